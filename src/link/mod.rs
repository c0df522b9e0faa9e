pub mod embed;
mod normalize;
mod platform;

use serde::Serialize;

pub use self::embed::{bandlab_embed_url, resolve_embed};
pub use self::normalize::{find_url, normalize};
pub use self::platform::{classify, Platform};

/// Result of resolving a link over the network. Every field is optional, an
/// empty value means the link could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMedia {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embed_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

impl ResolvedMedia {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
