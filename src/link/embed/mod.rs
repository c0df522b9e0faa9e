mod bandlab;
mod spotify;
mod youtube;

use self::bandlab::BandlabEmbed;
use self::spotify::SpotifyEmbed;
use self::youtube::YoutubeEmbed;
use super::{normalize, Platform};

pub use self::bandlab::embed_url as bandlab_embed_url;

/// Derives an embeddable URL from nothing but the link itself.
///
/// Returning `None` means the link is left as it is.
pub trait EmbedResolver {
    fn resolve(_url: &str) -> Option<String> {
        None
    }
}

struct PassthroughEmbed;

impl EmbedResolver for PassthroughEmbed {}

/// Best-effort embed URL for a link, falling back to the normalized link itself
pub fn resolve_embed(url: &str, platform: Platform) -> String {
    let link = normalize(url).unwrap_or(url);
    let embed = match platform {
        Platform::Spotify => SpotifyEmbed::resolve(link),
        Platform::Bandlab => BandlabEmbed::resolve(link),
        Platform::Youtube => YoutubeEmbed::resolve(link),
        Platform::Soundcloud | Platform::Other => PassthroughEmbed::resolve(link),
    };
    embed.unwrap_or_else(|| link.to_owned())
}
