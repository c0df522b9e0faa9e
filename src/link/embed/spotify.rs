use url::Url;

use super::EmbedResolver;

pub struct SpotifyEmbed;

impl EmbedResolver for SpotifyEmbed {
    fn resolve(url: &str) -> Option<String> {
        let url = Url::parse(url).ok()?;
        if url.path().starts_with("/embed/") {
            return Some(url.into());
        }
        Some(format!("https://open.spotify.com/embed{}", url.path()))
    }
}
