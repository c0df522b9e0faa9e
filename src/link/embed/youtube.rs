use url::Url;

use super::EmbedResolver;

pub struct YoutubeEmbed;

impl EmbedResolver for YoutubeEmbed {
    fn resolve(url: &str) -> Option<String> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?.to_ascii_lowercase();
        let path = parsed.path();

        let id = if host == "youtu.be" || host.ends_with(".youtu.be") {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next())
                .map(str::to_owned)
        } else if path.contains("/embed/") {
            return Some(url.to_owned());
        } else if path.contains("/watch") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
        } else {
            path.strip_prefix("/shorts/")
                .and_then(|rest| rest.split('/').next())
                .map(str::to_owned)
        };

        id.filter(|id| !id.is_empty())
            .map(|id| format!("https://www.youtube.com/embed/{id}"))
    }
}
