use once_cell::sync::Lazy;
use regex::Regex;

use super::post_id::PostId;

static DEEP_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"bandlab://posts/(?P<id>[a-zA-Z0-9_-]+)").unwrap());
static EMBED_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https://www\.bandlab\.com/embed/\?id=(?P<id>[a-zA-Z0-9_-]+)").unwrap()
});
static EMBED_SRC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"src="https://www\.bandlab\.com/embed/\?id=(?P<id>[a-zA-Z0-9_-]+)""#).unwrap()
});

pub type Strategy = fn(&str) -> Option<String>;

/// Tried in order against the post page markup
pub static EMBED_STRATEGIES: [(&str, Strategy); 2] =
    [("embed url", embed_url), ("embed src", embed_src)];

fn capture_id(re: &Regex, html: &str) -> Option<String> {
    re.captures(html)
        .and_then(|c| c.name("id"))
        .map(|m| m.as_str().to_owned())
}

fn embed_url(html: &str) -> Option<String> {
    capture_id(&EMBED_URL_RE, html)
}

fn embed_src(html: &str) -> Option<String> {
    capture_id(&EMBED_SRC_RE, html)
}

/// Post id from the app deep link the page advertises in its meta tags
pub fn deep_link_post_id(html: &str) -> Option<PostId> {
    capture_id(&DEEP_LINK_RE, html).map(|id| PostId::new(&id))
}

pub fn embed_id(html: &str) -> Option<(&'static str, String)> {
    EMBED_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(html).map(|id| (*name, id)))
}
