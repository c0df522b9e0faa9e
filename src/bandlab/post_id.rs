use std::fmt::Display;

use once_cell::sync::Lazy;
use regex::Regex;

static PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:post|track)/(?P<id>[a-zA-Z0-9_-]+)").unwrap());
static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12}")
        .unwrap()
});

/// Identifier of a post as the posts API knows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostId(Box<str>);

impl PostId {
    pub fn new(id: &str) -> Self {
        Self(id.into())
    }
}

impl Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type Strategy = fn(&str) -> Option<PostId>;

/// Tried in order against the cleaned link
pub static URL_STRATEGIES: [(&str, Strategy); 2] = [("path", path_id), ("uuid", uuid)];

/// `post/<id>` or `track/<id>`, ids may be composite like `<hex>_<hex>`
fn path_id(url: &str) -> Option<PostId> {
    PATH_RE
        .captures(url)
        .and_then(|c| c.name("id"))
        .map(|m| PostId::new(m.as_str()))
}

fn uuid(url: &str) -> Option<PostId> {
    UUID_RE.find(url).map(|m| PostId::new(m.as_str()))
}

/// First post id any URL strategy finds, along with the strategy's name
pub fn from_url(url: &str) -> Option<(&'static str, PostId)> {
    URL_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(url).map(|id| (*name, id)))
}
