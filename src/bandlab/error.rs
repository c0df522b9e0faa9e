use std::error::Error;
use std::fmt::Display;

#[derive(Debug)]
pub enum ResolveError {
    /// Every strategy ran and none produced audio or an embed id
    NotFound,
    /// The post page could not be fetched and nothing else resolved the link
    Upstream(String),
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound => write!(f, "Could not find embed ID in page"),
            Self::Upstream(reason) => write!(f, "{reason}"),
        }
    }
}

impl Error for ResolveError {}

impl From<reqwest::Error> for ResolveError {
    fn from(error: reqwest::Error) -> Self {
        Self::Upstream(error.to_string())
    }
}
