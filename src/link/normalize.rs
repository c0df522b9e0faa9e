use once_cell::sync::Lazy;
use regex::Regex;

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"https?://[^\s"<>]+"#).unwrap());

/// Find the first URL in a piece of free text
pub fn find_url(text: &str) -> Option<&str> {
    URL_RE.find(text).map(|m| m.as_str())
}

/// Recover a bare URL from a submitted string.
///
/// Returns the first URL found in `raw`, or `raw` unchanged if it contains none.
/// Blank input returns `None`.
pub fn normalize(raw: &str) -> Option<&str> {
    if raw.trim().is_empty() {
        return None;
    }
    Some(find_url(raw).unwrap_or(raw))
}
