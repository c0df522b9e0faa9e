use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::normalize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Youtube,
    Spotify,
    Soundcloud,
    Bandlab,
    Other,
}

/// Hostname fragments in match order
static PLATFORM_HOSTS: [(&str, Platform); 5] = [
    ("youtube.com", Platform::Youtube),
    ("youtu.be", Platform::Youtube),
    ("spotify.com", Platform::Spotify),
    ("soundcloud.com", Platform::Soundcloud),
    ("bandlab.com", Platform::Bandlab),
];

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Youtube => "youtube",
            Self::Spotify => "spotify",
            Self::Soundcloud => "soundcloud",
            Self::Bandlab => "bandlab",
            Self::Other => "other",
        }
    }

    /// Name as the provider writes it
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Youtube => "YouTube",
            Self::Spotify => "Spotify",
            Self::Soundcloud => "SoundCloud",
            Self::Bandlab => "BandLab",
            Self::Other => "Other",
        }
    }
}

impl Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tag a submitted link with the platform hosting it
pub fn classify(url: &str) -> Platform {
    let url = match normalize(url) {
        Some(url) => url.to_ascii_lowercase(),
        None => return Platform::Other,
    };
    PLATFORM_HOSTS
        .iter()
        .find(|(host, _)| url.contains(host))
        .map(|(_, platform)| *platform)
        .unwrap_or(Platform::Other)
}
