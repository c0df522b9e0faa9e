//! Subset of the posts API response the resolver reads

use serde::Deserialize;
use url::Url;

use crate::link::Platform;

pub static UNKNOWN_ARTIST: &str = "Unknown Artist";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    revision: Option<Revision>,
    waveform_url: Option<String>,
    caption: Option<String>,
    creator: Option<Person>,
    author: Option<Person>,
    picture: Option<Picture>,
}

#[derive(Debug, Deserialize)]
struct Revision {
    mixdown: Option<Mixdown>,
    song: Option<Song>,
}

#[derive(Debug, Deserialize)]
struct Mixdown {
    file: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Song {
    name: Option<String>,
    picture: Option<Picture>,
}

#[derive(Debug, Deserialize)]
struct Person {
    name: Option<String>,
    username: Option<String>,
    picture: Option<Picture>,
}

#[derive(Debug, Deserialize)]
struct Picture {
    url: Option<String>,
}

/// Blank strings count as missing
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

impl Picture {
    fn url(&self) -> Option<&str> {
        present(&self.url)
    }
}

/// The audio sits beside the waveform data, `<name>.json` becomes `<name>.m4a`.
/// Only the end of the path is rewritten, query and host are left alone.
fn waveform_audio_url(waveform_url: &str) -> String {
    let Ok(mut url) = Url::parse(waveform_url) else {
        return match waveform_url.strip_suffix(".json") {
            Some(stem) => format!("{stem}.m4a"),
            None => waveform_url.to_owned(),
        };
    };
    if let Some(stem) = url.path().strip_suffix(".json") {
        let path = format!("{stem}.m4a");
        url.set_path(&path);
    }
    url.into()
}

impl Post {
    fn song(&self) -> Option<&Song> {
        self.revision.as_ref()?.song.as_ref()
    }

    /// Rendered mixdown first, then the audio sitting next to the waveform data
    pub fn audio_url(&self) -> Option<String> {
        let mixdown = self
            .revision
            .as_ref()
            .and_then(|r| r.mixdown.as_ref())
            .and_then(|m| present(&m.file));
        if let Some(file) = mixdown {
            return Some(file.to_owned());
        }
        present(&self.waveform_url).map(waveform_audio_url)
    }

    pub fn title(&self) -> String {
        self.song()
            .and_then(|s| present(&s.name))
            .or_else(|| present(&self.caption))
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{} Track", Platform::Bandlab.display_name()))
    }

    pub fn artist(&self) -> String {
        let creator = self.creator.as_ref();
        creator
            .and_then(|c| present(&c.name))
            .or_else(|| creator.and_then(|c| present(&c.username)))
            .or_else(|| self.author.as_ref().and_then(|a| present(&a.name)))
            .unwrap_or(UNKNOWN_ARTIST)
            .to_owned()
    }

    pub fn cover_url(&self) -> Option<String> {
        self.picture
            .as_ref()
            .and_then(Picture::url)
            .or_else(|| {
                self.song()
                    .and_then(|s| s.picture.as_ref())
                    .and_then(Picture::url)
            })
            .or_else(|| {
                self.creator
                    .as_ref()
                    .and_then(|c| c.picture.as_ref())
                    .and_then(Picture::url)
            })
            .map(str::to_owned)
    }
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn post(value: serde_json::Value) -> Post {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn mixdown_beats_waveform() {
        let p = post(json!({
            "revision": { "mixdown": { "file": "https://cdn.example/mix.m4a" } },
            "waveformUrl": "https://cdn.example/wave.json"
        }));
        assert_eq!(p.audio_url().as_deref(), Some("https://cdn.example/mix.m4a"));
    }

    #[test]
    fn waveform_rewritten() {
        let p = post(json!({
            "revision": { "mixdown": null },
            "waveformUrl": "https://cdn.example/a/abc.json"
        }));
        assert_eq!(p.audio_url().as_deref(), Some("https://cdn.example/a/abc.m4a"));

        let p = post(json!({ "waveformUrl": "https://cdn.example/abc.json?sig=1" }));
        assert_eq!(p.audio_url().as_deref(), Some("https://cdn.example/abc.m4a?sig=1"));
    }

    #[test]
    fn waveform_only_path_suffix_rewritten() {
        let p = post(json!({
            "waveformUrl": "https://waveforms.json.example/data.json/abc.json?format=json"
        }));
        assert_eq!(
            p.audio_url().as_deref(),
            Some("https://waveforms.json.example/data.json/abc.m4a?format=json")
        );

        let p = post(json!({ "waveformUrl": "https://cdn.example/abc.png" }));
        assert_eq!(p.audio_url().as_deref(), Some("https://cdn.example/abc.png"));
        assert_eq!(waveform_audio_url("relative/abc.json"), "relative/abc.m4a");
    }

    #[test]
    fn no_audio() {
        assert_eq!(post(json!({})).audio_url(), None);
        assert_eq!(
            post(json!({ "revision": { "mixdown": { "file": "" } } })).audio_url(),
            None
        );
    }

    #[test]
    fn title_chain() {
        let p = post(json!({
            "revision": { "song": { "name": "Song Name" } },
            "caption": "a caption"
        }));
        assert_eq!(p.title(), "Song Name");
        assert_eq!(post(json!({ "caption": "a caption" })).title(), "a caption");
        assert_eq!(
            post(json!({ "revision": { "song": { "name": "" } } })).title(),
            "BandLab Track"
        );
    }

    #[test]
    fn artist_chain() {
        let p = post(json!({
            "creator": { "name": "Display", "username": "handle" },
            "author": { "name": "Author" }
        }));
        assert_eq!(p.artist(), "Display");
        let p = post(json!({
            "creator": { "username": "handle" },
            "author": { "name": "Author" }
        }));
        assert_eq!(p.artist(), "handle");
        assert_eq!(post(json!({ "author": { "name": "Author" } })).artist(), "Author");
        assert_eq!(post(json!({})).artist(), UNKNOWN_ARTIST);
    }

    #[test]
    fn cover_chain() {
        let p = post(json!({
            "picture": { "url": "post.jpg" },
            "revision": { "song": { "picture": { "url": "song.jpg" } } },
            "creator": { "picture": { "url": "creator.jpg" } }
        }));
        assert_eq!(p.cover_url().as_deref(), Some("post.jpg"));
        let p = post(json!({
            "picture": {},
            "revision": { "song": { "picture": { "url": "song.jpg" } } },
            "creator": { "picture": { "url": "creator.jpg" } }
        }));
        assert_eq!(p.cover_url().as_deref(), Some("song.jpg"));
        let p = post(json!({ "creator": { "picture": { "url": "creator.jpg" } } }));
        assert_eq!(p.cover_url().as_deref(), Some("creator.jpg"));
        assert_eq!(post(json!({})).cover_url(), None);
    }

    #[test]
    fn unknown_fields_ignored() {
        let p = post(json!({ "id": "x", "counters": { "likes": 3 }, "caption": "c" }));
        assert_eq!(p.title(), "c");
    }
}
