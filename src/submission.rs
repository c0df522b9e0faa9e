//! Songs submitted through the awards sign-up form, as exported to a spreadsheet

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::bandlab::UNKNOWN_ARTIST;
use crate::link::{classify, normalize, Platform};

pub type Row = HashMap<String, Value>;

pub static URL_COLUMN: &str = "Drop a track or video link (Short answer, required)";
pub static ARTIST_COLUMN: &str = "BandLab Username (Short answer, required)";
pub static SOCIAL_COLUMN: &str = "Social Handles (Optional) (Short answer)";
pub static CATEGORY_COLUMN: &str = "What category fits you best? (Short answer, optional)";
pub static REASON_COLUMN: &str =
    "Why should you be part of the BandLab Choice Awards? (Paragraph, optional)";
pub static PERMISSION_COLUMN: &str =
    "Do you give permission to be featured on Twitch/YouTube during the show?";
pub static NOMINATIONS_COLUMN: &str =
    "List up to 5 BandLab artists you think deserve a nomination";

pub static UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SongStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Approve,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub user_id: String,
    pub user_name: String,
    pub vote: VoteChoice,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub approve: usize,
    pub reject: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub url: String,
    pub extracted_url: String,
    pub platform: Platform,
    pub status: SongStatus,
    pub artist_name: String,
    pub song_name: String,
    pub social_handles: String,
    pub submission_category: String,
    pub submission_reason: String,
    pub feature_permission: String,
    pub nominations: String,
    pub votes: Vec<Vote>,
    pub notes: String,
    pub created_at: i64,
}

/// Cell text, numbers and booleans stringified, anything else blank
fn cell(row: &Row, column: &str) -> String {
    match row.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

pub fn now_millis() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    i64::try_from(nanos).unwrap_or(i64::MAX)
}

impl Song {
    pub fn from_row(row: &Row) -> Self {
        let url = cell(row, URL_COLUMN).trim().to_owned();
        let extracted_url = normalize(&url).unwrap_or(&url).to_owned();
        let artist_name = match cell(row, ARTIST_COLUMN) {
            name if name.is_empty() => UNKNOWN_ARTIST.to_owned(),
            name => name,
        };

        Self {
            platform: classify(&url),
            extracted_url,
            url,
            status: SongStatus::Pending,
            artist_name,
            song_name: UNTITLED.to_owned(),
            social_handles: cell(row, SOCIAL_COLUMN),
            submission_category: cell(row, CATEGORY_COLUMN),
            submission_reason: cell(row, REASON_COLUMN),
            feature_permission: cell(row, PERMISSION_COLUMN),
            nominations: cell(row, NOMINATIONS_COLUMN),
            votes: Vec::new(),
            notes: String::new(),
            created_at: now_millis(),
        }
    }

    /// Record a vote, replacing any earlier vote by the same user
    pub fn cast_vote(&mut self, vote: Vote) {
        match self.votes.iter_mut().find(|v| v.user_id == vote.user_id) {
            Some(existing) => *existing = vote,
            None => self.votes.push(vote),
        }
    }

    pub fn tally(&self) -> Tally {
        self.votes.iter().fold(Tally::default(), |mut tally, v| {
            match v.vote {
                VoteChoice::Approve => tally.approve += 1,
                VoteChoice::Reject => tally.reject += 1,
            }
            tally
        })
    }

    pub fn set_status(&mut self, status: SongStatus) {
        self.status = status;
    }
}

pub fn import_rows(rows: &[Row]) -> Vec<Song> {
    rows.iter().map(Song::from_row).collect()
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    fn row(value: Value) -> Row {
        serde_json::from_value(value).unwrap()
    }

    fn vote(user: &str, choice: VoteChoice) -> Vote {
        Vote {
            user_id: user.into(),
            user_name: user.to_uppercase(),
            vote: choice,
            timestamp: 1,
        }
    }

    #[test]
    fn full_row() {
        let song = Song::from_row(&row(json!({
            "Timestamp": 45000.5,
            URL_COLUMN: "  Listen here https://www.bandlab.com/track/abc_123 thanks ",
            ARTIST_COLUMN: "someartist",
            SOCIAL_COLUMN: "@someartist",
            CATEGORY_COLUMN: "Producer",
            REASON_COLUMN: "Because",
            PERMISSION_COLUMN: "Yes",
            NOMINATIONS_COLUMN: "a, b, c",
        })));
        assert_eq!(song.url, "Listen here https://www.bandlab.com/track/abc_123 thanks");
        assert_eq!(song.extracted_url, "https://www.bandlab.com/track/abc_123");
        assert_eq!(song.platform, Platform::Bandlab);
        assert_eq!(song.status, SongStatus::Pending);
        assert_eq!(song.artist_name, "someartist");
        assert_eq!(song.song_name, UNTITLED);
        assert_eq!(song.social_handles, "@someartist");
        assert_eq!(song.submission_category, "Producer");
        assert_eq!(song.submission_reason, "Because");
        assert_eq!(song.feature_permission, "Yes");
        assert_eq!(song.nominations, "a, b, c");
        assert!(song.votes.is_empty());
        assert!(song.created_at > 0);
    }

    #[test]
    fn sparse_row() {
        let song = Song::from_row(&row(json!({ URL_COLUMN: 12345, ARTIST_COLUMN: "" })));
        assert_eq!(song.url, "12345");
        assert_eq!(song.extracted_url, "12345");
        assert_eq!(song.platform, Platform::Other);
        assert_eq!(song.artist_name, UNKNOWN_ARTIST);
        assert_eq!(song.social_handles, "");
        assert_eq!(song.nominations, "");

        let song = Song::from_row(&Row::new());
        assert_eq!(song.url, "");
        assert_eq!(song.extracted_url, "");
    }

    #[test]
    fn wire_format() {
        let song = Song::from_row(&row(json!({ URL_COLUMN: "https://youtu.be/dQw4w9WgXcQ" })));
        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(value["extractedUrl"], "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(value["platform"], "youtube");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["artistName"], UNKNOWN_ARTIST);
        assert!(value["createdAt"].is_i64());
    }

    #[test]
    fn later_vote_replaces_earlier() {
        let mut song = Song::from_row(&Row::new());
        song.cast_vote(vote("u1", VoteChoice::Approve));
        song.cast_vote(vote("u2", VoteChoice::Approve));
        song.cast_vote(vote("u1", VoteChoice::Reject));
        assert_eq!(song.votes.len(), 2);
        assert_eq!(song.tally(), Tally { approve: 1, reject: 1 });

        song.set_status(SongStatus::Approved);
        let value = serde_json::to_value(&song).unwrap();
        assert_eq!(value["status"], "approved");
        assert_eq!(value["votes"][0]["vote"], "reject");
        assert_eq!(value["votes"][0]["userName"], "U1");
    }
}
