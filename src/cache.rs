use std::collections::HashMap;
use std::sync::Arc;

use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

use crate::link::ResolvedMedia;

/// Remote resolutions keyed by normalized link, each kept for a fixed time.
/// Holds at most `max_entries`, the entry closest to expiry makes room for a new one.
#[derive(Clone)]
pub struct ResolutionCache {
    ttl: Duration,
    max_entries: usize,
    entries: Arc<Mutex<HashMap<Box<str>, Entry>>>,
}

struct Entry {
    expiry: OffsetDateTime,
    media: ResolvedMedia,
}

impl ResolutionCache {
    pub fn new(ttl_secs: u64, max_entries: usize) -> Self {
        Self {
            ttl: Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX)),
            max_entries,
            entries: Arc::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl.is_positive() && self.max_entries > 0
    }

    pub async fn get(&self, link: &str) -> Option<ResolvedMedia> {
        if !self.is_enabled() {
            return None;
        }
        let mut entries = self.entries.lock().await;
        let now = OffsetDateTime::now_utc();
        let expired = match entries.get(link) {
            Some(entry) if entry.expiry > now => return Some(entry.media.clone()),
            Some(_) => true,
            None => false,
        };
        if expired {
            entries.remove(link);
        }
        None
    }

    /// Store a resolution, empty ones are never cached
    pub async fn insert(&self, link: &str, media: &ResolvedMedia) {
        if !self.is_enabled() || media.is_empty() {
            return;
        }
        let now = OffsetDateTime::now_utc();
        let Some(expiry) = now.checked_add(self.ttl) else {
            return;
        };
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.expiry > now);
        if entries.len() >= self.max_entries && !entries.contains_key(link) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, entry)| entry.expiry)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                entries.remove(&key);
            }
        }
        entries.insert(
            link.into(),
            Entry {
                expiry,
                media: media.clone(),
            },
        );
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
