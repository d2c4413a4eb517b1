//! Lyrics module for fetching and synchronizing timed lyrics
//!
//! This module provides:
//! - LRCLIB API client for fetching lyrics
//! - LRC format parser
//! - Display timeline construction (waiting entries, capped gaps)
//! - Cursor lookup for karaoke rendering

pub mod cursor;
pub mod lrclib;
pub mod parser;
pub mod timeline;

pub use cursor::{locate, Cursor};
pub use lrclib::LrclibClient;
pub use parser::TimedLine;
pub use timeline::TimelineEntry;

use lru::LruCache;
use std::num::NonZeroUsize;

/// Fetch and parse synced lyrics for a track.
///
/// `Ok(vec![])` means LRCLIB has nothing usable for this track.
pub async fn fetch_lyrics(
    client: &LrclibClient,
    title: &str,
    artist: &str,
) -> anyhow::Result<Vec<TimedLine>> {
    let raw = client.synced_lyrics(title, artist).await?;
    Ok(raw.as_deref().map(parser::parse).unwrap_or_default())
}

/// In-memory cache of parsed lyrics, keyed by track identity.
#[derive(Debug)]
pub struct LyricsCache {
    inner: LruCache<String, Vec<TimedLine>>,
}

impl LyricsCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: LruCache::new(capacity),
        }
    }

    pub fn get(&mut self, track_id: &str) -> Option<Vec<TimedLine>> {
        self.inner.get(track_id).cloned()
    }

    pub fn insert(&mut self, track_id: &str, lines: Vec<TimedLine>) {
        self.inner.put(track_id.to_string(), lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_evicts_least_recent() {
        let mut cache = LyricsCache::new(2);
        cache.insert("a", vec![TimedLine::new(0, "a")]);
        cache.insert("b", vec![TimedLine::new(0, "b")]);
        assert!(cache.get("a").is_some());
        cache.insert("c", vec![]);
        assert!(cache.get("b").is_none());
        assert!(cache.get("a").is_some());
        assert_eq!(cache.get("c"), Some(vec![]));
    }

    #[test]
    fn test_zero_capacity_still_holds_one() {
        let mut cache = LyricsCache::new(0);
        cache.insert("a", vec![]);
        assert!(cache.get("a").is_some());
    }
}
