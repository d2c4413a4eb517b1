//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API that provides synchronized (LRC format) lyrics.
//! API Documentation: https://lrclib.net/docs

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

/// LRCLIB API response
#[derive(Debug, Deserialize, Clone)]
pub struct LrclibResponse {
    #[serde(rename = "trackName")]
    pub track_name: String,
    #[serde(rename = "artistName")]
    pub artist_name: String,
    #[serde(rename = "syncedLyrics")]
    pub synced_lyrics: Option<String>,
}

impl LrclibResponse {
    fn synced(&self) -> Option<&str> {
        self.synced_lyrics
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

/// LRCLIB API client
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://lrclib.net/api";
    const USER_AGENT: &'static str = concat!("nowsync/", env!("CARGO_PKG_VERSION"));

    /// Create a new LRCLIB client
    pub fn new(base_url: &str, timeout: std::time::Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()
            .context("build lrclib http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get synced LRC text for a track, if LRCLIB has any.
    pub async fn synced_lyrics(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> anyhow::Result<Option<String>> {
        // First try the "get" endpoint with exact match
        if let Some(found) = self.get_exact(track_name, artist_name).await?
            && let Some(synced) = found.synced()
        {
            debug!(track = %found.track_name, artist = %found.artist_name, "lrclib exact match");
            return Ok(Some(synced.to_string()));
        }

        // Fall back to search
        let results = self.search(track_name, artist_name).await?;
        let picked = pick_synced(&results);
        if let Some(r) = picked {
            debug!(track = %r.track_name, artist = %r.artist_name, "lrclib search match");
        }
        Ok(picked.and_then(LrclibResponse::synced).map(str::to_string))
    }

    /// Get lyrics with exact match
    async fn get_exact(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> anyhow::Result<Option<LrclibResponse>> {
        let url = format!(
            "{}/get?track_name={}&artist_name={}",
            self.base_url,
            urlencoding::encode(track_name),
            urlencoding::encode(artist_name)
        );
        debug!(%url, "lrclib get");

        let response = self.client.get(&url).send().await.context("lrclib get")?;

        let status = response.status();
        if status.is_success() {
            let lyrics: LrclibResponse = response.json().await.context("decode lrclib get")?;
            Ok(Some(lyrics))
        } else if is_exact_miss(status) {
            debug!(%status, "lrclib get missed, trying search");
            Ok(None)
        } else {
            anyhow::bail!("LRCLIB API error: {status}");
        }
    }

    /// Search for lyrics
    async fn search(
        &self,
        track_name: &str,
        artist_name: &str,
    ) -> anyhow::Result<Vec<LrclibResponse>> {
        let query = format!("{} {}", track_name, artist_name);
        let url = format!(
            "{}/search?q={}",
            self.base_url,
            urlencoding::encode(&query)
        );
        debug!(%url, "lrclib search");

        let response = self.client.get(&url).send().await.context("lrclib search")?;

        if response.status().is_success() {
            response.json().await.context("decode lrclib search")
        } else if response.status() == reqwest::StatusCode::NOT_FOUND {
            Ok(Vec::new())
        } else {
            anyhow::bail!("LRCLIB search error: {}", response.status());
        }
    }
}

/// Client errors (404, or 400 for an incomplete query such as an empty
/// artist) mean there is no exact match; search may still find one.
fn is_exact_miss(status: reqwest::StatusCode) -> bool {
    status.is_client_error()
}

/// First search result that carries synced lyrics.
fn pick_synced(results: &[LrclibResponse]) -> Option<&LrclibResponse> {
    results.iter().find(|r| r.synced().is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_get_response() {
        let raw = r#"{
            "id": 3396226,
            "trackName": "I Want to Live",
            "artistName": "Borislav Slavov",
            "albumName": "Baldur's Gate 3",
            "duration": 233,
            "instrumental": false,
            "plainLyrics": "I feel your breath",
            "syncedLyrics": "[00:17.12] I feel your breath"
        }"#;
        let r: LrclibResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(r.track_name, "I Want to Live");
        assert_eq!(r.synced(), Some("[00:17.12] I feel your breath"));
    }

    #[test]
    fn test_pick_synced_skips_plain_only_results() {
        let raw = r#"[
            {"id": 1, "trackName": "a", "artistName": "x", "plainLyrics": "plain", "syncedLyrics": null},
            {"id": 2, "trackName": "a", "artistName": "x", "plainLyrics": null, "syncedLyrics": "  "},
            {"id": 3, "trackName": "a", "artistName": "x", "plainLyrics": null, "syncedLyrics": "[00:01.00]yes"}
        ]"#;
        let results: Vec<LrclibResponse> = serde_json::from_str(raw).unwrap();
        let picked = pick_synced(&results).unwrap();
        assert_eq!(picked.synced(), Some("[00:01.00]yes"));
        assert!(pick_synced(&results[..2]).is_none());
    }

    #[test]
    fn test_client_errors_fall_back_to_search() {
        use reqwest::StatusCode;
        assert!(is_exact_miss(StatusCode::NOT_FOUND));
        assert!(is_exact_miss(StatusCode::BAD_REQUEST));
        assert!(!is_exact_miss(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(!is_exact_miss(StatusCode::OK));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let c = LrclibClient::new("https://example.test/api/", std::time::Duration::from_secs(1))
            .unwrap();
        assert_eq!(c.base_url, "https://example.test/api");
    }
}
