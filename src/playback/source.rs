//! HTTP client for the now-playing backend.

use super::snapshot::{self, NowPlaying};
use anyhow::Context;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct NowPlayingClient {
    client: reqwest::Client,
    url: String,
}

impl NowPlayingClient {
    pub fn new(url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build now-playing http client")?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    /// Fetch one snapshot.
    ///
    /// Transport and HTTP errors are returned; a body that does not match
    /// the expected shape is reported as [`NowPlaying::Nothing`].
    pub async fn fetch(&self) -> anyhow::Result<NowPlaying> {
        let url = cache_busted(&self.url, unix_millis());
        debug!(%url, "poll now-playing");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(reqwest::header::PRAGMA, "no-cache")
            .send()
            .await
            .with_context(|| format!("GET {}", self.url))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("now-playing backend error: {status}");
        }

        let body = response.text().await.context("read now-playing body")?;
        Ok(snapshot::decode(&body, Instant::now()))
    }
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Append a `t` query parameter so intermediaries never serve a stale copy.
fn cache_busted(url: &str, stamp: u128) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}t={stamp}")
}
