//! Deezer search client, used only to find a 30 second preview clip.

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    preview: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeezerClient {
    client: reqwest::Client,
    base_url: String,
}

impl DeezerClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.deezer.com";

    pub fn new(base_url: &str, timeout: std::time::Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build deezer http client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Preview URL of the best match for `track artist`, if any.
    pub async fn preview_url(&self, track: &str, artist: &str) -> anyhow::Result<Option<String>> {
        let query = format!("{track} {artist}");
        let url = format!(
            "{}/search?q={}&limit=1",
            self.base_url,
            urlencoding::encode(query.trim())
        );
        debug!(%url, "deezer search");

        let response = self.client.get(&url).send().await.context("deezer search")?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            anyhow::bail!("Deezer search error: {}", response.status());
        }

        let body = response.text().await.context("read deezer body")?;
        first_preview(&body)
    }
}

fn first_preview(body: &str) -> anyhow::Result<Option<String>> {
    let parsed: SearchResponse = serde_json::from_str(body).context("decode deezer search")?;
    Ok(parsed
        .data
        .into_iter()
        .next()
        .and_then(|hit| hit.preview)
        .filter(|p| !p.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_preview() {
        let body = r#"{"data":[{"id":3135556,"title":"Harder, Better, Faster, Stronger",
            "preview":"https://cdns-preview-d.dzcdn.net/stream/c-deda7fa9316d9e9e880d2c6207e92260-8.mp3"}],
            "total":1}"#;
        assert_eq!(
            first_preview(body).unwrap().as_deref(),
            Some("https://cdns-preview-d.dzcdn.net/stream/c-deda7fa9316d9e9e880d2c6207e92260-8.mp3")
        );
    }

    #[test]
    fn test_no_hits() {
        assert_eq!(first_preview(r#"{"data":[],"total":0}"#).unwrap(), None);
        assert_eq!(first_preview(r#"{"data":[{"preview":""}]}"#).unwrap(), None);
        // Deezer reports quota and query errors with a 200 and an error object.
        assert_eq!(
            first_preview(r#"{"error":{"type":"Exception","message":"Quota limit exceeded","code":4}}"#)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(first_preview("<html>").is_err());
    }
}
