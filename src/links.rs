//! Search links to the current track on Spotify and YouTube.

use anyhow::{bail, Context};
use tokio::process::Command;
use tracing::{debug, info};

/// Desktop-app URI; opens the Spotify client when it is installed.
pub fn spotify_uri(track: &str, artist: &str) -> String {
    let query = format!("track:{} artist:{}", track.trim(), artist.trim());
    format!("spotify:search:{}", urlencoding::encode(&query))
}

pub fn spotify_web_url(track: &str, artist: &str) -> String {
    let query = format!("{} {}", track.trim(), artist.trim());
    format!("https://open.spotify.com/search/{}", urlencoding::encode(&query))
}

pub fn youtube_url(track: &str, artist: &str) -> String {
    let query = format!("{} {} official music video", track.trim(), artist.trim());
    format!(
        "https://www.youtube.com/results?search_query={}",
        urlencoding::encode(&query)
    )
}

/// Open the Spotify app, or the web player if no handler takes the URI.
/// Returns the link that was opened.
pub async fn open_spotify(track: &str, artist: &str) -> anyhow::Result<String> {
    let uri = spotify_uri(track, artist);
    match open_url(&uri).await {
        Ok(()) => Ok(uri),
        Err(e) => {
            debug!(error = %format!("{e:#}"), "spotify uri not handled, using web");
            let web = spotify_web_url(track, artist);
            open_url(&web).await?;
            Ok(web)
        }
    }
}

pub async fn open_youtube(track: &str, artist: &str) -> anyhow::Result<String> {
    let url = youtube_url(track, artist);
    open_url(&url).await?;
    Ok(url)
}

/// Hand `url` to the desktop opener and wait for it to accept.
pub async fn open_url(url: &str) -> anyhow::Result<()> {
    let opener = if cfg!(target_os = "macos") { "open" } else { "xdg-open" };
    let status = Command::new(opener)
        .arg(url)
        .stdin(std::process::Stdio::null())
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .await
        .with_context(|| format!("spawn {opener}"))?;
    if !status.success() {
        bail!("{opener} exited with {status}");
    }
    info!(%url, "opened link");
    Ok(())
}
