//! Now-playing payload validation.
//!
//! The backend returns
//! `{track, artist, albumArt, progressMs, durationMs, isPlaying, id?}`.
//! Anything that does not fit that shape is treated as "nothing playing".

use serde::Deserialize;
use std::time::Instant;
use tracing::warn;

/// Authoritative, already-stale sample of the remote player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub track_id: String,
    pub track: String,
    pub artist: String,
    pub album_art: Option<String>,
    pub progress_ms: u64,
    pub duration_ms: u64,
    pub is_playing: bool,
    pub received_at: Instant,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NowPlaying {
    Nothing,
    Track(PlaybackSnapshot),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    id: Option<String>,
    track: Option<String>,
    artist: Option<String>,
    album_art: Option<String>,
    progress_ms: Option<f64>,
    duration_ms: Option<f64>,
    is_playing: Option<bool>,
}

/// Validate a response body received at `received_at`.
pub fn decode(body: &str, received_at: Instant) -> NowPlaying {
    let payload: Payload = match serde_json::from_str(body) {
        Ok(p) => p,
        Err(e) => {
            warn!(error = %e, "now-playing payload does not match schema");
            return NowPlaying::Nothing;
        }
    };

    let Some(track) = payload.track.filter(|t| !t.trim().is_empty()) else {
        return NowPlaying::Nothing;
    };

    let (Some(progress), Some(duration), Some(is_playing)) =
        (payload.progress_ms, payload.duration_ms, payload.is_playing)
    else {
        warn!(%track, "now-playing payload missing progress, duration or play state");
        return NowPlaying::Nothing;
    };

    let duration_ms = millis(duration);
    if duration_ms == 0 {
        warn!(%track, duration, "now-playing payload has no usable duration");
        return NowPlaying::Nothing;
    }
    let progress_ms = millis(progress).min(duration_ms);

    let artist = payload.artist.unwrap_or_default();
    let track_id = payload
        .id
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| format!("{track}\u{1f}{artist}"));

    NowPlaying::Track(PlaybackSnapshot {
        track_id,
        track,
        artist,
        album_art: payload.album_art.filter(|u| !u.is_empty()),
        progress_ms,
        duration_ms,
        is_playing,
        received_at,
    })
}

/// Non-finite and negative values collapse to zero.
fn millis(v: f64) -> u64 {
    if v.is_finite() && v > 0.0 {
        v.round() as u64
    } else {
        0
    }
}
