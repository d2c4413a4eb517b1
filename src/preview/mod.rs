//! Short audio previews of the current track.
//!
//! The clip is looked up on Deezer and played through an idle `mpv`. While
//! it plays, the playback clock is overridden so the clip's own timeline
//! never leaks into the lyric position.

pub mod deezer;
pub mod mpv;

pub use deezer::DeezerClient;
pub use mpv::MpvHandle;

/// Preview availability and playback state for the current track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PreviewState {
    /// No lookup finished yet, or nothing was found.
    #[default]
    Unavailable,
    Ready { url: String },
    /// `loadfile` sent, waiting for mpv to start the clip.
    Starting { url: String },
    Playing { url: String },
}

impl PreviewState {
    pub fn url(&self) -> Option<&str> {
        match self {
            PreviewState::Unavailable => None,
            PreviewState::Ready { url }
            | PreviewState::Starting { url }
            | PreviewState::Playing { url } => Some(url),
        }
    }

    /// Whether a clip is loading or audible.
    pub fn is_active(&self) -> bool {
        matches!(self, PreviewState::Starting { .. } | PreviewState::Playing { .. })
    }

    /// Back to `Ready` once a clip ended, failed or was stopped.
    pub fn settle(&mut self) {
        if let Some(url) = self.url().map(str::to_string) {
            *self = PreviewState::Ready { url };
        }
    }
}
