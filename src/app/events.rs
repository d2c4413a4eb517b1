use crate::color::Rgb;
use crate::lyrics::TimedLine;
use crate::playback::NowPlaying;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    /// Local clock tick.
    Tick(Instant),
    Network(NetworkEvent),
    Preview(PreviewEvent),
}

#[derive(Debug, Clone)]
pub enum InputEvent {
    Key(crossterm::event::KeyEvent),
    Resize,
}

/// Playback state of the preview clip, as reported by mpv.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEvent {
    Started,
    Ended,
    Failed(String),
    /// The IPC connection closed; mpv is gone.
    Exited,
}

/// Results of background requests. Everything tied to a track carries its
/// id so late arrivals for a previous track can be dropped.
#[derive(Debug, Clone)]
pub enum NetworkEvent {
    Snapshot(NowPlaying),
    SnapshotFailed(String),
    LyricsLoaded { track_id: String, lines: Vec<TimedLine> },
    LyricsFailed { track_id: String, error: String },
    PreviewFound { track_id: String, url: String },
    PreviewNotFound { track_id: String },
    AlbumColor { track_id: String, color: Rgb },
    LinkFailed(String),
}
