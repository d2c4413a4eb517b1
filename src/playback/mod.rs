//! Remote playback state: polling, validation and the local clock.

pub mod clock;
pub mod snapshot;
pub mod source;

pub use clock::{ClockTuning, IngestOutcome, PlaybackClock};
pub use snapshot::{NowPlaying, PlaybackSnapshot};
pub use source::NowPlayingClient;

/// Format milliseconds as `m:ss`.
pub fn format_time(ms: u64) -> String {
    let total_secs = ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}
