use crate::color::Rgb;
use crate::lyrics::{self, timeline, Cursor, TimedLine, TimelineEntry};
use crate::playback::{ClockTuning, NowPlaying, PlaybackClock, PlaybackSnapshot};
use crate::preview::PreviewState;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub created_at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Info,
            created_at: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: ToastKind::Error,
            created_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.created_at.elapsed() > std::time::Duration::from_secs(3)
    }
}

/// What the loop has to do after a snapshot was applied.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SnapshotEffect {
    /// Set when a different track started; fetch its lyrics, preview and color.
    pub new_track: Option<PlaybackSnapshot>,
    /// The previous track went away; cancel its work and stop any preview.
    pub track_ended: bool,
}

pub struct AppState {
    pub should_quit: bool,
    /// Clock ticks since start; drives the loading spinner.
    pub tick: u64,
    /// True until the first poll answered.
    pub loading: bool,

    pub clock: PlaybackClock,

    // Lyrics of the current track
    pub timeline: Vec<TimelineEntry>,
    pub lyrics_loading: bool,

    // Preview
    pub preview: PreviewState,
    pub preview_volume: u8,

    /// Dominant color of the current album art.
    pub accent: Option<Rgb>,

    pub show_help: bool,
    pub toast: Option<Toast>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ClockTuning::default())
    }
}

impl AppState {
    pub fn new(tuning: ClockTuning) -> Self {
        Self {
            should_quit: false,
            tick: 0,
            loading: true,
            clock: PlaybackClock::new(tuning),
            timeline: Vec::new(),
            lyrics_loading: false,
            preview: PreviewState::Unavailable,
            preview_volume: 50,
            accent: None,
            show_help: false,
            toast: None,
        }
    }

    pub fn track(&self) -> Option<&PlaybackSnapshot> {
        self.clock.snapshot()
    }

    pub fn is_current(&self, track_id: &str) -> bool {
        self.track().is_some_and(|t| t.track_id == track_id)
    }

    pub fn cursor(&self) -> Cursor {
        lyrics::locate(&self.timeline, self.clock.estimated_progress_ms())
    }

    pub fn tick(&mut self, now: Instant) {
        self.tick = self.tick.wrapping_add(1);
        self.clock.tick(now);
    }

    pub fn apply_snapshot(&mut self, now_playing: NowPlaying) -> SnapshotEffect {
        self.loading = false;

        let snapshot = match now_playing {
            NowPlaying::Track(s) => s,
            NowPlaying::Nothing => {
                let had_track = self.track().is_some();
                if had_track {
                    info!("nothing playing");
                    self.reset_track();
                    self.clock.clear();
                }
                return SnapshotEffect {
                    new_track: None,
                    track_ended: had_track,
                };
            }
        };

        let had_track = self.track().is_some();
        let outcome = self.clock.ingest(snapshot);
        if !outcome.track_changed {
            if outcome.resynced {
                info!("position corrected");
            }
            return SnapshotEffect::default();
        }

        self.reset_track();
        let track = self.clock.snapshot().cloned();
        if let Some(t) = &track {
            info!(track = %t.track, artist = %t.artist, "track changed");
            // Waiting entry until the lyrics arrive.
            self.timeline = timeline::waiting(t.duration_ms);
            self.lyrics_loading = true;
        }

        SnapshotEffect {
            new_track: track,
            track_ended: had_track,
        }
    }

    /// Install lyrics for `track_id`. Returns false for a stale result.
    pub fn apply_lyrics(&mut self, track_id: &str, lines: &[TimedLine]) -> bool {
        if !self.is_current(track_id) {
            return false;
        }
        self.timeline = if lines.is_empty() {
            timeline::waiting(self.clock.duration_ms())
        } else {
            timeline::build(lines)
        };
        self.lyrics_loading = false;
        true
    }

    pub fn apply_lyrics_failed(&mut self, track_id: &str) -> bool {
        self.apply_lyrics(track_id, &[])
    }

    pub fn apply_preview_url(&mut self, track_id: &str, url: Option<String>) -> bool {
        if !self.is_current(track_id) {
            return false;
        }
        self.preview = match url {
            Some(url) => PreviewState::Ready { url },
            None => PreviewState::Unavailable,
        };
        true
    }

    pub fn apply_color(&mut self, track_id: &str, color: Rgb) -> bool {
        if !self.is_current(track_id) {
            return false;
        }
        self.accent = Some(color);
        true
    }

    /// mpv started the clip. Returns whether the clock entered override.
    pub fn preview_started(&mut self) -> bool {
        let PreviewState::Starting { url } = &self.preview else {
            // A clip from a previous track finished loading after we moved on.
            return false;
        };
        self.preview = PreviewState::Playing { url: url.clone() };
        self.clock.set_overridden(true)
    }

    /// The clip ended, failed or was stopped. Returns whether the clock left
    /// override, in which case it should be resynced right away.
    pub fn preview_stopped(&mut self) -> bool {
        self.preview.settle();
        self.clock.set_overridden(false)
    }

    /// mpv went away. Previews are off for the rest of the session and the
    /// clock follows the backend again. Returns whether override was left.
    pub fn preview_player_lost(&mut self) -> bool {
        self.preview = PreviewState::Unavailable;
        self.clock.set_overridden(false)
    }

    fn reset_track(&mut self) {
        self.timeline.clear();
        self.lyrics_loading = false;
        self.preview = PreviewState::Unavailable;
        self.accent = None;
        self.clock.set_overridden(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lyrics::timeline::WAITING_TEXT;
    use std::time::Duration;

    fn snap(track_id: &str, progress_ms: u64, at: Instant) -> NowPlaying {
        NowPlaying::Track(PlaybackSnapshot {
            track_id: track_id.to_string(),
            track: format!("{track_id} title"),
            artist: "artist".to_string(),
            album_art: Some("https://img/a.jpg".to_string()),
            progress_ms,
            duration_ms: 180_000,
            is_playing: true,
            received_at: at,
        })
    }

    #[test]
    fn test_first_snapshot_starts_track_with_waiting_entry() {
        let mut state = AppState::default();
        assert!(state.loading);
        let effect = state.apply_snapshot(snap("a", 0, Instant::now()));
        assert!(!state.loading);
        assert!(!effect.track_ended);
        assert_eq!(effect.new_track.map(|t| t.track_id), Some("a".to_string()));
        assert!(state.lyrics_loading);
        assert_eq!(state.timeline.len(), 1);
        assert_eq!(state.timeline[0].text, WAITING_TEXT);
    }

    #[test]
    fn test_same_track_has_no_effect() {
        let t0 = Instant::now();
        let mut state = AppState::default();
        state.apply_snapshot(snap("a", 0, t0));
        assert_eq!(state.apply_snapshot(snap("a", 5000, t0)), SnapshotEffect::default());
    }

    #[test]
    fn test_stale_lyrics_are_dropped() {
        let t0 = Instant::now();
        let mut state = AppState::default();
        state.apply_snapshot(snap("a", 0, t0));
        let effect = state.apply_snapshot(snap("b", 0, t0));
        assert!(effect.track_ended);

        assert!(!state.apply_lyrics("a", &[TimedLine::new(0, "old song")]));
        assert!(state.lyrics_loading);

        assert!(state.apply_lyrics("b", &[TimedLine::new(0, "new song")]));
        assert!(!state.lyrics_loading);
        assert_eq!(state.timeline[0].text, "new song");
    }

    #[test]
    fn test_missing_lyrics_show_waiting_entry() {
        let mut state = AppState::default();
        state.apply_snapshot(snap("a", 0, Instant::now()));
        assert!(state.apply_lyrics_failed("a"));
        assert_eq!(state.timeline, timeline::waiting(180_000));
    }

    #[test]
    fn test_cursor_follows_clock() {
        let t0 = Instant::now();
        let mut state = AppState::default();
        state.apply_snapshot(snap("a", 0, t0));
        state.apply_lyrics(
            "a",
            &[TimedLine::new(0, "one"), TimedLine::new(2000, "two three")],
        );
        // 600 ms latency offset applies.
        assert_eq!(state.cursor().active_index, 0);
        state.tick(t0 + Duration::from_millis(1400));
        assert_eq!(state.cursor().active_index, 1);
        assert_eq!(state.cursor().line_progress, 0.0);
    }

    #[test]
    fn test_nothing_playing_clears_everything() {
        let t0 = Instant::now();
        let mut state = AppState::default();
        state.apply_snapshot(snap("a", 0, t0));
        state.apply_preview_url("a", Some("https://p/a.mp3".into()));
        state.accent = Some(Rgb::new(1, 2, 3));

        let effect = state.apply_snapshot(NowPlaying::Nothing);
        assert!(effect.track_ended);
        assert!(state.track().is_none());
        assert!(state.timeline.is_empty());
        assert_eq!(state.preview, PreviewState::Unavailable);

        // Repeated "nothing" is quiet.
        assert_eq!(state.apply_snapshot(NowPlaying::Nothing), SnapshotEffect::default());

        // The same track coming back counts as a new track.
        assert!(state.apply_snapshot(snap("a", 0, t0)).new_track.is_some());
    }

    #[test]
    fn test_preview_lifecycle_drives_override() {
        let t0 = Instant::now();
        let mut state = AppState::default();
        state.apply_snapshot(snap("a", 10_000, t0));
        assert!(state.apply_preview_url("a", Some("https://p/a.mp3".into())));

        // Not loading yet: a stray start is ignored.
        assert!(!state.preview_started());
        assert!(!state.clock.is_overridden());

        state.preview = PreviewState::Starting {
            url: "https://p/a.mp3".into(),
        };
        assert!(state.preview_started());
        assert!(state.clock.is_overridden());

        state.tick(t0 + Duration::from_secs(5));
        assert_eq!(state.clock.estimated_progress_ms(), 10_600);

        assert!(state.preview_stopped());
        assert!(!state.clock.is_overridden());
        assert_eq!(
            state.preview,
            PreviewState::Ready {
                url: "https://p/a.mp3".into()
            }
        );
    }

    #[test]
    fn test_lost_player_unfreezes_clock() {
        let t0 = Instant::now();
        let mut state = AppState::default();
        state.apply_snapshot(snap("a", 10_000, t0));
        state.preview = PreviewState::Starting { url: "u".into() };
        assert!(state.preview_started());

        assert!(state.preview_player_lost());
        assert_eq!(state.preview, PreviewState::Unavailable);
        assert!(!state.clock.is_overridden());

        // The backend has moved on a minute; the estimate follows it.
        state.tick(t0 + Duration::from_secs(60));
        state.apply_snapshot(snap("a", 70_000, t0 + Duration::from_secs(60)));
        assert_eq!(state.clock.estimated_progress_ms(), 70_600);
        assert!(!state.preview_player_lost());
    }

    #[test]
    fn test_track_change_ends_override() {
        let t0 = Instant::now();
        let mut state = AppState::default();
        state.apply_snapshot(snap("a", 0, t0));
        state.preview = PreviewState::Starting { url: "u".into() };
        state.preview_started();

        state.apply_snapshot(snap("b", 0, t0));
        assert!(!state.clock.is_overridden());
        assert_eq!(state.preview, PreviewState::Unavailable);
        assert!(!state.apply_preview_url("a", Some("late".into())));
        assert!(!state.apply_color("a", Rgb::BLACK));
        assert!(state.apply_color("b", Rgb::BLACK));
    }
}
