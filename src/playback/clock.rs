//! Locally interpolated playback position.
//!
//! The remote player is only sampled every few seconds and each sample is
//! already late by the time it arrives. [`PlaybackClock`] keeps its own
//! estimate running between samples and only jumps to a new sample when the
//! two disagree by more than the drift tolerance, so normal jitter never
//! shows up as a visible skip in the lyrics.
//!
//! While a local preview is playing the clock is *overridden*: the estimate
//! is frozen and samples no longer resync it.

use super::snapshot::PlaybackSnapshot;
use std::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTuning {
    /// Added to every reported position to cover network and display lag.
    pub latency_offset_ms: u64,
    /// Largest disagreement tolerated before a hard resync.
    pub drift_tolerance_ms: u64,
}

impl Default for ClockTuning {
    fn default() -> Self {
        Self {
            latency_offset_ms: 600,
            drift_tolerance_ms: 2000,
        }
    }
}

/// What a call to [`PlaybackClock::ingest`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestOutcome {
    pub track_changed: bool,
    pub resynced: bool,
}

#[derive(Debug, Clone)]
pub struct PlaybackClock {
    tuning: ClockTuning,
    estimated_progress_ms: u64,
    last_snapshot: Option<PlaybackSnapshot>,
    last_tick: Option<Instant>,
    overridden: bool,
}

impl PlaybackClock {
    pub fn new(tuning: ClockTuning) -> Self {
        Self {
            tuning,
            estimated_progress_ms: 0,
            last_snapshot: None,
            last_tick: None,
            overridden: false,
        }
    }

    /// Apply a fresh sample from the remote player.
    pub fn ingest(&mut self, snapshot: PlaybackSnapshot) -> IngestOutcome {
        let duration = snapshot.duration_ms;
        let reported = snapshot.progress_ms.min(duration);
        // Ticks already processed after the sample arrived still count.
        let catch_up = match self.last_tick {
            Some(t) if snapshot.is_playing => {
                t.saturating_duration_since(snapshot.received_at).as_millis() as u64
            }
            _ => 0,
        };
        let corrected = reported
            .saturating_add(self.tuning.latency_offset_ms)
            .saturating_add(catch_up)
            .min(duration);

        let track_changed = self
            .last_snapshot
            .as_ref()
            .is_none_or(|prev| prev.track_id != snapshot.track_id);
        let drift = corrected.abs_diff(self.estimated_progress_ms);
        let resynced =
            track_changed || (!self.overridden && drift > self.tuning.drift_tolerance_ms);

        if resynced {
            debug!(
                track_changed,
                drift,
                from = self.estimated_progress_ms,
                to = corrected,
                "clock resync"
            );
            self.estimated_progress_ms = corrected;
            // The corrected value describes the later of arrival and last tick.
            self.last_tick = Some(match self.last_tick {
                Some(t) if t > snapshot.received_at => t,
                _ => snapshot.received_at,
            });
        } else {
            self.estimated_progress_ms = self.estimated_progress_ms.min(duration);
        }

        self.last_snapshot = Some(snapshot);
        IngestOutcome {
            track_changed,
            resynced,
        }
    }

    /// Advance the estimate to `now`.
    ///
    /// `now` must not be earlier than the previous tick; a backwards step is
    /// treated as zero elapsed time.
    pub fn tick(&mut self, now: Instant) {
        let Some(last) = self.last_tick.replace(now) else {
            return;
        };
        if !self.is_advancing() {
            return;
        }
        let Some(snapshot) = &self.last_snapshot else {
            return;
        };

        let elapsed = now.saturating_duration_since(last).as_millis() as u64;
        self.estimated_progress_ms = self
            .estimated_progress_ms
            .saturating_add(elapsed)
            .min(snapshot.duration_ms);
    }

    /// Enter or leave override mode. Returns whether the flag changed.
    pub fn set_overridden(&mut self, overridden: bool) -> bool {
        let changed = self.overridden != overridden;
        if changed {
            debug!(overridden, at = self.estimated_progress_ms, "clock override");
        }
        self.overridden = overridden;
        changed
    }

    /// Forget the current track, e.g. when nothing is playing anymore.
    pub fn clear(&mut self) {
        self.estimated_progress_ms = 0;
        self.last_snapshot = None;
        self.last_tick = None;
    }

    pub fn estimated_progress_ms(&self) -> u64 {
        self.estimated_progress_ms
    }

    /// Estimate as a fraction of the track, in `[0, 1]`.
    pub fn progress_fraction(&self) -> f64 {
        match self.duration_ms() {
            0 => 0.0,
            d => (self.estimated_progress_ms as f64 / d as f64).clamp(0.0, 1.0),
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.last_snapshot.as_ref().map_or(0, |s| s.duration_ms)
    }

    pub fn is_playing(&self) -> bool {
        self.last_snapshot.as_ref().is_some_and(|s| s.is_playing)
    }

    pub fn is_overridden(&self) -> bool {
        self.overridden
    }

    pub fn snapshot(&self) -> Option<&PlaybackSnapshot> {
        self.last_snapshot.as_ref()
    }

    fn is_advancing(&self) -> bool {
        self.is_playing() && !self.overridden
    }
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(ClockTuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn snap(track_id: &str, progress_ms: u64, is_playing: bool, at: Instant) -> PlaybackSnapshot {
        PlaybackSnapshot {
            track_id: track_id.to_string(),
            track: track_id.to_string(),
            artist: "artist".to_string(),
            album_art: None,
            progress_ms,
            duration_ms: 200_000,
            is_playing,
            received_at: at,
        }
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_interpolates_between_snapshots() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        let outcome = clock.ingest(snap("a", 10_000, true, t0));
        assert_eq!(
            outcome,
            IngestOutcome {
                track_changed: true,
                resynced: true
            }
        );
        assert_eq!(clock.estimated_progress_ms(), 10_600);

        for k in 1..=20 {
            clock.tick(t0 + ms(50 * k));
        }
        assert_eq!(clock.estimated_progress_ms(), 11_600);
    }

    #[test]
    fn test_small_drift_keeps_local_estimate() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        clock.ingest(snap("a", 10_000, true, t0));
        clock.tick(t0 + ms(1000));
        assert_eq!(clock.estimated_progress_ms(), 11_600);

        // Corrected 13_600 is exactly 2000 away.
        let outcome = clock.ingest(snap("a", 13_000, true, t0 + ms(1000)));
        assert!(!outcome.resynced);
        assert_eq!(clock.estimated_progress_ms(), 11_600);

        clock.tick(t0 + ms(1500));
        assert_eq!(clock.estimated_progress_ms(), 12_100);
    }

    #[test]
    fn test_large_drift_resyncs() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        clock.ingest(snap("a", 10_000, true, t0));

        let outcome = clock.ingest(snap("a", 12_001, true, t0));
        assert!(outcome.resynced);
        assert!(!outcome.track_changed);
        assert_eq!(clock.estimated_progress_ms(), 12_601);

        // Seeking backwards is drift too.
        let outcome = clock.ingest(snap("a", 1_000, true, t0));
        assert!(outcome.resynced);
        assert_eq!(clock.estimated_progress_ms(), 1_600);
    }

    #[test]
    fn test_track_change_always_resyncs() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        clock.ingest(snap("a", 10_000, true, t0));
        let outcome = clock.ingest(snap("b", 10_500, true, t0));
        assert!(outcome.track_changed && outcome.resynced);
        assert_eq!(clock.estimated_progress_ms(), 11_100);
    }

    #[test]
    fn test_paused_snapshot_freezes() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        clock.ingest(snap("a", 10_000, false, t0));
        clock.tick(t0 + ms(3000));
        assert_eq!(clock.estimated_progress_ms(), 10_600);
        assert!(!clock.is_playing());
    }

    #[test]
    fn test_override_freezes_and_suppresses_resync() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        clock.ingest(snap("a", 10_000, true, t0));
        assert!(clock.set_overridden(true));
        assert!(!clock.set_overridden(true));

        clock.tick(t0 + ms(2000));
        assert_eq!(clock.estimated_progress_ms(), 10_600);

        let outcome = clock.ingest(snap("a", 50_000, true, t0 + ms(2000)));
        assert!(!outcome.resynced);
        assert_eq!(clock.estimated_progress_ms(), 10_600);

        // Leaving override resumes from `now`, not from the frozen span.
        clock.set_overridden(false);
        clock.tick(t0 + ms(2100));
        assert_eq!(clock.estimated_progress_ms(), 10_700);
    }

    #[test]
    fn test_track_change_applies_while_overridden() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        clock.ingest(snap("a", 10_000, true, t0));
        clock.set_overridden(true);

        let outcome = clock.ingest(snap("b", 0, true, t0 + ms(100)));
        assert!(outcome.track_changed && outcome.resynced);
        assert_eq!(clock.estimated_progress_ms(), 600);
        assert_eq!(clock.snapshot().map(|s| s.track_id.as_str()), Some("b"));

        clock.tick(t0 + ms(1000));
        assert_eq!(clock.estimated_progress_ms(), 600);
    }

    #[test]
    fn test_clamped_to_duration() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        clock.ingest(snap("a", 199_800, true, t0));
        assert_eq!(clock.estimated_progress_ms(), 200_000);
        clock.tick(t0 + ms(5000));
        assert_eq!(clock.estimated_progress_ms(), 200_000);
        assert_eq!(clock.progress_fraction(), 1.0);

        let mut bogus = snap("b", 500_000, true, t0);
        bogus.duration_ms = 100_000;
        clock.ingest(bogus);
        assert_eq!(clock.estimated_progress_ms(), 100_000);
    }

    #[test]
    fn test_backwards_tick_is_ignored() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        clock.ingest(snap("a", 0, true, t0 + ms(1000)));
        clock.tick(t0);
        assert_eq!(clock.estimated_progress_ms(), 600);
    }

    #[test]
    fn test_late_snapshot_keeps_ticks_since_arrival() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        clock.ingest(snap("a", 0, true, t0));
        clock.tick(t0 + ms(1000));

        // Received before the last tick, but applied after it: the 500 ms
        // already ticked since arrival are added on top.
        clock.ingest(snap("a", 60_000, true, t0 + ms(500)));
        assert_eq!(clock.estimated_progress_ms(), 61_100);
        clock.tick(t0 + ms(1100));
        assert_eq!(clock.estimated_progress_ms(), 61_200);
    }

    #[test]
    fn test_late_paused_snapshot_has_no_catch_up() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        clock.ingest(snap("a", 0, true, t0));
        clock.tick(t0 + ms(1000));

        clock.ingest(snap("a", 60_000, false, t0 + ms(500)));
        assert_eq!(clock.estimated_progress_ms(), 60_600);
    }

    #[test]
    fn test_clear_forgets_track() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::default();
        clock.ingest(snap("a", 10_000, true, t0));
        clock.clear();
        assert_eq!(clock.estimated_progress_ms(), 0);
        assert_eq!(clock.duration_ms(), 0);
        assert_eq!(clock.progress_fraction(), 0.0);
        assert!(clock.ingest(snap("a", 10_000, true, t0)).track_changed);
    }

    #[test]
    fn test_custom_tuning() {
        let t0 = Instant::now();
        let mut clock = PlaybackClock::new(ClockTuning {
            latency_offset_ms: 0,
            drift_tolerance_ms: 100,
        });
        clock.ingest(snap("a", 10_000, true, t0));
        assert_eq!(clock.estimated_progress_ms(), 10_000);
        assert!(clock.ingest(snap("a", 10_101, true, t0)).resynced);
    }
}
