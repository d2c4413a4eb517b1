//! Maps a playback position onto the timeline.
//!
//! Everything here is a pure function of its inputs and is recomputed on
//! every clock tick.

use super::timeline::TimelineEntry;
use std::ops::Range;

/// Rows shown in the lyrics pane.
const WINDOW_ROWS: usize = 5;
/// Rows of context kept above the active line.
const WINDOW_CONTEXT_ABOVE: usize = 1;
/// Dots drawn for a waiting entry.
pub const WAITING_DOTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cursor {
    pub active_index: usize,
    /// Elapsed fraction of the active entry's window, in `[0, 1]`.
    pub line_progress: f64,
}

/// Locate the active entry for `position_ms`.
///
/// Before the first entry the cursor sits on index 0 with no progress.
pub fn locate(entries: &[TimelineEntry], position_ms: u64) -> Cursor {
    // Entries are ascending, so the active one is right before the first
    // entry that starts in the future.
    let after = entries.partition_point(|e| e.time_ms <= position_ms);
    let Some(active_index) = after.checked_sub(1) else {
        return Cursor::default();
    };

    let entry = &entries[active_index];
    let line_progress = if entry.duration_ms == 0 {
        0.0
    } else {
        let elapsed = (position_ms - entry.time_ms) as f64;
        (elapsed / entry.duration_ms as f64).clamp(0.0, 1.0)
    };

    Cursor {
        active_index,
        line_progress,
    }
}

impl Cursor {
    /// Progress used for the karaoke reveal of entry `index`.
    pub fn progress_of(&self, index: usize) -> f64 {
        if index == self.active_index {
            self.line_progress
        } else {
            0.0
        }
    }
}

/// A word of the active line with its fill fraction in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct WordFill<'a> {
    pub word: &'a str,
    pub fill: f64,
}

/// Split a line into words and fill them left to right.
///
/// Word `k` of `n` fills while `line_progress` moves through
/// `[k/n, (k+1)/n)`. Waiting entries carry no words.
pub fn word_fills(entry: &TimelineEntry, line_progress: f64) -> Vec<WordFill<'_>> {
    if entry.is_waiting() {
        return Vec::new();
    }

    let words: Vec<&str> = entry.text.split_whitespace().collect();
    let n = words.len() as f64;
    let progress = line_progress.clamp(0.0, 1.0);

    words
        .into_iter()
        .enumerate()
        .map(|(k, word)| {
            let start = k as f64 / n;
            let end = (k + 1) as f64 / n;
            let fill = ((progress - start) / (end - start)).clamp(0.0, 1.0);
            WordFill { word, fill }
        })
        .collect()
}

/// Fill of each waiting dot; the window is split into equal thirds.
pub fn waiting_dots(line_progress: f64) -> [f64; WAITING_DOTS] {
    let progress = line_progress.clamp(0.0, 1.0);
    let slot = 1.0 / WAITING_DOTS as f64;
    std::array::from_fn(|i| ((progress - i as f64 * slot) / slot).clamp(0.0, 1.0))
}

/// Range of entry indices to display around the active one.
pub fn visible_window(active_index: usize, len: usize) -> Range<usize> {
    let start = active_index.saturating_sub(WINDOW_CONTEXT_ABOVE).min(len);
    let end = (start + WINDOW_ROWS).min(len);
    start..end
}
