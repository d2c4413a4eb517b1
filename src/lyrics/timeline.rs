//! Display timeline derived from parsed lyrics.
//!
//! Each entry owns an explicit window `[time_ms, time_ms + duration_ms)`.
//! Long instrumental gaps get a synthetic waiting entry so the display never
//! sits on a stale line.

use super::parser::TimedLine;

/// Text of a synthetic waiting entry.
pub const WAITING_TEXT: &str = "…";

/// Leading silence longer than this gets a waiting entry.
const INTRO_FILLER_AFTER_MS: u64 = 3000;
/// Window given to the last line, which has no successor to bound it.
const TRAILING_DURATION_MS: u64 = 5000;
/// Gaps longer than this are split into a capped line plus a waiting entry.
const LONG_GAP_MS: u64 = 10_000;
/// Active window of a line followed by a long gap.
const CAPPED_DURATION_MS: u64 = 5000;
/// Pause between a capped line and its waiting entry.
const FILLER_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub time_ms: u64,
    pub text: String,
    pub duration_ms: u64,
}

impl TimelineEntry {
    pub fn waiting(time_ms: u64, duration_ms: u64) -> Self {
        Self {
            time_ms,
            text: WAITING_TEXT.to_string(),
            duration_ms,
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.text == WAITING_TEXT
    }
}

/// Build the display timeline.
///
/// Output is ascending, non-overlapping and every entry has a positive
/// duration. A line sharing its timestamp with the next one would get an
/// empty window and is left out.
pub fn build(lines: &[TimedLine]) -> Vec<TimelineEntry> {
    let mut entries = Vec::with_capacity(lines.len() + 2);

    let Some(first) = lines.first() else {
        return entries;
    };

    if first.time_ms > INTRO_FILLER_AFTER_MS {
        entries.push(TimelineEntry::waiting(0, first.time_ms));
    }

    for (i, line) in lines.iter().enumerate() {
        let Some(next) = lines.get(i + 1) else {
            entries.push(entry(line, TRAILING_DURATION_MS));
            break;
        };

        let gap = next.time_ms.saturating_sub(line.time_ms);
        if gap == 0 {
            continue;
        }

        if gap > LONG_GAP_MS {
            entries.push(entry(line, CAPPED_DURATION_MS));

            let filler_start = line.time_ms + CAPPED_DURATION_MS + FILLER_DELAY_MS;
            if filler_start < next.time_ms {
                entries.push(TimelineEntry::waiting(
                    filler_start,
                    next.time_ms - filler_start,
                ));
            }
        } else {
            entries.push(entry(line, gap));
        }
    }

    entries
}

/// Timeline shown when a track has no usable lyrics: one waiting entry
/// spanning the whole track.
pub fn waiting(duration_ms: u64) -> Vec<TimelineEntry> {
    vec![TimelineEntry::waiting(0, duration_ms.max(1))]
}

fn entry(line: &TimedLine, duration_ms: u64) -> TimelineEntry {
    TimelineEntry {
        time_ms: line.time_ms,
        text: line.text.clone(),
        duration_ms,
    }
}
