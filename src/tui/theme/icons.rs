//! Nerd Font icons for TUI display
//! Requires a Nerd Font to be installed (https://www.nerdfonts.com)

/// Icon set using Nerd Font glyphs
#[derive(Debug, Clone)]
pub struct Icons {
    // Playback
    pub play: &'static str,
    pub pause: &'static str,
    pub volume: &'static str,

    // Status
    pub live: &'static str,
    pub history: &'static str,
    pub help: &'static str,
    pub info: &'static str,
    pub error: &'static str,

    // Music
    pub music: &'static str,
    pub lyrics: &'static str,

    // Progress bar
    pub progress_full: &'static str,
    pub progress_empty: &'static str,
    pub progress_head: &'static str,

    // Waiting entries
    pub dot: &'static str,
}

impl Icons {
    /// Nerd Font icon set
    pub const fn nerd() -> Self {
        Self {
            play: "\u{f04b}",           // nf-fa-play
            pause: "\u{f04c}",          // nf-fa-pause
            volume: "\u{f028}",         // nf-fa-volume_up

            live: "\u{f111}",           // nf-fa-circle
            history: "\u{f1da}",        // nf-fa-history
            help: "\u{f059}",           // nf-fa-question_circle
            info: "\u{f05a}",           // nf-fa-info_circle
            error: "\u{f00d}",          // nf-fa-times

            music: "\u{f001}",          // nf-fa-music
            lyrics: "\u{f15c}",         // nf-fa-file_text_o

            progress_full: "━",
            progress_empty: "─",
            progress_head: "●",

            dot: "●",
        }
    }
}

impl Default for Icons {
    fn default() -> Self {
        Self::nerd()
    }
}

/// Loading spinner frames
pub struct LoadingSpinner;

impl LoadingSpinner {
    /// Braille-based smooth spinner
    pub const BRAILLE: [&'static str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

    pub fn frame(tick: u64) -> &'static str {
        let idx = (tick / 2) as usize % Self::BRAILLE.len();
        Self::BRAILLE[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_wraps() {
        assert_eq!(LoadingSpinner::frame(0), "⠋");
        assert_eq!(LoadingSpinner::frame(3), "⠙");
        assert_eq!(LoadingSpinner::frame(16), "⠋");
    }
}
