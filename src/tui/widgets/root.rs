//! Root layout widget - picks the screen for the current state

use crate::app::state::AppState;
use crate::tui::theme::{LoadingSpinner, Theme};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{help, lyrics, now_playing};

/// Playing layout:
/// ┌─ Now Playing ──────────────────────────┐
/// │ ● LIVE  Track                           │
/// │ Artist                                  │
/// ├─ Lyrics ───────────────────────────────┤
/// │            previous line                │
/// │            ACTIVE LINE                  │
/// │            next lines                   │
/// ├────────────────────────────────────────┤
/// │ ━━━━━━━━━●──────────────────────────── │
/// │ 1:02 / 3:30   p: preview                │
/// │ toast                                   │
/// └────────────────────────────────────────┘
pub fn render(frame: &mut Frame, state: &AppState) {
    let theme = Theme::with_accent(state.accent);
    let root = frame.area();

    match state.track() {
        _ if state.loading => render_message(
            frame,
            &theme,
            root,
            &format!("{} Connecting...", LoadingSpinner::frame(state.tick)),
            None,
        ),
        None => {
            render_message(frame, &theme, root, "Nothing playing", Some("q: quit  ?: help"));
            render_toast_row(frame, state, &theme, root);
        }
        Some(track) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(4), // Header
                    Constraint::Min(5),    // Lyrics
                    Constraint::Length(5), // Footer
                ])
                .split(root);

            now_playing::render_header(frame, state, track, &theme, rows[0]);
            lyrics::render(frame, state, &theme, rows[1]);
            now_playing::render_footer(frame, state, &theme, rows[2]);
        }
    }

    if state.show_help {
        help::render(frame, &theme, root);
    }
}

/// Centered message for the loading and idle screens.
fn render_message(frame: &mut Frame, theme: &Theme, area: Rect, message: &str, hint: Option<&str>) {
    let mut lines = vec![Line::from(Span::styled(
        message.to_string(),
        Style::default()
            .fg(theme.palette.fg_primary)
            .add_modifier(Modifier::BOLD),
    ))];
    if let Some(hint) = hint {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            hint.to_string(),
            Style::default().fg(theme.palette.fg_secondary),
        )));
    }

    let top = (area.height as usize).saturating_sub(lines.len()) / 2;
    let mut centered: Vec<Line> = vec![Line::default(); top];
    centered.extend(lines);
    frame.render_widget(Paragraph::new(centered).alignment(Alignment::Center), area);
}

fn render_toast_row(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    if area.height < 2 {
        return;
    }
    let row = Rect::new(area.x + 1, area.bottom() - 1, area.width.saturating_sub(2), 1);
    now_playing::render_toast(frame, state, theme, row);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::state::Toast;
    use crate::lyrics::TimedLine;
    use crate::playback::{NowPlaying, PlaybackSnapshot};
    use crate::tui::widgets::test_util::render_rows;
    use std::time::Instant;

    fn playing_state(is_playing: bool) -> AppState {
        let mut state = AppState::default();
        state.apply_snapshot(NowPlaying::Track(PlaybackSnapshot {
            track_id: "id".into(),
            track: "Song Title".into(),
            artist: "Some Artist".into(),
            album_art: None,
            progress_ms: 61_000,
            duration_ms: 210_000,
            is_playing,
            received_at: Instant::now(),
        }));
        state
    }

    fn screen(state: &AppState) -> String {
        render_rows(60, 20, |f| render(f, state)).join("\n")
    }

    #[test]
    fn test_loading_screen() {
        let state = AppState::default();
        assert!(screen(&state).contains("Connecting..."));
    }

    #[test]
    fn test_nothing_playing_screen() {
        let mut state = AppState::default();
        state.apply_snapshot(NowPlaying::Nothing);
        state.toast = Some(Toast::error("backend down"));
        let out = screen(&state);
        assert!(out.contains("Nothing playing"));
        assert!(out.contains("backend down"));
    }

    #[test]
    fn test_playing_screen() {
        let mut state = playing_state(true);
        state.apply_lyrics("id", &[TimedLine::new(0, "hello there")]);
        let out = screen(&state);
        assert!(out.contains("LIVE"));
        assert!(out.contains("Song Title"));
        assert!(out.contains("Some Artist"));
        assert!(out.contains("hello there"));
        // 61 s plus the 600 ms latency offset.
        assert!(out.contains("1:01 / 3:30"));
        assert!(out.contains("s: spotify  y: youtube"));
    }

    #[test]
    fn test_paused_track_shows_last_played() {
        let out = screen(&playing_state(false));
        assert!(out.contains("last played"));
        assert!(!out.contains("LIVE"));
    }

    #[test]
    fn test_help_overlay() {
        let mut state = playing_state(true);
        state.show_help = true;
        assert!(screen(&state).contains("Keybinds"));
    }
}
