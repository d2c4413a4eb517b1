//! Now Playing widgets - track header and progress footer

use super::truncate_str;
use crate::app::state::{AppState, ToastKind};
use crate::playback::{format_time, PlaybackSnapshot};
use crate::preview::PreviewState;
use crate::tui::theme::{Icons, Theme};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Badge, title and artist.
pub fn render_header(
    frame: &mut Frame,
    state: &AppState,
    track: &PlaybackSnapshot,
    theme: &Theme,
    area: Rect,
) {
    let icons = &theme.icons;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} Now Playing ", icons.music))
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(padded(inner));

    let badge = if state.clock.is_overridden() {
        Span::styled(
            format!("{} PREVIEW ", icons.play),
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        )
    } else if state.clock.is_playing() {
        Span::styled(
            format!("{} LIVE ", icons.live),
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            format!("{} last played ", icons.history),
            Style::default().fg(theme.palette.fg_secondary),
        )
    };
    let title_width = (rows[0].width as usize).saturating_sub(badge.width() + 1);
    let title_line = Line::from(vec![
        badge,
        Span::raw(" "),
        Span::styled(
            truncate_str(&track.track, title_width),
            Style::default()
                .fg(theme.palette.fg_primary)
                .add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(title_line), rows[0]);

    let artist_line = Line::from(Span::styled(
        truncate_str(&track.artist, rows[1].width as usize),
        Style::default().fg(theme.palette.fg_secondary),
    ));
    frame.render_widget(Paragraph::new(artist_line), rows[1]);
}

/// Progress bar, times, key hints and toast.
pub fn render_footer(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let icons = &theme.icons;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Progress bar
            Constraint::Length(1), // Time + key hints
            Constraint::Min(0),    // Toast (if any)
        ])
        .split(padded(inner));

    let bar = progress_bar(rows[0].width as usize, state.clock.progress_fraction(), icons);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            bar,
            Style::default().fg(theme.palette.accent),
        ))),
        rows[0],
    );

    let mut spans = vec![Span::styled(
        format!(
            "{} / {}",
            format_time(state.clock.estimated_progress_ms()),
            format_time(state.clock.duration_ms())
        ),
        Style::default().fg(theme.palette.fg_secondary),
    )];
    if let Some(hint) = preview_hint(&state.preview, state.preview_volume, icons) {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(hint, Style::default().fg(theme.palette.fg_primary)));
    }
    spans.push(Span::raw("   "));
    spans.push(Span::styled(LINK_HINT, Style::default().fg(theme.palette.fg_dim)));
    frame.render_widget(Paragraph::new(Line::from(spans)), rows[1]);

    render_toast(frame, state, theme, rows[2]);
}

pub fn render_toast(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let Some(toast) = &state.toast else {
        return;
    };
    if toast.is_expired() || area.height == 0 {
        return;
    }

    let (prefix, color) = match toast.kind {
        ToastKind::Info => (theme.icons.info, theme.palette.fg_secondary),
        ToastKind::Error => (theme.icons.error, theme.palette.error),
    };
    let toast_line = Line::from(vec![
        Span::styled(format!("{} ", prefix), Style::default().fg(color)),
        Span::styled(
            truncate_str(&toast.message, (area.width as usize).saturating_sub(3)),
            Style::default().fg(color),
        ),
    ]);
    frame.render_widget(Paragraph::new(toast_line), area);
}

const LINK_HINT: &str = "s: spotify  y: youtube";

/// Key hint for the preview control; none when the track has no clip.
fn preview_hint(preview: &PreviewState, volume: u8, icons: &Icons) -> Option<String> {
    match preview {
        PreviewState::Unavailable => None,
        PreviewState::Ready { .. } => Some(format!("{} p: preview", icons.play)),
        PreviewState::Starting { .. } => Some(format!("{} loading preview...", icons.play)),
        PreviewState::Playing { .. } => Some(format!(
            "{} p: stop preview  {} {}%",
            icons.pause, icons.volume, volume
        )),
    }
}

/// Renders a modern progress bar
fn progress_bar(width: usize, ratio: f64, icons: &Icons) -> String {
    if width < 3 {
        return String::new();
    }

    let filled = ((width - 1) as f64 * ratio.clamp(0.0, 1.0)).round() as usize;
    let empty = width.saturating_sub(filled + 1);

    let mut bar = String::with_capacity(width * 3);
    for _ in 0..filled {
        bar.push_str(icons.progress_full);
    }
    bar.push_str(icons.progress_head);
    for _ in 0..empty {
        bar.push_str(icons.progress_empty);
    }
    bar
}

fn padded(inner: Rect) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1), // Left padding
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Right padding
        ])
        .split(inner)[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_shape() {
        let icons = Icons::nerd();
        assert_eq!(progress_bar(2, 0.5, &icons), "");
        assert_eq!(progress_bar(5, 0.0, &icons), "●────");
        assert_eq!(progress_bar(5, 0.5, &icons), "━━●──");
        assert_eq!(progress_bar(5, 1.0, &icons), "━━━━●");
        assert_eq!(progress_bar(5, 3.0, &icons), "━━━━●");
    }

    #[test]
    fn test_preview_hint_follows_state() {
        let icons = Icons::nerd();
        assert_eq!(preview_hint(&PreviewState::Unavailable, 50, &icons), None);
        let ready = PreviewState::Ready { url: "u".into() };
        assert!(preview_hint(&ready, 50, &icons).unwrap().contains("p: preview"));
        let playing = PreviewState::Playing { url: "u".into() };
        assert!(preview_hint(&playing, 35, &icons).unwrap().contains("35%"));
    }
}
