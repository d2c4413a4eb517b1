//! Lyrics pane - karaoke window around the active line

use super::truncate_str;
use crate::app::state::AppState;
use crate::lyrics::cursor::{self, Cursor};
use crate::lyrics::TimelineEntry;
use crate::tui::theme::palette::blend;
use crate::tui::theme::{LoadingSpinner, Theme};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme, area: Rect) {
    let icons = &theme.icons;

    let title = if state.lyrics_loading {
        format!(" {} Lyrics {} ", icons.lyrics, LoadingSpinner::frame(state.tick))
    } else {
        format!(" {} Lyrics ", icons.lyrics)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(title)
        .title_style(Style::default().fg(theme.palette.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Add horizontal padding
    let padded = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1), // Left padding
            Constraint::Min(1),    // Content
            Constraint::Length(1), // Right padding
        ])
        .split(inner)[1];

    let display_lines = window_lines(
        &state.timeline,
        state.cursor(),
        theme,
        padded.width as usize,
    );

    // Center vertically
    let top_padding = (padded.height as usize).saturating_sub(display_lines.len()) / 2;
    let mut centered_lines: Vec<Line> = vec![Line::default(); top_padding];
    centered_lines.extend(display_lines);

    let paragraph = Paragraph::new(centered_lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, padded);
}

/// Lines for the visible window, the active one with karaoke fill.
pub fn window_lines<'a>(
    entries: &'a [TimelineEntry],
    cursor: Cursor,
    theme: &Theme,
    max_width: usize,
) -> Vec<Line<'a>> {
    cursor::visible_window(cursor.active_index, entries.len())
        .map(|i| {
            let entry = &entries[i];
            let progress = cursor.progress_of(i);
            if entry.is_waiting() {
                waiting_line(progress, theme)
            } else if i == cursor.active_index {
                karaoke_line(entry, progress, theme, max_width)
            } else {
                let color = if i < cursor.active_index {
                    theme.palette.fg_dim
                } else {
                    theme.palette.fg_secondary
                };
                Line::from(Span::styled(
                    truncate_str(&entry.text, max_width),
                    Style::default().fg(color),
                ))
            }
        })
        .collect()
}

/// Active line: each word fills with the accent by character count.
///
/// Words that do not fit in `max_width` are replaced by " ...".
pub fn karaoke_line<'a>(
    entry: &'a TimelineEntry,
    progress: f64,
    theme: &Theme,
    max_width: usize,
) -> Line<'a> {
    let filled_style = Style::default()
        .fg(theme.palette.accent)
        .add_modifier(Modifier::BOLD);
    let unfilled_style = Style::default()
        .fg(theme.palette.fg_secondary)
        .add_modifier(Modifier::BOLD);

    let fills = cursor::word_fills(entry, progress);
    let count = fills.len();
    let mut used = 0;
    let mut spans = Vec::new();
    for (k, wf) in fills.into_iter().enumerate() {
        let sep = usize::from(k > 0);
        let chars = wf.word.chars().count();
        let reserve = if k + 1 < count { MORE.len() } else { 0 };

        if used + sep + chars + reserve > max_width {
            if k > 0 {
                spans.push(Span::styled(MORE, unfilled_style));
            } else {
                // A single word wider than the pane.
                let word = char_prefix(wf.word, max_width);
                let lit = (wf.fill * chars as f64).round() as usize;
                push_word(&mut spans, word, lit, filled_style, unfilled_style);
            }
            break;
        }

        if k > 0 {
            spans.push(Span::raw(" "));
        }
        let lit = (wf.fill * chars as f64).round() as usize;
        push_word(&mut spans, wf.word, lit, filled_style, unfilled_style);
        used += sep + chars;
    }
    Line::from(spans)
}

const MORE: &str = " ...";

/// Push `word` with its first `lit` characters filled.
fn push_word<'a>(
    spans: &mut Vec<Span<'a>>,
    word: &'a str,
    lit: usize,
    filled: Style,
    unfilled: Style,
) {
    let (head, tail) = word.split_at(char_prefix(word, lit).len());
    if !head.is_empty() {
        spans.push(Span::styled(head, filled));
    }
    if !tail.is_empty() {
        spans.push(Span::styled(tail, unfilled));
    }
}

/// The first `n` characters of `s`.
fn char_prefix(s: &str, n: usize) -> &str {
    s.char_indices().nth(n).map_or(s, |(i, _)| &s[..i])
}

/// Waiting entry: dots that brighten one after another.
pub fn waiting_line(progress: f64, theme: &Theme) -> Line<'static> {
    let dots = cursor::waiting_dots(progress);
    let mut spans = Vec::with_capacity(dots.len() * 2);
    for (i, fill) in dots.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let color = blend(theme.palette.fg_dim, theme.palette.accent, fill);
        spans.push(Span::styled(theme.icons.dot, Style::default().fg(color)));
    }
    Line::from(spans)
}
