//! Help overlay showing keybindings

use crate::tui::theme::Theme;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const BINDINGS: [(&str, &str); 8] = [
    ("p / Space", "Play or stop preview"),
    ("+ / =", "Preview volume up"),
    ("- / _", "Preview volume down"),
    ("r", "Refresh now"),
    ("s", "Search on Spotify"),
    ("y", "Search on YouTube"),
    ("?", "Toggle this help"),
    ("q / Esc", "Quit"),
];

/// Render the help popup centered over `area`
pub fn render(frame: &mut Frame, theme: &Theme, area: Rect) {
    let popup = centered(area, 44, BINDINGS.len() as u16 + 2);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_set(theme.border_set())
        .border_style(Style::default().fg(theme.palette.border))
        .title(format!(" {} Keybinds ", theme.icons.help))
        .title_style(Style::default().fg(theme.palette.accent));

    let lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(key, desc)| keybind(key, desc, theme))
        .collect();

    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

fn keybind(key: &str, desc: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("  ", Style::default()),
        Span::styled(
            format!("{:12}", key),
            Style::default()
                .fg(theme.palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc.to_string(), Style::default().fg(theme.palette.fg_primary)),
    ])
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    popup
}
