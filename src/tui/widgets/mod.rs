pub mod help;
pub mod lyrics;
pub mod now_playing;
pub mod root;

/// Shorten `s` to `max_len` characters, ending in "..." when cut.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    let char_count: usize = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    } else {
        s.chars().take(max_len).collect()
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    /// Render with `f` into a `width` x `height` buffer and return its rows.
    pub fn render_rows(
        width: u16,
        height: u16,
        f: impl FnOnce(&mut ratatui::Frame),
    ) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(f).unwrap();
        rows(terminal.backend().buffer())
    }

    fn rows(buf: &Buffer) -> Vec<String> {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buf[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }
}
