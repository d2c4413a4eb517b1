//! LRC format parser
//!
//! Parses synchronized lyrics in LRC format:
//! [mm:ss.cc] Lyrics line here
//!
//! Example:
//! [00:12.34] Hello world
//! [00:15] Another line
//!
//! Lines without a leading timestamp (metadata tags such as `[ti:Title]`,
//! plain text) and lines with no text after the tag are dropped.

/// A single line of lyrics at an absolute offset into the track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedLine {
    /// Timestamp in milliseconds from start
    pub time_ms: u64,
    /// The lyrics text, trimmed
    pub text: String,
}

impl TimedLine {
    pub fn new(time_ms: u64, text: impl Into<String>) -> Self {
        Self {
            time_ms,
            text: text.into(),
        }
    }
}

/// Parse LRC text into lines sorted by timestamp.
///
/// Never fails: malformed input yields fewer (possibly zero) lines.
pub fn parse(raw: &str) -> Vec<TimedLine> {
    let mut lines: Vec<TimedLine> = raw.lines().filter_map(parse_line).collect();

    // `sort_by_key` is stable, so equal timestamps keep their input order.
    lines.sort_by_key(|l| l.time_ms);
    lines
}

/// Format lines back to LRC, one `[mm:ss.cc]text` per line.
pub fn format_lrc(lines: &[TimedLine]) -> String {
    lines
        .iter()
        .map(|l| {
            let min = l.time_ms / 60_000;
            let sec = (l.time_ms % 60_000) / 1000;
            let cs = (l.time_ms % 1000) / 10;
            format!("[{:02}:{:02}.{:02}]{}", min, sec, cs, l.text)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a line like `[00:12.34]Lyrics` or `[00:12]Lyrics`
fn parse_line(line: &str) -> Option<TimedLine> {
    let line = line.trim_start();
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    let time_ms = parse_timestamp(&rest[..end])?;

    let text = rest[end + 1..].trim();
    if text.is_empty() {
        return None;
    }

    Some(TimedLine::new(time_ms, text))
}

/// Parse timestamp string like "01:23" or "01:23.45" to milliseconds
fn parse_timestamp(s: &str) -> Option<u64> {
    let (min, rest) = s.split_once(':')?;
    let (sec, cs) = match rest.split_once('.') {
        Some((sec, cs)) => (sec, Some(cs)),
        None => (rest, None),
    };

    let min = two_digits(min)?;
    let sec = two_digits(sec)?;
    let cs = match cs {
        Some(cs) => two_digits(cs)?,
        None => 0,
    };

    Some((min * 60 + sec) * 1000 + cs * 10)
}

fn two_digits(s: &str) -> Option<u64> {
    if s.len() != 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp("00:12"), Some(12000));
        assert_eq!(parse_timestamp("01:30"), Some(90000));
        assert_eq!(parse_timestamp("00:12.34"), Some(12340));
        assert_eq!(parse_timestamp("99:59.99"), Some(5_999_990));
        assert_eq!(parse_timestamp("ti:Title"), None);
        assert_eq!(parse_timestamp("0:12"), None);
        assert_eq!(parse_timestamp("00:12.3"), None);
        assert_eq!(parse_timestamp("00:12:34"), None);
    }

    #[test]
    fn test_exact_millis_for_every_field() {
        for (mm, ss, cc) in [(0, 0, 0), (3, 7, 5), (12, 59, 99), (59, 1, 10)] {
            let raw = format!("[{mm:02}:{ss:02}.{cc:02}]word");
            let lines = parse(&raw);
            assert_eq!(lines.len(), 1, "{raw}");
            assert_eq!(lines[0].time_ms, (mm * 60 + ss) * 1000 + cc * 10);
        }
    }

    #[test]
    fn test_parse_lrc() {
        let lrc = r#"
[ti:Test Song]
[ar:Test Artist]
[00:15.00]Second line
[00:12.34]  First line
[00:20.00]
[00:21.00]
no tag here
[00:30]Last
"#;
        let lines = parse(lrc);
        assert_eq!(
            lines,
            vec![
                TimedLine::new(12340, "First line"),
                TimedLine::new(15000, "Second line"),
                TimedLine::new(30000, "Last"),
            ]
        );
    }

    #[test]
    fn test_equal_timestamps_keep_input_order() {
        let lines = parse("[00:05.00]b\n[00:01.00]a\n[00:05.00]c");
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, ["a", "b", "c"]);
    }

    #[test]
    fn test_garbage_is_empty() {
        assert!(parse("").is_empty());
        assert!(parse("hello\n[xx:yy]nope\n[00:1a.00]bad").is_empty());
    }

    #[test]
    fn test_reparse_formatted_output_keeps_times() {
        let first = parse("[00:01]one\n[02:03.45]two\n[00:59.99]three");
        let second = parse(&format_lrc(&first));
        assert_eq!(first, second);
    }
}
