use std::fs;
use std::io::{self, Read};

use tracing::info;

use crate::error::TrainerError;

/// Source name meaning standard input.
pub const STDIN: &str = "-";

/// Read `source_name` (a path, or `-` for stdin) as lines without terminators.
pub fn read_lines(source_name: &str) -> Result<Vec<String>, TrainerError> {
    let read_err = |source: io::Error| TrainerError::Read {
        source_name: source_name.to_string(),
        source,
    };
    let content = if source_name == STDIN {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(read_err)?;
        buf
    } else {
        fs::read_to_string(source_name).map_err(read_err)?
    };
    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect())
}

/// A run of consecutive lines to type.
#[derive(Clone, Debug, PartialEq)]
pub struct Excerpt {
    pub text: String,
    /// Index of the first line in the source.
    pub offset: usize,
    pub line_count: usize,
}

/// Take lines starting at `offset` until the text holds at least
/// `min_length` characters (`0` takes the whole remainder).
///
/// An offset past the end, or one followed only by blank lines, starts
/// over from the first line.
pub fn excerpt(
    lines: &[String],
    offset: usize,
    min_length: usize,
    source_name: &str,
) -> Result<Excerpt, TrainerError> {
    if lines.iter().all(|l| l.trim().is_empty()) {
        return Err(TrainerError::InvalidSource {
            source_name: source_name.to_string(),
        });
    }
    let exhausted = lines
        .get(offset..)
        .is_none_or(|rest| rest.iter().all(|l| l.trim().is_empty()));
    let offset = if exhausted {
        info!(source = source_name, offset, "reached end of text, starting over");
        0
    } else {
        offset
    };

    let mut taken: Vec<&str> = Vec::new();
    let mut length = 0usize;
    for line in &lines[offset..] {
        if !taken.is_empty() {
            length += 1; // joining newline
        }
        length += line.chars().count();
        taken.push(line);
        if min_length > 0 && length >= min_length {
            break;
        }
    }

    Ok(Excerpt {
        text: taken.join("\n"),
        offset,
        line_count: taken.len(),
    })
}

/// Lines finished after typing the first `typed_chars` characters of `excerpt`.
/// A line counts once its newline was typed, or once the whole excerpt was.
pub fn lines_completed(excerpt: &str, typed_chars: usize) -> usize {
    let total = excerpt.chars().count();
    let newlines = excerpt
        .chars()
        .take(typed_chars)
        .filter(|&c| c == '\n')
        .count();
    if total > 0 && typed_chars >= total {
        newlines + 1
    } else {
        newlines
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reads_lines_and_strips_carriage_returns() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "first\r\nsecond\nthird").unwrap();
        let read = read_lines(file.path().to_str().unwrap()).unwrap();
        assert_eq!(read, lines(&["first", "second", "third"]));
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = read_lines("/definitely/not/here.txt").unwrap_err();
        assert!(matches!(err, TrainerError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }

    #[test]
    fn whole_remainder_when_no_minimum() {
        let src = lines(&["one", "two", "three"]);
        let ex = excerpt(&src, 1, 0, "src").unwrap();
        assert_eq!(ex.text, "two\nthree");
        assert_eq!(ex.offset, 1);
        assert_eq!(ex.line_count, 2);
    }

    #[test]
    fn stops_once_minimum_length_reached() {
        let src = lines(&["abcd", "efgh", "ijkl", "mnop"]);
        // "abcd\nefgh" is 9 characters
        let ex = excerpt(&src, 0, 8, "src").unwrap();
        assert_eq!(ex.text, "abcd\nefgh");
        assert_eq!(ex.line_count, 2);
    }

    #[test]
    fn offset_past_end_wraps_to_start() {
        let src = lines(&["one", "two"]);
        let ex = excerpt(&src, 5, 0, "src").unwrap();
        assert_eq!(ex.offset, 0);
        assert_eq!(ex.text, "one\ntwo");
    }

    #[test]
    fn blank_remainder_wraps_to_start() {
        let src = lines(&["hello world", "", "  "]);
        let ex = excerpt(&src, 1, 5, "src").unwrap();
        assert_eq!(ex.offset, 0);
        assert_eq!(ex.text, "hello world");
    }

    #[test]
    fn blank_source_is_invalid() {
        let err = excerpt(&lines(&["", "  "]), 0, 0, "blank.txt").unwrap_err();
        assert_eq!(err.to_string(), "blank.txt contains no usable data");
    }

    #[test]
    fn counts_completed_lines() {
        let text = "ab\ncd\nef";
        assert_eq!(lines_completed(text, 0), 0);
        assert_eq!(lines_completed(text, 2), 0);
        assert_eq!(lines_completed(text, 3), 1);
        assert_eq!(lines_completed(text, 7), 2);
        assert_eq!(lines_completed(text, 8), 3);
    }
}
