use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Trigram model document.
pub const STATS_FILE: &str = "stats.json";
/// One JSON line per recorded session.
pub const SESSIONS_LOG_FILE: &str = "sessions_log.jsonl";
/// Per-file line offsets for resuming text drills.
pub const FILE_PROGRESS_FILE: &str = "file_progress.json";

/// How many lines of each source file have been typed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FileProgress {
    #[serde(default)]
    pub files: HashMap<String, usize>,
}

impl FileProgress {
    pub fn offset(&self, path: &str) -> usize {
        self.files.get(path).copied().unwrap_or(0)
    }

    pub fn set_offset(&mut self, path: &str, offset: usize) {
        self.files.insert(path.to_string(), offset);
    }

    /// Move the stored offset for `path` to `start + lines`.
    pub fn advance(&mut self, path: &str, start: usize, lines: usize) -> usize {
        let next = start + lines;
        self.set_offset(path, next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_file_starts_at_zero() {
        assert_eq!(FileProgress::default().offset("/tmp/book.txt"), 0);
    }

    #[test]
    fn advance_records_new_offset() {
        let mut progress = FileProgress::default();
        assert_eq!(progress.advance("/tmp/book.txt", 0, 3), 3);
        assert_eq!(progress.advance("/tmp/book.txt", 3, 2), 5);
        assert_eq!(progress.offset("/tmp/book.txt"), 5);
        assert_eq!(progress.offset("/tmp/other.txt"), 0);
    }

    #[test]
    fn missing_files_field_defaults_to_empty() {
        let progress: FileProgress = serde_json::from_str("{}").unwrap();
        assert!(progress.files.is_empty());
    }
}
