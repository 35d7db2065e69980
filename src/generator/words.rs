use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;

use crate::error::TrainerError;
use crate::generator::text_file::read_lines;

pub const DEFAULT_WORD_PATTERN: &str = "^[a-z]+$";
pub const DEFAULT_MAX_WORD_LENGTH: usize = 8;

/// Word list for random phrases.
#[derive(Clone, Debug)]
pub struct WordSource {
    words: Vec<String>,
}

impl WordSource {
    /// Keep trimmed entries matching `pattern` and at most `max_len` characters long.
    pub fn from_lines<I, S>(
        lines: I,
        pattern: &Regex,
        max_len: usize,
        source_name: &str,
    ) -> Result<Self, TrainerError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words: Vec<String> = lines
            .into_iter()
            .filter_map(|line| {
                let word = line.as_ref().trim();
                (pattern.is_match(word) && word.chars().count() <= max_len)
                    .then(|| word.to_string())
            })
            .collect();
        if words.is_empty() {
            return Err(TrainerError::InvalidSource {
                source_name: source_name.to_string(),
            });
        }
        Ok(Self { words })
    }

    pub fn load(source_name: &str, pattern: &str, max_len: usize) -> Result<Self, TrainerError> {
        let pattern = Regex::new(pattern)?;
        Self::from_lines(read_lines(source_name)?, &pattern, max_len, source_name)
    }

    /// `count` randomly chosen words joined by single spaces.
    pub fn phrase<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> String {
        (0..count)
            .filter_map(|_| self.words.choose(rng))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
