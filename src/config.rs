use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::MIN_SESSION_LENGTH;
use crate::generator::words::{DEFAULT_MAX_WORD_LENGTH, DEFAULT_WORD_PATTERN};
use crate::generator::{DEFAULT_MARKOV_LENGTH, DEFAULT_WEAKEST_LENGTH};

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];
const MAX_DRILL_LENGTH: usize = 10_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_markov_length")]
    pub markov_length: usize,
    #[serde(default = "default_weakest_length")]
    pub weakest_length: usize,
    #[serde(default = "default_words_file")]
    pub words_file: String,
    #[serde(default = "default_words_count")]
    pub words_count: usize,
    #[serde(default = "default_words_pattern")]
    pub words_pattern: String,
    #[serde(default = "default_words_max_length")]
    pub words_max_length: usize,
    /// Minimum characters per text-file drill; 0 types the rest of the file.
    #[serde(default = "default_text_min_length")]
    pub text_min_length: usize,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Overrides the platform data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

fn default_markov_length() -> usize {
    DEFAULT_MARKOV_LENGTH
}
fn default_weakest_length() -> usize {
    DEFAULT_WEAKEST_LENGTH
}
fn default_words_file() -> String {
    "/usr/share/dict/words".to_string()
}
fn default_words_count() -> usize {
    10
}
fn default_words_pattern() -> String {
    DEFAULT_WORD_PATTERN.to_string()
}
fn default_words_max_length() -> usize {
    DEFAULT_MAX_WORD_LENGTH
}
fn default_text_min_length() -> usize {
    0
}
fn default_theme() -> String {
    "default".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            markov_length: default_markov_length(),
            weakest_length: default_weakest_length(),
            words_file: default_words_file(),
            words_count: default_words_count(),
            words_pattern: default_words_pattern(),
            words_max_length: default_words_max_length(),
            text_min_length: default_text_min_length(),
            theme: default_theme(),
            log_level: default_log_level(),
            data_dir: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keyloop")
            .join("config.toml")
    }

    /// Clamp out-of-range values and reset unknown ones after deserialization.
    pub fn validate(&mut self) {
        self.markov_length = self.markov_length.clamp(MIN_SESSION_LENGTH, MAX_DRILL_LENGTH);
        self.weakest_length = self.weakest_length.clamp(MIN_SESSION_LENGTH, MAX_DRILL_LENGTH);
        self.words_count = self.words_count.clamp(1, 200);
        self.words_max_length = self.words_max_length.clamp(1, 64);
        self.text_min_length = self.text_min_length.min(MAX_DRILL_LENGTH);
        self.log_level = self.log_level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&self.log_level.as_str()) {
            self.log_level = default_log_level();
        }
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
        if self.words_pattern.trim().is_empty() {
            self.words_pattern = default_words_pattern();
        }
    }
}
