use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::scoring::trigram_score;
use crate::engine::window::RunningWindow;
use crate::error::TrainerError;

// ---------------------------------------------------------------------------
// N-gram keys
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Bigram(pub [char; 2]);

impl fmt::Display for Bigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0[0], self.0[1])
    }
}

/// Three consecutive code points. Case and whitespace sensitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Trigram(pub [char; 3]);

impl Trigram {
    pub fn head(&self) -> Bigram {
        Bigram([self.0[0], self.0[1]])
    }

    pub fn tail(&self) -> Bigram {
        Bigram([self.0[1], self.0[2]])
    }

    pub fn chars(&self) -> [char; 3] {
        self.0
    }
}

impl fmt::Display for Trigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.0[0], self.0[1], self.0[2])
    }
}

impl TryFrom<&str> for Trigram {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), Some(c), None) => Ok(Trigram([a, b, c])),
            _ => Err(format!("{s:?} is not a trigram (needs exactly 3 characters)")),
        }
    }
}

impl TryFrom<String> for Trigram {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Trigram::try_from(s.as_str())
    }
}

impl From<Trigram> for String {
    fn from(t: Trigram) -> Self {
        t.to_string()
    }
}

// ---------------------------------------------------------------------------
// TrigramStat
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrigramStat {
    #[serde(alias = "c")]
    pub count: u64,
    #[serde(alias = "d")]
    pub duration: RunningWindow,
}

impl TrigramStat {
    /// `reference_duration` stands in for the average when no sample was recorded.
    pub fn score(&self, reference_duration: f64) -> f64 {
        trigram_score(self.count, self.duration.average(reference_duration))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrigramScore {
    pub trigram: Trigram,
    pub score: f64,
}

// ---------------------------------------------------------------------------
// TrigramModel
// ---------------------------------------------------------------------------

/// Everything learned from past sessions. Persisted as one document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrigramModel {
    #[serde(default)]
    pub total_chars_typed: u64,
    #[serde(default)]
    pub total_sessions_duration: f64,
    #[serde(default)]
    pub sessions_count: u64,
    #[serde(default)]
    pub trigrams: HashMap<Trigram, TrigramStat>,
}

impl TrigramModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds per character over all sessions, `None` before the first one.
    pub fn average_char_duration(&self) -> Option<f64> {
        if self.total_chars_typed == 0 {
            return None;
        }
        Some(self.total_sessions_duration / self.total_chars_typed as f64)
    }

    /// Expected time for an average trigram.
    pub fn reference_duration(&self) -> Option<f64> {
        self.average_char_duration().map(|d| d * 3.0)
    }

    pub fn trigram_count(&self) -> usize {
        self.trigrams.len()
    }

    pub fn get(&self, trigram: &Trigram) -> Option<&TrigramStat> {
        self.trigrams.get(trigram)
    }

    /// All observed trigrams, most in need of training first.
    /// Equal scores are ordered by trigram so the result is reproducible.
    pub fn ranked_trigrams(&self) -> Vec<TrigramScore> {
        let reference = self.reference_duration().unwrap_or(0.0);
        let mut ranked: Vec<TrigramScore> = self
            .trigrams
            .iter()
            .map(|(trigram, stat)| TrigramScore {
                trigram: *trigram,
                score: stat.score(reference),
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.trigram.cmp(&b.trigram))
        });
        ranked
    }

    pub fn weakest(&self) -> Option<TrigramScore> {
        self.ranked_trigrams().into_iter().next()
    }

    /// Fold one finished session into the model.
    ///
    /// `timeline[i]` is the second at which `text[i]` was accepted. Training
    /// sessions refine durations only, so drilled trigrams don't inflate
    /// their own frequency.
    pub fn ingest(
        &mut self,
        text: &[char],
        timeline: &[f64],
        is_training: bool,
    ) -> Result<(), TrainerError> {
        if text.len() != timeline.len() {
            return Err(TrainerError::Validation {
                text_len: text.len(),
                timeline_len: timeline.len(),
            });
        }
        let Some(&elapsed) = timeline.last() else {
            debug!("ignoring empty session");
            return Ok(());
        };

        self.sessions_count += 1;
        self.total_chars_typed += text.len() as u64;
        self.total_sessions_duration += elapsed;

        for i in 0..text.len().saturating_sub(3) {
            let key = Trigram([text[i], text[i + 1], text[i + 2]]);
            let stat = self.trigrams.entry(key).or_default();
            stat.duration.append(timeline[i + 3] - timeline[i]);
            if !is_training {
                stat.count += 1;
            }
        }

        debug!(
            chars = text.len(),
            elapsed,
            is_training,
            trigrams = self.trigrams.len(),
            "session ingested"
        );
        Ok(())
    }
}

pub fn rank_trigrams(model: &TrigramModel) -> Vec<TrigramScore> {
    model.ranked_trigrams()
}

pub fn ingest_session(
    mut model: TrigramModel,
    text: &[char],
    timeline: &[f64],
    is_training: bool,
) -> Result<TrigramModel, TrainerError> {
    model.ingest(text, timeline, is_training)?;
    Ok(model)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
