use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::scoring::wpm;
use crate::session::drill::DrillState;

/// One typing session as written to the sessions log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub start: DateTime<Utc>,
    pub text: String,
    pub timeline: Vec<f64>,
}

impl SessionRecord {
    pub fn new(start: DateTime<Utc>, text: impl Into<String>, timeline: Vec<f64>) -> Self {
        Self {
            start,
            text: text.into(),
            timeline,
        }
    }

    /// The correctly typed prefix of `drill`. A drill that never started is
    /// stamped with `fallback_start`.
    pub fn from_drill(drill: &DrillState, fallback_start: DateTime<Utc>) -> Self {
        Self {
            start: drill.started_at.unwrap_or(fallback_start),
            text: drill.done().iter().collect(),
            timeline: drill.typed_timeline().to_vec(),
        }
    }

    pub fn chars(&self) -> Vec<char> {
        self.text.chars().collect()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.timeline.last().copied().unwrap_or(0.0)
    }

    pub fn wpm(&self) -> f64 {
        wpm(self.char_count(), self.elapsed_secs())
    }

    pub fn summary(&self) -> String {
        let typed = self.char_count();
        if typed == 0 {
            return "Typed nothing".to_string();
        }
        let elapsed = self.elapsed_secs();
        if elapsed <= 0.0 {
            return "Speed of light! (probably a problem with the timer)".to_string();
        }
        format!(
            "Typed {typed} characters in {elapsed:.1} seconds. Speed: {:.1} wpm",
            self.wpm()
        )
    }
}
