use chrono::{DateTime, Utc};

use crate::engine::scoring::wpm;

/// Characters used for the live speed readout.
pub const RECENT_WINDOW: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrillEvent {
    Char(char),
    Enter,
    Backspace,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Every target character was typed.
    Finished,
    /// The user left before the end; whatever was typed still counts.
    Aborted,
}

#[derive(Clone, Debug)]
pub struct DrillState {
    pub target: Vec<char>,
    pub cursor: usize,
    /// Keys typed since the first mismatch, shown in red until erased.
    pub error_input: Vec<char>,
    /// Seconds since `started_at` at which each target character was typed.
    pub timeline: Vec<f64>,
    pub started_at: Option<DateTime<Utc>>,
    pub typos: usize,
}

impl DrillState {
    pub fn new(text: &str) -> Self {
        let target: Vec<char> = text.chars().collect();
        Self {
            timeline: vec![0.0; target.len()],
            target,
            cursor: 0,
            error_input: Vec::new(),
            started_at: None,
            typos: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.target.len()
    }

    pub fn done(&self) -> &[char] {
        &self.target[..self.cursor]
    }

    pub fn wrong(&self) -> &[char] {
        &self.error_input
    }

    pub fn todo(&self) -> &[char] {
        &self.target[self.cursor..]
    }

    /// Timestamps of the characters typed so far.
    pub fn typed_timeline(&self) -> &[f64] {
        &self.timeline[..self.cursor]
    }

    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> f64 {
        match self.started_at {
            Some(start) => seconds_between(start, now),
            None => 0.0,
        }
    }

    /// Speed over the last `RECENT_WINDOW` characters, 0 until that many are typed.
    pub fn recent_wpm(&self, now: DateTime<Utc>) -> f64 {
        if self.cursor <= RECENT_WINDOW {
            return 0.0;
        }
        let since = self.elapsed_secs(now) - self.timeline[self.cursor - RECENT_WINDOW];
        wpm(RECENT_WINDOW, since)
    }

    pub fn progress(&self) -> f64 {
        if self.target.is_empty() {
            return 0.0;
        }
        self.cursor as f64 / self.target.len() as f64
    }
}

fn seconds_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_microseconds().unwrap_or(i64::MAX) as f64 / 1_000_000.0
}

/// Apply one key event. Effects tell the caller when the drill is over.
pub fn reduce(
    mut state: DrillState,
    event: DrillEvent,
    now: DateTime<Utc>,
) -> (DrillState, Vec<Effect>) {
    let ch = match event {
        DrillEvent::Quit => return (state, vec![Effect::Aborted]),
        DrillEvent::Backspace => {
            state.error_input.pop();
            return (state, Vec::new());
        }
        DrillEvent::Enter => '\n',
        DrillEvent::Char(ch) => ch,
    };
    if state.is_complete() {
        return (state, Vec::new());
    }

    let started_at = *state.started_at.get_or_insert(now);

    if state.error_input.is_empty() && ch == state.target[state.cursor] {
        state.timeline[state.cursor] = seconds_between(started_at, now);
        state.cursor += 1;
    } else {
        if state.error_input.is_empty() {
            state.typos += 1;
        }
        state.error_input.push(ch);
    }

    let effects = if state.is_complete() {
        vec![Effect::Finished]
    } else {
        Vec::new()
    };
    (state, effects)
}
