use serde::{Deserialize, Serialize};

pub const WINDOW_CAPACITY: usize = 10;

/// Circular buffer holding the last `WINDOW_CAPACITY` durations of a trigram.
///
/// Once full, every append silently evicts the oldest sample.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct RunningWindow {
    length: usize,
    index: usize,
    values: [f64; WINDOW_CAPACITY],
}

// Mirror of the persisted layout, checked before it becomes a RunningWindow.
#[derive(Deserialize)]
struct RawWindow {
    length: usize,
    index: usize,
    values: [f64; WINDOW_CAPACITY],
}

impl TryFrom<RawWindow> for RunningWindow {
    type Error = String;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        if raw.length > WINDOW_CAPACITY || raw.index >= WINDOW_CAPACITY {
            return Err(format!(
                "window length {} / index {} out of range for capacity {}",
                raw.length, raw.index, WINDOW_CAPACITY
            ));
        }
        Ok(Self {
            length: raw.length,
            index: raw.index,
            values: raw.values,
        })
    }
}

impl RunningWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, value: f64) {
        self.values[self.index] = value;
        self.index = (self.index + 1) % WINDOW_CAPACITY;
        if self.length < WINDOW_CAPACITY {
            self.length += 1;
        }
    }

    /// Mean of the held samples, or `default` when nothing was recorded yet.
    pub fn average(&self, default: f64) -> f64 {
        if self.length == 0 {
            return default;
        }
        self.samples().sum::<f64>() / self.length as f64
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Populated slots, in storage order.
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        // Until the buffer wraps, the populated slots are exactly 0..length.
        self.values[..self.length].iter().copied()
    }
}
