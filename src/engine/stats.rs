use serde::{Deserialize, Serialize};

/// Measured performance for one practice attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub wpm: f64,
    /// Percentage, 0-100.
    pub accuracy: f64,
}

impl Stats {
    pub fn new(wpm: f64, accuracy: f64) -> Self {
        Self { wpm, accuracy }
    }

    /// True when both speed and accuracy reach `target`.
    pub fn meets(&self, target: &Stats) -> bool {
        self.wpm >= target.wpm && self.accuracy >= target.accuracy
    }

    /// Both dimensions scaled by `percent` (clamped to 0-100).
    pub fn scaled(&self, percent: u32) -> Stats {
        let factor = percent.min(100) as f64 / 100.0;
        Stats {
            wpm: self.wpm * factor,
            accuracy: self.accuracy * factor,
        }
    }
}
