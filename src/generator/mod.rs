pub mod material;
pub mod practice;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Integer randomness used by the text generators. Injected so tests can
/// script exact sequences.
pub trait RandomSource {
    /// Value in `0..max_exclusive`; 0 when the range is empty.
    fn next(&mut self, max_exclusive: usize) -> usize;

    /// Value in `min..max_exclusive`; `min` when the range is empty.
    fn next_range(&mut self, min: usize, max_exclusive: usize) -> usize {
        if max_exclusive <= min {
            return min;
        }
        min + self.next(max_exclusive - min)
    }
}

impl RandomSource for SmallRng {
    fn next(&mut self, max_exclusive: usize) -> usize {
        if max_exclusive == 0 {
            return 0;
        }
        self.gen_range(0..max_exclusive)
    }
}

/// Entropy-seeded source for production use.
pub fn entropy_source() -> SmallRng {
    SmallRng::from_entropy()
}

/// Replays a fixed sequence of raw values, cycling when exhausted. Each value
/// is reduced into the requested range, so `next_range(2, 4)` fed `1` yields 3.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRandom {
    values: Vec<usize>,
    pos: usize,
}

impl ScriptedRandom {
    pub fn new(values: impl Into<Vec<usize>>) -> Self {
        Self {
            values: values.into(),
            pos: 0,
        }
    }

    pub fn calls(&self) -> usize {
        self.pos
    }
}

impl RandomSource for ScriptedRandom {
    fn next(&mut self, max_exclusive: usize) -> usize {
        if self.values.is_empty() || max_exclusive == 0 {
            self.pos += 1;
            return 0;
        }
        let value = self.values[self.pos % self.values.len()];
        self.pos += 1;
        value % max_exclusive
    }
}

/// First `limit` chars of `text`, without a dangling separator.
pub(crate) fn truncate_chars(text: &str, limit: usize) -> String {
    let cut: String = text.chars().take(limit).collect();
    cut.trim_end_matches(' ').to_string()
}
