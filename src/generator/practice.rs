use tracing::debug;

use crate::engine::phase::PracticePhase;
use crate::error::{EngineError, Result};
use crate::generator::{RandomSource, truncate_chars};

const MIN_RUN_LEN: usize = 2;
const MAX_RUN_LEN: usize = 4; // exclusive
const MIN_PATTERN_WORDS: usize = 1;
const MAX_PATTERN_WORDS: usize = 6; // exclusive
const MIN_PATTERN_LEN: usize = 2;
const MAX_PATTERN_LEN: usize = 5; // exclusive
const KEY_FILL_PERCENT: usize = 70;
const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

/// Builds drill text for one lesson phase from its target keys and word list.
pub struct PracticeTextGenerator<R> {
    rng: R,
}

impl<R: RandomSource> PracticeTextGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn into_inner(self) -> R {
        self.rng
    }

    /// Generate text of at most `length_limit` chars for `phase`.
    ///
    /// `SimpleRepetition` and `Patterns` need at least one target key.
    /// Whitespace is never a target key.
    /// `RealWords` falls back to patterns when the lesson has no common words.
    pub fn generate(
        &mut self,
        target_keys: &[char],
        common_words: &[String],
        phase: PracticePhase,
        length_limit: usize,
    ) -> Result<String> {
        if length_limit == 0 {
            return Err(EngineError::invalid("practice text length limit must be positive"));
        }
        let keys = unique_keys(target_keys)?;
        let phase = phase.resolved();

        let text = match phase {
            PracticePhase::RealWords => {
                let words: Vec<&str> = common_words
                    .iter()
                    .map(|w| w.trim())
                    .filter(|w| !w.is_empty())
                    .collect();
                if words.is_empty() {
                    debug!("no common words, falling back to key patterns");
                    self.patterns(&keys, length_limit)?
                } else {
                    self.real_words(&words, length_limit)
                }
            }
            PracticePhase::Patterns => self.patterns(&keys, length_limit)?,
            _ => self.simple_repetition(&keys, length_limit)?,
        };
        debug!(?phase, len = text.chars().count(), "generated practice text");
        Ok(text)
    }

    fn simple_repetition(&mut self, keys: &[char], limit: usize) -> Result<String> {
        if keys.is_empty() {
            return Err(EngineError::invalid("repetition drills need at least one target key"));
        }
        let runs: Vec<String> = keys
            .iter()
            .map(|&key| {
                let len = self.rng.next_range(MIN_RUN_LEN, MAX_RUN_LEN);
                std::iter::repeat_n(key, len).collect()
            })
            .collect();
        // Truncation only ever loses runs at the tail.
        Ok(truncate_chars(&runs.join(" "), limit))
    }

    fn patterns(&mut self, keys: &[char], limit: usize) -> Result<String> {
        if keys.is_empty() {
            return Err(EngineError::invalid("pattern drills need at least one target key"));
        }
        let consonants: Vec<char> = keys
            .iter()
            .copied()
            .filter(|ch| !VOWELS.contains(&ch.to_ascii_lowercase()))
            .collect();

        // Enough words that every key gets a mandatory slot.
        let max_slots = MAX_PATTERN_LEN - 1;
        let min_words = keys.len().div_ceil(max_slots);
        let count = self
            .rng
            .next_range(MIN_PATTERN_WORDS, MAX_PATTERN_WORDS)
            .max(min_words);

        let mut mandatory: Vec<Vec<char>> = vec![Vec::new(); count];
        for (i, &key) in keys.iter().enumerate() {
            mandatory[i % count].push(key);
        }

        let words: Vec<String> = mandatory
            .iter()
            .map(|required| self.pattern_word(keys, &consonants, required))
            .collect();

        Ok(truncate_chars(&words.join(" "), limit))
    }

    fn pattern_word(&mut self, keys: &[char], consonants: &[char], required: &[char]) -> String {
        let len = self
            .rng
            .next_range(MIN_PATTERN_LEN, MAX_PATTERN_LEN)
            .max(required.len());
        let mut slots: Vec<Option<char>> = vec![None; len];

        for &key in required {
            let free: Vec<usize> = (0..len).filter(|&i| slots[i].is_none()).collect();
            let pos = free[self.rng.next(free.len())];
            slots[pos] = Some(key);
        }

        slots
            .into_iter()
            .map(|slot| match slot {
                Some(ch) => ch,
                None => self.fill_char(keys, consonants),
            })
            .collect()
    }

    /// Mostly target keys, otherwise a consonant so pseudo-words stay
    /// vowel-light.
    fn fill_char(&mut self, keys: &[char], consonants: &[char]) -> char {
        if self.rng.next(100) < KEY_FILL_PERCENT || consonants.is_empty() {
            keys[self.rng.next(keys.len())]
        } else {
            consonants[self.rng.next(consonants.len())]
        }
    }

    fn real_words(&mut self, words: &[&str], limit: usize) -> String {
        let first = words[self.rng.next(words.len())];
        // The first word is always kept, cut down if it alone is too long.
        let mut text = truncate_chars(first, limit);
        let mut len = text.chars().count();

        loop {
            let word = words[self.rng.next(words.len())];
            let word_len = word.chars().count();
            if len + 1 + word_len > limit {
                break;
            }
            text.push(' ');
            text.push_str(word);
            len += 1 + word_len;
        }
        text
    }
}

/// Target keys in first-seen order, without duplicates.
fn unique_keys(keys: &[char]) -> Result<Vec<char>> {
    let mut seen = Vec::with_capacity(keys.len());
    for &key in keys {
        if key.is_whitespace() {
            return Err(EngineError::invalid(format!(
                "target key {key:?} is whitespace, which drills use as the separator"
            )));
        }
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    Ok(seen)
}
