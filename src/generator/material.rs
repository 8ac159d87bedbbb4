use crate::engine::skill::SkillTier;
use crate::error::{EngineError, Result};
use crate::generator::RandomSource;

const COMMON_WORDS: &[&str] = &[
    "the", "be", "to", "of", "and", "a", "in", "that", "have", "I", "it", "for", "not", "on",
    "with", "he", "as", "you", "do", "at", "this", "but", "his", "by", "from", "they", "we",
    "say", "her", "she", "or", "an", "will", "my", "one", "all", "would", "there", "their",
    "what", "so", "up", "out", "if", "about", "who", "get", "which", "go", "me", "when", "make",
    "can", "like", "time", "no", "just", "him", "know", "take", "people", "into", "year", "your",
    "good", "some", "could", "them", "see", "other", "than", "then", "now", "look", "only",
    "come", "its", "over", "think", "also", "back", "after", "use", "two", "how", "our", "work",
    "first", "well", "way", "even", "new", "want", "because", "any", "these", "give", "day",
    "most", "us",
];

const BEGINNER_WORDS: &[&str] = &[
    "cat", "dog", "run", "jump", "walk", "eat", "sleep", "play", "read", "write", "book", "pen",
    "desk", "chair", "table", "door", "window", "wall", "floor", "roof",
];

const NOVICE_WORDS: &[&str] = &[
    "computer", "keyboard", "monitor", "screen", "mouse", "printer", "scanner", "network",
    "internet", "website", "email", "message", "document", "folder", "file", "program",
    "software", "hardware", "system", "data",
];

const INTERMEDIATE_WORDS: &[&str] = &[
    "algorithm", "database", "function", "variable", "parameter", "interface", "class", "method",
    "object", "property", "event", "handler", "service", "client", "server", "protocol",
    "framework", "library", "module", "component",
];

const ADVANCED_WORDS: &[&str] = &[
    "encryption", "authentication", "authorization", "validation", "optimization", "performance",
    "reliability", "scalability", "maintainability", "compatibility", "integration",
    "deployment", "configuration", "implementation", "architecture", "infrastructure",
    "environment", "repository", "dependency", "framework",
];

const EXPERT_WORDS: &[&str] = &[
    "microservices", "containerization", "orchestration", "virtualization", "cloud",
    "distributed", "concurrent", "asynchronous", "synchronous", "persistence", "transaction",
    "replication", "fragmentation", "normalization", "denormalization", "polymorphism",
    "inheritance", "encapsulation", "abstraction", "refactoring",
];

const KEYWORD_PERCENT: usize = 30;
const KEY_FILL_PERCENT: usize = 70;
const MAX_REPETITION_DRILLS: usize = 5;
const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

fn tier_words(tier: SkillTier) -> &'static [&'static str] {
    match tier {
        SkillTier::Beginner => BEGINNER_WORDS,
        SkillTier::Novice => NOVICE_WORDS,
        SkillTier::Intermediate => INTERMEDIATE_WORDS,
        SkillTier::Advanced => ADVANCED_WORDS,
        SkillTier::Expert => EXPERT_WORDS,
    }
}

/// Share of everyday words mixed into tier material; harder tiers see more
/// of their own vocabulary.
fn common_word_percent(tier: SkillTier) -> usize {
    match tier {
        SkillTier::Beginner => 80,
        SkillTier::Novice => 70,
        SkillTier::Intermediate => 60,
        SkillTier::Advanced => 50,
        SkillTier::Expert => 40,
    }
}

/// Free-form test material used for placement and speed tests.
pub struct MaterialGenerator<R> {
    rng: R,
}

impl<R: RandomSource> MaterialGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn pick<'a>(&mut self, pool: &[&'a str]) -> &'a str {
        pool[self.rng.next(pool.len())]
    }

    pub fn test_material(&mut self, tier: SkillTier, word_count: usize) -> String {
        let level_words = tier_words(tier);
        let common_percent = common_word_percent(tier);
        let words: Vec<&str> = (0..word_count)
            .map(|_| {
                if self.rng.next(100) < common_percent {
                    self.pick(COMMON_WORDS)
                } else {
                    self.pick(level_words)
                }
            })
            .collect();
        words.join(" ")
    }

    pub fn keyword_material(&mut self, keywords: &[String], word_count: usize) -> Result<String> {
        if keywords.is_empty() {
            return Err(EngineError::invalid("keyword list cannot be empty"));
        }
        let words: Vec<&str> = (0..word_count)
            .map(|_| {
                if self.rng.next(100) < KEYWORD_PERCENT {
                    keywords[self.rng.next(keywords.len())].as_str()
                } else {
                    self.pick(COMMON_WORDS)
                }
            })
            .collect();
        Ok(words.join(" "))
    }

    /// Pseudo-words over `keys`, each holding at least one key, mixed with a
    /// few single-key repetition drills and shuffled.
    pub fn key_practice_text(
        &mut self,
        keys: &[char],
        word_count: usize,
        min_len: usize,
        max_len: usize,
    ) -> Result<String> {
        if keys.is_empty() {
            return Err(EngineError::invalid("keys cannot be empty"));
        }
        if min_len == 0 || min_len > max_len {
            return Err(EngineError::invalid(format!(
                "invalid word length range {min_len}..={max_len}"
            )));
        }

        let consonants: Vec<char> = keys
            .iter()
            .copied()
            .filter(|ch| !VOWELS.contains(&ch.to_ascii_lowercase()))
            .collect();

        let mut words: Vec<String> = Vec::with_capacity(word_count + MAX_REPETITION_DRILLS);
        for _ in 0..word_count {
            let len = self.rng.next_range(min_len, max_len + 1);
            let must_use = keys[self.rng.next(keys.len())];
            let must_pos = self.rng.next(len);
            let word: String = (0..len)
                .map(|i| {
                    if i == must_pos {
                        must_use
                    } else if self.rng.next(100) < KEY_FILL_PERCENT || consonants.is_empty() {
                        keys[self.rng.next(keys.len())]
                    } else {
                        consonants[self.rng.next(consonants.len())]
                    }
                })
                .collect();
            words.push(word);
        }

        let repetitions = MAX_REPETITION_DRILLS.min(word_count / 10);
        for _ in 0..repetitions {
            let key = keys[self.rng.next(keys.len())];
            let len = self.rng.next_range(3, 6);
            words.push(std::iter::repeat_n(key, len).collect());
        }

        // Fisher-Yates
        for i in (1..words.len()).rev() {
            let j = self.rng.next(i + 1);
            words.swap(i, j);
        }

        Ok(words.join(" "))
    }
}
