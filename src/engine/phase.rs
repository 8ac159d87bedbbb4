use serde::{Deserialize, Serialize};

use crate::engine::stats::Stats;

/// Pedagogical sub-mode within a lesson.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PracticePhase {
    /// Initial value before the first lesson is requested.
    #[default]
    NotSet,
    SimpleRepetition,
    Patterns,
    RealWords,
}

impl PracticePhase {
    /// Next phase in the cycle. `NotSet` enters the cycle at `SimpleRepetition`.
    pub fn next(self) -> PracticePhase {
        match self {
            PracticePhase::NotSet => PracticePhase::SimpleRepetition,
            PracticePhase::SimpleRepetition => PracticePhase::Patterns,
            PracticePhase::Patterns => PracticePhase::RealWords,
            PracticePhase::RealWords => PracticePhase::SimpleRepetition,
        }
    }

    /// `NotSet` resolves to `SimpleRepetition`; other phases are unchanged.
    pub fn resolved(self) -> PracticePhase {
        match self {
            PracticePhase::NotSet => PracticePhase::SimpleRepetition,
            other => other,
        }
    }

    pub fn instruction_prefix(self) -> &'static str {
        match self.resolved() {
            PracticePhase::Patterns => "Practice these key patterns",
            PracticePhase::RealWords => "Apply your skills by typing these common words",
            _ => "Focus on finger position and accuracy",
        }
    }

    pub fn to_key(self) -> &'static str {
        match self {
            PracticePhase::NotSet => "not-set",
            PracticePhase::SimpleRepetition => "simple-repetition",
            PracticePhase::Patterns => "patterns",
            PracticePhase::RealWords => "real-words",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "not-set" => Some(PracticePhase::NotSet),
            "simple-repetition" | "repetition" => Some(PracticePhase::SimpleRepetition),
            "patterns" => Some(PracticePhase::Patterns),
            "real-words" | "words" => Some(PracticePhase::RealWords),
            _ => None,
        }
    }
}

/// Advance the phase when `stats` clear `threshold`; otherwise hold.
/// Never regresses.
pub fn advance(phase: PracticePhase, stats: &Stats, threshold: &Stats) -> PracticePhase {
    if phase == PracticePhase::NotSet {
        return PracticePhase::SimpleRepetition;
    }
    if stats.meets(threshold) {
        phase.next()
    } else {
        phase
    }
}
