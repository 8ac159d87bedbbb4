use serde::{Deserialize, Serialize};

use crate::engine::stats::Stats;
use crate::error::{EngineError, Result};

const WPM_WEIGHT_TENTHS: u32 = 4;
const ACCURACY_WEIGHT_TENTHS: u32 = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SkillTier {
    Beginner,
    Novice,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillTier {
    pub fn all() -> &'static [SkillTier] {
        &[
            SkillTier::Beginner,
            SkillTier::Novice,
            SkillTier::Intermediate,
            SkillTier::Advanced,
            SkillTier::Expert,
        ]
    }

    pub fn to_key(self) -> &'static str {
        match self {
            SkillTier::Beginner => "beginner",
            SkillTier::Novice => "novice",
            SkillTier::Intermediate => "intermediate",
            SkillTier::Advanced => "advanced",
            SkillTier::Expert => "expert",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "beginner" => Some(SkillTier::Beginner),
            "novice" => Some(SkillTier::Novice),
            "intermediate" => Some(SkillTier::Intermediate),
            "advanced" => Some(SkillTier::Advanced),
            "expert" => Some(SkillTier::Expert),
            _ => None,
        }
    }
}

pub fn wpm_points(wpm: f64) -> u32 {
    match wpm {
        w if w >= 75.0 => 5,
        w if w >= 60.0 => 4,
        w if w >= 45.0 => 3,
        w if w >= 30.0 => 2,
        _ => 1,
    }
}

pub fn accuracy_points(accuracy: f64) -> u32 {
    match accuracy {
        a if a >= 95.0 => 5,
        a if a >= 90.0 => 4,
        a if a >= 85.0 => 3,
        a if a >= 80.0 => 2,
        _ => 1,
    }
}

/// Composite score in tenths (10..=50). Integer arithmetic keeps the tier
/// boundaries exact.
fn composite_tenths(stats: &Stats) -> u32 {
    WPM_WEIGHT_TENTHS * wpm_points(stats.wpm) + ACCURACY_WEIGHT_TENTHS * accuracy_points(stats.accuracy)
}

/// 40% speed, 60% accuracy blend of the two 1-5 sub-scores.
pub fn composite_score(stats: &Stats) -> f64 {
    composite_tenths(stats) as f64 / 10.0
}

/// Whether the composite score reaches a lesson's point weight.
pub fn meets_weight(stats: &Stats, weight: u32) -> bool {
    composite_tenths(stats) >= weight.saturating_mul(10)
}

pub fn classify(stats: &Stats) -> Result<SkillTier> {
    let tenths = composite_tenths(stats);
    match tenths {
        10..=19 => Ok(SkillTier::Beginner),
        20..=29 => Ok(SkillTier::Novice),
        30..=39 => Ok(SkillTier::Intermediate),
        40..=49 => Ok(SkillTier::Advanced),
        50 => Ok(SkillTier::Expert),
        _ => Err(EngineError::OutOfRange(tenths as f64 / 10.0)),
    }
}
