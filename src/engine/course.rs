use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::point_course::PointCourse;
use crate::engine::progression::LessonProgression;
use crate::engine::stats::Stats;
use crate::engine::threshold_course::ThresholdCourse;
use crate::error::{EngineError, Result};
use crate::generator::RandomSource;
use crate::store::catalog::LessonCatalog;
use crate::store::schema::LessonDefinition;

/// Per-course tuning owned by whoever owns the course.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CourseSetting {
    pub session_minutes: u32,
    pub new_keys_per_step: u32,
    /// Maximum characters of generated practice text.
    pub practice_text_length: usize,
    /// Percent of `target_stats` a learner needs to move to the next phase.
    pub phase_attempt_threshold: u32,
    /// Bar for passing a lesson in threshold-based courses.
    pub target_stats: Stats,
}

impl Default for CourseSetting {
    fn default() -> Self {
        Self {
            session_minutes: 120,
            new_keys_per_step: 1,
            practice_text_length: 74,
            phase_attempt_threshold: 50,
            target_stats: Stats::new(30.0, 90.0),
        }
    }
}

impl CourseSetting {
    pub fn validate(&self) -> Result<()> {
        if self.practice_text_length == 0 {
            return Err(EngineError::invalid("practice text length must be at least 1"));
        }
        if self.phase_attempt_threshold == 0 {
            return Err(EngineError::invalid("phase attempt threshold must be at least 1"));
        }
        Ok(())
    }

    /// Within-lesson phase bar.
    pub fn phase_target(&self) -> Stats {
        self.target_stats.scaled(self.phase_attempt_threshold)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseKind {
    /// Adaptive key-by-key course with a phase cycle per lesson.
    Beginner,
    /// Point-gated course for learners who already know the keyboard.
    AdvancedLevel,
}

impl CourseKind {
    pub fn all() -> &'static [CourseKind] {
        &[CourseKind::Beginner, CourseKind::AdvancedLevel]
    }

    pub fn to_key(self) -> &'static str {
        match self {
            CourseKind::Beginner => "beginner",
            CourseKind::AdvancedLevel => "advanced-level",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "beginner" => Some(CourseKind::Beginner),
            "advanced-level" | "advanced" => Some(CourseKind::AdvancedLevel),
            _ => None,
        }
    }

    /// Identity of the bundled catalog this kind reads by default.
    pub fn catalog_id(self) -> &'static str {
        self.to_key()
    }

    pub fn description(self) -> &'static str {
        match self {
            CourseKind::Beginner => {
                "Learn the keyboard a few keys at a time, drilling each lesson until you hit the target speed and accuracy"
            }
            CourseKind::AdvancedLevel => {
                "Skill-gated lessons that unlock as your combined speed and accuracy score improves"
            }
        }
    }

    pub fn build<R>(
        self,
        setting: CourseSetting,
        lessons: Arc<[LessonDefinition]>,
        rng: R,
    ) -> Result<Box<dyn LessonProgression + Send>>
    where
        R: RandomSource + Send + 'static,
    {
        debug!(kind = self.to_key(), lessons = lessons.len(), "building course");
        let course: Box<dyn LessonProgression + Send> = match self {
            CourseKind::Beginner => Box::new(ThresholdCourse::new(setting, lessons, rng)?),
            CourseKind::AdvancedLevel => Box::new(PointCourse::new(setting, lessons, rng)?),
        };
        Ok(course)
    }
}

/// Load the kind's catalog and build its progression.
pub fn open_course<R>(
    catalog: &LessonCatalog,
    kind: CourseKind,
    setting: CourseSetting,
    rng: R,
) -> Result<Box<dyn LessonProgression + Send>>
where
    R: RandomSource + Send + 'static,
{
    let lessons = catalog.load(kind.catalog_id())?;
    kind.build(setting, lessons, rng)
}
