use serde::{Deserialize, Serialize};

use crate::engine::course::CourseSetting;
use crate::engine::phase::PracticePhase;
use crate::engine::stats::Stats;
use crate::error::{EngineError, Result};
use crate::store::schema::LessonDefinition;

pub const COURSE_COMPLETE_TEXT: &str =
    "Congratulations, you have completed all lessons in this course.";

/// What the caller renders for the next practice session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LessonPresentation {
    pub lesson_id: u32,
    pub practice_text: String,
    pub instruction: String,
    pub is_course_complete: bool,
    /// Phase to feed back on the next request.
    pub phase: PracticePhase,
    pub lesson_count: usize,
}

impl LessonPresentation {
    pub fn course_complete(lesson_id: u32, phase: PracticePhase, lesson_count: usize) -> Self {
        Self {
            lesson_id,
            practice_text: String::new(),
            instruction: COURSE_COMPLETE_TEXT.to_string(),
            is_course_complete: true,
            phase,
            lesson_count,
        }
    }
}

/// Decides which lesson a learner practises next and builds its text.
///
/// The engine holds no learner state: callers persist the returned lesson id
/// and phase and pass them back with the next attempt's stats. A
/// `current_lesson_id` of 0 means the learner has not started the course.
pub trait LessonProgression {
    fn practice_lesson(
        &mut self,
        current_lesson_id: u32,
        stats: Option<&Stats>,
        phase: PracticePhase,
    ) -> Result<LessonPresentation>;

    fn is_completed(&self, current_lesson_id: u32, stats: &Stats) -> Result<bool>;

    fn lessons(&self) -> &[LessonDefinition];

    fn setting(&self) -> &CourseSetting;
}

pub(crate) fn require_stats(stats: Option<&Stats>) -> Result<&Stats> {
    stats.ok_or_else(|| {
        EngineError::invalid("stats are required before a practice lesson can be chosen")
    })
}

/// Position of `lesson_id` in catalog order.
pub(crate) fn lesson_index(lessons: &[LessonDefinition], lesson_id: u32) -> Result<usize> {
    lessons
        .iter()
        .position(|l| l.id == lesson_id)
        .ok_or(EngineError::LessonNotFound { lesson_id })
}

pub(crate) fn require_lessons(lessons: &[LessonDefinition]) -> Result<()> {
    if lessons.is_empty() {
        return Err(EngineError::invalid("a course needs at least one lesson"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_presentation_shape() {
        let done = LessonPresentation::course_complete(7, PracticePhase::RealWords, 9);
        assert!(done.is_course_complete);
        assert!(done.practice_text.is_empty());
        assert_eq!(done.lesson_id, 7);
        assert_eq!(done.instruction, COURSE_COMPLETE_TEXT);
    }

    #[test]
    fn test_missing_stats_rejected() {
        assert!(matches!(
            require_stats(None),
            Err(EngineError::InvalidArgument(_))
        ));
        let stats = Stats::new(10.0, 50.0);
        assert_eq!(require_stats(Some(&stats)).unwrap(), &stats);
    }

    #[test]
    fn test_lesson_index_uses_catalog_order() {
        let lessons = vec![LessonDefinition::new(5, &['a']), LessonDefinition::new(2, &['b'])];
        assert_eq!(lesson_index(&lessons, 2).unwrap(), 1);
        assert!(matches!(
            lesson_index(&lessons, 9),
            Err(EngineError::LessonNotFound { lesson_id: 9 })
        ));
    }
}
