use std::sync::Arc;

use tracing::debug;

use crate::engine::course::CourseSetting;
use crate::engine::phase::PracticePhase;
use crate::engine::progression::{
    LessonPresentation, LessonProgression, lesson_index, require_lessons, require_stats,
};
use crate::engine::skill::{composite_score, meets_weight};
use crate::engine::stats::Stats;
use crate::error::Result;
use crate::generator::practice::PracticeTextGenerator;
use crate::generator::{RandomSource, truncate_chars};
use crate::store::schema::LessonDefinition;

/// Skill-gated progression over a fixed lesson list. Each lesson carries a
/// point weight; the learner moves on to the next lesson whose weight their
/// composite skill score reaches.
pub struct PointCourse<R> {
    lessons: Arc<[LessonDefinition]>,
    setting: CourseSetting,
    generator: PracticeTextGenerator<R>,
}

impl<R: RandomSource> PointCourse<R> {
    pub fn new(setting: CourseSetting, lessons: Arc<[LessonDefinition]>, rng: R) -> Result<Self> {
        setting.validate()?;
        require_lessons(&lessons)?;
        Ok(Self {
            lessons,
            setting,
            generator: PracticeTextGenerator::new(rng),
        })
    }

    fn last_index(&self) -> usize {
        self.lessons.len() - 1
    }

    /// First lesson after `index`, in catalog order, whose weight the score
    /// reaches.
    fn next_qualifying(&self, index: usize, stats: &Stats) -> Option<usize> {
        self.lessons[index + 1..]
            .iter()
            .position(|l| meets_weight(stats, l.point_weight))
            .map(|offset| index + 1 + offset)
    }

    fn present(&mut self, index: usize) -> Result<LessonPresentation> {
        let lesson = &self.lessons[index];
        let limit = self.setting.practice_text_length;
        let text = match &lesson.practice_text {
            Some(authored) => truncate_chars(authored, limit),
            None => {
                let phase = if lesson.common_words.is_empty() {
                    PracticePhase::Patterns
                } else {
                    PracticePhase::RealWords
                };
                self.generator
                    .generate(&lesson.target_keys, &lesson.common_words, phase, limit)?
            }
        };
        Ok(LessonPresentation {
            lesson_id: lesson.id,
            practice_text: text,
            instruction: lesson.instruction.clone(),
            is_course_complete: false,
            phase: PracticePhase::NotSet,
            lesson_count: self.lessons.len(),
        })
    }
}

impl<R: RandomSource> LessonProgression for PointCourse<R> {
    /// `phase` is ignored: point-based courses have no phase cycle.
    fn practice_lesson(
        &mut self,
        current_lesson_id: u32,
        stats: Option<&Stats>,
        _phase: PracticePhase,
    ) -> Result<LessonPresentation> {
        let stats = require_stats(stats)?;
        if current_lesson_id == 0 {
            return self.present(0);
        }

        let index = lesson_index(&self.lessons, current_lesson_id)?;
        let score = composite_score(stats);
        if index == self.last_index() && meets_weight(stats, self.lessons[index].point_weight) {
            debug!(lesson = current_lesson_id, score, "course complete");
            return Ok(LessonPresentation::course_complete(
                current_lesson_id,
                PracticePhase::NotSet,
                self.lessons.len(),
            ));
        }

        let target = self.next_qualifying(index, stats).unwrap_or(index);
        debug!(from = current_lesson_id, to = self.lessons[target].id, score, "point progression");
        self.present(target)
    }

    fn is_completed(&self, current_lesson_id: u32, stats: &Stats) -> Result<bool> {
        if current_lesson_id == 0 {
            return Ok(false);
        }
        let index = lesson_index(&self.lessons, current_lesson_id)?;
        Ok(index == self.last_index() && meets_weight(stats, self.lessons[index].point_weight))
    }

    fn lessons(&self) -> &[LessonDefinition] {
        &self.lessons
    }

    fn setting(&self) -> &CourseSetting {
        &self.setting
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::progression::COURSE_COMPLETE_TEXT;
    use crate::error::EngineError;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn lessons() -> Arc<[LessonDefinition]> {
        let texts = [
            "Beginner Course.",
            "Novice Course.",
            "Intermediate Course.",
            "Advanced Course.",
            "Expert Course.",
            "Beginner Course2.",
        ];
        let points = [1, 2, 3, 4, 5, 1];
        texts
            .iter()
            .zip(points)
            .enumerate()
            .map(|(i, (text, point))| {
                LessonDefinition::new(i as u32 + 1, &['a'])
                    .with_point(point)
                    .with_practice_text(text)
                    .with_instruction(&format!("Lesson {}", i + 1))
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn course_with(lessons: Arc<[LessonDefinition]>) -> PointCourse<SmallRng> {
        PointCourse::new(CourseSetting::default(), lessons, SmallRng::seed_from_u64(42)).unwrap()
    }

    fn course() -> PointCourse<SmallRng> {
        course_with(lessons())
    }

    fn lesson_for(course: &mut PointCourse<SmallRng>, id: u32, stats: Stats) -> LessonPresentation {
        course
            .practice_lesson(id, Some(&stats), PracticePhase::NotSet)
            .unwrap()
    }

    #[test]
    fn test_new_learner_gets_first_lesson() {
        let mut course = course();
        let lesson = lesson_for(&mut course, 0, Stats::default());
        assert_eq!(lesson.lesson_id, 1);
        assert_eq!(lesson.practice_text, "Beginner Course.");
        assert_eq!(lesson.instruction, "Lesson 1");
    }

    #[test]
    fn test_minimum_score_skips_to_next_equal_weight_lesson() {
        // score 1.0 reaches only weight-1 lessons
        let mut course = course();
        let lesson = lesson_for(&mut course, 1, Stats::new(20.0, 70.0));
        assert_eq!(lesson.lesson_id, 6);
        assert_eq!(lesson.practice_text, "Beginner Course2.");
    }

    #[test]
    fn test_improved_score_advances_to_first_reachable_lesson() {
        // 74 wpm / 90% -> 0.4*4 + 0.6*4 = 4.0
        let mut course = course();
        let lesson = lesson_for(&mut course, 1, Stats::new(74.0, 90.0));
        assert_eq!(lesson.lesson_id, 2);
        assert_eq!(lesson.practice_text, "Novice Course.");
    }

    #[test]
    fn test_no_reachable_later_lesson_stays() {
        // 2.6 does not reach the weight-5 tail
        let lessons: Arc<[LessonDefinition]> = vec![
            LessonDefinition::new(1, &['a']).with_point(1).with_practice_text("one"),
            LessonDefinition::new(2, &['a']).with_point(5).with_practice_text("two"),
        ]
        .into();
        let mut course = course_with(lessons);
        let lesson = lesson_for(&mut course, 1, Stats::new(35.0, 85.0));
        assert_eq!(lesson.lesson_id, 1);
        assert!(!lesson.is_course_complete);
    }

    #[test]
    fn test_last_lesson_cleared_completes_course() {
        let lessons: Arc<[LessonDefinition]> = vec![
            LessonDefinition::new(1, &['a']).with_point(1).with_practice_text("one"),
            LessonDefinition::new(6, &['a']).with_point(5).with_practice_text("six"),
        ]
        .into();
        let mut course = course_with(lessons);
        let lesson = lesson_for(&mut course, 6, Stats::new(80.0, 97.0));
        assert!(lesson.is_course_complete);
        assert_eq!(lesson.lesson_id, 6);
        assert!(lesson.practice_text.is_empty());
        assert_eq!(lesson.instruction, COURSE_COMPLETE_TEXT);

        // not yet at weight 5: stay on the last lesson
        let lesson = lesson_for(&mut course, 6, Stats::new(74.0, 90.0));
        assert!(!lesson.is_course_complete);
        assert_eq!(lesson.lesson_id, 6);
    }

    #[test]
    fn test_lesson_ids_never_decrease() {
        let mut course = course();
        let samples = [
            Stats::new(10.0, 50.0),
            Stats::new(35.0, 85.0),
            Stats::new(50.0, 87.0),
            Stats::new(70.0, 92.0),
            Stats::new(90.0, 99.0),
        ];
        for start in 1..=6 {
            for stats in samples {
                let lesson = lesson_for(&mut course, start, stats);
                assert!(lesson.lesson_id >= start, "{start} -> {}", lesson.lesson_id);
            }
        }
    }

    #[test]
    fn test_generated_text_when_no_authored_text() {
        let lessons: Arc<[LessonDefinition]> = vec![
            LessonDefinition::new(1, &['q', 'w'])
                .with_words(&["queue", "wow"])
                .with_point(1),
            LessonDefinition::new(2, &['z', 'x']).with_point(1),
        ]
        .into();
        let mut course = course_with(lessons);
        let first = lesson_for(&mut course, 0, Stats::default());
        for word in first.practice_text.split(' ') {
            assert!(word == "queue" || word == "wow", "{word:?}");
        }
        let second = lesson_for(&mut course, 1, Stats::default());
        assert_eq!(second.lesson_id, 2);
        assert!(second.practice_text.contains('z') && second.practice_text.contains('x'));
    }

    #[test]
    fn test_authored_text_truncated_to_limit() {
        let mut setting = CourseSetting::default();
        setting.practice_text_length = 8;
        let mut course = PointCourse::new(setting, lessons(), SmallRng::seed_from_u64(1)).unwrap();
        let lesson = lesson_for(&mut course, 0, Stats::default());
        assert_eq!(lesson.practice_text, "Beginner");
    }

    #[test]
    fn test_is_completed() {
        let course = course();
        // lesson 6 is last with weight 1
        assert!(course.is_completed(6, &Stats::new(74.0, 90.0)).unwrap());
        assert!(course.is_completed(6, &Stats::new(24.0, 20.0)).unwrap());
        assert!(!course.is_completed(5, &Stats::new(74.0, 90.0)).unwrap());
        assert!(!course.is_completed(1, &Stats::new(90.0, 99.0)).unwrap());
    }

    #[test]
    fn test_missing_stats_and_unknown_lesson() {
        let mut course = course();
        assert!(matches!(
            course.practice_lesson(1, None, PracticePhase::NotSet),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(matches!(
            course.practice_lesson(42, Some(&Stats::default()), PracticePhase::NotSet),
            Err(EngineError::LessonNotFound { lesson_id: 42 })
        ));
    }
}
