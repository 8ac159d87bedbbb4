use std::sync::Arc;

use tracing::debug;

use crate::engine::course::CourseSetting;
use crate::engine::phase::{self, PracticePhase};
use crate::engine::progression::{
    LessonPresentation, LessonProgression, lesson_index, require_lessons, require_stats,
};
use crate::engine::stats::Stats;
use crate::error::Result;
use crate::generator::RandomSource;
use crate::generator::practice::PracticeTextGenerator;
use crate::store::schema::LessonDefinition;

/// Adaptive beginner progression: a lesson is passed when the attempt meets
/// the course's target stats; below that, the learner drills the same lesson
/// through the repetition, patterns and real-words phases.
pub struct ThresholdCourse<R> {
    lessons: Arc<[LessonDefinition]>,
    setting: CourseSetting,
    generator: PracticeTextGenerator<R>,
}

impl<R: RandomSource> ThresholdCourse<R> {
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

    fn present(&mut self, index: usize, phase: PracticePhase) -> Result<LessonPresentation> {
        let lesson = &self.lessons[index];
        let text = self.generator.generate(
            &lesson.target_keys,
            &lesson.common_words,
            phase,
            self.setting.practice_text_length,
        )?;
        let prefix = phase.instruction_prefix();
        let instruction = if lesson.instruction.is_empty() {
            prefix.to_string()
        } else {
            format!("{prefix}. {}", lesson.instruction)
        };
        Ok(LessonPresentation {
            lesson_id: lesson.id,
            practice_text: text,
            instruction,
            is_course_complete: false,
            phase,
            lesson_count: self.lessons.len(),
        })
    }
}

impl<R: RandomSource> LessonProgression for ThresholdCourse<R> {
    fn practice_lesson(
        &mut self,
        current_lesson_id: u32,
        stats: Option<&Stats>,
        phase: PracticePhase,
    ) -> Result<LessonPresentation> {
        let stats = require_stats(stats)?;
        if current_lesson_id == 0 {
            return self.present(0, PracticePhase::SimpleRepetition);
        }

        let index = lesson_index(&self.lessons, current_lesson_id)?;
        if stats.meets(&self.setting.target_stats) {
            if index == self.last_index() {
                debug!(lesson = current_lesson_id, "course complete");
                return Ok(LessonPresentation::course_complete(
                    current_lesson_id,
                    phase.resolved(),
                    self.lessons.len(),
                ));
            }
            // A new lesson always restarts the phase cycle.
            debug!(from = current_lesson_id, "target met, advancing lesson");
            return self.present(index + 1, PracticePhase::SimpleRepetition);
        }

        let next_phase = phase::advance(phase, stats, &self.setting.phase_target());
        debug!(lesson = current_lesson_id, ?phase, ?next_phase, "drilling lesson");
        self.present(index, next_phase)
    }

    fn is_completed(&self, current_lesson_id: u32, stats: &Stats) -> Result<bool> {
        if current_lesson_id == 0 {
            return Ok(false);
        }
        let index = lesson_index(&self.lessons, current_lesson_id)?;
        Ok(index == self.last_index() && stats.meets(&self.setting.target_stats))
    }

    fn lessons(&self) -> &[LessonDefinition] {
        &self.lessons
    }

    fn setting(&self) -> &CourseSetting {
        &self.setting
    }
}
