pub mod course;
pub mod phase;
pub mod point_course;
pub mod progression;
pub mod skill;
pub mod stats;
pub mod threshold_course;

pub use course::{CourseKind, CourseSetting, open_course};
pub use phase::PracticePhase;
pub use progression::{LessonPresentation, LessonProgression};
pub use skill::SkillTier;
pub use stats::Stats;
