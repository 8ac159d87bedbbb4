use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::course::{CourseKind, CourseSetting};
use crate::engine::stats::Stats;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_lesson_dir")]
    pub lesson_dir: String,
    #[serde(default = "default_course")]
    pub default_course: String,
    #[serde(default = "default_session_minutes")]
    pub session_minutes: u32,
    #[serde(default = "default_new_keys_per_step")]
    pub new_keys_per_step: u32,
    #[serde(default = "default_practice_text_length")]
    pub practice_text_length: usize,
    #[serde(default = "default_phase_attempt_threshold")]
    pub phase_attempt_threshold: u32,
    #[serde(default = "default_target_wpm")]
    pub target_wpm: u32,
    #[serde(default = "default_target_accuracy")]
    pub target_accuracy: f64,
}

fn default_lesson_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("typecoach")
        .join("lessons")
        .to_string_lossy()
        .to_string()
}
fn default_course() -> String {
    CourseKind::Beginner.to_key().to_string()
}
fn default_session_minutes() -> u32 {
    120
}
fn default_new_keys_per_step() -> u32 {
    1
}
fn default_practice_text_length() -> usize {
    74
}
fn default_phase_attempt_threshold() -> u32 {
    50
}
fn default_target_wpm() -> u32 {
    30
}
fn default_target_accuracy() -> f64 {
    90.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lesson_dir: default_lesson_dir(),
            default_course: default_course(),
            session_minutes: default_session_minutes(),
            new_keys_per_step: default_new_keys_per_step(),
            practice_text_length: default_practice_text_length(),
            phase_attempt_threshold: default_phase_attempt_threshold(),
            target_wpm: default_target_wpm(),
            target_accuracy: default_target_accuracy(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typecoach")
            .join("config.toml")
    }

    /// Clamp values a hand-edited file may have pushed out of range, and
    /// reset an unknown default course.
    pub fn validate(&mut self) {
        self.practice_text_length = self.practice_text_length.max(1);
        self.phase_attempt_threshold = self.phase_attempt_threshold.clamp(1, 100);
        self.target_accuracy = if self.target_accuracy.is_nan() {
            default_target_accuracy()
        } else {
            self.target_accuracy.clamp(0.0, 100.0)
        };
        if CourseKind::from_name(&self.default_course).is_none() {
            self.default_course = default_course();
        }
    }

    pub fn course_kind(&self) -> CourseKind {
        CourseKind::from_name(&self.default_course).unwrap_or(CourseKind::Beginner)
    }

    pub fn course_setting(&self) -> CourseSetting {
        CourseSetting {
            session_minutes: self.session_minutes,
            new_keys_per_step: self.new_keys_per_step,
            practice_text_length: self.practice_text_length,
            phase_attempt_threshold: self.phase_attempt_threshold,
            target_stats: Stats::new(self.target_wpm as f64, self.target_accuracy),
        }
    }
}
