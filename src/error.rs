use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// No lesson source knows this course identity.
    #[error("no lesson catalog found for course '{0}'")]
    NotFound(String),

    #[error("lesson {lesson_id} is not in the catalog")]
    LessonNotFound { lesson_id: u32 },

    #[error("malformed lesson data for course '{course}': {reason}")]
    MalformedData { course: String, reason: String },

    /// Composite skill score outside [1, 5]. Indicates a classifier defect.
    #[error("composite skill score {0} is out of range")]
    OutOfRange(f64),
}

impl EngineError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        EngineError::InvalidArgument(msg.into())
    }

    pub fn malformed(course: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedData {
            course: course.to_string(),
            reason: reason.into(),
        }
    }
}
