//! Caller-facing errors of the progression engine.

use thiserror::Error;

use crate::domain::foundation::{CourseId, DomainError, ErrorCode, LessonId};

/// Typed failures surfaced by progression commands and queries.
///
/// `CourseNotFound`, `LessonNotFound`, `NotEnrolled`, `LessonOutsideCourse`
/// and `NotEligible` are permanent for the given input and must not be
/// retried. `Conflict` only escapes when concurrent writers kept winning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),

    #[error("Lesson not found: {0}")]
    LessonNotFound(LessonId),

    #[error("Learner is not enrolled in course {0}")]
    NotEnrolled(CourseId),

    #[error("Lesson {lesson_id} does not belong to course {course_id}")]
    LessonOutsideCourse {
        lesson_id: LessonId,
        course_id: CourseId,
    },

    #[error("Course {0} is not completed yet")]
    NotEligible(CourseId),

    #[error("Concurrent update conflict: {0}")]
    Conflict(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl ProgressionError {
    pub fn conflict(message: impl Into<String>) -> Self {
        ProgressionError::Conflict(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        ProgressionError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ProgressionError::CourseNotFound(_) => ErrorCode::CourseNotFound,
            ProgressionError::LessonNotFound(_) => ErrorCode::LessonNotFound,
            ProgressionError::NotEnrolled(_) => ErrorCode::Forbidden,
            ProgressionError::LessonOutsideCourse { .. } => ErrorCode::Forbidden,
            ProgressionError::NotEligible(_) => ErrorCode::NotEligible,
            ProgressionError::Conflict(_) => ErrorCode::Conflict,
            ProgressionError::Validation(_) => ErrorCode::ValidationFailed,
            ProgressionError::Infrastructure(_) => ErrorCode::InternalError,
        }
    }
}

impl From<DomainError> for ProgressionError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Conflict => ProgressionError::Conflict(err.message),
            ErrorCode::ValidationFailed => ProgressionError::Validation(err.message),
            _ => ProgressionError::Infrastructure(err.to_string()),
        }
    }
}
