//! Enrollment check port.
//!
//! Answers whether a learner may act on a course. Enrollment itself is
//! owned by the enroll collaborator; this port only asks.

use async_trait::async_trait;

use crate::domain::foundation::{CourseId, DomainError, LearnerId};

#[async_trait]
pub trait EnrollmentChecker: Send + Sync {
    /// Returns true if `learner_id` is enrolled in `course_id`.
    ///
    /// Errors mean the check could not be made, not that the learner is absent.
    async fn is_enrolled(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<bool, DomainError>;
}
