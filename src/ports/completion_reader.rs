//! Completion reader port.

use async_trait::async_trait;

use crate::domain::completion::CompletionSet;
use crate::domain::foundation::{CourseId, DomainError, LearnerId};

/// Read access to a learner's completion facts.
#[async_trait]
pub trait CompletionReader: Send + Sync {
    /// Completions recorded by `learner_id` for lessons of `course_id`.
    ///
    /// Implementations must read current state; callers recompute progress
    /// from this set and never from cached counts.
    async fn completions_for(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<CompletionSet, DomainError>;
}
