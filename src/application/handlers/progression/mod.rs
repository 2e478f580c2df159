//! Progression command and query handlers.
//!
//! Commands write through the enrollment repository and publish their
//! events only after the write committed. Queries never write.

// Command handlers
mod enroll_learner;
mod generate_certificate;
mod mark_lesson_complete;

// Query handlers
mod get_course_progress;
mod get_navigation_state;

#[cfg(test)]
pub(crate) mod test_support;

pub use enroll_learner::{EnrollLearnerCommand, EnrollLearnerHandler, EnrollLearnerResult};
pub use generate_certificate::{
    GenerateCertificateCommand, GenerateCertificateHandler, GenerateCertificateResult,
};
pub use get_course_progress::{CourseProgressView, GetCourseProgressHandler, GetCourseProgressQuery};
pub use get_navigation_state::{GetNavigationStateHandler, GetNavigationStateQuery};
pub use mark_lesson_complete::{
    MarkLessonCompleteCommand, MarkLessonCompleteHandler, MarkLessonCompleteResult,
};

use crate::domain::enrollment::{EnrollmentEvent, ProgressionError};
use crate::domain::foundation::{CommandMetadata, CourseId, LearnerId};
use crate::ports::{EnrollmentChecker, EventPublisher};

/// Publishes events of a committed change.
///
/// The change is already durable, so a publishing failure is logged and
/// does not fail the command.
async fn publish_committed(
    publisher: &dyn EventPublisher,
    metadata: &CommandMetadata,
    events: &[EnrollmentEvent],
) {
    if events.is_empty() {
        return;
    }

    let envelopes = match events
        .iter()
        .map(|event| event.to_envelope().map(|envelope| metadata.stamp(envelope)))
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(envelopes) => envelopes,
        Err(err) => {
            tracing::warn!(error = %err, "Failed to serialize enrollment events");
            return;
        }
    };

    if let Err(err) = publisher.publish_all(envelopes).await {
        tracing::warn!(error = %err, "Failed to publish enrollment events");
    }
}

/// Fails with `NotEnrolled` unless the checker confirms the enrollment.
///
/// A checker outage is an infrastructure error, not a refusal.
async fn ensure_enrolled(
    checker: &dyn EnrollmentChecker,
    learner_id: &LearnerId,
    course_id: &CourseId,
) -> Result<(), ProgressionError> {
    if checker.is_enrolled(learner_id, course_id).await? {
        Ok(())
    } else {
        Err(ProgressionError::NotEnrolled(*course_id))
    }
}
