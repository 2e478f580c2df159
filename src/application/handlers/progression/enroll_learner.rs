//! EnrollLearnerHandler - Command handler for enrolling a learner in a course.
//!
//! Enrolling twice is not an error: the existing enrollment is returned and
//! no second `EnrollmentCreated` event is published.

use std::sync::Arc;

use crate::domain::enrollment::{Enrollment, ProgressionError};
use crate::domain::foundation::{CommandMetadata, CourseId, Timestamp};
use crate::ports::{CatalogReader, EnrollmentRepository, EventPublisher};

use super::publish_committed;

/// Command to enroll the calling learner.
#[derive(Debug, Clone)]
pub struct EnrollLearnerCommand {
    pub course_id: CourseId,
}

#[derive(Debug, Clone)]
pub struct EnrollLearnerResult {
    pub enrollment: Enrollment,
    /// False when the learner was already enrolled.
    pub newly_enrolled: bool,
}

pub struct EnrollLearnerHandler {
    catalog: Arc<dyn CatalogReader>,
    enrollments: Arc<dyn EnrollmentRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl EnrollLearnerHandler {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        enrollments: Arc<dyn EnrollmentRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            catalog,
            enrollments,
            event_publisher,
        }
    }

    #[tracing::instrument(skip(self, metadata), fields(learner_id = %metadata.learner_id))]
    pub async fn handle(
        &self,
        cmd: EnrollLearnerCommand,
        metadata: CommandMetadata,
    ) -> Result<EnrollLearnerResult, ProgressionError> {
        // 1. The course must exist
        self.catalog
            .load_tree(&cmd.course_id)
            .await?
            .ok_or(ProgressionError::CourseNotFound(cmd.course_id))?;

        // 2. Insert unless already enrolled
        let (candidate, event) =
            Enrollment::enroll(metadata.learner_id.clone(), cmd.course_id, Timestamp::now());
        let enrollment = self.enrollments.insert_if_absent(&candidate).await?;
        let newly_enrolled = enrollment.id == candidate.id;

        // 3. Publish only for the insert that won
        if newly_enrolled {
            tracing::info!(enrollment_id = %enrollment.id, "Learner enrolled");
            publish_committed(self.event_publisher.as_ref(), &metadata, &[event]).await;
        }

        Ok(EnrollLearnerResult {
            enrollment,
            newly_enrolled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::progression::test_support::{metadata, Harness};
    use crate::ports::EnrollmentChecker;

    fn handler(h: &Harness) -> EnrollLearnerHandler {
        EnrollLearnerHandler::new(
            Arc::new(h.catalog.clone()),
            Arc::new(h.store.clone()),
            h.bus.clone(),
        )
    }

    #[tokio::test]
    async fn enrolls_and_publishes_created() {
        let h = Harness::new().await;
        let result = handler(&h)
            .handle(EnrollLearnerCommand { course_id: h.course_id() }, metadata())
            .await
            .unwrap();

        assert!(result.newly_enrolled);
        assert_eq!(result.enrollment.progress.value(), 0);
        assert!(h
            .store
            .is_enrolled(&metadata().learner_id, &h.course_id())
            .await
            .unwrap());

        let events = h.bus.events_of_type("enrollment.created.v1");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].metadata.correlation_id.as_deref(), Some("test-correlation-id"));
    }

    #[tokio::test]
    async fn second_enrollment_returns_existing() {
        let h = Harness::new().await;
        let handler = handler(&h);
        let cmd = EnrollLearnerCommand { course_id: h.course_id() };

        let first = handler.handle(cmd.clone(), metadata()).await.unwrap();
        let second = handler.handle(cmd, metadata()).await.unwrap();

        assert!(!second.newly_enrolled);
        assert_eq!(first.enrollment.id, second.enrollment.id);
        assert_eq!(h.bus.events_of_type("enrollment.created.v1").len(), 1);
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let h = Harness::new().await;
        let missing = CourseId::new();
        let err = handler(&h)
            .handle(EnrollLearnerCommand { course_id: missing }, metadata())
            .await
            .unwrap_err();

        assert_eq!(err, ProgressionError::CourseNotFound(missing));
        assert_eq!(h.bus.event_count(), 0);
    }
}
