//! GetCourseProgressHandler - Query handler for a learner's course progress.
//!
//! Reads the cached values on the enrollment. The cache is refreshed by
//! every progress write, so after content changes it can lag until the
//! learner's next completion.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::certificate::CertificateStatus;
use crate::domain::enrollment::ProgressionError;
use crate::domain::foundation::{CertificateRef, CourseId, LearnerId, Percentage, Timestamp};
use crate::ports::EnrollmentRepository;

#[derive(Debug, Clone)]
pub struct GetCourseProgressQuery {
    pub learner_id: LearnerId,
    pub course_id: CourseId,
}

/// Progress summary shown on the course page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseProgressView {
    pub progress_percent: Percentage,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
    pub certificate_ref: Option<CertificateRef>,
    pub certificate_status: CertificateStatus,
}

pub struct GetCourseProgressHandler {
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl GetCourseProgressHandler {
    pub fn new(enrollments: Arc<dyn EnrollmentRepository>) -> Self {
        Self { enrollments }
    }

    pub async fn handle(
        &self,
        query: GetCourseProgressQuery,
    ) -> Result<CourseProgressView, ProgressionError> {
        let enrollment = self
            .enrollments
            .find_by_learner_and_course(&query.learner_id, &query.course_id)
            .await?
            .ok_or(ProgressionError::NotEnrolled(query.course_id))?;

        Ok(CourseProgressView {
            progress_percent: enrollment.progress,
            completed: enrollment.completed,
            completed_at: enrollment.completed_at,
            certificate_status: enrollment.certificate_status(),
            certificate_ref: enrollment.certificate_ref,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::progression::test_support::{metadata, other_learner, Harness};

    #[tokio::test]
    async fn fresh_enrollment_reports_zero() {
        let h = Harness::new().await;
        h.enroll(&metadata()).await;

        let view = GetCourseProgressHandler::new(Arc::new(h.store.clone()))
            .handle(GetCourseProgressQuery {
                learner_id: metadata().learner_id,
                course_id: h.course_id(),
            })
            .await
            .unwrap();

        assert_eq!(view.progress_percent, Percentage::ZERO);
        assert!(!view.completed);
        assert_eq!(view.certificate_status, CertificateStatus::NotEligible);
    }

    #[tokio::test]
    async fn completed_enrollment_is_eligible() {
        let h = Harness::new().await;
        let mut enrollment = h.enroll(&metadata()).await;
        enrollment.progress = Percentage::HUNDRED;
        enrollment.completed = true;
        enrollment.completed_at = Some(Timestamp::now());
        h.store.put(enrollment).await;

        let view = GetCourseProgressHandler::new(Arc::new(h.store.clone()))
            .handle(GetCourseProgressQuery {
                learner_id: metadata().learner_id,
                course_id: h.course_id(),
            })
            .await
            .unwrap();

        assert!(view.completed);
        assert_eq!(view.certificate_status, CertificateStatus::Eligible);
        assert!(view.certificate_ref.is_none());
    }

    #[tokio::test]
    async fn missing_enrollment_is_not_enrolled() {
        let h = Harness::new().await;
        h.enroll(&metadata()).await;

        let err = GetCourseProgressHandler::new(Arc::new(h.store.clone()))
            .handle(GetCourseProgressQuery {
                learner_id: other_learner().learner_id,
                course_id: h.course_id(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, ProgressionError::NotEnrolled(h.course_id()));
    }
}
