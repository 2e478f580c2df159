//! GenerateCertificateHandler - Command handler for issuing a course certificate.
//!
//! Issuance happens at most once per enrollment. Eligibility is judged
//! against the catalog as it is now: the cached progress is recomputed from
//! the learner's completions and committed before the check, so content
//! added after completion makes the learner ineligible again.
//!
//! Within the process, requests for the same enrollment are serialized so
//! the renderer runs once. Across processes, the repository's check-and-set
//! on the certificate reference decides the winner and losers return the
//! stored reference.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::domain::catalog::CatalogTree;
use crate::domain::enrollment::{Enrollment, EnrollmentEvent, ProgressionError};
use crate::domain::foundation::{
    CertificateRef, CommandMetadata, CourseId, EnrollmentId, Timestamp,
};
use crate::ports::{
    CatalogReader, CertificateClaim, CertificateRenderer, CertificateRequest, CompletionReader,
    EnrollmentRepository, EventPublisher,
};

use super::publish_committed;

#[derive(Debug, Clone)]
pub struct GenerateCertificateCommand {
    pub course_id: CourseId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateCertificateResult {
    pub certificate_ref: CertificateRef,
    /// False when an earlier request already issued the certificate.
    pub newly_issued: bool,
}

type IssueLock = Arc<tokio::sync::Mutex<()>>;

pub struct GenerateCertificateHandler {
    catalog: Arc<dyn CatalogReader>,
    enrollments: Arc<dyn EnrollmentRepository>,
    completions: Arc<dyn CompletionReader>,
    renderer: Arc<dyn CertificateRenderer>,
    event_publisher: Arc<dyn EventPublisher>,
    max_commit_retries: u32,
    in_flight: Mutex<HashMap<EnrollmentId, IssueLock>>,
}

impl GenerateCertificateHandler {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        enrollments: Arc<dyn EnrollmentRepository>,
        completions: Arc<dyn CompletionReader>,
        renderer: Arc<dyn CertificateRenderer>,
        event_publisher: Arc<dyn EventPublisher>,
        max_commit_retries: u32,
    ) -> Self {
        Self {
            catalog,
            enrollments,
            completions,
            renderer,
            event_publisher,
            max_commit_retries,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    #[tracing::instrument(skip(self, metadata), fields(learner_id = %metadata.learner_id))]
    pub async fn handle(
        &self,
        cmd: GenerateCertificateCommand,
        metadata: CommandMetadata,
    ) -> Result<GenerateCertificateResult, ProgressionError> {
        let enrollment = self
            .enrollments
            .find_by_learner_and_course(&metadata.learner_id, &cmd.course_id)
            .await?
            .ok_or(ProgressionError::NotEnrolled(cmd.course_id))?;

        // Cheap path: already issued, no need to queue behind anyone.
        if let Some(existing) = enrollment.certificate_ref {
            return Ok(GenerateCertificateResult {
                certificate_ref: existing,
                newly_issued: false,
            });
        }

        let lock = self.lock_for(enrollment.id);
        let result = {
            let _guard = lock.lock().await;
            self.issue(enrollment.id, cmd.course_id, &metadata).await
        };
        drop(lock);
        self.release_idle_locks();

        result
    }

    async fn issue(
        &self,
        enrollment_id: EnrollmentId,
        course_id: CourseId,
        metadata: &CommandMetadata,
    ) -> Result<GenerateCertificateResult, ProgressionError> {
        // 1. Re-read under the lock; a queued request sees the winner's reference
        let enrollment = self
            .enrollments
            .find_by_id(&enrollment_id)
            .await?
            .ok_or(ProgressionError::NotEnrolled(course_id))?;

        if let Some(existing) = enrollment.certificate_ref.clone() {
            return Ok(GenerateCertificateResult {
                certificate_ref: existing,
                newly_issued: false,
            });
        }

        // 2. Judge eligibility against the current tree, not the cached flag
        let tree = self
            .catalog
            .load_tree(&course_id)
            .await?
            .ok_or(ProgressionError::CourseNotFound(course_id))?;
        let mut enrollment = self.sync_progress(enrollment, &tree, metadata).await?;

        let completed_at = match (enrollment.completed, enrollment.completed_at) {
            (true, Some(at)) => at,
            _ => return Err(ProgressionError::NotEligible(course_id)),
        };

        // 3. Render
        let request = CertificateRequest {
            enrollment_id: enrollment.id,
            learner_id: enrollment.learner_id.clone(),
            course_id,
            course_title: tree.course().title.clone(),
            completed_at,
        };
        let reference = self.renderer.render(&request).await?;

        // 4. Claim
        let now = Timestamp::now();
        let event = enrollment.issue_certificate(reference.clone(), now)?;
        match self
            .enrollments
            .claim_certificate(&enrollment.id, &reference)
            .await?
        {
            CertificateClaim::Claimed => {
                tracing::info!(
                    enrollment_id = %enrollment.id,
                    certificate_ref = %reference,
                    "Certificate issued"
                );
                publish_committed(
                    self.event_publisher.as_ref(),
                    metadata,
                    &[EnrollmentEvent::CertificateIssued(event)],
                )
                .await;
                Ok(GenerateCertificateResult {
                    certificate_ref: reference,
                    newly_issued: true,
                })
            }
            CertificateClaim::AlreadyIssued(existing) => {
                tracing::warn!(
                    enrollment_id = %enrollment.id,
                    discarded_ref = %reference,
                    "Lost certificate issuance race, returning stored reference"
                );
                Ok(GenerateCertificateResult {
                    certificate_ref: existing,
                    newly_issued: false,
                })
            }
        }
    }

    /// Recomputes the cached progress from the learner's completions and
    /// commits it when it moved. A lost race re-reads and tries again.
    async fn sync_progress(
        &self,
        mut enrollment: Enrollment,
        tree: &CatalogTree,
        metadata: &CommandMetadata,
    ) -> Result<Enrollment, ProgressionError> {
        for attempt in 0..=self.max_commit_retries {
            let completions = self
                .completions
                .completions_for(&enrollment.learner_id, &enrollment.course_id)
                .await?;
            let events = enrollment.recompute(tree, &completions, Timestamp::now());
            if events.is_empty() {
                return Ok(enrollment);
            }

            match self.enrollments.commit_progress(&enrollment, None).await {
                Ok(version) => {
                    enrollment.version = version;
                    for event in &events {
                        if let EnrollmentEvent::ProgressUpdated(update) = event {
                            if update.is_dilution() {
                                tracing::info!(
                                    enrollment_id = %enrollment.id,
                                    previous = %update.previous_percent,
                                    current = %update.progress_percent,
                                    "Progress diluted by catalog changes"
                                );
                            }
                        }
                    }
                    publish_committed(self.event_publisher.as_ref(), metadata, &events).await;
                    return Ok(enrollment);
                }
                Err(err) if err.is_conflict() => {
                    tracing::warn!(
                        attempt,
                        enrollment_id = %enrollment.id,
                        "Enrollment changed concurrently, retrying from a fresh read"
                    );
                    enrollment = self
                        .enrollments
                        .find_by_id(&enrollment.id)
                        .await?
                        .ok_or(ProgressionError::NotEnrolled(enrollment.course_id))?;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(ProgressionError::conflict(format!(
            "progress sync for enrollment {} lost {} races",
            enrollment.id,
            self.max_commit_retries + 1
        )))
    }

    fn lock_for(&self, enrollment_id: EnrollmentId) -> IssueLock {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(enrollment_id)
            .or_default()
            .clone()
    }

    /// Drops locks nobody holds or waits on.
    fn release_idle_locks(&self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}
