//! In-Memory Enrollment Store
//!
//! Enrollments and completion facts behind one lock, so a progress commit
//! is atomic the same way the database transaction is.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::completion::{CompletionSet, LessonCompletion};
use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{
    CertificateRef, CourseId, DomainError, EnrollmentId, ErrorCode, LearnerId, LessonId, Timestamp,
};
use crate::ports::{CertificateClaim, CompletionReader, EnrollmentChecker, EnrollmentRepository};

#[derive(Debug, Clone)]
struct StoredCompletion {
    course_id: CourseId,
    completed_at: Timestamp,
}

#[derive(Debug, Default)]
struct StoreData {
    enrollments: HashMap<EnrollmentId, Enrollment>,
    completions: HashMap<(LearnerId, LessonId), StoredCompletion>,
}

impl StoreData {
    fn find(&self, learner_id: &LearnerId, course_id: &CourseId) -> Option<&Enrollment> {
        self.enrollments
            .values()
            .find(|e| e.learner_id == *learner_id && e.course_id == *course_id)
    }
}

/// In-memory enrollment repository, completion reader and enrollment checker.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEnrollmentStore {
    data: Arc<RwLock<StoreData>>,
}

impl InMemoryEnrollmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completion facts across all learners.
    pub async fn completion_count(&self) -> usize {
        self.data.read().await.completions.len()
    }

    /// Overwrites an enrollment without a version check. Test setup only.
    pub async fn put(&self, enrollment: Enrollment) {
        self.data
            .write()
            .await
            .enrollments
            .insert(enrollment.id, enrollment);
    }
}

fn not_found(id: &EnrollmentId) -> DomainError {
    DomainError::new(
        ErrorCode::EnrollmentNotFound,
        format!("Enrollment not found: {}", id),
    )
}

#[async_trait]
impl EnrollmentRepository for InMemoryEnrollmentStore {
    async fn insert_if_absent(&self, enrollment: &Enrollment) -> Result<Enrollment, DomainError> {
        let mut data = self.data.write().await;
        if let Some(existing) = data.find(&enrollment.learner_id, &enrollment.course_id) {
            return Ok(existing.clone());
        }
        data.enrollments.insert(enrollment.id, enrollment.clone());
        Ok(enrollment.clone())
    }

    async fn find_by_id(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        Ok(self.data.read().await.enrollments.get(id).cloned())
    }

    async fn find_by_learner_and_course(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError> {
        Ok(self.data.read().await.find(learner_id, course_id).cloned())
    }

    async fn commit_progress(
        &self,
        enrollment: &Enrollment,
        completion: Option<&LessonCompletion>,
    ) -> Result<i64, DomainError> {
        let mut data = self.data.write().await;

        let stored = data
            .enrollments
            .get_mut(&enrollment.id)
            .ok_or_else(|| not_found(&enrollment.id))?;
        if stored.version != enrollment.version {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!(
                    "Enrollment {} changed since version {}",
                    enrollment.id, enrollment.version
                ),
            ));
        }

        stored.progress = enrollment.progress;
        stored.completed = enrollment.completed;
        stored.completed_at = enrollment.completed_at;
        stored.version += 1;
        let new_version = stored.version;

        if let Some(completion) = completion {
            data.completions
                .entry((completion.learner_id.clone(), completion.lesson_id))
                .or_insert(StoredCompletion {
                    course_id: enrollment.course_id,
                    completed_at: completion.completed_at,
                });
        }

        Ok(new_version)
    }

    async fn claim_certificate(
        &self,
        id: &EnrollmentId,
        reference: &CertificateRef,
    ) -> Result<CertificateClaim, DomainError> {
        let mut data = self.data.write().await;
        let stored = data.enrollments.get_mut(id).ok_or_else(|| not_found(id))?;

        match &stored.certificate_ref {
            Some(existing) => Ok(CertificateClaim::AlreadyIssued(existing.clone())),
            None => {
                stored.certificate_ref = Some(reference.clone());
                Ok(CertificateClaim::Claimed)
            }
        }
    }
}

#[async_trait]
impl CompletionReader for InMemoryEnrollmentStore {
    async fn completions_for(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<CompletionSet, DomainError> {
        let data = self.data.read().await;
        Ok(data
            .completions
            .iter()
            .filter(|((learner, _), stored)| {
                learner == learner_id && stored.course_id == *course_id
            })
            .map(|((_, lesson_id), stored)| (*lesson_id, stored.completed_at))
            .collect())
    }
}

#[async_trait]
impl EnrollmentChecker for InMemoryEnrollmentStore {
    async fn is_enrolled(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<bool, DomainError> {
        Ok(self.data.read().await.find(learner_id, course_id).is_some())
    }
}
