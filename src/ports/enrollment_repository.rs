//! Enrollment repository port (write side).
//!
//! # Design
//!
//! - **Atomic commit**: a new completion and the recomputed enrollment are
//!   written together or not at all
//! - **Optimistic concurrency**: commits carry the version they were
//!   computed from and fail with `Conflict` if another writer got there first
//! - **Single issuance**: the certificate reference is claimed with a
//!   check-and-set

use async_trait::async_trait;

use crate::domain::completion::LessonCompletion;
use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{CertificateRef, CourseId, DomainError, EnrollmentId, LearnerId};

/// Outcome of a certificate claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateClaim {
    /// The reference was stored by this call.
    Claimed,
    /// Another caller stored a reference first; this is the stored one.
    AlreadyIssued(CertificateRef),
}

#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Stores a new enrollment unless one exists for the same learner and course.
    ///
    /// Returns the stored enrollment, which is the existing one when the
    /// pair was already enrolled.
    async fn insert_if_absent(&self, enrollment: &Enrollment) -> Result<Enrollment, DomainError>;

    async fn find_by_id(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError>;

    async fn find_by_learner_and_course(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError>;

    /// Writes `completion` (if any, ignoring duplicates) and the enrollment's
    /// progress fields in one atomic unit.
    ///
    /// `enrollment.version` must be the version the enrollment was read at.
    /// Returns the new version.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the stored version moved on
    /// - `EnrollmentNotFound` if the enrollment was removed
    /// - `DatabaseError` on persistence failure
    async fn commit_progress(
        &self,
        enrollment: &Enrollment,
        completion: Option<&LessonCompletion>,
    ) -> Result<i64, DomainError>;

    /// Sets the certificate reference if none is stored yet.
    ///
    /// # Errors
    ///
    /// - `EnrollmentNotFound` if the enrollment does not exist
    /// - `DatabaseError` on persistence failure
    async fn claim_certificate(
        &self,
        id: &EnrollmentId,
        reference: &CertificateRef,
    ) -> Result<CertificateClaim, DomainError>;
}
