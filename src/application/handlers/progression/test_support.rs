//! Shared fixtures and mocks for the progression handler tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::adapters::events::InMemoryEventBus;
use crate::adapters::memory::{InMemoryCatalog, InMemoryEnrollmentStore};
use crate::application::handlers::progression::{
    MarkLessonCompleteCommand, MarkLessonCompleteHandler, MarkLessonCompleteResult,
};
use crate::domain::catalog::fixtures::{two_module_course, SampleCourse};
use crate::domain::completion::LessonCompletion;
use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{
    CertificateRef, CommandMetadata, CourseId, DomainError, EnrollmentId, ErrorCode, LearnerId,
    LessonId, Timestamp,
};
use crate::ports::{
    CertificateClaim, CertificateRenderer, CertificateRequest, EnrollmentChecker,
    EnrollmentRepository,
};

pub struct Harness {
    pub sample: SampleCourse,
    pub catalog: InMemoryCatalog,
    pub store: InMemoryEnrollmentStore,
    pub bus: Arc<InMemoryEventBus>,
}

impl Harness {
    pub async fn new() -> Self {
        let sample = two_module_course();
        let catalog = InMemoryCatalog::with_tree(&sample.tree).await;
        Self {
            sample,
            catalog,
            store: InMemoryEnrollmentStore::new(),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    pub fn course_id(&self) -> CourseId {
        self.sample.tree.course_id()
    }

    pub async fn enroll(&self, metadata: &CommandMetadata) -> Enrollment {
        let (enrollment, _) =
            Enrollment::enroll(metadata.learner_id.clone(), self.course_id(), Timestamp::now());
        self.store.insert_if_absent(&enrollment).await.unwrap()
    }

    /// Completes a lesson for the default learner through the real handler.
    pub async fn complete(&self, lesson_id: LessonId) -> MarkLessonCompleteResult {
        MarkLessonCompleteHandler::new(
            Arc::new(self.catalog.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            Arc::new(self.store.clone()),
            self.bus.clone(),
            5,
        )
        .handle(
            MarkLessonCompleteCommand {
                lesson_id,
                course_id: None,
            },
            metadata(),
        )
        .await
        .unwrap()
    }
}

pub fn metadata() -> CommandMetadata {
    CommandMetadata::test_fixture()
}

pub fn other_learner() -> CommandMetadata {
    CommandMetadata::new(LearnerId::new("someone-else").unwrap())
}

// ─────────────────────────────────────────────────────────────────────
// Mock implementations
// ─────────────────────────────────────────────────────────────────────

/// Checker whose backend is down.
pub struct FailingChecker;

#[async_trait]
impl EnrollmentChecker for FailingChecker {
    async fn is_enrolled(&self, _: &LearnerId, _: &CourseId) -> Result<bool, DomainError> {
        Err(DomainError::new(ErrorCode::DatabaseError, "checker unavailable"))
    }
}

/// Repository that reports a version conflict for the first `conflicts`
/// commits and then delegates.
pub struct ContendedRepository {
    pub inner: InMemoryEnrollmentStore,
    conflicts: AtomicUsize,
    pub commit_attempts: AtomicUsize,
}

impl ContendedRepository {
    pub fn new(inner: InMemoryEnrollmentStore, conflicts: usize) -> Self {
        Self {
            inner,
            conflicts: AtomicUsize::new(conflicts),
            commit_attempts: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl EnrollmentRepository for ContendedRepository {
    async fn insert_if_absent(&self, enrollment: &Enrollment) -> Result<Enrollment, DomainError> {
        self.inner.insert_if_absent(enrollment).await
    }

    async fn find_by_id(&self, id: &EnrollmentId) -> Result<Option<Enrollment>, DomainError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_learner_and_course(
        &self,
        learner_id: &LearnerId,
        course_id: &CourseId,
    ) -> Result<Option<Enrollment>, DomainError> {
        self.inner.find_by_learner_and_course(learner_id, course_id).await
    }

    async fn commit_progress(
        &self,
        enrollment: &Enrollment,
        completion: Option<&LessonCompletion>,
    ) -> Result<i64, DomainError> {
        self.commit_attempts.fetch_add(1, Ordering::SeqCst);
        let remaining = self.conflicts.load(Ordering::SeqCst);
        if remaining > 0 {
            self.conflicts.store(remaining - 1, Ordering::SeqCst);
            return Err(DomainError::new(ErrorCode::Conflict, "version moved"));
        }
        self.inner.commit_progress(enrollment, completion).await
    }

    async fn claim_certificate(
        &self,
        id: &EnrollmentId,
        reference: &CertificateRef,
    ) -> Result<CertificateClaim, DomainError> {
        self.inner.claim_certificate(id, reference).await
    }
}

/// Renderer that counts calls and can be slowed down to widen races.
pub struct CountingRenderer {
    pub calls: AtomicUsize,
    delay: Duration,
    fail: bool,
}

impl CountingRenderer {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
            fail: false,
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CertificateRenderer for CountingRenderer {
    async fn render(&self, request: &CertificateRequest) -> Result<CertificateRef, DomainError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail {
            return Err(DomainError::new(ErrorCode::RendererError, "renderer down"));
        }
        Ok(CertificateRef::new(format!("cert-{}-{}", request.enrollment_id, call)).unwrap())
    }
}
