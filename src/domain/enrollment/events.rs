//! Enrollment domain events.
//!
//! Events published after an enrollment change has been committed:
//! - `EnrollmentCreated` - Learner enrolled in a course
//! - `LessonCompleted` - A new completion was recorded
//! - `ProgressUpdated` - Cached progress or completion flag changed
//! - `CourseCompleted` - Completion flag flipped from false to true
//! - `CertificateIssued` - Certificate reference was claimed

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    domain_event, CertificateRef, CourseId, DomainError, EnrollmentId, EventEnvelope, EventId,
    LearnerId, LessonId, Percentage, SerializableDomainEvent, Timestamp,
};

// ════════════════════════════════════════════════════════════════════════════
// EnrollmentCreated
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentCreated {
    pub event_id: EventId,
    pub enrollment_id: EnrollmentId,
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub enrolled_at: Timestamp,
}

domain_event!(
    EnrollmentCreated,
    event_type = "enrollment.created.v1",
    schema_version = 1,
    aggregate_id = enrollment_id,
    aggregate_type = "Enrollment",
    occurred_at = enrolled_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// LessonCompleted
// ════════════════════════════════════════════════════════════════════════════

/// Published once per (learner, lesson); repeated completions publish nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonCompleted {
    pub event_id: EventId,
    pub enrollment_id: EnrollmentId,
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub lesson_id: LessonId,
    pub completed_at: Timestamp,
}

domain_event!(
    LessonCompleted,
    event_type = "lesson.completed.v1",
    schema_version = 1,
    aggregate_id = enrollment_id,
    aggregate_type = "Enrollment",
    occurred_at = completed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// ProgressUpdated
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdated {
    pub event_id: EventId,
    pub enrollment_id: EnrollmentId,
    pub course_id: CourseId,
    pub previous_percent: Percentage,
    pub progress_percent: Percentage,
    pub completed: bool,
    pub updated_at: Timestamp,
}

impl ProgressUpdated {
    /// True when new content pushed the percentage down.
    pub fn is_dilution(&self) -> bool {
        self.progress_percent < self.previous_percent
    }
}

domain_event!(
    ProgressUpdated,
    event_type = "enrollment.progress_updated.v1",
    schema_version = 1,
    aggregate_id = enrollment_id,
    aggregate_type = "Enrollment",
    occurred_at = updated_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// CourseCompleted
// ════════════════════════════════════════════════════════════════════════════

/// Published on the false to true edge of the completion flag. The
/// certificate becomes eligible at this point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCompleted {
    pub event_id: EventId,
    pub enrollment_id: EnrollmentId,
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub completed_at: Timestamp,
}

domain_event!(
    CourseCompleted,
    event_type = "enrollment.course_completed.v1",
    schema_version = 1,
    aggregate_id = enrollment_id,
    aggregate_type = "Enrollment",
    occurred_at = completed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// CertificateIssued
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateIssued {
    pub event_id: EventId,
    pub enrollment_id: EnrollmentId,
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub certificate_ref: CertificateRef,
    pub issued_at: Timestamp,
}

domain_event!(
    CertificateIssued,
    event_type = "certificate.issued.v1",
    schema_version = 1,
    aggregate_id = enrollment_id,
    aggregate_type = "Enrollment",
    occurred_at = issued_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// EnrollmentEvent
// ════════════════════════════════════════════════════════════════════════════

/// Any event raised by the enrollment aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnrollmentEvent {
    Created(EnrollmentCreated),
    LessonCompleted(LessonCompleted),
    ProgressUpdated(ProgressUpdated),
    CourseCompleted(CourseCompleted),
    CertificateIssued(CertificateIssued),
}

impl EnrollmentEvent {
    pub fn event_type(&self) -> &'static str {
        use crate::domain::foundation::DomainEvent;
        match self {
            EnrollmentEvent::Created(e) => e.event_type(),
            EnrollmentEvent::LessonCompleted(e) => e.event_type(),
            EnrollmentEvent::ProgressUpdated(e) => e.event_type(),
            EnrollmentEvent::CourseCompleted(e) => e.event_type(),
            EnrollmentEvent::CertificateIssued(e) => e.event_type(),
        }
    }

    /// Wraps the inner event for transport.
    pub fn to_envelope(&self) -> Result<EventEnvelope, DomainError> {
        match self {
            EnrollmentEvent::Created(e) => e.to_envelope(),
            EnrollmentEvent::LessonCompleted(e) => e.to_envelope(),
            EnrollmentEvent::ProgressUpdated(e) => e.to_envelope(),
            EnrollmentEvent::CourseCompleted(e) => e.to_envelope(),
            EnrollmentEvent::CertificateIssued(e) => e.to_envelope(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course_completed() -> CourseCompleted {
        CourseCompleted {
            event_id: EventId::new(),
            enrollment_id: EnrollmentId::new(),
            learner_id: LearnerId::new("learner-7").unwrap(),
            course_id: CourseId::new(),
            completed_at: Timestamp::now(),
        }
    }

    #[test]
    fn course_completed_envelope_is_routed_by_enrollment() {
        let event = course_completed();
        let envelope = EnrollmentEvent::CourseCompleted(event.clone())
            .to_envelope()
            .unwrap();

        assert_eq!(envelope.event_type, "enrollment.course_completed.v1");
        assert_eq!(envelope.schema_version, 1);
        assert_eq!(envelope.aggregate_type, "Enrollment");
        assert_eq!(envelope.aggregate_id, event.enrollment_id.to_string());
        assert_eq!(envelope.payload["learner_id"], "learner-7");
    }

    #[test]
    fn progress_updated_detects_dilution() {
        let mut event = ProgressUpdated {
            event_id: EventId::new(),
            enrollment_id: EnrollmentId::new(),
            course_id: CourseId::new(),
            previous_percent: Percentage::HUNDRED,
            progress_percent: Percentage::new(75),
            completed: false,
            updated_at: Timestamp::now(),
        };
        assert!(event.is_dilution());

        event.previous_percent = Percentage::new(50);
        assert!(!event.is_dilution());
    }

    #[test]
    fn certificate_issued_payload_carries_reference() {
        let event = CertificateIssued {
            event_id: EventId::new(),
            enrollment_id: EnrollmentId::new(),
            learner_id: LearnerId::new("learner-7").unwrap(),
            course_id: CourseId::new(),
            certificate_ref: CertificateRef::new("https://certs.example/abc").unwrap(),
            issued_at: Timestamp::now(),
        };
        let envelope = EnrollmentEvent::CertificateIssued(event).to_envelope().unwrap();
        assert_eq!(envelope.event_type, "certificate.issued.v1");
        assert_eq!(envelope.payload["certificate_ref"], "https://certs.example/abc");
    }
}
