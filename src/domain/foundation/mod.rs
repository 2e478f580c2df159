//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, events and error types
//! that form the vocabulary of the course progression domain.

mod command;
mod errors;
mod events;
mod ids;
mod percentage;
mod state_machine;
mod timestamp;

pub use crate::domain_event;
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{CertificateRef, CourseId, EnrollmentId, LearnerId, LessonId, ModuleId};
pub use percentage::Percentage;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
