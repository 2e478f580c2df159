//! Enrollment module - Per-learner course state.

mod aggregate;
mod errors;
mod events;

pub use aggregate::Enrollment;
pub use errors::ProgressionError;
pub use events::{
    CertificateIssued, CourseCompleted, EnrollmentCreated, EnrollmentEvent, LessonCompleted,
    ProgressUpdated,
};
