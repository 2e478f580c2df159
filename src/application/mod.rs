//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write and publish; query handlers only read.

pub mod handlers;

pub use handlers::progression::{
    CourseProgressView, EnrollLearnerCommand, EnrollLearnerHandler, EnrollLearnerResult,
    GenerateCertificateCommand, GenerateCertificateHandler, GenerateCertificateResult,
    GetCourseProgressHandler, GetCourseProgressQuery, GetNavigationStateHandler,
    GetNavigationStateQuery, MarkLessonCompleteCommand, MarkLessonCompleteHandler,
    MarkLessonCompleteResult,
};
