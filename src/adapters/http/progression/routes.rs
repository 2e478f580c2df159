//! Axum router configuration for progression endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    complete_lesson, enroll, generate_certificate, get_navigation, get_progress,
    ProgressionAppState,
};

/// Create the progression API router.
///
/// # Routes
///
/// All routes require the `X-User-Id` header.
/// - `GET /courses/:course_id/progress` - Cached progress and certificate state
/// - `GET /courses/:course_id/navigation` - Player state (`?view=completed&lesson=<id>`)
/// - `POST /courses/:course_id/certificate` - Issue the certificate
/// - `POST /courses/:course_id/enrollment` - Enroll in the course
/// - `POST /lessons/:lesson_id/complete` - Record a completion
///
/// Mount under `/api`.
pub fn progression_router() -> Router<ProgressionAppState> {
    Router::new()
        .route("/courses/:course_id/progress", get(get_progress))
        .route("/courses/:course_id/navigation", get(get_navigation))
        .route("/courses/:course_id/certificate", post(generate_certificate))
        .route("/courses/:course_id/enrollment", post(enroll))
        .route("/lessons/:lesson_id/complete", post(complete_lesson))
}
