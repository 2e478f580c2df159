//! HTTP handlers for progression endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::adapters::http::middleware::AuthenticatedUser;
use crate::application::{
    EnrollLearnerCommand, EnrollLearnerHandler, GenerateCertificateCommand,
    GenerateCertificateHandler, GetCourseProgressHandler, GetCourseProgressQuery,
    GetNavigationStateHandler, GetNavigationStateQuery, MarkLessonCompleteCommand,
    MarkLessonCompleteHandler,
};
use crate::domain::enrollment::ProgressionError;
use crate::domain::foundation::{CourseId, ErrorCode, LessonId};
use crate::domain::progression::ViewMode;
use crate::ports::{
    CatalogReader, CertificateRenderer, CompletionReader, EnrollmentChecker, EnrollmentRepository,
    EventPublisher,
};

use super::dto::{
    CertificateResponse, CompleteLessonRequest, CompleteLessonResponse, EnrollResponse,
    ErrorResponse, NavigationParams, NavigationResponse, ProgressResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Stateless handlers are created per request. The certificate handler is
/// shared because it tracks in-flight issuance per enrollment.
#[derive(Clone)]
pub struct ProgressionAppState {
    pub catalog: Arc<dyn CatalogReader>,
    pub enrollment_checker: Arc<dyn EnrollmentChecker>,
    pub enrollments: Arc<dyn EnrollmentRepository>,
    pub completions: Arc<dyn CompletionReader>,
    pub event_publisher: Arc<dyn EventPublisher>,
    pub max_commit_retries: u32,
    certificates: Arc<GenerateCertificateHandler>,
}

impl ProgressionAppState {
    pub fn new(
        catalog: Arc<dyn CatalogReader>,
        enrollment_checker: Arc<dyn EnrollmentChecker>,
        enrollments: Arc<dyn EnrollmentRepository>,
        completions: Arc<dyn CompletionReader>,
        renderer: Arc<dyn CertificateRenderer>,
        event_publisher: Arc<dyn EventPublisher>,
        max_commit_retries: u32,
    ) -> Self {
        let certificates = Arc::new(GenerateCertificateHandler::new(
            catalog.clone(),
            enrollments.clone(),
            completions.clone(),
            renderer,
            event_publisher.clone(),
            max_commit_retries,
        ));
        Self {
            catalog,
            enrollment_checker,
            enrollments,
            completions,
            event_publisher,
            max_commit_retries,
            certificates,
        }
    }

    pub fn enroll_handler(&self) -> EnrollLearnerHandler {
        EnrollLearnerHandler::new(
            self.catalog.clone(),
            self.enrollments.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn mark_complete_handler(&self) -> MarkLessonCompleteHandler {
        MarkLessonCompleteHandler::new(
            self.catalog.clone(),
            self.enrollment_checker.clone(),
            self.enrollments.clone(),
            self.completions.clone(),
            self.event_publisher.clone(),
            self.max_commit_retries,
        )
    }

    pub fn progress_handler(&self) -> GetCourseProgressHandler {
        GetCourseProgressHandler::new(self.enrollments.clone())
    }

    pub fn navigation_handler(&self) -> GetNavigationStateHandler {
        GetNavigationStateHandler::new(
            self.catalog.clone(),
            self.enrollment_checker.clone(),
            self.completions.clone(),
        )
    }

    pub fn certificate_handler(&self) -> &GenerateCertificateHandler {
        &self.certificates
    }
}

fn parse_id<T: FromStr>(raw: &str, field: &str) -> Result<T, ProgressionApiError> {
    raw.parse()
        .map_err(|_| ProgressionApiError::bad_request(format!("Invalid {}: {}", field, raw)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/courses/:course_id/progress - Cached progress and certificate state
pub async fn get_progress(
    State(state): State<ProgressionAppState>,
    user: AuthenticatedUser,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, ProgressionApiError> {
    let course_id: CourseId = parse_id(&course_id, "course_id")?;
    let query = GetCourseProgressQuery {
        learner_id: user.learner_id,
        course_id,
    };

    let view = state.progress_handler().handle(query).await?;
    Ok(Json(ProgressResponse::from(view)))
}

/// GET /api/courses/:course_id/navigation?view=completed&lesson=<id> - Player state
pub async fn get_navigation(
    State(state): State<ProgressionAppState>,
    user: AuthenticatedUser,
    Path(course_id): Path<String>,
    Query(params): Query<NavigationParams>,
) -> Result<impl IntoResponse, ProgressionApiError> {
    let course_id: CourseId = parse_id(&course_id, "course_id")?;
    let lesson_id = params
        .lesson
        .as_deref()
        .filter(|raw| !raw.is_empty())
        .map(|raw| parse_id::<LessonId>(raw, "lesson"))
        .transpose()?;

    let query = GetNavigationStateQuery {
        learner_id: user.learner_id,
        course_id,
        mode: ViewMode::from_query_param(params.view.as_deref()),
        lesson_id,
    };

    let navigation = state.navigation_handler().handle(query).await?;
    Ok(Json(NavigationResponse::from(navigation)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/lessons/:lesson_id/complete - Record a lesson completion
pub async fn complete_lesson(
    State(state): State<ProgressionAppState>,
    user: AuthenticatedUser,
    Path(lesson_id): Path<String>,
    body: Option<Json<CompleteLessonRequest>>,
) -> Result<impl IntoResponse, ProgressionApiError> {
    let lesson_id: LessonId = parse_id(&lesson_id, "lesson_id")?;
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let course_id = request
        .course_id
        .as_deref()
        .map(|raw| parse_id::<CourseId>(raw, "courseId"))
        .transpose()?;

    let cmd = MarkLessonCompleteCommand {
        lesson_id,
        course_id,
    };
    let result = state.mark_complete_handler().handle(cmd, user.metadata()).await?;

    Ok(Json(CompleteLessonResponse::from(result)))
}

/// POST /api/courses/:course_id/certificate - Issue the course certificate
pub async fn generate_certificate(
    State(state): State<ProgressionAppState>,
    user: AuthenticatedUser,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, ProgressionApiError> {
    let course_id: CourseId = parse_id(&course_id, "course_id")?;
    let result = state
        .certificate_handler()
        .handle(GenerateCertificateCommand { course_id }, user.metadata())
        .await?;

    let status = if result.newly_issued {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(CertificateResponse::from(result))))
}

/// POST /api/courses/:course_id/enrollment - Enroll the calling learner
pub async fn enroll(
    State(state): State<ProgressionAppState>,
    user: AuthenticatedUser,
    Path(course_id): Path<String>,
) -> Result<impl IntoResponse, ProgressionApiError> {
    let course_id: CourseId = parse_id(&course_id, "course_id")?;
    let result = state
        .enroll_handler()
        .handle(EnrollLearnerCommand { course_id }, user.metadata())
        .await?;

    let status = if result.newly_enrolled {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(EnrollResponse {
            newly_enrolled: result.newly_enrolled,
            enrollment: result.enrollment.into(),
        }),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper that converts progression errors to HTTP responses.
#[derive(Debug)]
pub enum ProgressionApiError {
    /// Malformed path, query or body.
    BadRequest(String),
    Progression(ProgressionError),
}

impl ProgressionApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl From<ProgressionError> for ProgressionApiError {
    fn from(err: ProgressionError) -> Self {
        Self::Progression(err)
    }
}

impl IntoResponse for ProgressionApiError {
    fn into_response(self) -> Response {
        let err = match self {
            ProgressionApiError::BadRequest(message) => {
                let body = ErrorResponse::new("BAD_REQUEST", message);
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            ProgressionApiError::Progression(err) => err,
        };

        let status = match err.code() {
            ErrorCode::CourseNotFound
            | ErrorCode::ModuleNotFound
            | ErrorCode::LessonNotFound
            | ErrorCode::EnrollmentNotFound => StatusCode::NOT_FOUND,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotEligible | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "Progression request failed");
            "Internal server error".to_string()
        } else {
            err.to_string()
        };

        let body = ErrorResponse::new(err.code().to_string(), message);
        (status, Json(body)).into_response()
    }
}
