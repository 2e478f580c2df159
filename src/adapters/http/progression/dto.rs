//! HTTP DTOs (Data Transfer Objects) for progression endpoints.
//!
//! These types define the JSON request/response structure of the course
//! player API. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

use crate::application::{
    CourseProgressView, GenerateCertificateResult, MarkLessonCompleteResult,
};
use crate::domain::certificate::CertificateStatus;
use crate::domain::enrollment::Enrollment;
use crate::domain::foundation::{
    CertificateRef, CourseId, EnrollmentId, LessonId, ModuleId, Timestamp,
};
use crate::domain::progression::{NavigationLesson, NavigationModule, NavigationState, ViewMode};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Optional body of `POST /lessons/:lesson_id/complete`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonRequest {
    /// Course the client is viewing; rejected if the lesson is elsewhere.
    #[serde(default)]
    pub course_id: Option<String>,
}

/// Query string of `GET /courses/:course_id/navigation`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NavigationParams {
    /// `completed` selects the completed-only view; anything else is all lessons.
    #[serde(default)]
    pub view: Option<String>,
    /// Lesson currently open in the player.
    #[serde(default)]
    pub lesson: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub progress_percent: u8,
    pub completed: bool,
    pub completed_at: Option<Timestamp>,
    pub certificate_ref: Option<CertificateRef>,
    pub certificate_status: CertificateStatus,
}

impl From<CourseProgressView> for ProgressResponse {
    fn from(view: CourseProgressView) -> Self {
        Self {
            progress_percent: view.progress_percent.value(),
            completed: view.completed,
            completed_at: view.completed_at,
            certificate_ref: view.certificate_ref,
            certificate_status: view.certificate_status,
        }
    }
}

/// Enrollment snapshot returned by write endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub id: EnrollmentId,
    pub course_id: CourseId,
    pub progress_percent: u8,
    pub completed: bool,
    pub enrolled_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub certificate_ref: Option<CertificateRef>,
    pub certificate_status: CertificateStatus,
}

impl From<Enrollment> for EnrollmentResponse {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            certificate_status: enrollment.certificate_status(),
            id: enrollment.id,
            course_id: enrollment.course_id,
            progress_percent: enrollment.progress.value(),
            completed: enrollment.completed,
            enrolled_at: enrollment.enrolled_at,
            completed_at: enrollment.completed_at,
            certificate_ref: enrollment.certificate_ref,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteLessonResponse {
    /// True only if this call recorded the completion.
    pub completed: bool,
    pub enrollment: EnrollmentResponse,
}

impl From<MarkLessonCompleteResult> for CompleteLessonResponse {
    fn from(result: MarkLessonCompleteResult) -> Self {
        Self {
            completed: result.newly_completed,
            enrollment: result.enrollment.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollResponse {
    pub newly_enrolled: bool,
    pub enrollment: EnrollmentResponse,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateResponse {
    pub certificate_ref: CertificateRef,
    pub newly_issued: bool,
}

impl From<GenerateCertificateResult> for CertificateResponse {
    fn from(result: GenerateCertificateResult) -> Self {
        Self {
            certificate_ref: result.certificate_ref,
            newly_issued: result.newly_issued,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub mode: ViewMode,
    /// Value to put in `?view=` to reproduce this mode; absent for all lessons.
    pub view: Option<&'static str>,
    pub current_module_id: Option<ModuleId>,
    pub current_lesson_id: Option<LessonId>,
    pub previous_lesson_id: Option<LessonId>,
    pub next_lesson_id: Option<LessonId>,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    pub visible_modules: Vec<NavigationModuleResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationModuleResponse {
    pub module_id: ModuleId,
    pub title: String,
    pub lessons: Vec<NavigationLessonResponse>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationLessonResponse {
    pub lesson_id: LessonId,
    pub title: String,
    pub is_free: bool,
    pub duration_minutes: Option<u32>,
    pub completed: bool,
}

impl From<NavigationLesson> for NavigationLessonResponse {
    fn from(lesson: NavigationLesson) -> Self {
        Self {
            lesson_id: lesson.lesson_id,
            title: lesson.title,
            is_free: lesson.is_free,
            duration_minutes: lesson.duration_minutes,
            completed: lesson.completed,
        }
    }
}

impl From<NavigationModule> for NavigationModuleResponse {
    fn from(module: NavigationModule) -> Self {
        Self {
            module_id: module.module_id,
            title: module.title,
            lessons: module.lessons.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<NavigationState> for NavigationResponse {
    fn from(state: NavigationState) -> Self {
        Self {
            mode: state.mode,
            view: state.mode.as_query_param(),
            current_module_id: state.current_module_id,
            current_lesson_id: state.current_lesson_id,
            previous_lesson_id: state.previous_lesson_id,
            next_lesson_id: state.next_lesson_id,
            can_go_prev: state.can_go_prev,
            can_go_next: state.can_go_next,
            visible_modules: state.visible_modules.into_iter().map(Into::into).collect(),
        }
    }
}

/// Error body returned with every non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
