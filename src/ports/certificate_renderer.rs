//! Certificate renderer port.
//!
//! Rendering (PDF, image, hosted page) is done by an external service.
//! The engine hands over what the certificate states and stores the opaque
//! reference it gets back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CertificateRef, CourseId, DomainError, EnrollmentId, LearnerId, Timestamp,
};

/// What the certificate attests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRequest {
    pub enrollment_id: EnrollmentId,
    pub learner_id: LearnerId,
    pub course_id: CourseId,
    pub course_title: String,
    pub completed_at: Timestamp,
}

#[async_trait]
pub trait CertificateRenderer: Send + Sync {
    /// Renders the artifact and returns a reference to it.
    ///
    /// Called at most once per issued certificate under normal operation.
    ///
    /// # Errors
    ///
    /// - `RendererError` if the renderer rejected or failed the request
    async fn render(&self, request: &CertificateRequest) -> Result<CertificateRef, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn certificate_renderer_is_object_safe() {
        fn _accepts_dyn(_renderer: &dyn CertificateRenderer) {}
    }
}
