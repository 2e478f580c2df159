//! Local certificate renderer.
//!
//! Produces `{public_base_url}/certificates/{enrollment_id}` without calling
//! anything, so the same enrollment always gets the same reference.

use async_trait::async_trait;

use crate::domain::foundation::{CertificateRef, DomainError};
use crate::ports::{CertificateRenderer, CertificateRequest};

#[derive(Debug, Clone)]
pub struct LocalCertificateRenderer {
    public_base_url: String,
}

impl LocalCertificateRenderer {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        let public_base_url: String = public_base_url.into();
        Self {
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl CertificateRenderer for LocalCertificateRenderer {
    async fn render(&self, request: &CertificateRequest) -> Result<CertificateRef, DomainError> {
        let reference = format!(
            "{}/certificates/{}",
            self.public_base_url, request.enrollment_id
        );
        Ok(CertificateRef::new(reference)?)
    }
}
