//! HTTP certificate renderer.
//!
//! Posts the certificate request as JSON to the rendering service and reads
//! back `{ "reference": "..." }`.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HttpRendererConfig::new("https://render.internal/certificates")
//!     .with_api_key(api_key)
//!     .with_timeout(Duration::from_secs(10));
//!
//! let renderer = HttpCertificateRenderer::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::foundation::{CertificateRef, DomainError, ErrorCode};
use crate::ports::{CertificateRenderer, CertificateRequest};

/// Configuration for the HTTP renderer.
#[derive(Debug, Clone)]
pub struct HttpRendererConfig {
    /// Endpoint receiving render requests.
    pub url: String,
    api_key: Option<SecretString>,
    pub timeout: Duration,
}

impl HttpRendererConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout: Duration::from_secs(10),
        }
    }

    /// Sent as a bearer token.
    pub fn with_api_key(mut self, api_key: SecretString) -> Self {
        self.api_key = Some(api_key);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct RenderResponse {
    reference: String,
}

/// Renders certificates through an external HTTP service.
pub struct HttpCertificateRenderer {
    config: HttpRendererConfig,
    client: Client,
}

impl HttpCertificateRenderer {
    pub fn new(config: HttpRendererConfig) -> Result<Self, DomainError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| renderer_error(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

fn renderer_error(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::RendererError, message)
}

#[async_trait]
impl CertificateRenderer for HttpCertificateRenderer {
    #[tracing::instrument(skip(self, request), fields(enrollment_id = %request.enrollment_id))]
    async fn render(&self, request: &CertificateRequest) -> Result<CertificateRef, DomainError> {
        let mut builder = self.client.post(&self.config.url).json(request);
        if let Some(api_key) = &self.config.api_key {
            builder = builder.bearer_auth(api_key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                renderer_error(format!(
                    "Renderer timed out after {}s",
                    self.config.timeout.as_secs()
                ))
            } else if e.is_connect() {
                renderer_error(format!("Connection failed: {}", e))
            } else {
                renderer_error(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(renderer_error(format!("Renderer returned {}", status))
                .with_detail("body", body));
        }

        let parsed: RenderResponse = response
            .json()
            .await
            .map_err(|e| renderer_error(format!("Failed to parse renderer response: {}", e)))?;

        CertificateRef::new(parsed.reference)
            .map_err(|e| renderer_error(format!("Renderer returned an unusable reference: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_sets_fields() {
        let config = HttpRendererConfig::new("http://localhost:9000/render")
            .with_api_key(SecretString::new("key".to_string()))
            .with_timeout(Duration::from_secs(3));

        assert_eq!(config.url, "http://localhost:9000/render");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(config.api_key.is_some());
    }

    #[test]
    fn api_key_is_not_printed() {
        let config = HttpRendererConfig::new("http://localhost")
            .with_api_key(SecretString::new("super-secret".to_string()));
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn response_body_parses() {
        let parsed: RenderResponse =
            serde_json::from_str(r#"{"reference":"https://certs.example/1"}"#).unwrap();
        assert_eq!(parsed.reference, "https://certs.example/1");
    }
}
