//! Certificate renderer configuration

use secrecy::SecretString;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Certificate rendering configuration
///
/// Without `renderer_url` certificates get deterministic local references
/// under `public_base_url`.
#[derive(Debug, Clone, Deserialize)]
pub struct CertificateConfig {
    /// Endpoint of the external rendering service
    pub renderer_url: Option<String>,

    /// Bearer token for the rendering service
    pub api_key: Option<SecretString>,

    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Base of locally generated certificate links
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl CertificateConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn uses_external_renderer(&self) -> bool {
        self.renderer_url.is_some()
    }

    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        if let Some(url) = &self.renderer_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidRendererUrl);
            }
            if production && !url.starts_with("https://") {
                return Err(ValidationError::RendererMustBeHttps);
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !self.public_base_url.starts_with("http://")
            && !self.public_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidPublicBaseUrl);
        }
        Ok(())
    }
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            renderer_url: None,
            api_key: None,
            timeout_secs: default_timeout(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_public_base_url() -> String {
    "http://localhost:8080".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_use_local_renderer() {
        let config = CertificateConfig::default();
        assert!(!config.uses_external_renderer());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate(false).is_ok());
    }

    #[test]
    fn test_production_requires_https_renderer() {
        let config = CertificateConfig {
            renderer_url: Some("http://render.internal".to_string()),
            ..Default::default()
        };
        assert!(config.validate(false).is_ok());
        assert_eq!(config.validate(true), Err(ValidationError::RendererMustBeHttps));
    }

    #[test]
    fn test_rejects_non_http_urls() {
        let config = CertificateConfig {
            renderer_url: Some("ftp://render".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(false), Err(ValidationError::InvalidRendererUrl));

        let config = CertificateConfig {
            public_base_url: "portal.example".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(false), Err(ValidationError::InvalidPublicBaseUrl));
    }
}
