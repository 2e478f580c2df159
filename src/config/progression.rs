//! Progression engine tuning

use serde::Deserialize;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressionConfig {
    /// Re-reads after a lost optimistic-concurrency race before giving up with 409
    #[serde(default = "default_max_commit_retries")]
    pub max_commit_retries: u32,
}

impl ProgressionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_commit_retries > 20 {
            return Err(ValidationError::InvalidCommitRetries);
        }
        Ok(())
    }
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            max_commit_retries: default_max_commit_retries(),
        }
    }
}

fn default_max_commit_retries() -> u32 {
    5
}
