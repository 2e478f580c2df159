//! Command infrastructure for CQRS handlers.
//!
//! `CommandMetadata` carries the acting learner and correlation context
//! through command processing and onto emitted events.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EventEnvelope, LearnerId};

/// Metadata context for command handlers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The learner executing this command.
    pub learner_id: LearnerId,

    /// Links related operations across a single request.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "api", "test").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates new command metadata for a learner.
    pub fn new(learner_id: LearnerId) -> Self {
        Self {
            learner_id,
            correlation_id: None,
            source: None,
        }
    }

    /// Builder: Add correlation ID for request tracing.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Stamps correlation and learner context onto an outgoing envelope.
    pub fn stamp(&self, envelope: EventEnvelope) -> EventEnvelope {
        envelope
            .with_correlation_id(self.correlation_id())
            .with_user_id(self.learner_id.to_string())
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Creates a test fixture with a test learner ID.
    pub fn test_fixture() -> Self {
        Self::new(LearnerId::new("test-learner-123").unwrap())
            .with_correlation_id("test-correlation-id")
            .with_source("test")
    }
}
