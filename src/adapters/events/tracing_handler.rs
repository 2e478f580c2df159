//! Event handler that records domain events in the service log.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventHandler;

/// Logs every event it receives at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventHandler;

impl TracingEventHandler {
    /// Event types worth logging.
    pub const EVENT_TYPES: [&'static str; 5] = [
        "enrollment.created.v1",
        "lesson.completed.v1",
        "enrollment.progress_updated.v1",
        "enrollment.course_completed.v1",
        "certificate.issued.v1",
    ];
}

#[async_trait]
impl EventHandler for TracingEventHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::info!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            aggregate_id = %event.aggregate_id,
            correlation_id = event.metadata.correlation_id.as_deref().unwrap_or("-"),
            "domain event"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "TracingEventHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn handle_never_fails() {
        let handler = TracingEventHandler;
        let envelope = EventEnvelope::new("lesson.completed.v1", "enr-1", "Enrollment", json!({}));
        assert!(handler.handle(envelope).await.is_ok());
        assert_eq!(handler.name(), "TracingEventHandler");
    }
}
