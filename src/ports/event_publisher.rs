//! EventPublisher port - Interface for publishing domain events.
//!
//! Handlers publish enrollment events only after the change that produced
//! them has been committed.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Delivery is at-least-once; subscribers must tolerate duplicates.
///
/// # Example
///
/// ```ignore
/// let envelope = metadata.stamp(event.to_envelope()?);
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish several events in order.
    ///
    /// Adapters without batch support publish sequentially and stop at the
    /// first failure.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}
