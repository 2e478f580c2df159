//! EventSubscriber port - Interface for subscribing to domain events.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Handlers must be idempotent: the same envelope may arrive twice.
///
/// # Example
///
/// ```ignore
/// struct CertificateMailer { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for CertificateMailer {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let issued: CertificateIssued = event.payload_as()?;
///         // send the link...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "CertificateMailer"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events by event type.
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event type.
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe handler to multiple event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

/// Combined trait for event bus implementations.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_traits_are_object_safe() {
        fn _handler(_h: &dyn EventHandler) {}
        fn _subscriber(_s: &dyn EventSubscriber) {}
    }
}
