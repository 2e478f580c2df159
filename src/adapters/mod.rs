//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the progression domain to external systems:
//! - `certificate` - Certificate renderers (HTTP service, local URL)
//! - `events` - In-process event bus and log subscriber
//! - `http` - Axum REST surface
//! - `memory` - In-memory catalog and enrollment store
//! - `postgres` - PostgreSQL persistence

pub mod certificate;
pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;

pub use events::{InMemoryEventBus, TracingEventHandler};
