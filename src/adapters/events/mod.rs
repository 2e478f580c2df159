//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process bus delivering to subscribed handlers
//! - `TracingEventHandler` - Subscriber that writes every event to the log

mod in_memory;
mod tracing_handler;

pub use in_memory::InMemoryEventBus;
pub use tracing_handler::TracingEventHandler;
