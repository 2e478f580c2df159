//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the progression domain and the outside world. Adapters implement these
//! ports.
//!
//! ## Content and Enrollment Ports
//!
//! - `CatalogReader` - Course tree read model from the content subsystem
//! - `CompletionReader` - Completion facts for a learner
//! - `EnrollmentRepository` - Enrollment persistence with atomic commits
//! - `EnrollmentChecker` - Enrollment existence/ownership check
//!
//! ## Certificate Ports
//!
//! - `CertificateRenderer` - Renders the certificate artifact
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events

mod catalog_reader;
mod certificate_renderer;
mod completion_reader;
mod enrollment_checker;
mod enrollment_repository;
mod event_publisher;
mod event_subscriber;

pub use catalog_reader::CatalogReader;
pub use certificate_renderer::{CertificateRenderer, CertificateRequest};
pub use completion_reader::CompletionReader;
pub use enrollment_checker::EnrollmentChecker;
pub use enrollment_repository::{CertificateClaim, EnrollmentRepository};
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
