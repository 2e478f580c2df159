//! In-memory adapters for tests and local development.
//!
//! They keep the same guarantees as the PostgreSQL adapters: progress
//! commits are version checked and certificate claims are check-and-set.

mod catalog;
mod enrollment_store;

pub use catalog::InMemoryCatalog;
pub use enrollment_store::InMemoryEnrollmentStore;
