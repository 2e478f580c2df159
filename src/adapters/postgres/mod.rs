//! PostgreSQL adapters - Database implementations for the progression ports.
//!
//! - `PostgresCatalogReader` - Course tree and lesson lookups
//! - `PostgresEnrollmentRepository` - Enrollments and completion facts
//! - `PostgresEnrollmentChecker` - Enrollment existence check

mod catalog_reader;
mod enrollment_checker;
mod enrollment_repository;

pub use catalog_reader::PostgresCatalogReader;
pub use enrollment_checker::PostgresEnrollmentChecker;
pub use enrollment_repository::PostgresEnrollmentRepository;
