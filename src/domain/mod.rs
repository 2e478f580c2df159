//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, events, errors)
//! - `catalog` - Course, module and lesson structure
//! - `completion` - Per-learner completion facts
//! - `progression` - Pure navigation and progress rules
//! - `enrollment` - Enrollment aggregate, events and errors
//! - `certificate` - Certificate eligibility state machine

pub mod catalog;
pub mod certificate;
pub mod completion;
pub mod enrollment;
pub mod foundation;
pub mod progression;
