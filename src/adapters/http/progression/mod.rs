//! Progression HTTP adapter.
//!
//! Exposes lesson completion, course progress, player navigation,
//! enrollment and certificate issuance over REST.

pub mod dto;
mod handlers;
mod routes;

pub use handlers::{ProgressionApiError, ProgressionAppState};
pub use routes::progression_router;
