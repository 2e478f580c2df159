//! HTTP middleware for axum.
//!
//! - `auth` - Learner identity extractor

pub mod auth;

pub use auth::{AuthenticatedUser, AuthenticationRequired, CORRELATION_HEADER, USER_ID_HEADER};
