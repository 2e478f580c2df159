//! Certificate renderer adapters.
//!
//! - `HttpCertificateRenderer` - Calls the external rendering service
//! - `LocalCertificateRenderer` - Deterministic references for local runs and tests

mod http_renderer;
mod local_renderer;

pub use http_renderer::{HttpCertificateRenderer, HttpRendererConfig};
pub use local_renderer::LocalCertificateRenderer;
