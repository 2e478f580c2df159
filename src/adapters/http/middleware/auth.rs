//! Learner identity extraction.
//!
//! Authentication happens upstream. The gateway forwards the verified
//! learner id in `X-User-Id`; requests without it are rejected with 401.
//! An optional `X-Correlation-Id` is carried into published events.
//!
//! # Example
//!
//! ```ignore
//! async fn my_handler(user: AuthenticatedUser) -> impl IntoResponse {
//!     format!("Hello, {}!", user.learner_id)
//! }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::progression::dto::ErrorResponse;
use crate::domain::foundation::{CommandMetadata, LearnerId};

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const CORRELATION_HEADER: &str = "X-Correlation-Id";

/// The calling learner.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub learner_id: LearnerId,
    pub correlation_id: Option<String>,
}

impl AuthenticatedUser {
    /// Command metadata for handlers invoked on behalf of this learner.
    pub fn metadata(&self) -> CommandMetadata {
        let metadata = CommandMetadata::new(self.learner_id.clone()).with_source("http");
        match &self.correlation_id {
            Some(id) => metadata.with_correlation_id(id.clone()),
            None => metadata,
        }
    }
}

/// Rejection type for AuthenticatedUser extraction.
#[derive(Debug, Clone)]
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let learner_id = parts
                .headers
                .get(USER_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| LearnerId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            let correlation_id = parts
                .headers
                .get(CORRELATION_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string);

            Ok(AuthenticatedUser {
                learner_id,
                correlation_id,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request;

    async fn extract(request: Request<()>) -> Result<AuthenticatedUser, AuthenticationRequired> {
        let (mut parts, _) = request.into_parts();
        AuthenticatedUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn reads_learner_and_correlation() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "learner-9")
            .header(CORRELATION_HEADER, "req-1")
            .body(())
            .unwrap();

        let user = extract(request).await.unwrap();
        assert_eq!(user.learner_id.as_str(), "learner-9");

        let metadata = user.metadata();
        assert_eq!(metadata.correlation_id(), "req-1");
        assert_eq!(metadata.source(), Some("http"));
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let request = Request::builder().body(()).unwrap();
        assert!(extract(request).await.is_err());
    }

    #[tokio::test]
    async fn blank_learner_is_rejected() {
        let request = Request::builder()
            .header(USER_ID_HEADER, "   ")
            .body(())
            .unwrap();
        assert!(extract(request).await.is_err());
    }

    #[test]
    fn rejection_is_unauthorized() {
        assert_eq!(
            AuthenticationRequired.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
    }
}
