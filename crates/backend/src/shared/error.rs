//! Service-level errors and their wire form
//!
//! Handlers surface failures as `{"error": "..."}` bodies. Validation and
//! conflict messages travel to the client verbatim; internal failures are
//! logged and reported without detail.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::api::ApiErrorBody;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected input: constraint violations, uniqueness conflicts,
    /// unknown fields. The message is meant for the user.
    #[error("{0}")]
    Invalid(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ServiceError::Invalid(message) => (StatusCode::BAD_REQUEST, message),
            ServiceError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ServiceError::Internal(err) => {
                tracing::error!("Internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };
        (status, Json(ApiErrorBody::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_keeps_the_message() {
        let err = ServiceError::invalid("Username already taken");
        assert_eq!(err.to_string(), "Username already taken");
    }

    #[test]
    fn internal_hides_the_cause() {
        let err: ServiceError = anyhow::anyhow!("db exploded").into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
