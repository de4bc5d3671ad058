//! HTTP error responses and mapping from domain errors.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::error::{DatabaseError, MailError, TokenError};

/// Failure outcome of a request handler. Every variant renders as
/// `{"message": ...}` with the matching status code.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    /// A required field is absent or unparsable.
    #[error("{0}")]
    Validation(String),

    /// Detail is logged, never returned to the client.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::Internal(detail) => {
                error!(error = %detail, "Request failed");
                "Internal server error".to_string()
            }
            Self::NotFound(m) | Self::Conflict(m) | Self::Unauthorized(m) | Self::Validation(m) => m,
        };
        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            conflict @ DatabaseError::Conflict { .. } => Self::Conflict(conflict.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<MailError> for ApiError {
    fn from(err: MailError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::Unauthorized("Token has expired".to_string()),
            TokenError::Invalid(_) => Self::Unauthorized("Invalid token".to_string()),
            TokenError::Encode(reason) => Self::Internal(reason),
        }
    }
}
