//! Server error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use user_store::UserStoreError;

use crate::api::response::Envelope;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Missing or incorrect access token.
    #[error("{0}")]
    Forbidden(String),

    /// Invalid request parameters or body.
    #[error("{0}")]
    InvalidRequest(String),

    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Storage failure.
    #[error("storage error: {0}")]
    Store(UserStoreError),
}

impl ServerError {
    /// Creates an invalid request error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Creates the not found error for a user identifier.
    pub fn user_not_found(id: i64) -> Self {
        Self::NotFound(format!("user {id} was not found"))
    }

    /// Returns the HTTP status reported for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServerError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            // Storage failures share the 400 status with validation errors.
            ServerError::Store(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<UserStoreError> for ServerError {
    fn from(err: UserStoreError) -> Self {
        match err {
            UserStoreError::NotFound { id } => Self::user_not_found(id),
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if let ServerError::Store(e) = &self {
            tracing::error!(error = %e, "User store failure");
        }

        Envelope::<()>::failure(status, self.to_string()).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
