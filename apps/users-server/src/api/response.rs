//! Uniform response envelope.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Body shape shared by every `/users` response.
///
/// `code` carries the HTTP status as a decimal string. Successful responses
/// carry `data`; failures carry `error`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    #[serde(skip)]
    status: StatusCode,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// Wraps a successful payload.
    pub fn success(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            code: StatusCode::OK.as_u16().to_string(),
            data: Some(data),
            error: None,
        }
    }

    /// Builds a failure envelope.
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            code: status.as_u16().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
