//! Access token middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use user_store::UserRepository;

use crate::error::ServerError;
use crate::state::AppState;

/// Header carrying the shared access token.
pub const TOKEN_HEADER: &str = "token";

/// Checks the request's access token against the expected secret.
pub fn check_access_token(headers: &HeaderMap, expected: &str) -> Result<(), ServerError> {
    let token = headers
        .get(TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty());

    match token {
        None => Err(ServerError::Forbidden(
            "access token was not provided".to_string(),
        )),
        Some(token) if token != expected => {
            Err(ServerError::Forbidden("access token is not valid".to_string()))
        }
        Some(_) => Ok(()),
    }
}

/// Authentication middleware.
///
/// Rejects the request with 403 unless the `token` header matches the
/// configured secret.
pub async fn token_middleware<R: UserRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(e) = check_access_token(request.headers(), &state.config.api_token) {
        tracing::debug!(error = %e, "Rejected request");
        return e.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_missing_token() {
        let headers = HeaderMap::new();
        let err = check_access_token(&headers, "secret").unwrap_err();
        assert_eq!(err.to_string(), "access token was not provided");
    }

    #[test]
    fn test_empty_token_counts_as_missing() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static(""));
        let err = check_access_token(&headers, "secret").unwrap_err();
        assert_eq!(err.to_string(), "access token was not provided");
    }

    #[test]
    fn test_wrong_token() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("guess"));
        let err = check_access_token(&headers, "secret").unwrap_err();
        assert_eq!(err.to_string(), "access token is not valid");
    }

    #[test]
    fn test_matching_token() {
        let mut headers = HeaderMap::new();
        headers.insert(TOKEN_HEADER, HeaderValue::from_static("secret"));
        assert!(check_access_token(&headers, "secret").is_ok());
    }
}
