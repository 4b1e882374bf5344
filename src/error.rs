//! Error types and Axum response conversions.
//!
//! The five authentication variants carry fixed statuses and messages that
//! clients depend on; see the verification flow in `auth::middleware`.
//! `InvalidToken` and `UnknownIdentity` additionally clear the credential
//! cookie so clients stop resending a dead token.

use crate::auth::AUTH_COOKIE;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::cookie::Cookie;
use serde_json::json;

/// Application error types.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No credential cookie was presented.
    #[error("authentication required")]
    MissingCredential,

    /// Credential cookie present but not in `Bearer <token>` form.
    #[error("malformed credential")]
    MalformedCredential,

    /// Token failed signature verification or could not be decoded.
    #[error("forged or malformed request")]
    InvalidToken,

    /// Token decoded to an identity with no record in the store.
    #[error("subject no longer exists")]
    UnknownIdentity,

    /// Login failed. Deliberately identical for unknown email and wrong
    /// password so the endpoint cannot be used to enumerate accounts.
    #[error("check your email and password")]
    CredentialMismatch,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Whether this rejection stems from a previously-issued token that is
    /// now invalid or orphaned. Those responses clear the cookie; rejections
    /// for requests that never presented one do not touch cookie state.
    fn clears_cookie(&self) -> bool {
        matches!(self, AppError::InvalidToken | AppError::UnknownIdentity)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::MissingCredential => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::MalformedCredential
            | AppError::InvalidToken
            | AppError::UnknownIdentity
            | AppError::CredentialMismatch => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Internal(msg) => {
                // Log detailed error server-side, return generic message to client
                tracing::error!(error = %msg, "Internal server error");
                (StatusCode::BAD_REQUEST, "request failed".to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        let clears_cookie = self.clears_cookie();

        let body = Json(json!({
            "error": message
        }));

        let mut response = (status, body).into_response();

        if clears_cookie {
            let mut removal = Cookie::new(AUTH_COOKIE, "");
            removal.set_path("/");
            removal.make_removal();
            if let Ok(value) = HeaderValue::from_str(&removal.to_string()) {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
        }

        response
    }
}

// Convenience conversions from common error types
impl From<redis::RedisError> for AppError {
    fn from(err: redis::RedisError) -> Self {
        AppError::Internal(format!("Redis error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    /// Extract status code and JSON body from an AppError response.
    async fn error_response(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        (status, json)
    }

    fn set_cookie_of(err: AppError) -> Option<String> {
        let response = err.into_response();
        response
            .headers()
            .get(header::SET_COOKIE)
            .map(|v| v.to_str().unwrap().to_string())
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let (status, body) = error_response(AppError::MissingCredential).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "authentication required");
    }

    #[tokio::test]
    async fn test_malformed_credential() {
        let (status, body) = error_response(AppError::MalformedCredential).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "malformed credential");
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let (status, body) = error_response(AppError::InvalidToken).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "forged or malformed request");
    }

    #[tokio::test]
    async fn test_unknown_identity() {
        let (status, body) = error_response(AppError::UnknownIdentity).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "subject no longer exists");
    }

    #[tokio::test]
    async fn test_credential_mismatch() {
        let (status, body) = error_response(AppError::CredentialMismatch).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "check your email and password");
    }

    #[test]
    fn test_invalid_token_clears_cookie() {
        let header = set_cookie_of(AppError::InvalidToken).expect("Set-Cookie expected");
        assert!(header.starts_with("authorization="));
        assert!(header.contains("Max-Age=0"));
    }

    #[test]
    fn test_unknown_identity_clears_cookie() {
        let header = set_cookie_of(AppError::UnknownIdentity).expect("Set-Cookie expected");
        assert!(header.starts_with("authorization="));
        assert!(header.contains("Max-Age=0"));
    }

    #[test]
    fn test_other_rejections_leave_cookie_alone() {
        assert!(set_cookie_of(AppError::MissingCredential).is_none());
        assert!(set_cookie_of(AppError::MalformedCredential).is_none());
        assert!(set_cookie_of(AppError::CredentialMismatch).is_none());
        assert!(set_cookie_of(AppError::NotFound("post".to_string())).is_none());
    }

    #[tokio::test]
    async fn test_internal_hides_details() {
        // CRITICAL: Internal error must NOT leak detailed message to client
        let (status, body) = error_response(AppError::Internal(
            "Redis connection refused at 10.0.0.5:6379".to_string(),
        ))
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "request failed");
        // Must NOT contain the actual error details
        assert!(!body["error"].as_str().unwrap().contains("Redis"));
        assert!(!body["error"].as_str().unwrap().contains("10.0.0.5"));
    }

    #[tokio::test]
    async fn test_conflict() {
        let (status, body) =
            error_response(AppError::Conflict("email already registered".to_string())).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "email already registered");
    }

    #[tokio::test]
    async fn test_not_found() {
        let (status, body) = error_response(AppError::NotFound("Post not found".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Post not found");
    }

    #[test]
    fn test_from_redis_error() {
        let redis_err = redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "test context",
            "connection refused".to_string(),
        ));
        let app_err = AppError::from(redis_err);
        match app_err {
            AppError::Internal(msg) => assert!(msg.contains("Redis error")),
            _ => panic!("Expected Internal variant"),
        }
    }

    #[test]
    fn test_from_serde_error() {
        let serde_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let app_err = AppError::from(serde_err);
        match app_err {
            AppError::Internal(msg) => assert!(msg.contains("JSON error")),
            _ => panic!("Expected Internal variant"),
        }
    }
}
