//! Per-request verification gate.
//!
//! `AuthUser` is an Axum extractor that runs before protected handlers.
//! It checks, strictly in order: cookie present, scheme well-formed, token
//! signature valid, identity present in the store. The first failing check
//! short-circuits — a malformed scheme is never inspected for token
//! validity, and the store is never queried before a successful decode.

use crate::auth::{TokenCodec, AUTH_COOKIE, AUTH_SCHEME};
use crate::error::AppError;
use crate::models::StoredUser;
use crate::storage;
use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::CookieJar;
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub redis: redis::Client,
    pub codec: Arc<TokenCodec>,
}

/// Verified-identity context for one request.
///
/// Holds the resolved principal. Created fresh per request by the extractor
/// and dropped when the request completes; never shared across requests.
/// Handlers taking this extractor are unreachable without a verified token.
pub struct AuthUser {
    pub user: StoredUser,
}

/// Split a credential cookie value into its token half.
///
/// The value must be exactly `Bearer <token>` with a non-empty token.
fn parse_bearer(value: &str) -> Result<&str, AppError> {
    let (scheme, token) = value
        .split_once(' ')
        .ok_or(AppError::MalformedCredential)?;

    if scheme != AUTH_SCHEME || token.is_empty() {
        return Err(AppError::MalformedCredential);
    }

    Ok(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // 1. Credential cookie must be present
        let jar = CookieJar::from_headers(&parts.headers);
        let credential = jar
            .get(AUTH_COOKIE)
            .map(|c| c.value().to_string())
            .ok_or(AppError::MissingCredential)?;

        // 2. Scheme must match
        let token = parse_bearer(&credential)?;

        // 3. Signature must verify
        let user_id = state.codec.verify(token).ok_or(AppError::InvalidToken)?;

        // 4. Identity must still exist. The lookup is the only await point;
        // I/O faults surface as a generic failure, not an auth rejection.
        let mut con = state
            .redis
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

        let user = storage::user::get_user(&mut con, user_id)
            .await?
            .ok_or(AppError::UnknownIdentity)?;

        Ok(AuthUser { user })
    }
}
