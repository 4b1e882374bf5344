//! User API endpoints.

use crate::auth::middleware::AuthUser;
use crate::models::UserResponse;
use axum::{response::IntoResponse, Json};

/// GET /api/users/me — Fetch the authenticated user's own profile
pub async fn me(auth: AuthUser) -> impl IntoResponse {
    Json(UserResponse::from(auth.user))
}
