//! Auth API endpoints: registration, login (token issuance), logout.

use crate::auth::middleware::{AppState, AuthUser};
use crate::auth::password::{hash_password, verify_password};
use crate::auth::{AUTH_COOKIE, AUTH_SCHEME};
use crate::error::AppError;
use crate::models::{LoginRequest, RegisterRequest, RegisterResponse, StoredUser};
use crate::storage;
use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar};

/// POST /api/users — Register a new account
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    // Validate email
    if req.email.is_empty() || !req.email.contains('@') {
        return Err(AppError::BadRequest("Invalid email format".to_string()));
    }

    // Validate name
    if req.name.len() < 3 || !req.name.chars().all(|c| c.is_alphanumeric()) {
        return Err(AppError::BadRequest(
            "Name must be at least 3 alphanumeric characters".to_string(),
        ));
    }

    // Validate password
    if req.password.len() < 4 {
        return Err(AppError::BadRequest(
            "Password must be at least 4 characters".to_string(),
        ));
    }
    if req.password.contains(&req.name) {
        return Err(AppError::BadRequest(
            "Password must not contain your name".to_string(),
        ));
    }
    if req.password != req.confirm_password {
        return Err(AppError::BadRequest(
            "Password confirmation does not match".to_string(),
        ));
    }

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let password_hash = hash_password(&req.password)?;
    let user_id = storage::user::allocate_user_id(&mut con).await?;

    // Exactly one account per email: the NX claim decides races, so the
    // user record is only written once the email key is won
    let claimed = storage::user::claim_email(&mut con, &req.email, user_id).await?;
    if !claimed {
        return Err(AppError::Conflict("email already registered".to_string()));
    }

    let user = StoredUser {
        id: user_id,
        email: req.email,
        password_hash,
        name: req.name,
        age: req.age,
        gender: req.gender.map(|g| g.to_uppercase()),
        profile_image: req.profile_image,
        created_at: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs(),
    };

    storage::user::store_user(&mut con, &user).await?;

    tracing::info!(action = "user_registered", user_id = user.id, "New user registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: user.id,
            message: "registration successful".to_string(),
        }),
    ))
}

/// POST /api/login — Authenticate and issue the credential cookie
///
/// Unknown email and wrong password produce the same rejection so the
/// endpoint cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let user = match storage::user::get_user_by_email(&mut con, &req.email).await? {
        Some(user) => user,
        None => {
            tracing::warn!(action = "login_failed", reason = "unknown_email", "Login rejected");
            return Err(AppError::CredentialMismatch);
        }
    };

    if !verify_password(&req.password, &user.password_hash) {
        tracing::warn!(
            action = "login_failed",
            reason = "wrong_password",
            user_id = user.id,
            "Login rejected"
        );
        return Err(AppError::CredentialMismatch);
    }

    let token = state.codec.issue(user.id)?;

    let cookie = Cookie::build((AUTH_COOKIE, format!("{} {}", AUTH_SCHEME, token)))
        .path("/")
        .http_only(true)
        .build();

    tracing::info!(action = "login_success", user_id = user.id, "User authenticated");

    // Serialize the cookie directly: the jar percent-encodes the value on
    // output, which would turn "Bearer <token>" into "Bearer%20<token>" on
    // the wire, breaking the documented cookie-value shape.
    Ok((
        [(header::SET_COOKIE, cookie.to_string())],
        Json(serde_json::json!({
            "message": "login successful"
        })),
    ))
}

/// POST /api/logout — Clear the credential cookie
///
/// Tokens are stateless, so logout is purely cookie removal on the client.
pub async fn logout(auth: AuthUser, jar: CookieJar) -> impl IntoResponse {
    tracing::info!(action = "logout", user_id = auth.user.id, "User logged out");

    let removal = Cookie::build((AUTH_COOKIE, "")).path("/").build();
    (jar.remove(removal), StatusCode::NO_CONTENT)
}
