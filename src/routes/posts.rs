//! Post API endpoints.
//!
//! Reads are public; every mutation runs behind the verification gate and
//! checks ownership.

use crate::auth::middleware::{AppState, AuthUser};
use crate::error::AppError;
use crate::models::{PostBody, PostDetail, PostSummary, StoredPost};
use crate::routes::validate_id;
use crate::storage;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

const POST_ID_LEN: usize = 12;

fn validate_body(body: &PostBody) -> Result<(), AppError> {
    if body.title.trim().is_empty() || body.content.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Title and content are required".to_string(),
        ));
    }
    Ok(())
}

/// POST /api/posts — Create post (authenticated)
pub async fn create_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<PostBody>,
) -> Result<impl IntoResponse, AppError> {
    validate_body(&body)?;

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let post = StoredPost {
        id: nanoid::nanoid!(POST_ID_LEN),
        author_id: auth.user.id,
        title: body.title,
        content: body.content,
        created_at: now,
        updated_at: now,
    };

    storage::post::store_post(&mut con, &post).await?;

    tracing::info!(action = "post_created", post_id = %post.id, user_id = auth.user.id, "Post created");

    Ok((
        StatusCode::CREATED,
        Json(PostDetail {
            id: post.id,
            title: post.title,
            content: post.content,
            author_id: post.author_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }),
    ))
}

/// GET /api/posts — List posts, newest first
pub async fn list_posts(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let posts = storage::post::list_posts(&mut con).await?;

    let summaries: Vec<PostSummary> = posts
        .into_iter()
        .map(|p| PostSummary {
            id: p.id,
            title: p.title,
            author_id: p.author_id,
            created_at: p.created_at,
            updated_at: p.updated_at,
        })
        .collect();

    Ok(Json(summaries))
}

/// GET /api/posts/:id — Get post detail
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_id(&id, "post id", POST_ID_LEN)?;

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let post = storage::post::get_post(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(Json(PostDetail {
        id: post.id,
        title: post.title,
        content: post.content,
        author_id: post.author_id,
        created_at: post.created_at,
        updated_at: post.updated_at,
    }))
}

/// PUT /api/posts/:id — Update post (authenticated, author only)
pub async fn update_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<PostBody>,
) -> Result<impl IntoResponse, AppError> {
    validate_id(&id, "post id", POST_ID_LEN)?;
    validate_body(&body)?;

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let mut post = storage::post::get_post(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.author_id != auth.user.id {
        return Err(AppError::Forbidden(
            "Only the author may edit this post".to_string(),
        ));
    }

    post.title = body.title;
    post.content = body.content;
    post.updated_at = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    storage::post::store_post(&mut con, &post).await?;

    tracing::info!(action = "post_updated", post_id = %id, user_id = auth.user.id, "Post updated");

    Ok(Json(serde_json::json!({
        "message": "post updated"
    })))
}

/// DELETE /api/posts/:id — Delete post (authenticated, author only)
pub async fn delete_post(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validate_id(&id, "post id", POST_ID_LEN)?;

    let mut con = state
        .redis
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {}", e)))?;

    let post = storage::post::get_post(&mut con, &id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    if post.author_id != auth.user.id {
        return Err(AppError::Forbidden(
            "Only the author may delete this post".to_string(),
        ));
    }

    storage::post::delete_post(&mut con, &id).await?;

    tracing::info!(action = "post_deleted", post_id = %id, user_id = auth.user.id, "Post deleted");

    Ok(StatusCode::NO_CONTENT)
}
