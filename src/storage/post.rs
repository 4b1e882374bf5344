//! Post Redis operations.
//!
//! Redis key patterns:
//! - `post:{nanoid}` — post data (JSON)

use crate::models::StoredPost;
use redis::AsyncCommands;

/// Store a post (create or overwrite).
pub async fn store_post<C>(con: &mut C, post: &StoredPost) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("post:{}", post.id);
    let json = serde_json::to_string(post).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "JSON serialize",
            e.to_string(),
        ))
    })?;

    con.set::<_, _, ()>(&key, json).await?;
    Ok(())
}

/// Get a post by id.
pub async fn get_post<C>(con: &mut C, id: &str) -> Result<Option<StoredPost>, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("post:{}", id);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            let post = serde_json::from_str(&data).map_err(|e| {
                redis::RedisError::from((
                    redis::ErrorKind::TypeError,
                    "JSON deserialize",
                    e.to_string(),
                ))
            })?;
            Ok(Some(post))
        }
        None => Ok(None),
    }
}

/// Delete a post from Redis.
///
/// Returns true if the post was deleted, false if it didn't exist.
pub async fn delete_post<C>(con: &mut C, id: &str) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("post:{}", id);
    let deleted: i32 = con.del(&key).await?;
    Ok(deleted > 0)
}

/// List all posts, newest first.
///
/// Scans for keys matching `post:*` and deserializes each.
pub async fn list_posts<C>(con: &mut C) -> Result<Vec<StoredPost>, redis::RedisError>
where
    C: AsyncCommands,
{
    let mut posts = Vec::new();
    let keys = super::scan_keys(con, "post:*").await?;

    for key in keys {
        let json: Option<String> = con.get(&key).await?;
        if let Some(data) = json {
            if let Ok(post) = serde_json::from_str::<StoredPost>(&data) {
                posts.push(post);
            }
        }
    }

    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(posts)
}
