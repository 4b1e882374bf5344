//! User Redis operations — the credential store the verifier resolves
//! identities against.
//!
//! Redis key patterns:
//! - `user:{id}` — individual user data (JSON)
//! - `email:{email}` — email lookup to user id (STRING)
//! - `user:next_id` — id allocation counter (INCR)
//!
//! Exactly one user exists per unique email: the email key is claimed with
//! `SET NX` before the user record is written, so concurrent registrations
//! cannot both win it. The verifier looks up by the numeric id only, the
//! email key serves login.
//!
//! User records carry the password hash, so deserialized JSON is wrapped in
//! `zeroize::Zeroizing` to clear it from application memory after use.

use crate::models::StoredUser;
use redis::AsyncCommands;
use zeroize::Zeroizing;

/// Allocate the next numeric user id.
pub async fn allocate_user_id<C>(con: &mut C) -> Result<u64, redis::RedisError>
where
    C: AsyncCommands,
{
    con.incr("user:next_id", 1).await
}

/// Claim an email for a user id, atomically.
///
/// Uses `SET NX` so exactly one of any set of concurrent registrations for
/// the same email wins the key. Returns false if the email is already
/// claimed. Must succeed before the user record is written.
pub async fn claim_email<C>(con: &mut C, email: &str, id: u64) -> Result<bool, redis::RedisError>
where
    C: AsyncCommands,
{
    let email_key = format!("email:{}", email);
    con.set_nx(&email_key, id).await
}

/// Store a user record in Redis. Users are permanent (no TTL).
///
/// The caller must have claimed the email via [`claim_email`] first; this
/// only writes `user:{id}`.
pub async fn store_user<C>(con: &mut C, user: &StoredUser) -> Result<(), redis::RedisError>
where
    C: AsyncCommands,
{
    let user_key = format!("user:{}", user.id);

    let json = serde_json::to_string(user).map_err(|e| {
        redis::RedisError::from((
            redis::ErrorKind::TypeError,
            "JSON serialize",
            e.to_string(),
        ))
    })?;

    con.set::<_, _, ()>(&user_key, json).await?;

    Ok(())
}

/// Get a user by id.
///
/// The user JSON is zeroized after deserialization.
pub async fn get_user<C>(con: &mut C, id: u64) -> Result<Option<StoredUser>, redis::RedisError>
where
    C: AsyncCommands,
{
    let key = format!("user:{}", id);
    let json: Option<String> = con.get(&key).await?;

    match json {
        Some(data) => {
            // Wrap the JSON string in Zeroizing to clear it after use
            let zeroizing_data = Zeroizing::new(data);
            let user = serde_json::from_str(&zeroizing_data).map_err(|e| {
                redis::RedisError::from((
                    redis::ErrorKind::TypeError,
                    "JSON deserialize",
                    e.to_string(),
                ))
            })?;
            // zeroizing_data is automatically zeroized when dropped here
            Ok(Some(user))
        }
        None => Ok(None),
    }
}

/// Get a user by email.
///
/// Performs a two-step lookup: email -> user id -> user data.
pub async fn get_user_by_email<C>(
    con: &mut C,
    email: &str,
) -> Result<Option<StoredUser>, redis::RedisError>
where
    C: AsyncCommands,
{
    let email_key = format!("email:{}", email);
    let user_id: Option<u64> = con.get(&email_key).await?;

    match user_id {
        Some(id) => get_user(con, id).await,
        None => Ok(None),
    }
}
