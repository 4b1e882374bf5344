//! Request and response models for the API.
//!
//! All models use serde for serialization/deserialization.
//! Storage models represent Redis data structures.

use serde::{Deserialize, Serialize};

// ============================================================================
// Auth Models
// ============================================================================

/// Request to register a new account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub profile_image: Option<String>,
}

/// Response after successful registration.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub id: u64,
    pub message: String,
}

/// Login credentials.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of a user, returned from profile endpoints.
/// Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: u64,
    pub email: String,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: u64,
}

impl From<StoredUser> for UserResponse {
    fn from(user: StoredUser) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            name: user.name,
            age: user.age,
            gender: user.gender,
            profile_image: user.profile_image,
            created_at: user.created_at,
        }
    }
}

// ============================================================================
// Post Models
// ============================================================================

/// Request body for creating or updating a post.
#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub title: String,
    pub content: String,
}

/// Post listing entry (no content).
#[derive(Debug, Serialize)]
pub struct PostSummary {
    pub id: String,
    pub title: String,
    pub author_id: u64,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Full post as returned from detail endpoints.
#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author_id: u64,
    pub created_at: u64,
    pub updated_at: u64,
}

// ============================================================================
// Storage Models
// ============================================================================

/// User data as stored in Redis.
///
/// `password_hash` is an Argon2id PHC string, never the plaintext secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: u64,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub age: Option<u32>,
    pub gender: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: u64,
}

/// Post data as stored in Redis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPost {
    pub id: String,
    pub author_id: u64,
    pub title: String,
    pub content: String,
    pub created_at: u64,
    pub updated_at: u64,
}
