//! User and session models.
//!
//! Users authenticate with a username and password. A successful login issues an opaque
//! bearer token; only its SHA-256 hash is stored in the `sessions` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a user record from the database.
///
/// # Database Table
///
/// Maps to the `users` table. `role` is either "user" or "admin".
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,

    /// Unique login name
    pub username: String,

    /// Salted password hash, see `services::user_service::hash_password`
    pub password_hash: String,

    pub role: String,

    /// Registration time
    pub created_at: DateTime<Utc>,
}

/// Role of an authenticated user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Parse the stored role. Anything other than "admin" has regular user privileges.
    pub fn from_db(role: &str) -> Self {
        if role == "admin" { Role::Admin } else { Role::User }
    }
}

/// Credentials for both registration and login.
///
/// ```json
/// { "username": "alice", "password": "s3cret!" }
/// ```
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Response body for user endpoints. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: Role::from_db(&user.role),
            username: user.username,
            created_at: user.created_at,
        }
    }
}

/// Response body for a successful login.
///
/// The token is shown exactly once; clients send it back as `Authorization: Bearer <token>`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}
