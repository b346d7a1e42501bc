//! User service - registration, login and session management.
//!
//! # Credential Storage
//!
//! Passwords are stored as `sha256$<salt_hex>$<mac_hex>` where the MAC is
//! HMAC-SHA256 keyed by a random 16-byte salt. Session tokens are 32 random bytes,
//! hex encoded; the database only keeps their SHA-256 hash.

use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    config::Config,
    db::{self, DbPool},
    error::AppError,
    middleware::auth::AuthContext,
    models::user::{LoginResponse, Role, User},
};

type HmacSha256 = Hmac<Sha256>;

const HASH_SCHEME: &str = "sha256";
const MIN_PASSWORD_LEN: usize = 6;
const MAX_USERNAME_LEN: usize = 100;

/// Validate registration input and return the trimmed username.
///
/// # Rules
///
/// - Username is required and at most 100 characters
/// - Password is at least 6 characters
pub fn validate_credentials(username: &str, password: &str) -> Result<String, AppError> {
    let username = username.trim();
    if username.is_empty() || password.is_empty() {
        return Err(AppError::InvalidRequest(
            "Both username and password are required".to_string(),
        ));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(AppError::InvalidRequest(format!(
            "Username may not exceed {} characters",
            MAX_USERNAME_LEN
        )));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LEN
        )));
    }
    Ok(username.to_string())
}

fn password_mac(salt: &[u8]) -> HmacSha256 {
    HmacSha256::new_from_slice(salt).expect("HMAC key length is valid")
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::random();
    let mut mac = password_mac(&salt);
    mac.update(password.as_bytes());
    format!(
        "{}${}${}",
        HASH_SCHEME,
        hex::encode(salt),
        hex::encode(mac.finalize().into_bytes())
    )
}

/// Check a password against a stored hash. Malformed hashes never verify.
///
/// The comparison is constant-time (`Mac::verify_slice`).
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(scheme), Some(salt_hex), Some(mac_hex)) = (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if scheme != HASH_SCHEME {
        return false;
    }
    let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(mac_hex)) else {
        return false;
    };

    let mut mac = password_mac(&salt);
    mac.update(password.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

/// Generate a session token (64 hex characters).
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

/// SHA-256 hash of a session token, as stored in `sessions.token_hash`.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// Register a new regular user.
///
/// # Errors
///
/// - `InvalidRequest`: username or password fail validation
/// - `UsernameTaken`: username already registered
pub async fn register(pool: &DbPool, username: &str, password: &str) -> Result<User, AppError> {
    let username = validate_credentials(username, password)?;
    create_user(pool, &username, password, Role::User).await
}

async fn create_user(
    pool: &DbPool,
    username: &str,
    password: &str,
    role: Role,
) -> Result<User, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash, role)
        VALUES ($1, $2, $3)
        RETURNING id, username, password_hash, role, created_at
        "#,
    )
    .bind(username)
    .bind(hash_password(password))
    .bind(role.as_str())
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if db::is_unique_violation(&e) {
            AppError::UsernameTaken
        } else {
            AppError::Database(e)
        }
    })?;

    tracing::info!(user_id = %user.id, role = role.as_str(), "User registered");

    Ok(user)
}

/// Verify credentials and open a session.
///
/// Unknown usernames and wrong passwords both fail with `AuthFailure`.
pub async fn login(
    pool: &DbPool,
    config: &Config,
    username: &str,
    password: &str,
) -> Result<LoginResponse, AppError> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, role, created_at FROM users WHERE username = $1",
    )
    .bind(username.trim())
    .fetch_optional(pool)
    .await?
    .filter(|user| verify_password(password, &user.password_hash))
    .ok_or(AppError::AuthFailure)?;

    let token = generate_token();
    let expires_at = Utc::now() + config.session_ttl();

    sqlx::query("INSERT INTO sessions (user_id, token_hash, expires_at) VALUES ($1, $2, $3)")
        .bind(user.id)
        .bind(hash_token(&token))
        .bind(expires_at)
        .execute(pool)
        .await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(LoginResponse {
        token,
        expires_at,
        user: user.into(),
    })
}

/// Resolve a bearer token to the user it was issued to.
///
/// Expired sessions are treated as missing.
pub async fn authenticate(pool: &DbPool, token: &str) -> Result<AuthContext, AppError> {
    let (session_id, user_id, username, role): (Uuid, Uuid, String, String) = sqlx::query_as(
        r#"
        SELECT s.id, u.id, u.username, u.role
        FROM sessions s
        JOIN users u ON u.id = s.user_id
        WHERE s.token_hash = $1 AND s.expires_at > NOW()
        "#,
    )
    .bind(hash_token(token))
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::AuthFailure)?;

    Ok(AuthContext {
        session_id,
        user_id,
        username,
        role: Role::from_db(&role),
    })
}

/// End the session behind `auth`.
pub async fn logout(pool: &DbPool, auth: &AuthContext) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(auth.session_id)
        .execute(pool)
        .await?;

    tracing::info!(username = %auth.username, "User logged out");

    Ok(())
}

/// Create the configured admin account if no admin exists yet.
///
/// Does nothing when `ADMIN_USERNAME` or `ADMIN_PASSWORD` is unset.
pub async fn ensure_admin(pool: &DbPool, config: &Config) -> Result<(), AppError> {
    let (Some(username), Some(password)) = (&config.admin_username, &config.admin_password) else {
        return Ok(());
    };

    let admin_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')")
            .fetch_one(pool)
            .await?;
    if admin_exists {
        return Ok(());
    }

    let username = validate_credentials(username, password)?;
    create_user(pool, &username, password, Role::Admin).await?;
    tracing::info!(username = %username, "Created bootstrap admin user");

    Ok(())
}

/// All regular users in registration order.
pub async fn list_users(pool: &DbPool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password_hash, role, created_at
        FROM users
        WHERE role = 'user'
        ORDER BY created_at, username
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}
