//! Registration, login and logout handlers.
//!
//! - POST /api/v1/register - Create a regular user
//! - POST /api/v1/login - Exchange credentials for a bearer token
//! - POST /api/v1/logout - Revoke the current token

use std::sync::Arc;

use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    config::Config,
    db::DbPool,
    error::AppError,
    extract::Json,
    middleware::auth::AuthContext,
    models::user::{CredentialsRequest, LoginResponse, UserResponse},
    services::user_service,
};

/// Register a new user.
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "password": "s3cret!" }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: Returns the created user
/// - **Error (400)**: Missing username/password or password shorter than 6 characters
/// - **Error (409)**: Username already taken
pub async fn register(
    State(pool): State<DbPool>,
    Json(request): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = user_service::register(&pool, &request.username, &request.password).await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Log in and receive a bearer token.
///
/// # Response (200)
///
/// ```json
/// {
///   "token": "9f86d081884c7d65...",
///   "expires_at": "2026-10-15T10:00:00Z",
///   "user": { "id": "...", "username": "alice", "role": "user", "created_at": "..." }
/// }
/// ```
///
/// - **Error (401)**: Unknown username or wrong password
pub async fn login(
    State(pool): State<DbPool>,
    State(config): State<Arc<Config>>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if request.username.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidRequest(
            "Please enter both username and password".to_string(),
        ));
    }

    let response =
        user_service::login(&pool, &config, &request.username, &request.password).await?;

    Ok(Json(response))
}

/// Revoke the token used for this request. Returns 204 No Content.
pub async fn logout(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<StatusCode, AppError> {
    user_service::logout(&pool, &auth).await?;

    Ok(StatusCode::NO_CONTENT)
}
