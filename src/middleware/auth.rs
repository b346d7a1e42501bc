//! Session token authentication middleware.
//!
//! This middleware intercepts every protected request to:
//! 1. Extract the bearer token from the Authorization header
//! 2. Hash it and resolve it to an unexpired session
//! 3. Inject the caller's `AuthContext` into the request
//! 4. Reject unauthorized requests with HTTP 401
//!
//! `require_admin` runs after it on admin routes and rejects non-admins with HTTP 403.

use crate::{db::DbPool, error::AppError, models::user::Role, services::user_service};
use axum::{
    Extension,
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Authentication context attached to authenticated requests.
///
/// This is the request-scoped replacement for a global "current user": handlers extract it
/// with `Extension<AuthContext>` and pass it down explicitly.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Session the bearer token belongs to
    pub session_id: Uuid,

    /// ID of the authenticated user
    ///
    /// Used to filter database queries (e.g., only show this user's bookings)
    pub user_id: Uuid,

    pub username: String,

    pub role: Role,
}

impl AuthContext {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Bearer token authentication middleware function.
///
/// # Flow
///
/// 1. Extract `Authorization: Bearer <token>` header from request
/// 2. Look up the SHA-256 hash of the token among unexpired sessions
/// 3. If found: inject `AuthContext` into request, call next handler
/// 4. If not found: return 401 Unauthorized error
pub async fn auth_middleware(
    State(pool): State<DbPool>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AppError::AuthFailure)?;

    let auth_context = user_service::authenticate(&pool, token).await?;

    // Route handlers can now extract this using Extension<AuthContext>
    request.extensions_mut().insert(auth_context);

    Ok(next.run(request).await)
}

/// Admin guard for back-office routes.
///
/// Must be layered inside `auth_middleware` so the `AuthContext` extension is present.
pub async fn require_admin(
    Extension(auth): Extension<AuthContext>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !auth.is_admin() {
        tracing::warn!(user_id = %auth.user_id, "Non-admin attempted admin route");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}
