//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
/// Every variant is recovered at the handler boundary; none is fatal to the process.
///
/// # Error Categories
///
/// - **Booking Errors**: invalid windows, unknown or unavailable spots, finished bookings
/// - **Authentication Errors**: bad credentials, missing or expired tokens, non-admin callers
/// - **Validation Errors**: Invalid request data
/// - **Database Errors**: Any sqlx::Error from database operations
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested booking window is empty, reversed, in the past, or too long.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid booking window: {0}")]
    InvalidWindow(String),

    /// Requested spot does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Spot not found")]
    SlotNotFound,

    /// Requested lot does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Lot not found")]
    LotNotFound,

    /// Lot still has active bookings that have not ended, so it cannot be disabled.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Lot has {0} active booking(s) and cannot be disabled")]
    LotInUse(i64),

    /// Spot is disabled or already has an active booking overlapping the window.
    ///
    /// For lot-level bookings: the lot is disabled or every spot in it is taken.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Spot is not available for the requested window")]
    SlotUnavailable,

    /// Booking was already released.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Booking is already completed")]
    AlreadyCompleted,

    /// Booking does not exist or belongs to another user.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Booking not found")]
    BookingNotFound,

    /// Credentials or bearer token are missing, wrong, or expired.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid credentials")]
    AuthFailure,

    /// Authenticated caller lacks the admin role.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Admin privileges required")]
    Forbidden,

    /// Username is already registered.
    ///
    /// Returns HTTP 409 Conflict.
    #[error("Username is already taken")]
    UsernameTaken,

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

impl AppError {
    /// HTTP status and machine-readable code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::InvalidWindow(_) => (StatusCode::BAD_REQUEST, "invalid_window"),
            AppError::SlotNotFound => (StatusCode::NOT_FOUND, "slot_not_found"),
            AppError::LotNotFound => (StatusCode::NOT_FOUND, "lot_not_found"),
            AppError::LotInUse(_) => (StatusCode::CONFLICT, "lot_in_use"),
            AppError::SlotUnavailable => (StatusCode::CONFLICT, "slot_unavailable"),
            AppError::AlreadyCompleted => (StatusCode::CONFLICT, "already_completed"),
            AppError::BookingNotFound => (StatusCode::NOT_FOUND, "booking_not_found"),
            AppError::AuthFailure => (StatusCode::UNAUTHORIZED, "auth_failure"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "forbidden"),
            AppError::UsernameTaken => (StatusCode::CONFLICT, "username_taken"),
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::Database(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

// Extractor rejections surface as 400s in the usual error body instead of axum's plain text.

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Database errors are logged and replaced by a generic message so details never reach the client.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            AppError::InvalidRequest(msg) => msg,
            AppError::Database(ref err) => {
                tracing::error!("Database error: {:?}", err);
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
