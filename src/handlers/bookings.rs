//! Booking HTTP handlers.
//!
//! This module implements the user-facing booking endpoints:
//! - POST /api/v1/bookings - Reserve a spot for a window
//! - POST /api/v1/lots/:id/bookings - Reserve the first free spot in a lot
//! - GET /api/v1/bookings/me - Own booking history, newest first
//! - GET /api/v1/bookings/:id - Get one booking
//! - POST /api/v1/bookings/:id/release - Check out
//! - POST /api/v1/bookings/:id/cancel - Cancel

use std::sync::Arc;

use axum::{Extension, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::Config,
    db::DbPool,
    error::AppError,
    extract::{Json, Path},
    middleware::auth::AuthContext,
    models::{
        booking::{BookingResponse, CreateBookingRequest},
        lot::LotBookingRequest,
    },
    services::{booking_service, ledger_service},
};

/// Reserve a spot.
///
/// # Request Body
///
/// ```json
/// {
///   "spot_id": "550e8400-...",
///   "start_time": "2026-12-01T10:00:00Z",
///   "end_time": "2026-12-01T12:30:00Z"
/// }
/// ```
///
/// # Response
///
/// - **Success (201 Created)**: the active booking with its frozen amount
/// - **Error (400)**: invalid window
/// - **Error (404)**: spot not found
/// - **Error (409)**: spot disabled or window already booked
pub async fn create_booking(
    State(pool): State<DbPool>,
    State(config): State<Arc<Config>>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = booking_service::reserve(
        &pool,
        &config,
        auth.user_id,
        request.spot_id,
        request.start_time,
        request.end_time,
        Utc::now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// Reserve whichever spot in a lot is free for the window, first by label.
///
/// # Request Body
///
/// ```json
/// { "start_time": "2026-12-01T10:00:00Z", "end_time": "2026-12-01T12:00:00Z" }
/// ```
///
/// - **Success (201 Created)**: the booking, whose `spot_id` names the assigned spot
/// - **Error (404)**: lot not found
/// - **Error (409)**: lot disabled or full for the window
pub async fn create_lot_booking(
    State(pool): State<DbPool>,
    State(config): State<Arc<Config>>,
    Extension(auth): Extension<AuthContext>,
    Path(lot_id): Path<Uuid>,
    Json(request): Json<LotBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = booking_service::reserve_in_lot(
        &pool,
        &config,
        auth.user_id,
        lot_id,
        request.start_time,
        request.end_time,
        Utc::now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(booking))))
}

/// The caller's bookings, newest first.
pub async fn my_bookings(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = ledger_service::history(&pool, auth.user_id).await?;

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// Get a booking by ID.
///
/// Returns 404 for bookings owned by someone else unless the caller is an admin.
pub async fn get_booking(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = booking_service::get_booking(&pool, &auth, booking_id).await?;

    Ok(Json(booking.into()))
}

/// Check out an active booking.
///
/// - **Error (409)**: already completed
pub async fn release_booking(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = booking_service::release(&pool, &auth, booking_id).await?;

    Ok(Json(booking.into()))
}

/// Cancel an active booking.
pub async fn cancel_booking(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = booking_service::cancel(&pool, &auth, booking_id).await?;

    Ok(Json(booking.into()))
}
