//! Back-office HTTP handlers. Every route here sits behind `require_admin`.
//!
//! - POST /api/v1/admin/lots - Create a lot and its numbered spots
//! - PATCH /api/v1/admin/lots/:id - Update a lot
//! - DELETE /api/v1/admin/lots/:id - Disable a lot
//! - POST /api/v1/admin/lots/:id/spots - Add a spot to a lot
//! - PATCH /api/v1/admin/spots/:id - Update label, rate or status
//! - GET /api/v1/admin/revenue - Total, per-lot and per-spot revenue
//! - GET /api/v1/admin/bookings - All bookings
//! - GET /api/v1/admin/users - Registered users
//! - GET /api/v1/admin/summary - Dashboard counters

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::{
    config::Config,
    db::DbPool,
    error::AppError,
    extract::{Json, Path, Query},
    models::{
        booking::{BookingListQuery, BookingResponse},
        ledger::{RevenueReport, Summary},
        lot::{CreateLotRequest, LotDetailResponse, LotOccupancy, LotResponse, UpdateLotRequest},
        spot::{CreateSpotRequest, SpotResponse, UpdateSpotRequest},
        user::UserResponse,
    },
    services::{ledger_service, lot_service, spot_service, user_service},
};

/// Create a lot with `spot_count` spots.
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Mall Road",
///   "address": "12 Mall Road",
///   "pin_code": "560001",
///   "hourly_rate_cents": 200,
///   "spot_count": 3
/// }
/// ```
///
/// - **Success (201 Created)**: the lot with spots `MAL-001`, `MAL-002`, `MAL-003`
/// - **Error (400)**: missing fields, non-positive rate, or spot count out of range
pub async fn create_lot(
    State(pool): State<DbPool>,
    Json(request): Json<CreateLotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (lot, spots) = lot_service::create_lot(&pool, request).await?;

    let total = spots.len() as i64;
    let body = LotDetailResponse {
        lot: LotResponse::from(LotOccupancy {
            lot,
            total_spots: total,
            occupied_spots: 0,
            available_spots: total,
        }),
        spots: spots.into_iter().map(Into::into).collect(),
    };

    Ok((StatusCode::CREATED, Json(body)))
}

/// Partially update a lot.
///
/// ```json
/// { "hourly_rate_cents": 250, "status": "disabled" }
/// ```
///
/// - **Error (404)**: lot not found
/// - **Error (409)**: disabling while bookings are active
pub async fn update_lot(
    State(pool): State<DbPool>,
    Path(lot_id): Path<Uuid>,
    Json(request): Json<UpdateLotRequest>,
) -> Result<Json<LotResponse>, AppError> {
    lot_service::update_lot(&pool, lot_id, request).await?;
    let lot = lot_service::get_lot(&pool, lot_id, Utc::now()).await?;

    Ok(Json(lot.into()))
}

/// Take a lot out of service. Lots are kept for booking history rather than removed.
///
/// - **Error (409)**: the lot still has active bookings
pub async fn disable_lot(
    State(pool): State<DbPool>,
    Path(lot_id): Path<Uuid>,
) -> Result<Json<LotResponse>, AppError> {
    lot_service::disable_lot(&pool, lot_id).await?;
    let lot = lot_service::get_lot(&pool, lot_id, Utc::now()).await?;

    Ok(Json(lot.into()))
}

/// Add a spot to a lot.
///
/// ```json
/// { "label": "MAL-004" }
/// ```
///
/// - **Success (201 Created)**
/// - **Error (400)**: empty label, non-positive rate, or label already used in the lot
/// - **Error (404)**: lot not found
pub async fn create_spot(
    State(pool): State<DbPool>,
    Path(lot_id): Path<Uuid>,
    Json(request): Json<CreateSpotRequest>,
) -> Result<impl IntoResponse, AppError> {
    let spot = spot_service::create_spot(&pool, lot_id, request).await?;

    Ok((StatusCode::CREATED, Json(SpotResponse::from(spot))))
}

/// Partially update a spot.
///
/// ```json
/// { "hourly_rate_cents": 250, "status": "disabled" }
/// ```
///
/// A rate change applies to future bookings only.
pub async fn update_spot(
    State(pool): State<DbPool>,
    Path(spot_id): Path<Uuid>,
    Json(request): Json<UpdateSpotRequest>,
) -> Result<Json<SpotResponse>, AppError> {
    let spot = spot_service::update_spot(&pool, spot_id, request).await?;

    Ok(Json(spot.into()))
}

/// Revenue report under the configured policy.
pub async fn revenue(
    State(pool): State<DbPool>,
    State(config): State<Arc<Config>>,
) -> Result<Json<RevenueReport>, AppError> {
    let report = ledger_service::revenue_report(&pool, &config).await?;

    Ok(Json(report))
}

/// Booking history across all users.
///
/// Query parameters: `status` (`active`, `completed`, `cancelled`) and `limit` (default 100).
pub async fn list_bookings(
    State(pool): State<DbPool>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = ledger_service::all_bookings(&pool, &query).await?;

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// Registered (non-admin) users.
pub async fn list_users(
    State(pool): State<DbPool>,
) -> Result<Json<Vec<UserResponse>>, AppError> {
    let users = user_service::list_users(&pool).await?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Spot, user and booking counters.
pub async fn summary(State(pool): State<DbPool>) -> Result<Json<Summary>, AppError> {
    let summary = ledger_service::summary(&pool, Utc::now()).await?;

    Ok(Json(summary))
}
