//! Lot browsing handlers.
//!
//! - GET /api/v1/lots - Lots with spot counters
//! - GET /api/v1/lots/:id - One lot with its spots

use axum::extract::State;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    extract::{Json, Path},
    models::lot::{LotDetailResponse, LotResponse},
    services::{lot_service, spot_service},
};

/// List lots with how many of their spots are occupied and available right now.
///
/// Spots of a disabled lot count towards `total_spots` only.
pub async fn list_lots(State(pool): State<DbPool>) -> Result<Json<Vec<LotResponse>>, AppError> {
    let lots = lot_service::list_lots(&pool, Utc::now()).await?;

    Ok(Json(lots.into_iter().map(Into::into).collect()))
}

/// Get a lot and its spots.
///
/// - **Error (404)**: lot not found
pub async fn get_lot(
    State(pool): State<DbPool>,
    Path(lot_id): Path<Uuid>,
) -> Result<Json<LotDetailResponse>, AppError> {
    let now = Utc::now();
    let lot = lot_service::get_lot(&pool, lot_id, now).await?;
    let spots = spot_service::list_spots(&pool, Some(lot_id), now).await?;

    Ok(Json(LotDetailResponse {
        lot: lot.into(),
        spots: spots.into_iter().map(Into::into).collect(),
    }))
}
