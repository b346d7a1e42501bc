//! Spot browsing handler.
//!
//! - GET /api/v1/spots - List spots with their current status
//! - GET /api/v1/spots?start=...&end=... - List spots bookable for a window
//! - GET /api/v1/spots?lot_id=... - Either of the above, limited to one lot

use std::sync::Arc;

use axum::extract::State;
use chrono::Utc;

use crate::{
    config::Config,
    db::DbPool,
    error::AppError,
    extract::{Json, Query},
    models::{
        booking::BookingWindow,
        spot::{SpotListQuery, SpotResponse},
    },
    services::spot_service,
};

/// List spots.
///
/// Without a window every spot is returned with status `available`, `occupied`
/// (an active booking covers the current instant) or `disabled`.
///
/// With `start` and `end` (RFC 3339) only enabled spots with no active booking
/// overlapping that window are returned. The window is validated like a reservation.
///
/// # Response
///
/// - **Success (200 OK)**: Array of spots ordered by lot, then label
/// - **Error (400)**: Only one of `start`/`end` given, or an invalid window
pub async fn list_spots(
    State(pool): State<DbPool>,
    State(config): State<Arc<Config>>,
    Query(query): Query<SpotListQuery>,
) -> Result<Json<Vec<SpotResponse>>, AppError> {
    let now = Utc::now();

    let spots = match (query.start, query.end) {
        (None, None) => spot_service::list_spots(&pool, query.lot_id, now).await?,
        (Some(start), Some(end)) => {
            let window = BookingWindow::new(start, end, now, config.max_booking_duration())?;
            spot_service::available_spots(&pool, query.lot_id, &window, now).await?
        }
        _ => {
            return Err(AppError::InvalidRequest(
                "Both start and end are required to filter by window".to_string(),
            ));
        }
    };

    Ok(Json(spots.into_iter().map(Into::into).collect()))
}
