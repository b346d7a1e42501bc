//! Spot service - inventory management and derived availability.
//!
//! A spot is available for a window when neither it nor its lot is disabled and no active
//! booking overlaps the window. Nothing about a booking is written back to the spot row.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    db::{self, DbPool},
    error::AppError,
    models::{
        booking::BookingWindow,
        spot::{self, CreateSpotRequest, Spot, SpotOccupancy, SpotStatus, UpdateSpotRequest},
    },
};

/// Most spots a lot may be created with in one request.
pub const MAX_BATCH_SIZE: u32 = 500;

// A disabled lot reports all of its spots as disabled
const SPOT_COLUMNS: &str = "s.id, s.lot_id, s.label, s.hourly_rate_cents, \
    CASE WHEN l.status = 'disabled' THEN 'disabled' ELSE s.status END AS status, \
    s.created_at, s.updated_at";

fn label_conflict(e: sqlx::Error) -> AppError {
    if db::is_unique_violation(&e) {
        AppError::InvalidRequest("A spot with that label already exists in this lot".to_string())
    } else {
        AppError::Database(e)
    }
}

/// Spots with their occupancy at `now`, optionally limited to one lot, ordered by lot then label.
pub async fn list_spots(
    pool: &DbPool,
    lot_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Vec<SpotOccupancy>, AppError> {
    let spots = sqlx::query_as::<_, SpotOccupancy>(&format!(
        r#"
        SELECT {SPOT_COLUMNS},
            EXISTS(
                SELECT 1 FROM bookings b
                WHERE b.spot_id = s.id
                  AND b.status = 'active'
                  AND b.start_time <= $2
                  AND $2 < b.end_time
            ) AS occupied
        FROM spots s
        JOIN lots l ON l.id = s.lot_id
        WHERE ($1::UUID IS NULL OR s.lot_id = $1)
        ORDER BY l.name, l.id, s.label
        "#
    ))
    .bind(lot_id)
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(spots)
}

/// Enabled spots with no active booking overlapping `window`, ordered by lot then label.
///
/// `occupied` in the result still refers to the current instant `now`.
pub async fn available_spots(
    pool: &DbPool,
    lot_id: Option<Uuid>,
    window: &BookingWindow,
    now: DateTime<Utc>,
) -> Result<Vec<SpotOccupancy>, AppError> {
    let spots = sqlx::query_as::<_, SpotOccupancy>(&format!(
        r#"
        SELECT {SPOT_COLUMNS},
            EXISTS(
                SELECT 1 FROM bookings b
                WHERE b.spot_id = s.id
                  AND b.status = 'active'
                  AND b.start_time <= $4
                  AND $4 < b.end_time
            ) AS occupied
        FROM spots s
        JOIN lots l ON l.id = s.lot_id
        WHERE s.status = 'available'
          AND l.status = 'available'
          AND ($1::UUID IS NULL OR s.lot_id = $1)
          AND NOT EXISTS(
                SELECT 1 FROM bookings b
                WHERE b.spot_id = s.id
                  AND b.status = 'active'
                  AND b.start_time < $3
                  AND $2 < b.end_time
          )
        ORDER BY l.name, l.id, s.label
        "#
    ))
    .bind(lot_id)
    .bind(window.start())
    .bind(window.end())
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(spots)
}

/// Insert one spot inside an open transaction.
pub(crate) async fn insert_spot(
    conn: &mut PgConnection,
    lot_id: Uuid,
    label: &str,
    hourly_rate_cents: i64,
) -> Result<Spot, AppError> {
    sqlx::query_as::<_, Spot>(
        r#"
        INSERT INTO spots (lot_id, label, hourly_rate_cents)
        VALUES ($1, $2, $3)
        RETURNING id, lot_id, label, hourly_rate_cents, status, created_at, updated_at
        "#,
    )
    .bind(lot_id)
    .bind(label)
    .bind(hourly_rate_cents)
    .fetch_one(conn)
    .await
    .map_err(label_conflict)
}

/// Add a spot to `lot_id`. The lot's rate is used when the request has none.
///
/// # Errors
///
/// - `LotNotFound`: lot doesn't exist
/// - `InvalidRequest`: bad label or rate, or a duplicate label within the lot
pub async fn create_spot(
    pool: &DbPool,
    lot_id: Uuid,
    request: CreateSpotRequest,
) -> Result<Spot, AppError> {
    let label = spot::normalize_label(&request.label)?;
    if let Some(rate) = request.hourly_rate_cents {
        spot::validate_rate(rate)?;
    }

    let mut tx = pool.begin().await?;

    let lot_rate: i64 = sqlx::query_scalar("SELECT hourly_rate_cents FROM lots WHERE id = $1")
        .bind(lot_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::LotNotFound)?;

    let rate = request.hourly_rate_cents.unwrap_or(lot_rate);
    let spot = insert_spot(&mut *tx, lot_id, &label, rate).await?;

    tx.commit().await?;

    tracing::info!(spot_id = %spot.id, %lot_id, label = %spot.label, "Spot created");

    Ok(spot)
}

/// Apply a partial update to a spot.
///
/// # Errors
///
/// - `SlotNotFound`: spot doesn't exist
/// - `InvalidRequest`: bad label or rate, duplicate label, or status "occupied"
pub async fn update_spot(
    pool: &DbPool,
    spot_id: Uuid,
    request: UpdateSpotRequest,
) -> Result<Spot, AppError> {
    let label = request
        .label
        .as_deref()
        .map(spot::normalize_label)
        .transpose()?;
    if let Some(rate) = request.hourly_rate_cents {
        spot::validate_rate(rate)?;
    }
    let status = match request.status {
        Some(SpotStatus::Occupied) => {
            return Err(AppError::InvalidRequest(
                "Occupancy is derived from bookings and cannot be set".to_string(),
            ));
        }
        other => other.map(|s| s.as_str()),
    };

    let spot = sqlx::query_as::<_, Spot>(
        r#"
        UPDATE spots
        SET label = COALESCE($2, label),
            hourly_rate_cents = COALESCE($3, hourly_rate_cents),
            status = COALESCE($4, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, lot_id, label, hourly_rate_cents, status, created_at, updated_at
        "#,
    )
    .bind(spot_id)
    .bind(label)
    .bind(request.hourly_rate_cents)
    .bind(status)
    .fetch_optional(pool)
    .await
    .map_err(label_conflict)?
    .ok_or(AppError::SlotNotFound)?;

    tracing::info!(spot_id = %spot.id, status = %spot.status, "Spot updated");

    Ok(spot)
}
