//! Lot service - parking lots and the spots they group.
//!
//! Lots are never deleted: bookings reference their spots and history is append-only.
//! Disabling a lot takes it out of service instead, and is refused while any of its
//! spots still has an active booking.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        lot::{self, CreateLotRequest, Lot, LotOccupancy, LotStatus, UpdateLotRequest},
        spot::{self, Spot},
    },
    services::spot_service::{self, MAX_BATCH_SIZE},
};

const LOT_COLUMNS: &str =
    "id, name, address, pin_code, hourly_rate_cents, status, created_at, updated_at";

async fn lots_with_counts(
    pool: &DbPool,
    lot_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Vec<LotOccupancy>, AppError> {
    let lots = sqlx::query_as::<_, LotOccupancy>(
        r#"
        WITH spot_state AS (
            SELECT s.lot_id,
                   s.status,
                   EXISTS(
                       SELECT 1 FROM bookings b
                       WHERE b.spot_id = s.id
                         AND b.status = 'active'
                         AND b.start_time <= $2
                         AND $2 < b.end_time
                   ) AS occupied
            FROM spots s
        )
        SELECT l.id, l.name, l.address, l.pin_code, l.hourly_rate_cents, l.status,
               l.created_at, l.updated_at,
               COUNT(ss.lot_id) AS total_spots,
               COUNT(ss.lot_id) FILTER (
                   WHERE l.status = 'available' AND ss.status = 'available' AND ss.occupied
               ) AS occupied_spots,
               COUNT(ss.lot_id) FILTER (
                   WHERE l.status = 'available' AND ss.status = 'available' AND NOT ss.occupied
               ) AS available_spots
        FROM lots l
        LEFT JOIN spot_state ss ON ss.lot_id = l.id
        WHERE ($1::UUID IS NULL OR l.id = $1)
        GROUP BY l.id
        ORDER BY l.name, l.id
        "#,
    )
    .bind(lot_id)
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(lots)
}

/// All lots with spot counters at `now`, ordered by name.
pub async fn list_lots(pool: &DbPool, now: DateTime<Utc>) -> Result<Vec<LotOccupancy>, AppError> {
    lots_with_counts(pool, None, now).await
}

/// One lot with spot counters at `now`.
pub async fn get_lot(
    pool: &DbPool,
    lot_id: Uuid,
    now: DateTime<Utc>,
) -> Result<LotOccupancy, AppError> {
    lots_with_counts(pool, Some(lot_id), now)
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::LotNotFound)
}

/// Create a lot and `spot_count` spots labelled `PREFIX-001` onwards, in one transaction.
///
/// # Errors
///
/// `InvalidRequest` for missing fields, a non-positive rate, a spot count outside
/// `1..=MAX_BATCH_SIZE`, or a prefix that yields labels longer than allowed.
pub async fn create_lot(
    pool: &DbPool,
    request: CreateLotRequest,
) -> Result<(Lot, Vec<Spot>), AppError> {
    let name = lot::normalize_name(&request.name)?;
    let address = lot::normalize_address(&request.address)?;
    let pin_code = lot::normalize_pin_code(&request.pin_code)?;
    spot::validate_rate(request.hourly_rate_cents)?;
    if request.spot_count == 0 || request.spot_count > MAX_BATCH_SIZE {
        return Err(AppError::InvalidRequest(format!(
            "Spot count must be between 1 and {}",
            MAX_BATCH_SIZE
        )));
    }

    let prefix = match request.label_prefix.as_deref().map(str::trim) {
        Some(prefix) if !prefix.is_empty() => prefix.to_string(),
        _ => lot::default_prefix(&name),
    };
    let labels = spot::batch_labels(&prefix, request.spot_count);
    // The last label is the longest
    if let Some(longest) = labels.last() {
        spot::normalize_label(longest)?;
    }

    let mut tx = pool.begin().await?;

    let lot = sqlx::query_as::<_, Lot>(&format!(
        r#"
        INSERT INTO lots (name, address, pin_code, hourly_rate_cents)
        VALUES ($1, $2, $3, $4)
        RETURNING {LOT_COLUMNS}
        "#
    ))
    .bind(&name)
    .bind(&address)
    .bind(&pin_code)
    .bind(request.hourly_rate_cents)
    .fetch_one(&mut *tx)
    .await?;

    let mut spots = Vec::with_capacity(labels.len());
    for label in &labels {
        spots.push(spot_service::insert_spot(&mut *tx, lot.id, label, lot.hourly_rate_cents).await?);
    }

    tx.commit().await?;

    tracing::info!(lot_id = %lot.id, name = %lot.name, spots = spots.len(), "Lot created");

    Ok((lot, spots))
}

/// Fail with `LotInUse` if any spot of the lot has an active booking.
async fn ensure_no_active_bookings(conn: &mut PgConnection, lot_id: Uuid) -> Result<(), AppError> {
    let active: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM bookings b
        JOIN spots s ON s.id = b.spot_id
        WHERE s.lot_id = $1 AND b.status = 'active'
        "#,
    )
    .bind(lot_id)
    .fetch_one(conn)
    .await?;

    if active > 0 {
        return Err(AppError::LotInUse(active));
    }
    Ok(())
}

/// Apply a partial update to a lot.
///
/// A new rate is copied onto every spot of the lot. Existing bookings keep their frozen rate.
///
/// # Errors
///
/// - `LotNotFound`: lot doesn't exist
/// - `LotInUse`: `status` is "disabled" while bookings are still active
/// - `InvalidRequest`: empty fields or a non-positive rate
pub async fn update_lot(
    pool: &DbPool,
    lot_id: Uuid,
    request: UpdateLotRequest,
) -> Result<Lot, AppError> {
    let name = request.name.as_deref().map(lot::normalize_name).transpose()?;
    let address = request
        .address
        .as_deref()
        .map(lot::normalize_address)
        .transpose()?;
    let pin_code = request
        .pin_code
        .as_deref()
        .map(lot::normalize_pin_code)
        .transpose()?;
    if let Some(rate) = request.hourly_rate_cents {
        spot::validate_rate(rate)?;
    }

    let mut tx = pool.begin().await?;

    // Waits for in-flight reservations, which hold the lot row FOR SHARE
    let exists: Option<Uuid> = sqlx::query_scalar("SELECT id FROM lots WHERE id = $1 FOR UPDATE")
        .bind(lot_id)
        .fetch_optional(&mut *tx)
        .await?;
    if exists.is_none() {
        tx.rollback().await?;
        return Err(AppError::LotNotFound);
    }

    if request.status == Some(LotStatus::Disabled) {
        if let Err(e) = ensure_no_active_bookings(&mut *tx, lot_id).await {
            tx.rollback().await?;
            return Err(e);
        }
    }

    let lot = sqlx::query_as::<_, Lot>(&format!(
        r#"
        UPDATE lots
        SET name = COALESCE($2, name),
            address = COALESCE($3, address),
            pin_code = COALESCE($4, pin_code),
            hourly_rate_cents = COALESCE($5, hourly_rate_cents),
            status = COALESCE($6, status),
            updated_at = NOW()
        WHERE id = $1
        RETURNING {LOT_COLUMNS}
        "#
    ))
    .bind(lot_id)
    .bind(name)
    .bind(address)
    .bind(pin_code)
    .bind(request.hourly_rate_cents)
    .bind(request.status.map(|s| s.as_str()))
    .fetch_one(&mut *tx)
    .await?;

    if let Some(rate) = request.hourly_rate_cents {
        sqlx::query("UPDATE spots SET hourly_rate_cents = $2, updated_at = NOW() WHERE lot_id = $1")
            .bind(lot_id)
            .bind(rate)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    tracing::info!(lot_id = %lot.id, status = %lot.status, "Lot updated");

    Ok(lot)
}

/// Take a lot out of service. Refused with `LotInUse` while bookings are active.
pub async fn disable_lot(pool: &DbPool, lot_id: Uuid) -> Result<Lot, AppError> {
    update_lot(
        pool,
        lot_id,
        UpdateLotRequest {
            status: Some(LotStatus::Disabled),
            ..Default::default()
        },
    )
    .await
}
