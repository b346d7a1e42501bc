//! Booking service - the slot allocator.
//!
//! This service handles:
//! - Window validation and amount computation at reservation time
//! - Overlap checks against active bookings
//! - Picking the first free spot when a whole lot is booked
//! - Release (checkout) and cancellation
//!
//! # Atomicity Guarantees
//!
//! Every operation runs inside one PostgreSQL transaction. A reservation locks the spot
//! row with `FOR UPDATE` (and its lot row `FOR SHARE`) before checking for overlaps, so
//! concurrent reservations for the same spot are serialized and a lot cannot be disabled
//! underneath them. The `bookings_no_active_overlap` exclusion constraint backs this up at
//! the storage level; a violation is reported as `SlotUnavailable`.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use uuid::Uuid;

use crate::{
    config::Config,
    db::{self, DbPool},
    error::AppError,
    middleware::auth::AuthContext,
    models::booking::{Booking, BookingStatus, BookingWindow},
    services::billing,
};

const BOOKING_COLUMNS: &str = "id, user_id, spot_id, start_time, end_time, rate_cents, amount_cents, status, created_at, released_at";

/// Outcome of locking a spot for a window.
enum SpotCheck {
    /// Bookable at this rate (cents per hour)
    Free(i64),
    /// Disabled, in a disabled lot, or overlapping an active booking
    Taken,
}

/// Lock `spot_id` and decide whether `window` can be booked on it.
///
/// Returns `None` if the spot doesn't exist. The locks are held until the transaction ends.
async fn lock_spot(
    conn: &mut PgConnection,
    spot_id: Uuid,
    window: &BookingWindow,
) -> Result<Option<SpotCheck>, AppError> {
    let Some((rate_cents, spot_status, lot_status)): Option<(i64, String, String)> =
        sqlx::query_as(
            r#"
            SELECT s.hourly_rate_cents, s.status, l.status
            FROM spots s
            JOIN lots l ON l.id = s.lot_id
            WHERE s.id = $1
            FOR UPDATE OF s
            FOR SHARE OF l
            "#,
        )
        .bind(spot_id)
        .fetch_optional(&mut *conn)
        .await?
    else {
        return Ok(None);
    };

    if spot_status == "disabled" || lot_status == "disabled" {
        return Ok(Some(SpotCheck::Taken));
    }

    let overlapping: Option<Uuid> = sqlx::query_scalar(
        r#"
        SELECT id FROM bookings
        WHERE spot_id = $1
          AND status = 'active'
          AND start_time < $3
          AND $2 < end_time
        LIMIT 1
        "#,
    )
    .bind(spot_id)
    .bind(window.start())
    .bind(window.end())
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(existing) = overlapping {
        tracing::info!(%spot_id, conflicting_booking = %existing, "Window taken");
        return Ok(Some(SpotCheck::Taken));
    }

    Ok(Some(SpotCheck::Free(rate_cents)))
}

/// Insert an active booking with its rate and amount frozen.
async fn insert_booking(
    conn: &mut PgConnection,
    config: &Config,
    user_id: Uuid,
    spot_id: Uuid,
    window: &BookingWindow,
    rate_cents: i64,
) -> Result<Booking, AppError> {
    let amount_cents = billing::compute_amount(window, config.billing_unit(), rate_cents)?;

    let booking = sqlx::query_as::<_, Booking>(&format!(
        r#"
        INSERT INTO bookings (user_id, spot_id, start_time, end_time, rate_cents, amount_cents, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'active')
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(spot_id)
    .bind(window.start())
    .bind(window.end())
    .bind(rate_cents)
    .bind(amount_cents)
    .fetch_one(conn)
    .await
    .map_err(|e| {
        if db::is_exclusion_violation(&e) {
            AppError::SlotUnavailable
        } else {
            AppError::Database(e)
        }
    })?;

    tracing::info!(
        booking_id = %booking.id,
        %spot_id,
        %user_id,
        amount_cents,
        "Booking reserved"
    );

    Ok(booking)
}

/// Reserve `spot_id` for `[start, end)` on behalf of `user_id`.
///
/// # Process
///
/// 1. Validate the window against `now`
/// 2. Start database transaction
/// 3. Lock the spot row and read its current rate
/// 4. Reject if the spot or its lot is disabled, or an active booking overlaps the window
/// 5. Insert the booking with the rate and amount frozen
/// 6. Commit (or rollback on error)
///
/// # Errors
///
/// - `InvalidWindow`: `start >= end`, start not in the future, or window too long
/// - `SlotNotFound`: spot doesn't exist
/// - `SlotUnavailable`: spot disabled or window already taken
/// - `Database`: Database error occurred
pub async fn reserve(
    pool: &DbPool,
    config: &Config,
    user_id: Uuid,
    spot_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Booking, AppError> {
    let window = BookingWindow::new(start, end, now, config.max_booking_duration())?;

    let mut tx = pool.begin().await?;

    match lock_spot(&mut *tx, spot_id, &window).await? {
        None => {
            tx.rollback().await?;
            Err(AppError::SlotNotFound)
        }
        Some(SpotCheck::Taken) => {
            tx.rollback().await?;
            Err(AppError::SlotUnavailable)
        }
        Some(SpotCheck::Free(rate_cents)) => {
            let booking =
                insert_booking(&mut *tx, config, user_id, spot_id, &window, rate_cents).await?;
            tx.commit().await?;
            Ok(booking)
        }
    }
}

/// Reserve the first free spot (by label) in `lot_id` for `[start, end)`.
///
/// Candidates are locked one at a time in label order, so concurrent callers never
/// deadlock and each ends up on a different spot.
///
/// # Errors
///
/// - `InvalidWindow`: as for `reserve`
/// - `LotNotFound`: lot doesn't exist
/// - `SlotUnavailable`: lot disabled or no spot in it is free for the window
pub async fn reserve_in_lot(
    pool: &DbPool,
    config: &Config,
    user_id: Uuid,
    lot_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Booking, AppError> {
    let window = BookingWindow::new(start, end, now, config.max_booking_duration())?;

    let mut tx = pool.begin().await?;

    let lot_status: String = sqlx::query_scalar("SELECT status FROM lots WHERE id = $1 FOR SHARE")
        .bind(lot_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::LotNotFound)?;

    if lot_status == "disabled" {
        tx.rollback().await?;
        return Err(AppError::SlotUnavailable);
    }

    let candidates: Vec<Uuid> = sqlx::query_scalar(
        r#"
        SELECT s.id FROM spots s
        WHERE s.lot_id = $1
          AND s.status = 'available'
          AND NOT EXISTS(
                SELECT 1 FROM bookings b
                WHERE b.spot_id = s.id
                  AND b.status = 'active'
                  AND b.start_time < $3
                  AND $2 < b.end_time
          )
        ORDER BY s.label
        "#,
    )
    .bind(lot_id)
    .bind(window.start())
    .bind(window.end())
    .fetch_all(&mut *tx)
    .await?;

    // Each check after locking sees bookings committed since the candidate query
    for spot_id in candidates {
        if let Some(SpotCheck::Free(rate_cents)) = lock_spot(&mut *tx, spot_id, &window).await? {
            let booking =
                insert_booking(&mut *tx, config, user_id, spot_id, &window, rate_cents).await?;
            tx.commit().await?;
            return Ok(booking);
        }
    }

    tx.rollback().await?;
    tracing::info!(%lot_id, "Lot booking rejected, no free spot");
    Err(AppError::SlotUnavailable)
}

/// Fetch a booking visible to `auth`: their own, or any booking for an admin.
pub async fn get_booking(
    pool: &DbPool,
    auth: &AuthContext,
    booking_id: Uuid,
) -> Result<Booking, AppError> {
    let booking = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
    ))
    .bind(booking_id)
    .fetch_optional(pool)
    .await?
    .filter(|b| auth.is_admin() || b.user_id == auth.user_id)
    .ok_or(AppError::BookingNotFound)?;

    Ok(booking)
}

/// Which terminal state a finished booking moves into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Finish {
    Release,
    Cancel,
}

/// Check that a booking in `current` state may be finished with `action`.
fn check_transition(current: BookingStatus, action: Finish) -> Result<BookingStatus, AppError> {
    match (current, action) {
        (BookingStatus::Active, Finish::Release) => Ok(BookingStatus::Completed),
        (BookingStatus::Active, Finish::Cancel) => Ok(BookingStatus::Cancelled),
        (BookingStatus::Completed, _) => Err(AppError::AlreadyCompleted),
        (BookingStatus::Cancelled, _) => Err(AppError::InvalidRequest(
            "Booking was cancelled".to_string(),
        )),
    }
}

async fn finish(
    pool: &DbPool,
    auth: &AuthContext,
    booking_id: Uuid,
    action: Finish,
) -> Result<Booking, AppError> {
    let mut tx = pool.begin().await?;

    // Lock the booking so a concurrent release/cancel sees the updated status
    let current = sqlx::query_as::<_, Booking>(&format!(
        "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
    ))
    .bind(booking_id)
    .fetch_optional(&mut *tx)
    .await?
    // Other users' bookings are reported as missing
    .filter(|b| auth.is_admin() || b.user_id == auth.user_id)
    .ok_or(AppError::BookingNotFound)?;

    let next = match check_transition(current.booking_status()?, action) {
        Ok(next) => next,
        Err(e) => {
            tx.rollback().await?;
            return Err(e);
        }
    };

    let booking = sqlx::query_as::<_, Booking>(&format!(
        r#"
        UPDATE bookings
        SET status = $2, released_at = NOW()
        WHERE id = $1
        RETURNING {BOOKING_COLUMNS}
        "#
    ))
    .bind(booking_id)
    .bind(next.as_str())
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(booking_id = %booking.id, status = %next, "Booking finished");

    Ok(booking)
}

/// Check out an active booking, marking it `completed`.
///
/// The amount stays as computed at reservation time.
///
/// # Errors
///
/// - `BookingNotFound`: booking doesn't exist or belongs to another user
/// - `AlreadyCompleted`: booking was already released
/// - `InvalidRequest`: booking was cancelled
pub async fn release(
    pool: &DbPool,
    auth: &AuthContext,
    booking_id: Uuid,
) -> Result<Booking, AppError> {
    finish(pool, auth, booking_id, Finish::Release).await
}

/// Cancel an active booking, freeing its window. Cancelled bookings never count as revenue.
///
/// # Errors
///
/// - `BookingNotFound`: booking doesn't exist or belongs to another user
/// - `AlreadyCompleted`: booking was already released
/// - `InvalidRequest`: booking was already cancelled
pub async fn cancel(
    pool: &DbPool,
    auth: &AuthContext,
    booking_id: Uuid,
) -> Result<Booking, AppError> {
    finish(pool, auth, booking_id, Finish::Cancel).await
}
