//! Ledger service - read-only aggregation over bookings.
//!
//! Nothing here writes to the database. Which booking statuses count as revenue is
//! decided by `Config::revenue_statuses`; cancelled bookings are never counted.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    config::Config,
    db::DbPool,
    error::AppError,
    models::{
        booking::{Booking, BookingListQuery},
        ledger::{LotRevenue, RevenueReport, SpotRevenue, Summary},
    },
};

/// Sum of amounts over bookings in any of `statuses`.
pub async fn total_revenue(pool: &DbPool, statuses: &[String]) -> Result<i64, AppError> {
    let total: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM bookings WHERE status = ANY($1)",
    )
    .bind(statuses)
    .fetch_one(pool)
    .await?;

    Ok(total)
}

/// Total revenue plus per-lot and per-spot breakdowns, highest earning first.
pub async fn revenue_report(pool: &DbPool, config: &Config) -> Result<RevenueReport, AppError> {
    let statuses = config.revenue_statuses();

    let total_revenue_cents = total_revenue(pool, &statuses).await?;

    let by_lot = sqlx::query_as::<_, LotRevenue>(
        r#"
        SELECT l.id AS lot_id,
               l.name,
               COUNT(b.id) AS booking_count,
               COALESCE(SUM(b.amount_cents), 0)::BIGINT AS revenue_cents
        FROM lots l
        JOIN spots s ON s.lot_id = l.id
        JOIN bookings b ON b.spot_id = s.id
        WHERE b.status = ANY($1)
        GROUP BY l.id, l.name
        ORDER BY revenue_cents DESC, l.name
        "#,
    )
    .bind(&statuses)
    .fetch_all(pool)
    .await?;

    let by_spot = sqlx::query_as::<_, SpotRevenue>(
        r#"
        SELECT s.id AS spot_id,
               s.lot_id,
               s.label,
               COUNT(b.id) AS booking_count,
               COALESCE(SUM(b.amount_cents), 0)::BIGINT AS revenue_cents
        FROM spots s
        JOIN bookings b ON b.spot_id = s.id
        WHERE b.status = ANY($1)
        GROUP BY s.id, s.lot_id, s.label
        ORDER BY revenue_cents DESC, s.label
        "#,
    )
    .bind(&statuses)
    .fetch_all(pool)
    .await?;

    Ok(RevenueReport {
        total_revenue_cents,
        counted_statuses: statuses,
        by_lot,
        by_spot,
    })
}

/// A user's bookings, newest first.
pub async fn history(pool: &DbPool, user_id: Uuid) -> Result<Vec<Booking>, AppError> {
    let bookings = sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, user_id, spot_id, start_time, end_time, rate_cents, amount_cents, status, created_at, released_at
        FROM bookings
        WHERE user_id = $1
        ORDER BY start_time DESC, created_at DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Bookings across all users, newest first, optionally filtered by status.
pub async fn all_bookings(
    pool: &DbPool,
    query: &BookingListQuery,
) -> Result<Vec<Booking>, AppError> {
    let bookings = sqlx::query_as::<_, Booking>(
        r#"
        SELECT id, user_id, spot_id, start_time, end_time, rate_cents, amount_cents, status, created_at, released_at
        FROM bookings
        WHERE ($1::TEXT IS NULL OR status = $1)
        ORDER BY start_time DESC, created_at DESC
        LIMIT $2
        "#,
    )
    .bind(query.status.map(|s| s.as_str()))
    .bind(query.effective_limit())
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Dashboard counters as of `now`.
pub async fn summary(pool: &DbPool, now: DateTime<Utc>) -> Result<Summary, AppError> {
    let summary = sqlx::query_as::<_, Summary>(
        r#"
        WITH occupancy AS (
            SELECT CASE WHEN l.status = 'disabled' THEN 'disabled' ELSE s.status END AS status,
                   EXISTS(
                       SELECT 1 FROM bookings b
                       WHERE b.spot_id = s.id
                         AND b.status = 'active'
                         AND b.start_time <= $1
                         AND $1 < b.end_time
                   ) AS occupied
            FROM spots s
            JOIN lots l ON l.id = s.lot_id
        )
        SELECT
            (SELECT COUNT(*) FROM lots) AS total_lots,
            (SELECT COUNT(*) FROM occupancy) AS total_spots,
            (SELECT COUNT(*) FROM occupancy WHERE status = 'disabled') AS disabled_spots,
            (SELECT COUNT(*) FROM occupancy WHERE status <> 'disabled' AND occupied) AS occupied_spots,
            (SELECT COUNT(*) FROM occupancy WHERE status <> 'disabled' AND NOT occupied) AS available_spots,
            (SELECT COUNT(*) FROM users WHERE role = 'user') AS registered_users,
            (SELECT COUNT(*) FROM bookings WHERE status = 'active') AS active_bookings
        "#,
    )
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(summary)
}
