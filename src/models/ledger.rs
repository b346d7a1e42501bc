//! Read-only aggregates produced by the booking ledger.

use serde::Serialize;
use uuid::Uuid;

/// Revenue earned by a single spot.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SpotRevenue {
    pub spot_id: Uuid,
    pub lot_id: Uuid,
    pub label: String,
    pub booking_count: i64,
    pub revenue_cents: i64,
}

/// Revenue earned by all spots of a lot.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct LotRevenue {
    pub lot_id: Uuid,
    pub name: String,
    pub booking_count: i64,
    pub revenue_cents: i64,
}

/// Response body for `GET /api/v1/admin/revenue`.
///
/// ```json
/// {
///   "total_revenue_cents": 1800,
///   "counted_statuses": ["completed"],
///   "by_lot": [
///     { "lot_id": "...", "name": "Mall Road", "booking_count": 3, "revenue_cents": 1800 }
///   ],
///   "by_spot": [
///     { "spot_id": "...", "lot_id": "...", "label": "MAL-001", "booking_count": 2, "revenue_cents": 1200 },
///     { "spot_id": "...", "lot_id": "...", "label": "MAL-002", "booking_count": 1, "revenue_cents": 600 }
///   ]
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct RevenueReport {
    pub total_revenue_cents: i64,
    pub counted_statuses: Vec<String>,
    pub by_lot: Vec<LotRevenue>,
    pub by_spot: Vec<SpotRevenue>,
}

/// Dashboard counters for `GET /api/v1/admin/summary`.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Summary {
    pub total_lots: i64,
    pub total_spots: i64,
    pub disabled_spots: i64,
    pub occupied_spots: i64,
    pub available_spots: i64,
    pub registered_users: i64,
    pub active_bookings: i64,
}
