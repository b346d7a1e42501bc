//! Spot data models and API request/response types.
//!
//! A spot's stored status only records whether an admin has taken it out of service.
//! Whether it is occupied is derived from active bookings covering the current instant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Represents a spot record from the database.
///
/// # Database Table
///
/// Maps to the `spots` table. `status` is either "available" or "disabled";
/// listing queries report "disabled" for every spot of a disabled lot.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Spot {
    pub id: Uuid,

    pub lot_id: Uuid,

    /// Human-readable identifier, unique within its lot (e.g. "MAL-001")
    pub label: String,

    /// Price per hour in cents
    pub hourly_rate_cents: i64,

    pub status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A spot together with whether an active booking covers the current instant.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SpotOccupancy {
    #[sqlx(flatten)]
    pub spot: Spot,

    pub occupied: bool,
}

/// Status reported to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpotStatus {
    Available,
    Occupied,
    Disabled,
}

impl SpotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpotStatus::Available => "available",
            SpotStatus::Occupied => "occupied",
            SpotStatus::Disabled => "disabled",
        }
    }

    /// Combine the stored admin status with derived occupancy.
    ///
    /// A disabled spot reports `Disabled` even if a booking made before it was disabled covers now.
    pub fn effective(stored: &str, occupied: bool) -> Self {
        match (stored, occupied) {
            ("disabled", _) => SpotStatus::Disabled,
            (_, true) => SpotStatus::Occupied,
            _ => SpotStatus::Available,
        }
    }
}

/// Request body for adding a spot to a lot.
///
/// ```json
/// { "label": "MAL-004", "hourly_rate_cents": 250 }
/// ```
///
/// Without `hourly_rate_cents` the spot takes the lot's rate.
#[derive(Debug, Deserialize)]
pub struct CreateSpotRequest {
    pub label: String,
    pub hourly_rate_cents: Option<i64>,
}

/// Partial update of a spot. Omitted fields are left unchanged.
///
/// `status` accepts only "available" or "disabled"; occupancy is never set directly.
/// A new rate applies to future bookings only.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSpotRequest {
    pub label: Option<String>,
    pub hourly_rate_cents: Option<i64>,
    pub status: Option<SpotStatus>,
}

/// Query parameters for listing spots.
///
/// When both `start` and `end` are given, only spots bookable for that window are returned.
/// `lot_id` restricts the listing to one lot.
#[derive(Debug, Default, Deserialize)]
pub struct SpotListQuery {
    pub lot_id: Option<Uuid>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Response body for spot endpoints.
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "lot_id": "440e8400-e29b-41d4-a716-446655440000",
///   "label": "MAL-001",
///   "hourly_rate_cents": 200,
///   "status": "occupied",
///   "created_at": "2026-10-01T10:00:00Z",
///   "updated_at": "2026-10-01T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct SpotResponse {
    pub id: Uuid,
    pub lot_id: Uuid,
    pub label: String,
    pub hourly_rate_cents: i64,
    pub status: SpotStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SpotResponse {
    fn with_status(spot: Spot, status: SpotStatus) -> Self {
        Self {
            id: spot.id,
            lot_id: spot.lot_id,
            label: spot.label,
            hourly_rate_cents: spot.hourly_rate_cents,
            status,
            created_at: spot.created_at,
            updated_at: spot.updated_at,
        }
    }
}

impl From<SpotOccupancy> for SpotResponse {
    fn from(row: SpotOccupancy) -> Self {
        let status = SpotStatus::effective(&row.spot.status, row.occupied);
        Self::with_status(row.spot, status)
    }
}

/// Used for admin writes, where occupancy is not queried.
impl From<Spot> for SpotResponse {
    fn from(spot: Spot) -> Self {
        let status = SpotStatus::effective(&spot.status, false);
        Self::with_status(spot, status)
    }
}

/// Validate a spot label and return it trimmed.
pub fn normalize_label(label: &str) -> Result<String, AppError> {
    let label = label.trim();
    if label.is_empty() {
        return Err(AppError::InvalidRequest("Label is required".to_string()));
    }
    if label.chars().count() > 50 {
        return Err(AppError::InvalidRequest(
            "Label may not exceed 50 characters".to_string(),
        ));
    }
    Ok(label.to_string())
}

/// Validate an hourly rate in cents.
pub fn validate_rate(hourly_rate_cents: i64) -> Result<(), AppError> {
    if hourly_rate_cents <= 0 {
        return Err(AppError::InvalidRequest(
            "Hourly rate must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Labels for a numbered batch: `PRE-001`, `PRE-002`, ...
pub fn batch_labels(prefix: &str, count: u32) -> Vec<String> {
    let prefix = prefix.trim().to_uppercase();
    (1..=count).map(|n| format!("{}-{:03}", prefix, n)).collect()
}
