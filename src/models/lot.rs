//! Parking lot data models and API request/response types.
//!
//! A lot groups spots at one location. Its rate is copied onto spots created in it,
//! and disabling a lot takes every spot in it out of service without touching the spot rows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{error::AppError, models::spot::SpotResponse};

const MAX_NAME_LEN: usize = 200;
const MAX_PIN_CODE_LEN: usize = 10;

/// Represents a lot record from the database.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Lot {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub pin_code: String,

    /// Default price per hour in cents for spots in this lot
    pub hourly_rate_cents: i64,

    /// "available" or "disabled"
    pub status: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A lot with spot counters as of a given instant.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LotOccupancy {
    #[sqlx(flatten)]
    pub lot: Lot,

    pub total_spots: i64,
    pub occupied_spots: i64,
    pub available_spots: i64,
}

/// Admin-controlled lot state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LotStatus {
    Available,
    Disabled,
}

impl LotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LotStatus::Available => "available",
            LotStatus::Disabled => "disabled",
        }
    }
}

/// Request body for creating a lot together with its spots.
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
/// Spots are labelled `MAL-001`, `MAL-002`, ... unless `label_prefix` is given.
#[derive(Debug, Deserialize)]
pub struct CreateLotRequest {
    pub name: String,
    pub address: String,
    pub pin_code: String,
    pub hourly_rate_cents: i64,
    pub spot_count: u32,
    pub label_prefix: Option<String>,
}

/// Partial update of a lot. Omitted fields are left unchanged.
///
/// A new rate is applied to every spot in the lot, for future bookings only.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLotRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub pin_code: Option<String>,
    pub hourly_rate_cents: Option<i64>,
    pub status: Option<LotStatus>,
}

/// Request body for booking any free spot in a lot.
#[derive(Debug, Deserialize)]
pub struct LotBookingRequest {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Response body for lot listings.
#[derive(Debug, Serialize)]
pub struct LotResponse {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub pin_code: String,
    pub hourly_rate_cents: i64,
    pub status: LotStatus,
    pub total_spots: i64,
    pub occupied_spots: i64,
    pub available_spots: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LotOccupancy> for LotResponse {
    fn from(row: LotOccupancy) -> Self {
        let status = if row.lot.status == "disabled" {
            LotStatus::Disabled
        } else {
            LotStatus::Available
        };
        Self {
            id: row.lot.id,
            name: row.lot.name,
            address: row.lot.address,
            pin_code: row.lot.pin_code,
            hourly_rate_cents: row.lot.hourly_rate_cents,
            status,
            total_spots: row.total_spots,
            occupied_spots: row.occupied_spots,
            available_spots: row.available_spots,
            created_at: row.lot.created_at,
            updated_at: row.lot.updated_at,
        }
    }
}

/// A lot with its spots.
#[derive(Debug, Serialize)]
pub struct LotDetailResponse {
    #[serde(flatten)]
    pub lot: LotResponse,
    pub spots: Vec<SpotResponse>,
}

fn required(field: &str, value: &str, max_len: usize) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::InvalidRequest(format!("{} is required", field)));
    }
    if value.chars().count() > max_len {
        return Err(AppError::InvalidRequest(format!(
            "{} may not exceed {} characters",
            field, max_len
        )));
    }
    Ok(value.to_string())
}

pub fn normalize_name(name: &str) -> Result<String, AppError> {
    required("Name", name, MAX_NAME_LEN)
}

pub fn normalize_address(address: &str) -> Result<String, AppError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(AppError::InvalidRequest("Address is required".to_string()));
    }
    Ok(address.to_string())
}

pub fn normalize_pin_code(pin_code: &str) -> Result<String, AppError> {
    required("Pin code", pin_code, MAX_PIN_CODE_LEN)
}

/// Spot label prefix derived from a lot name: its first three non-space characters.
pub fn default_prefix(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .take(3)
        .collect::<String>()
        .to_uppercase()
}
