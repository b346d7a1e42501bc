//! Booking data models and API request/response types.
//!
//! This module defines:
//! - `Booking`: Database entity representing a reservation of a spot
//! - `BookingStatus`: Lifecycle state of a booking
//! - `BookingWindow`: A validated half-open `[start, end)` time range
//! - Request/response bodies for booking endpoints

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Represents a booking record from the database.
///
/// # Database Table
///
/// Maps to the `bookings` table. Each booking:
/// - Belongs to one user and one spot
/// - Freezes the spot's hourly rate at booking time in `rate_cents`
/// - Stores the computed amount in cents
///
/// Rows are never deleted. Only `status` and `released_at` change after insertion.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub spot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,

    /// Spot rate (cents per hour) at the moment the booking was made
    pub rate_cents: i64,

    /// Amount owed in cents
    pub amount_cents: i64,

    /// "active", "completed" or "cancelled"
    pub status: String,

    pub created_at: DateTime<Utc>,

    /// When the booking was released or cancelled
    pub released_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Parsed lifecycle state.
    ///
    /// The column carries a CHECK constraint, so unknown values indicate a corrupted row.
    pub fn booking_status(&self) -> Result<BookingStatus, AppError> {
        self.status.parse()
    }
}

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Holds its window; the only state that blocks other reservations
    Active,
    /// Checked out
    Completed,
    /// Withdrawn before checkout
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(BookingStatus::Active),
            "completed" => Ok(BookingStatus::Completed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(AppError::InvalidRequest(format!(
                "Unknown booking status '{}'",
                other
            ))),
        }
    }
}

/// A validated booking window.
///
/// The window is half-open: it covers `start` up to but not including `end`,
/// so back-to-back bookings (one ending at 12:00, the next starting at 12:00) do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl BookingWindow {
    /// Validate a window requested at time `now`.
    ///
    /// Both ends are truncated to whole microseconds, the precision PostgreSQL stores.
    ///
    /// # Errors
    ///
    /// `InvalidWindow` if `start >= end`, if `start` is not after `now`,
    /// or if the window is longer than `max_duration`.
    pub fn new(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        now: DateTime<Utc>,
        max_duration: Duration,
    ) -> Result<Self, AppError> {
        let start = start.trunc_subsecs(6);
        let end = end.trunc_subsecs(6);

        if start >= end {
            return Err(AppError::InvalidWindow(
                "start must be before end".to_string(),
            ));
        }

        // end > start, so a future start implies a future end
        if start <= now {
            return Err(AppError::InvalidWindow(
                "start must be in the future".to_string(),
            ));
        }

        if end - start > max_duration {
            return Err(AppError::InvalidWindow(format!(
                "window may not exceed {} hours",
                max_duration.num_hours()
            )));
        }

        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Request body for reserving a spot.
///
/// # JSON Example
///
/// ```json
/// {
///   "spot_id": "550e8400-e29b-41d4-a716-446655440000",
///   "start_time": "2026-12-01T10:00:00Z",
///   "end_time": "2026-12-01T12:30:00Z"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub spot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Query parameters for the admin booking history.
#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    /// Only include bookings in this state
    pub status: Option<BookingStatus>,

    /// Maximum number of rows (defaults to 100, capped at 1000)
    pub limit: Option<i64>,
}

impl BookingListQuery {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 1000;

    /// Row limit clamped to `1..=MAX_LIMIT`.
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

/// Response body for booking endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "770e8400-e29b-41d4-a716-446655440002",
///   "spot_id": "550e8400-e29b-41d4-a716-446655440000",
///   "start_time": "2026-12-01T10:00:00Z",
///   "end_time": "2026-12-01T12:30:00Z",
///   "rate_cents": 200,
///   "amount_cents": 600,
///   "status": "active",
///   "created_at": "2026-11-30T08:00:00Z",
///   "released_at": null
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub spot_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub rate_cents: i64,
    pub amount_cents: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub released_at: Option<DateTime<Utc>>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id,
            user_id: booking.user_id,
            spot_id: booking.spot_id,
            start_time: booking.start_time,
            end_time: booking.end_time,
            rate_cents: booking.rate_cents,
            amount_cents: booking.amount_cents,
            status: booking.status,
            created_at: booking.created_at,
            released_at: booking.released_at,
        }
    }
}
