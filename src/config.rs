//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use chrono::Duration;
use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `DATABASE_MAX_CONNECTIONS` (optional): pool size, defaults to 5
/// - `BILLING_UNIT_MINUTES` (optional): smallest chargeable increment, defaults to 60
/// - `MAX_BOOKING_HOURS` (optional): longest window a single booking may span, defaults to 168
/// - `REVENUE_INCLUDES_ACTIVE` (optional): count active bookings as revenue, defaults to false
/// - `SESSION_TTL_HOURS` (optional): lifetime of a login token, defaults to 24
/// - `ADMIN_USERNAME` / `ADMIN_PASSWORD` (optional): bootstrap admin created at startup
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_billing_unit_minutes")]
    pub billing_unit_minutes: u32,

    #[serde(default = "default_max_booking_hours")]
    pub max_booking_hours: u32,

    #[serde(default)]
    pub revenue_includes_active: bool,

    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u32,

    pub admin_username: Option<String>,

    pub admin_password: Option<String>,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

fn default_billing_unit_minutes() -> u32 {
    60
}

fn default_max_booking_hours() -> u32 {
    24 * 7
}

fn default_session_ttl_hours() -> u32 {
    24
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    /// - The billing unit is zero
    pub fn from_env() -> anyhow::Result<Self> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Field names are automatically converted: database_url -> DATABASE_URL
        let config = envy::from_env::<Config>()?;

        if config.billing_unit_minutes == 0 {
            anyhow::bail!("BILLING_UNIT_MINUTES must be greater than zero");
        }

        Ok(config)
    }

    /// Billing unit as a duration.
    pub fn billing_unit(&self) -> Duration {
        Duration::minutes(i64::from(self.billing_unit_minutes))
    }

    /// Longest window a single booking may cover.
    pub fn max_booking_duration(&self) -> Duration {
        Duration::hours(i64::from(self.max_booking_hours))
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::hours(i64::from(self.session_ttl_hours))
    }

    /// Booking statuses counted by the revenue report.
    pub fn revenue_statuses(&self) -> Vec<String> {
        let mut statuses = vec!["completed".to_string()];
        if self.revenue_includes_active {
            statuses.push("active".to_string());
        }
        statuses
    }
}

#[cfg(test)]
impl Config {
    /// Default settings with no real database.
    pub fn for_tests() -> Self {
        Self {
            database_url: String::new(),
            server_port: 0,
            database_max_connections: default_max_connections(),
            billing_unit_minutes: default_billing_unit_minutes(),
            max_booking_hours: default_max_booking_hours(),
            revenue_includes_active: false,
            session_ttl_hours: default_session_ttl_hours(),
            admin_username: None,
            admin_password: None,
        }
    }
}
