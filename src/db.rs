//! Database connection pool and migration management.
//!
//! This module provides utilities for:
//! - Creating and managing a PostgreSQL connection pool
//! - Running database migrations automatically
//! - Recognizing the constraint violations the services translate into domain errors

use sqlx::{Pool, Postgres};

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// SQLSTATE raised when a row violates a UNIQUE constraint.
const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE raised when a row violates an EXCLUDE constraint.
const EXCLUSION_VIOLATION: &str = "23P01";

/// Create a new PostgreSQL connection pool.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns an error if:
/// - Database connection string is invalid
/// - Cannot connect to PostgreSQL server
/// - Database authentication fails
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Migrations are tracked in the `_sqlx_migrations` table, so each migration runs only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro reads migrations at compile time from ./migrations directory
    sqlx::migrate!("./migrations").run(pool).await
}

/// Whether the error is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, UNIQUE_VIOLATION)
}

/// Whether the error is an EXCLUDE constraint violation.
///
/// Raised by `bookings_no_active_overlap` when two active bookings for a spot would overlap.
pub fn is_exclusion_violation(err: &sqlx::Error) -> bool {
    has_sqlstate(err, EXCLUSION_VIOLATION)
}

fn has_sqlstate(err: &sqlx::Error, sqlstate: &str) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .is_some_and(|code| code == sqlstate)
}
