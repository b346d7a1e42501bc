//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, auth context)
//! 2. Delegates to a service
//! 3. Returns HTTP response (JSON, status code)

/// Back-office endpoints (admin only)
pub mod admin;
/// Reservation endpoints
pub mod bookings;
pub mod health;
/// Lot browsing
pub mod lots;
/// Spot browsing
pub mod spots;
/// Registration, login, logout
pub mod users;
