//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request and response bodies built from them.

/// Reservation records and booking windows
pub mod booking;
/// Revenue and dashboard aggregates
pub mod ledger;
/// Parking lots grouping spots by location
pub mod lot;
/// Parking spot inventory
pub mod spot;
/// Users, roles and login responses
pub mod user;
