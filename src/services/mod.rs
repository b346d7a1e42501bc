//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and aggregation.

pub mod billing;
pub mod booking_service;
pub mod ledger_service;
pub mod lot_service;
pub mod spot_service;
pub mod user_service;

#[cfg(test)]
mod db_tests;
