//! HTTP middleware components.
//!
//! Middleware are functions that run before route handlers.
//! They can:
//! - Authenticate requests
//! - Enforce roles
//! - Short-circuit requests (reject unauthorized)

/// Session token authentication and admin guard
pub mod auth;
