//! Shared application state injected into handlers.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::{config::Config, db::DbPool};

/// State shared by every handler.
///
/// Handlers that only need the database keep extracting `State<DbPool>`;
/// `FromRef` lets them do so from this combined state.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(pool: DbPool, config: Config) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
