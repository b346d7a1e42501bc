//! Parking Booking Service - Main Application Entry Point
//!
//! A REST API for renting parking spots by the hour. Users register, log in, browse lots
//! and spots, and reserve time windows on a spot or on any free spot of a lot; admins
//! manage lots and spots and review revenue and history.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: Bearer session tokens, stored as SHA-256 hashes
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Create the bootstrap admin if configured
//! 5. Build HTTP router with routes and middleware
//! 6. Start server on configured port, until Ctrl+C or SIGTERM

mod config;
mod db;
mod error;
mod extract;
mod handlers;
mod middleware;
mod models;
mod services;
mod state;

use tracing_subscriber::EnvFilter;

use anyhow::Context;
use axum::{
    Router, middleware as axum_middleware,
    routing::{get, patch, post},
};
use tokio::signal;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        billing_unit_minutes = config.billing_unit_minutes,
        revenue_includes_active = config.revenue_includes_active,
        "Configuration loaded"
    );

    let pool = db::create_pool(&config.database_url, config.database_max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations complete");

    services::user_service::ensure_admin(&pool, &config)
        .await
        .context("Failed to create bootstrap admin")?;

    let addr = format!("0.0.0.0:{}", config.server_port);
    let app = router(AppState::new(pool, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

/// Build the HTTP router.
///
/// Three tiers of routes:
/// - public (health, register, login)
/// - authenticated (any logged-in user)
/// - admin (authenticated, then checked for the admin role)
fn router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/api/v1/admin/lots", post(handlers::admin::create_lot))
        .route(
            "/api/v1/admin/lots/{id}",
            patch(handlers::admin::update_lot).delete(handlers::admin::disable_lot),
        )
        .route(
            "/api/v1/admin/lots/{id}/spots",
            post(handlers::admin::create_spot),
        )
        .route(
            "/api/v1/admin/spots/{id}",
            patch(handlers::admin::update_spot),
        )
        .route("/api/v1/admin/revenue", get(handlers::admin::revenue))
        .route("/api/v1/admin/bookings", get(handlers::admin::list_bookings))
        .route("/api/v1/admin/users", get(handlers::admin::list_users))
        .route("/api/v1/admin/summary", get(handlers::admin::summary))
        .route_layer(axum_middleware::from_fn(middleware::auth::require_admin));

    let authenticated_routes = Router::new()
        .route("/api/v1/logout", post(handlers::users::logout))
        .route("/api/v1/lots", get(handlers::lots::list_lots))
        .route("/api/v1/lots/{id}", get(handlers::lots::get_lot))
        .route(
            "/api/v1/lots/{id}/bookings",
            post(handlers::bookings::create_lot_booking),
        )
        .route("/api/v1/spots", get(handlers::spots::list_spots))
        .route("/api/v1/bookings", post(handlers::bookings::create_booking))
        .route("/api/v1/bookings/me", get(handlers::bookings::my_bookings))
        .route(
            "/api/v1/bookings/{id}",
            get(handlers::bookings::get_booking),
        )
        .route(
            "/api/v1/bookings/{id}/release",
            post(handlers::bookings::release_booking),
        )
        .route(
            "/api/v1/bookings/{id}/cancel",
            post(handlers::bookings::cancel_booking),
        )
        .merge(admin_routes)
        // Runs before require_admin, which needs the AuthContext it inserts
        .route_layer(axum_middleware::from_fn_with_state(
            state.pool.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/api/v1/register", post(handlers::users::register))
        .route("/api/v1/login", post(handlers::users::login))
        .merge(authenticated_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
