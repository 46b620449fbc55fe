//! Course-Access Server - Main Application Entry Point
//!
//! This is the backend for an online course-sales site: visitors log in
//! with one-time email codes, purchase access to lesson blocks, and fetch
//! gated lesson listings. Every content request passes the purchase-gated
//! authorization check.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: email OTP -> bearer session cookie, SHA-256 hashed
//! - **Payments**: signed gateway form + HMAC-verified callback webhook
//! - **Format**: JSON requests/responses
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Load the read-only course catalog
//! 3. Create database connection pool
//! 4. Run database migrations
//! 5. Build HTTP router with routes and middleware
//! 6. Start server on configured port

mod catalog;
mod config;
mod db;
mod entitlements;
mod error;
mod handlers;
mod mailer;
mod middleware;
mod models;
mod services;
mod state;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    // Load the read-only catalog; the server refuses to start without it
    let catalog = catalog::Catalog::load(&config.catalog_path)?;
    tracing::info!("Catalog loaded ({} courses)", catalog.courses.len());

    // Create database pool
    let pool = db::create_pool(&config.database_url, config.db_acquire_timeout_secs).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let mailer = mailer::Mailer::new(config.mail_relay_url.clone(), config.mail_from.clone());
    if config.mail_relay_url.is_none() {
        tracing::warn!("MAIL_RELAY_URL unset; login codes will appear in the server log");
    }
    if config.merchant().is_none() {
        tracing::warn!("merchant credentials unset; payment endpoints disabled");
    }

    let server_port = config.server_port;
    let state = AppState {
        pool,
        config: Arc::new(config),
        catalog: Arc::new(catalog),
        mailer,
    };

    // Purchase routes require a logged-in session
    let purchase_routes = Router::new()
        .route(
            "/api/payment/create",
            post(handlers::payments::create_purchase),
        )
        .route(
            "/api/pay/create-invoice",
            post(handlers::payments::create_invoice),
        )
        // Apply session authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::session_middleware,
        ));

    // Combine with the public routes; the auth and content handlers resolve
    // the cookie themselves because anonymous is a normal state for them,
    // and the payment callback authenticates by signature
    let app = Router::new()
        .route("/health", get(handlers::health::health_check))
        // OTP login
        .route("/api/auth/request-code", post(handlers::auth::request_code))
        .route("/api/auth/verify-code", post(handlers::auth::verify_code))
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/me", get(handlers::auth::me))
        // Catalog and gated content
        .route("/api/catalog", get(handlers::content::get_catalog))
        .route("/api/access", get(handlers::content::access_list))
        .route("/api/lessons", get(handlers::content::list_lessons))
        // Provider webhook
        .route(
            "/api/pay/callback",
            post(handlers::payments::payment_callback),
        )
        // Merge session-gated purchase routes
        .merge(purchase_routes)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share application state with all handlers via State extraction
        .with_state(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{server_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
