//! Payment Reconciliation Service - Main Application Entry Point
//!
//! HTTP server that ingests payment-provider webhooks from two rails,
//! reconciles them against payment and booking records, funds escrow on
//! completion, and notifies the counterparties.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Build collaborator clients (escrow, push, provider API)
//! 5. Build HTTP router with routes and middleware
//! 6. Start server on configured port

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use payment_reconciler::clients::escrow::HttpEscrowClient;
use payment_reconciler::clients::provider::HttpProviderClient;
use payment_reconciler::clients::push::HttpPushClient;
use payment_reconciler::store::postgres::PgStore;
use payment_reconciler::{AppState, config, db, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging with tracing subscriber. Reads RUST_LOG environment variable (defaults to "info" level)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // Load configuration
    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    if config.webhook_secret.is_none() {
        // Deployment requirement: without a secret every webhook caller is
        // trusted.
        tracing::warn!("WEBHOOK_SECRET is not set, accepting unauthenticated webhooks");
    }

    // Create database pool
    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    // Run migrations
    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    // Build injected collaborators
    let state = AppState {
        store: Arc::new(PgStore::new(pool)),
        escrow: Arc::new(HttpEscrowClient::new(&config.escrow_service_url)?),
        push: Arc::new(HttpPushClient::new(
            &config.push_gateway_url,
            config.push_server_key.clone(),
        )?),
        provider: Arc::new(HttpProviderClient::new(
            &config.provider_api_url,
            config.provider_api_key.clone(),
        )?),
        webhook_secret: config.webhook_secret.clone(),
    };

    let app = router(state);

    // Bind to network address and start server
    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Start serving HTTP requests
    // This blocks forever, handling requests concurrently with tokio
    axum::serve(listener, app).await?;

    Ok(())
}
