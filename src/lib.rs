//! Payment reconciliation and escrow-funding service.
//!
//! Consumes asynchronous, possibly duplicated payment-status notifications
//! from two payment rails (online-gateway and reference/ATM), maps provider
//! status vocabulary onto an internal payment state machine, atomically
//! updates payment and booking records, and drives escrow funding and user
//! notifications once per state transition. A small admin API acknowledges
//! consumed reference-rail notifications back to the provider.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Collaborators**: escrow service, push gateway, and provider API
//!   behind trait objects so the controller is testable with fakes
//! - **Format**: JSON requests/responses

pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::clients::escrow::EscrowClient;
use crate::clients::provider::ProviderClient;
use crate::clients::push::PushClient;
use crate::store::PaymentStore;

/// Shared application state handed to every handler.
///
/// Each webhook delivery is handled as an independent, stateless
/// request-response invocation; this struct holds only the injected
/// collaborators, never per-delivery state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PaymentStore>,
    pub escrow: Arc<dyn EscrowClient>,
    pub push: Arc<dyn PushClient>,
    pub provider: Arc<dyn ProviderClient>,

    /// Shared secret for inbound webhook verification.
    ///
    /// `None` accepts every caller, an explicit operational choice for
    /// optional verification; real deployments must configure it.
    pub webhook_secret: Option<String>,
}

/// Build the HTTP router.
///
/// # Routes
///
/// - `POST /webhooks/payments`: provider webhook ingestion (shared-secret
///   check inside the handler; any other method on the path yields 405
///   before business logic runs)
/// - `POST /api/v1/reference-payments/{reference_id}/acknowledge`: admin
///   RPC, API-key authenticated
/// - `GET /health`: public probe
pub fn router(state: AppState) -> Router {
    // Admin routes sit behind the API key middleware
    let admin_routes = Router::new()
        .route(
            "/api/v1/reference-payments/{reference_id}/acknowledge",
            post(handlers::admin::acknowledge_reference_payment),
        )
        // Apply authentication middleware to all routes in this group
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        // Public routes (no API key required)
        .route("/health", get(handlers::health::health_check))
        .route(
            "/webhooks/payments",
            post(handlers::webhooks::receive_webhook),
        )
        // Merge authenticated routes
        .merge(admin_routes)
        // Add distributed tracing middleware for observability
        .layer(TraceLayer::new_for_http())
        // Share state with all handlers via State extraction
        .with_state(state)
}
