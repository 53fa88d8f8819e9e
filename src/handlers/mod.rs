//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs business logic (service calls, validation)
//! 3. Returns HTTP response (JSON, status code)

/// Admin operations (reference-payment acknowledgement)
pub mod admin;
/// Service health probe
pub mod health;
/// Inbound provider webhook ingestion
pub mod webhooks;
