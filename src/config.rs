//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to automatically deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `WEBHOOK_SECRET` (optional): shared secret for inbound webhook
///   verification; when unset, every webhook caller is accepted (must be
///   set in any real deployment)
/// - `ESCROW_SERVICE_URL` (required): base URL of the escrow-funding service
/// - `PUSH_GATEWAY_URL` (required): base URL of the push-message gateway
/// - `PUSH_SERVER_KEY` (optional): server key sent to the push gateway
/// - `PROVIDER_API_URL` (required): base URL of the payment provider's API
///   (used by the reference-payment acknowledgement client)
/// - `PROVIDER_API_KEY` (required): API key for basic auth against the
///   provider's API
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,

    pub webhook_secret: Option<String>,

    pub escrow_service_url: String,
    pub push_gateway_url: String,
    pub push_server_key: Option<String>,
    pub provider_api_url: String,
    pub provider_api_key: String,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// This method first attempts to load a `.env` file (which is optional),
    /// then reads environment variables and deserializes them into a Config struct.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing (e.g., DATABASE_URL)
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        // Parse environment variables into Config struct
        // Field names are automatically converted: database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }
}
