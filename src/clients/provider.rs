//! Payment provider API client.
//!
//! Used by the admin acknowledgement flow to tell the provider a
//! reference-payment notification has been consumed, clearing it from the
//! provider's pending queue. Unlike the webhook path, failures here are
//! surfaced directly to the caller, since this is a synchronous, operator-driven
//! action, not a provider callback.

use async_trait::async_trait;
use url::Url;

use crate::error::AppError;

/// Clears a consumed reference payment from the provider's pending queue.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    async fn clear_pending_payment(&self, reference_id: &str) -> Result<(), AppError>;
}

/// HTTP implementation authenticated with basic auth built from the
/// configured API key.
pub struct HttpProviderClient {
    client: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpProviderClient {
    /// Build a client for the provider's API.
    ///
    /// # Timeout
    ///
    /// 10 seconds; this is an interactive admin call, so a little more
    /// patience than the fire-and-forget collaborators.
    pub fn new(base_url: &str, api_key: String) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    async fn clear_pending_payment(&self, reference_id: &str) -> Result<(), AppError> {
        let url = self
            .base_url
            .join(&format!("pending-payments/{reference_id}"))
            .map_err(|e| AppError::Upstream(format!("Bad provider URL: {e}")))?;

        let response = self
            .client
            .delete(url)
            .basic_auth(&self.api_key, Some(""))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Provider call failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Provider returned {} acknowledging reference {reference_id}",
                response.status()
            )));
        }

        Ok(())
    }
}
