//! Escrow-funding collaborator client.

use async_trait::async_trait;
use serde_json::json;
use url::Url;
use uuid::Uuid;

use crate::error::AppError;

/// Asks the external escrow service to fund an escrow from a payment.
///
/// The collaborator is contractually idempotent: repeated calls with the
/// same payment id must not double-fund. This service still only calls it
/// once per completed transition (the guarded status update makes the
/// transition itself at-most-once).
#[async_trait]
pub trait EscrowClient: Send + Sync {
    async fn fund_escrow(&self, escrow_id: Uuid, payment_id: Uuid) -> Result<(), AppError>;
}

/// HTTP implementation talking to the escrow service's REST API.
pub struct HttpEscrowClient {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpEscrowClient {
    /// Build a client for the given base URL.
    ///
    /// # Timeout
    ///
    /// 5 seconds per call; escrow failures are logged by the caller, never
    /// propagated to the webhook acknowledgement.
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl EscrowClient for HttpEscrowClient {
    async fn fund_escrow(&self, escrow_id: Uuid, payment_id: Uuid) -> Result<(), AppError> {
        let url = self
            .base_url
            .join(&format!("escrows/{escrow_id}/fund"))
            .map_err(|e| AppError::Upstream(format!("Bad escrow URL: {e}")))?;

        let response = self
            .client
            .post(url)
            .json(&json!({ "payment_id": payment_id }))
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Escrow call failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Escrow service returned {} for escrow {escrow_id}",
                response.status()
            )));
        }

        Ok(())
    }
}
