//! Push-message gateway client.

use async_trait::async_trait;
use serde_json::json;
use url::Url;

use crate::error::AppError;

/// Sends a push message to one device token.
///
/// Delivery is best-effort: the gateway's own guarantees are its concern,
/// and the notification dispatcher persists the history record regardless
/// of send outcome.
#[async_trait]
pub trait PushClient: Send + Sync {
    async fn send_push(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: &serde_json::Value,
    ) -> Result<(), AppError>;
}

/// HTTP implementation posting FCM-style messages to the push gateway.
pub struct HttpPushClient {
    client: reqwest::Client,
    base_url: Url,
    server_key: Option<String>,
}

impl HttpPushClient {
    /// Build a client for the given gateway base URL.
    ///
    /// # Timeout
    ///
    /// 5 seconds per send (prevents hanging on a slow gateway).
    pub fn new(base_url: &str, server_key: Option<String>) -> anyhow::Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url,
            server_key,
        })
    }
}

#[async_trait]
impl PushClient for HttpPushClient {
    /// Send one push message.
    ///
    /// # Delivery Hints
    ///
    /// High priority with default sound and badge, so mobile platforms wake
    /// the app and surface the message immediately.
    async fn send_push(
        &self,
        token: &str,
        title: &str,
        body: &str,
        data: &serde_json::Value,
    ) -> Result<(), AppError> {
        let url = self
            .base_url
            .join("send")
            .map_err(|e| AppError::Upstream(format!("Bad push gateway URL: {e}")))?;

        let message = json!({
            "to": token,
            "priority": "high",
            "content_available": true,
            "notification": {
                "title": title,
                "body": body,
                "sound": "default",
                "badge": "1",
            },
            "data": data,
        });

        let mut request = self.client.post(url).json(&message);
        if let Some(ref key) = self.server_key {
            request = request.header("Authorization", format!("key={key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Push send failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Push gateway returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
