//! Notification dispatcher - best-effort push plus persisted history.
//!
//! Notifications are never fatal to webhook processing: every failure in
//! here is caught and logged, and the caller always proceeds.

use serde_json::json;
use uuid::Uuid;

use crate::clients::push::PushClient;
use crate::models::notification::NewNotification;
use crate::store::PaymentStore;

/// Send a push notification to a user and persist the history record.
///
/// # Process
///
/// 1. Look up the user's device token; if absent, log and return (a user
///    with no registered device simply gets no push)
/// 2. Send the push message (high priority, default sound/badge)
/// 3. Persist a NotificationRecord whenever a token existed and a send was
///    attempted, even if the send itself failed: the record is the
///    durable, user-visible history; push delivery is best-effort
///
/// # Error Handling
///
/// Infallible by design: store and gateway failures are logged with enough
/// context to replay manually, never propagated.
pub async fn notify(
    store: &dyn PaymentStore,
    push: &dyn PushClient,
    user_id: Uuid,
    title: &str,
    body: &str,
    notification_type: &str,
    data: serde_json::Value,
) {
    let token = match store.push_token(user_id).await {
        Ok(Some(token)) => token,
        Ok(None) => {
            tracing::info!(%user_id, notification_type, "no device token, skipping push");
            return;
        }
        Err(e) => {
            tracing::warn!(%user_id, error = ?e, "device token lookup failed, skipping push");
            return;
        }
    };

    // Ship the platform alongside the free-form data so the gateway can
    // apply its own per-platform hints.
    let data = match data {
        serde_json::Value::Object(mut map) => {
            map.insert("platform".to_string(), json!(token.platform));
            serde_json::Value::Object(map)
        }
        other => other,
    };

    if let Err(e) = push.send_push(&token.token, title, body, &data).await {
        tracing::warn!(%user_id, error = ?e, "push send failed");
        // Fall through: the history record is still written below.
    }

    let record = NewNotification {
        user_id,
        title: title.to_string(),
        body: body.to_string(),
        notification_type: notification_type.to_string(),
        data,
    };

    if let Err(e) = store.insert_notification(record).await {
        tracing::warn!(%user_id, error = ?e, "failed to persist notification record");
    }
}
