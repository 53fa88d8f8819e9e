//! Inbound payment webhook handler.
//!
//! This is the entry point for both payment rails. The only rejections are
//! transport-level (wrong method, bad signature) and shape-level (payload
//! matching neither rail); everything else is acknowledged with 200 so the
//! provider does not retry-storm on transient internal faults.

use axum::{Json, extract::State, http::HeaderMap};
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

use crate::AppState;
use crate::error::AppError;
use crate::models::webhook::ProviderNotification;
use crate::services::reconciliation;

/// Receive a provider payment notification.
///
/// # Request
///
/// `POST /webhooks/payments` with a JSON body in one of two shapes:
///
/// Online-gateway rail:
/// ```json
/// { "id": "pp-910", "reference_id": "PAY-2031", "status": "paid", "amount": 50000 }
/// ```
///
/// Reference/ATM rail:
/// ```json
/// { "reference": "R123", "amount": 75000, "datetime": "2026-02-10T09:15:00Z" }
/// ```
///
/// # Response
///
/// - `200 {"success": true, "message": "Webhook processed"}` for every
///   classified-and-routed request, including requests where internal
///   processing logged a recoverable error. The provider's retry policy is
///   not trusted to resolve internal faults, and suppressing retries avoids
///   duplicate side effects.
/// - `400` when the body matches neither payload shape
/// - `401` when a secret is configured and the signature header mismatches
/// - `405` for any method other than POST (axum method routing)
///
/// # Security
///
/// When `WEBHOOK_SECRET` is configured, the call must carry it in
/// `X-Provider-Signature` or `Authorization` (raw or Bearer-prefixed).
/// When unconfigured, all callers are accepted. That is an explicit
/// operational choice; a warning is logged at startup.
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, AppError> {
    // Transport-level auth runs before any business logic.
    verify_signature(state.webhook_secret.as_deref(), &headers)?;

    // Classify the payload by rail; an unrecognized shape is the one
    // payload-level rejection.
    let notification = ProviderNotification::classify(&payload).ok_or_else(|| {
        AppError::MalformedPayload("Payload matches no known provider shape".to_string())
    })?;

    // From here on the delivery is acknowledged no matter what: internal
    // errors are logged with the payload for manual replay.
    if let Err(e) = reconciliation::process_notification(&state, &payload, notification).await {
        tracing::error!(error = ?e, %payload, "webhook processing failed, acknowledging anyway");
    }

    Ok(Json(json!({
        "success": true,
        "message": "Webhook processed"
    })))
}

/// Validate the shared-secret header against the configured secret.
///
/// Accepts the secret in `X-Provider-Signature` or in `Authorization`,
/// either raw or `Bearer`-prefixed. Comparison goes through SHA-256 so it
/// does not leak secret length or prefix timing.
fn verify_signature(secret: Option<&str>, headers: &HeaderMap) -> Result<(), AppError> {
    // No secret configured: every caller is accepted.
    let Some(secret) = secret else {
        return Ok(());
    };

    let presented = headers
        .get("X-Provider-Signature")
        .or_else(|| headers.get("Authorization"))
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::InvalidSignature)?;

    let presented = presented.strip_prefix("Bearer ").unwrap_or(presented);

    if sha256_hex(presented) != sha256_hex(secret) {
        return Err(AppError::InvalidSignature);
    }

    Ok(())
}

fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
