//! Provider webhook payload shapes and classification.
//!
//! Two payment rails deliver notifications to the same endpoint, using
//! disjoint field sets. Rather than duck-typing field presence inline, the
//! ingestion boundary classifies the raw JSON once into a tagged union and
//! the two processing branches stay exhaustive and statically checkable.
//!
//! # Classification Rules
//!
//! - Presence of `reference_id` or `id` ⇒ online-gateway rail
//! - Presence of `reference` and `datetime` (absent `reference_id`) ⇒
//!   reference/ATM rail
//! - Neither shape ⇒ malformed, rejected with 400

use serde::Deserialize;

/// Notification from the online-gateway rail (per-transaction mobile
/// payment push).
///
/// # JSON Example
///
/// ```json
/// {
///   "id": "pp-910",
///   "reference_id": "PAY-2031",
///   "status": "paid",
///   "amount": 50000,
///   "transaction_id": "tx-77"
/// }
/// ```
///
/// Every field is optional on the wire; processing rejects (as a logged
/// no-op) when `reference_id` is missing, and an absent `status` maps to
/// `pending` like any unrecognized value.
#[derive(Debug, Clone, Deserialize)]
pub struct OnlineGatewayNotification {
    /// Provider's id for this payment push
    pub id: Option<String>,

    /// Correlation key matching `payments.reference`
    pub reference_id: Option<String>,

    /// Provider status vocabulary, mapped via `PaymentStatus::from_provider`
    pub status: Option<String>,

    /// Amount in minor units
    pub amount: Option<i64>,

    /// Payer's mobile number (informational)
    pub mobile: Option<String>,

    /// Provider's human-readable message (informational)
    pub message: Option<String>,

    /// Settlement transaction id, supplied on completion
    pub transaction_id: Option<String>,

    /// Reason supplied when the payment failed
    pub failure_reason: Option<String>,
}

/// Notification from the reference/ATM rail (long-lived reference code
/// settled at ATMs or home banking).
///
/// # JSON Example
///
/// ```json
/// {
///   "reference": "R123",
///   "amount": 75000,
///   "datetime": "2026-02-10T09:15:00Z",
///   "terminal_id": "ATM-041",
///   "terminal_location": "Airport branch"
/// }
/// ```
///
/// This rail only ever signals completion (the provider does not call back
/// on failure), so there is no status field and no mapping step.
#[derive(Debug, Clone, Deserialize)]
pub struct ReferenceNotification {
    /// Long-lived reference code; matched against
    /// `payments.reference_number`, falling back to `payments.reference`
    pub reference: String,

    /// Amount actually paid, in minor units
    ///
    /// May legitimately exceed or differ from the originally recorded
    /// amount; the payment record trusts this figure for `paid_amount_cents`.
    pub amount: i64,

    /// Provider's settlement timestamp (opaque, stored via the raw payload)
    pub datetime: String,

    pub terminal_id: Option<String>,
    pub terminal_location: Option<String>,
    pub transaction_id: Option<String>,
}

/// A classified inbound provider notification.
#[derive(Debug, Clone)]
pub enum ProviderNotification {
    OnlineGateway(OnlineGatewayNotification),
    Reference(ReferenceNotification),
}

impl ProviderNotification {
    /// Classify a raw webhook body by rail.
    ///
    /// Returns `None` when the body is not a JSON object, matches neither
    /// field set, or carries fields of the wrong type (e.g. a fractional
    /// amount; both rails contract integer minor units).
    pub fn classify(payload: &serde_json::Value) -> Option<Self> {
        let body = payload.as_object()?;

        if body.contains_key("reference_id") || body.contains_key("id") {
            serde_json::from_value(payload.clone())
                .ok()
                .map(ProviderNotification::OnlineGateway)
        } else if body.contains_key("reference") && body.contains_key("datetime") {
            serde_json::from_value(payload.clone())
                .ok()
                .map(ProviderNotification::Reference)
        } else {
            None
        }
    }
}
