//! Payment data models and the payment status state machine.
//!
//! This module defines:
//! - `PaymentStatus`: the internal payment state machine
//! - `PaymentStatus::from_provider`: mapping of provider status vocabulary
//! - `PaymentRecord`: database entity representing one payment attempt
//! - `PaymentPatch`: the partial update applied by webhook processing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Internal payment status.
///
/// # State Machine
///
/// `Pending` is the only non-terminal state:
///
/// ```text
/// pending ──► completed
///         ──► failed
///         ──► cancelled
///         ──► expired
/// ```
///
/// No transition is defined away from a terminal state. A webhook arriving
/// for an already-terminal record is a duplicate for state purposes and must
/// not re-run side effects (enforced by the store's guarded update).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
    Expired,
}

impl PaymentStatus {
    /// Map a provider's raw status string onto the internal status.
    ///
    /// Case-insensitive, total: never errors, has no side effects.
    ///
    /// # Mapping Table
    ///
    /// - `accepted`, `completed`, `paid` → `Completed`
    /// - `rejected`, `failed`, `error` → `Failed`
    /// - `cancelled`, `canceled` → `Cancelled`
    /// - `expired` → `Expired`
    /// - `pending`, `active`, or anything unrecognized → `Pending`
    ///
    /// Unknown input degrades to `Pending`, never to a terminal state: an
    /// unmapped provider status must never be mistaken for a completed
    /// payment.
    pub fn from_provider(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "accepted" | "completed" | "paid" => PaymentStatus::Completed,
            "rejected" | "failed" | "error" => PaymentStatus::Failed,
            "cancelled" | "canceled" => PaymentStatus::Cancelled,
            "expired" => PaymentStatus::Expired,
            _ => PaymentStatus::Pending,
        }
    }

    /// Whether this status is terminal (no further transition defined).
    pub fn is_terminal(self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

/// Represents a payment record from the database.
///
/// # Database Table
///
/// Maps to the `payments` table. Each payment:
/// - Is located on webhook arrival by `reference` (online-gateway rail) or
///   `reference_number` falling back to `reference` (reference/ATM rail)
/// - Stores amounts in minor units (never floats!)
/// - Is created when a payment is initiated (outside this service) and
///   mutated exclusively by webhook processing; never deleted here
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct PaymentRecord {
    /// Unique identifier for this payment attempt
    pub id: Uuid,

    /// Correlation key, provider-assigned or internally generated
    ///
    /// Unique per attempt; the online-gateway rail looks records up by this
    /// field.
    pub reference: String,

    /// Long-lived reference code for the reference/ATM rail
    ///
    /// NULL for online-gateway payments. The reference rail looks records
    /// up by this field first, falling back to `reference`.
    pub reference_number: Option<String>,

    /// Current state in the payment state machine
    pub status: PaymentStatus,

    /// Expected amount in minor units
    ///
    /// NULL for reference-rail records created before the amount is known.
    pub amount_cents: Option<i64>,

    /// Amount the provider reported as actually paid (reference rail)
    ///
    /// May legitimately differ from `amount_cents`; the record trusts the
    /// provider's figure here.
    pub paid_amount_cents: Option<i64>,

    /// Booking this payment belongs to, if any
    pub booking_id: Option<Uuid>,

    /// Supplier counterparty (receives the "payment received" notification)
    pub supplier_id: Option<Uuid>,

    /// Client counterparty (receives confirmation / failure notifications)
    pub user_id: Option<Uuid>,

    /// Upstream identifiers, set on the first webhook that supplies them
    pub provider_payment_id: Option<String>,
    pub transaction_id: Option<String>,

    /// Set only when the payment fails
    pub failure_reason: Option<String>,

    /// ATM/home-banking terminal details (reference rail only)
    pub terminal_id: Option<String>,
    pub terminal_location: Option<String>,

    /// Escrow to fund on completion
    ///
    /// Presence signals that completion should trigger escrow funding.
    pub escrow_id: Option<Uuid>,

    /// Payment method recorded on booking entries
    /// ("online_gateway" / "reference")
    pub method: String,

    /// Raw body of the last webhook processed, kept for audit/debugging
    pub last_payload: Option<serde_json::Value>,

    /// Timestamps maintained by webhook processing
    pub last_webhook_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied to a payment record by webhook processing.
///
/// The store applies this as a single atomic UPDATE. For terminal target
/// statuses the update is guarded with `status = 'pending'`, so a patch is
/// either applied exactly once or reported as a duplicate; the caller uses
/// that outcome to decide whether side effects run.
///
/// `completed_at` / `failed_at` are derived from `status` inside the store,
/// not carried here.
#[derive(Debug, Clone)]
pub struct PaymentPatch {
    /// Target status computed from the provider's vocabulary
    pub status: PaymentStatus,

    /// Upstream id of the payment on the provider side, if supplied
    pub provider_payment_id: Option<String>,

    /// Settlement transaction id, if supplied (completed payments)
    pub transaction_id: Option<String>,

    /// Provider-supplied failure reason (failed payments)
    pub failure_reason: Option<String>,

    /// Provider-reported paid amount in minor units (reference rail)
    pub paid_amount_cents: Option<i64>,

    /// Terminal details (reference rail)
    pub terminal_id: Option<String>,
    pub terminal_location: Option<String>,

    /// Raw webhook body, stored for audit
    pub payload: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_completed_vocabulary() {
        for raw in ["accepted", "completed", "paid", "PAID", "Accepted"] {
            assert_eq!(PaymentStatus::from_provider(raw), PaymentStatus::Completed);
        }
    }

    #[test]
    fn maps_failed_vocabulary() {
        for raw in ["rejected", "failed", "error", "ERROR"] {
            assert_eq!(PaymentStatus::from_provider(raw), PaymentStatus::Failed);
        }
    }

    #[test]
    fn maps_both_cancelled_spellings() {
        assert_eq!(
            PaymentStatus::from_provider("cancelled"),
            PaymentStatus::Cancelled
        );
        assert_eq!(
            PaymentStatus::from_provider("canceled"),
            PaymentStatus::Cancelled
        );
    }

    #[test]
    fn maps_expired() {
        assert_eq!(
            PaymentStatus::from_provider("expired"),
            PaymentStatus::Expired
        );
    }

    #[test]
    fn unknown_status_degrades_to_pending() {
        for raw in ["", "pending", "active", "settled", "ok", "SUCCESS!!", "paid "] {
            assert_eq!(PaymentStatus::from_provider(raw), PaymentStatus::Pending);
        }
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!PaymentStatus::Pending.is_terminal());
        for status in [
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Cancelled,
            PaymentStatus::Expired,
        ] {
            assert!(status.is_terminal());
        }
    }
}
