//! Booking aggregate models.
//!
//! A booking owns a running paid total and an append-only list of payment
//! entries. It is mutated only as a side effect of a payment reaching
//! `completed`, and a booking may receive multiple completed payments
//! (partial payments accumulate).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Represents a booking record from the database.
///
/// # Database Table
///
/// Maps to the `bookings` table. `paid_amount_cents` is increment-only and
/// is updated with an additive SQL expression, never a read-modify-write,
/// so concurrent partial payments cannot clobber each other.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Booking {
    pub id: Uuid,

    /// At least distinguishes "paid" once any payment attaches
    pub payment_status: String,

    /// Running total of completed payments, in minor units
    pub paid_amount_cents: i64,

    /// Append-only JSON array of [`BookingPaymentEntry`]
    pub payments: serde_json::Value,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry in a booking's `payments` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingPaymentEntry {
    pub payment_id: Uuid,
    pub amount_cents: i64,
    pub method: String,
    pub paid_at: DateTime<Utc>,
}
