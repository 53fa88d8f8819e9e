//! Store adapter over the payment database.
//!
//! The controller never touches the database directly; it is handed a
//! [`PaymentStore`] trait object so the whole reconciliation flow can be
//! exercised against in-memory fakes in tests. The production
//! implementation lives in [`postgres`].

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::api_key::ApiKey;
use crate::models::device_token::DeviceToken;
use crate::models::notification::NewNotification;
use crate::models::payment::{PaymentPatch, PaymentRecord};

pub mod postgres;

/// Which indexed correlation column to look a payment up by.
///
/// The two payment rails use different correlation fields: the
/// online-gateway rail matches `reference`, while the reference/ATM rail's
/// long-lived code may be recorded under `reference_number` or `reference`
/// depending on when the payment record was created. Both columns carry a
/// unique index, so a lookup yields at most one record by contract, not by
/// accident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKey {
    Reference,
    ReferenceNumber,
}

/// Operations the reconciliation flow performs against the store.
///
/// # Atomicity
///
/// Implementations must apply `apply_patch` and `record_booking_payment` as
/// single atomic statements (no read-then-write), so concurrent webhook
/// deliveries for the same record cannot produce lost updates. No
/// cross-record transaction is required: the payment update and the booking
/// increment are allowed to be eventually consistent with each other.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Point lookup of a payment by correlation key.
    async fn find_by_reference(
        &self,
        key: ReferenceKey,
        value: &str,
    ) -> Result<Option<PaymentRecord>, AppError>;

    /// Apply a webhook patch to a payment as one atomic update.
    ///
    /// The update is guarded with `status = 'pending'`: it returns the
    /// updated record when the transition was applied, or `None` when the
    /// record was already terminal (a duplicate or stale delivery). Side
    /// effects must only run on `Some`.
    async fn apply_patch(
        &self,
        id: Uuid,
        patch: &PaymentPatch,
    ) -> Result<Option<PaymentRecord>, AppError>;

    /// Record a duplicate delivery on an already-terminal payment.
    ///
    /// Refreshes `last_webhook_at` and the stored raw payload without
    /// touching status or any other field.
    async fn touch_webhook(&self, id: Uuid, payload: &serde_json::Value) -> Result<(), AppError>;

    /// Attach a completed payment to its booking.
    ///
    /// Increments `paid_amount_cents` additively and appends an entry to
    /// the booking's `payments` list, in one atomic update. Fails with
    /// [`AppError::BookingNotFound`] when no booking matches; the webhook
    /// path logs and swallows that.
    async fn record_booking_payment(
        &self,
        booking_id: Uuid,
        payment_id: Uuid,
        amount_cents: i64,
        method: &str,
    ) -> Result<(), AppError>;

    /// Look up a user's push token; `None` means the user has no device
    /// registered and no push should be attempted.
    async fn push_token(&self, user_id: Uuid) -> Result<Option<DeviceToken>, AppError>;

    /// Persist a notification history record.
    async fn insert_notification(&self, notification: NewNotification) -> Result<(), AppError>;

    /// Look up an active admin API key by its SHA-256 hash.
    async fn find_api_key(&self, key_hash: &str) -> Result<Option<ApiKey>, AppError>;

    /// Connectivity probe used by the health endpoint.
    async fn ping(&self) -> Result<(), AppError>;
}
