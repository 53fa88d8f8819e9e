//! PostgreSQL implementation of the store adapter.
//!
//! All mutations are single-statement updates: the status transition uses a
//! conditional `WHERE status = 'pending'` guard and the booking increment
//! uses an additive expression, so the database, not application code, is
//! what serializes racing webhook deliveries.

use async_trait::async_trait;
use serde_json::json;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::models::api_key::ApiKey;
use crate::models::device_token::DeviceToken;
use crate::models::notification::NewNotification;
use crate::models::payment::{PaymentPatch, PaymentRecord};
use crate::store::{PaymentStore, ReferenceKey};

/// Store adapter backed by the PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentStore for PgStore {
    async fn find_by_reference(
        &self,
        key: ReferenceKey,
        value: &str,
    ) -> Result<Option<PaymentRecord>, AppError> {
        // Both columns carry a unique index, so fetch_optional is exact,
        // not "first match wins".
        let query = match key {
            ReferenceKey::Reference => "SELECT * FROM payments WHERE reference = $1",
            ReferenceKey::ReferenceNumber => "SELECT * FROM payments WHERE reference_number = $1",
        };

        let payment = sqlx::query_as::<_, PaymentRecord>(query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        Ok(payment)
    }

    /// Apply a webhook patch as one conditional update.
    ///
    /// # Process
    ///
    /// 1. Match the row by id *and* `status = 'pending'`
    /// 2. Set the new status plus whichever upstream fields the webhook
    ///    supplied (COALESCE keeps values set by an earlier webhook)
    /// 3. Derive `completed_at` / `failed_at` from the target status
    /// 4. RETURNING hands back the post-update row, or no row when the
    ///    record was already terminal
    ///
    /// The guard is what makes duplicate deliveries safe: two webhooks
    /// racing on the same pending record get exactly one winner, and the
    /// loser sees `None` and skips side effects.
    async fn apply_patch(
        &self,
        id: Uuid,
        patch: &PaymentPatch,
    ) -> Result<Option<PaymentRecord>, AppError> {
        let payment = sqlx::query_as::<_, PaymentRecord>(
            r#"
            UPDATE payments
            SET status = $2,
                provider_payment_id = COALESCE($3, provider_payment_id),
                transaction_id = COALESCE($4, transaction_id),
                failure_reason = COALESCE($5, failure_reason),
                paid_amount_cents = COALESCE($6, paid_amount_cents),
                terminal_id = COALESCE($7, terminal_id),
                terminal_location = COALESCE($8, terminal_location),
                last_payload = $9,
                last_webhook_at = NOW(),
                updated_at = NOW(),
                completed_at = CASE WHEN $2 = 'completed' THEN NOW() ELSE completed_at END,
                failed_at = CASE WHEN $2 = 'failed' THEN NOW() ELSE failed_at END
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(patch.status)
        .bind(&patch.provider_payment_id)
        .bind(&patch.transaction_id)
        .bind(&patch.failure_reason)
        .bind(patch.paid_amount_cents)
        .bind(&patch.terminal_id)
        .bind(&patch.terminal_location)
        .bind(&patch.payload)
        .fetch_optional(&self.pool)
        .await?;

        Ok(payment)
    }

    async fn touch_webhook(&self, id: Uuid, payload: &serde_json::Value) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE payments
            SET last_webhook_at = NOW(),
                last_payload = $2,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(payload)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Attach a completed payment to its booking.
    ///
    /// The increment is additive (`paid_amount_cents + $2`), never a
    /// read-modify-write, so concurrent partial payments accumulate instead
    /// of clobbering each other. The payments list is appended in the same
    /// statement.
    async fn record_booking_payment(
        &self,
        booking_id: Uuid,
        payment_id: Uuid,
        amount_cents: i64,
        method: &str,
    ) -> Result<(), AppError> {
        let entry = json!([{
            "payment_id": payment_id,
            "amount_cents": amount_cents,
            "method": method,
            "paid_at": chrono::Utc::now(),
        }]);

        let updated_count = sqlx::query(
            r#"
            UPDATE bookings
            SET payment_status = 'paid',
                paid_amount_cents = paid_amount_cents + $2,
                payments = payments || $3::jsonb,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(booking_id)
        .bind(amount_cents)
        .bind(&entry)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if updated_count == 0 {
            return Err(AppError::BookingNotFound);
        }

        Ok(())
    }

    async fn push_token(&self, user_id: Uuid) -> Result<Option<DeviceToken>, AppError> {
        let token =
            sqlx::query_as::<_, DeviceToken>("SELECT * FROM device_tokens WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(token)
    }

    async fn insert_notification(&self, notification: NewNotification) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (user_id, title, body, notification_type, data)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(notification.user_id)
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.notification_type)
        .bind(&notification.data)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_api_key(&self, key_hash: &str) -> Result<Option<ApiKey>, AppError> {
        let api_key = sqlx::query_as::<_, ApiKey>(
            "SELECT * FROM api_keys WHERE key_hash = $1 AND is_active = true",
        )
        .bind(key_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(api_key)
    }

    async fn ping(&self) -> Result<(), AppError> {
        // Verify database connectivity with simple query
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
