//! Shared in-memory fakes for integration tests.
//!
//! The reconciliation controller only sees trait objects, so these fakes
//! stand in for the store and every outbound collaborator. The fake store
//! reproduces the two load-bearing guarantees of the Postgres adapter: the
//! pending-status guard on `apply_patch` and the additive booking
//! increment.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use payment_reconciler::AppState;
use payment_reconciler::clients::escrow::EscrowClient;
use payment_reconciler::clients::provider::ProviderClient;
use payment_reconciler::clients::push::PushClient;
use payment_reconciler::error::AppError;
use payment_reconciler::models::api_key::ApiKey;
use payment_reconciler::models::booking::Booking;
use payment_reconciler::models::device_token::DeviceToken;
use payment_reconciler::models::notification::NewNotification;
use payment_reconciler::models::payment::{PaymentPatch, PaymentRecord, PaymentStatus};
use payment_reconciler::store::{PaymentStore, ReferenceKey};

#[derive(Default)]
pub struct FakeStore {
    pub payments: Mutex<Vec<PaymentRecord>>,
    pub bookings: Mutex<HashMap<Uuid, Booking>>,
    pub tokens: Mutex<HashMap<Uuid, DeviceToken>>,
    pub notifications: Mutex<Vec<NewNotification>>,
    pub api_keys: Mutex<Vec<ApiKey>>,
}

impl FakeStore {
    pub fn payment(&self, id: Uuid) -> PaymentRecord {
        self.payments
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .expect("payment should exist")
    }

    pub fn booking(&self, id: Uuid) -> Booking {
        self.bookings
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .expect("booking should exist")
    }
}

#[async_trait]
impl PaymentStore for FakeStore {
    async fn find_by_reference(
        &self,
        key: ReferenceKey,
        value: &str,
    ) -> Result<Option<PaymentRecord>, AppError> {
        let payments = self.payments.lock().unwrap();
        let found = payments
            .iter()
            .find(|p| match key {
                ReferenceKey::Reference => p.reference == value,
                ReferenceKey::ReferenceNumber => p.reference_number.as_deref() == Some(value),
            })
            .cloned();
        Ok(found)
    }

    async fn apply_patch(
        &self,
        id: Uuid,
        patch: &PaymentPatch,
    ) -> Result<Option<PaymentRecord>, AppError> {
        let mut payments = self.payments.lock().unwrap();
        let Some(payment) = payments.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        // Same guard as the SQL: only pending records transition.
        if payment.status != PaymentStatus::Pending {
            return Ok(None);
        }

        let now = Utc::now();
        payment.status = patch.status;
        if let Some(ref v) = patch.provider_payment_id {
            payment.provider_payment_id = Some(v.clone());
        }
        if let Some(ref v) = patch.transaction_id {
            payment.transaction_id = Some(v.clone());
        }
        if let Some(ref v) = patch.failure_reason {
            payment.failure_reason = Some(v.clone());
        }
        if let Some(v) = patch.paid_amount_cents {
            payment.paid_amount_cents = Some(v);
        }
        if let Some(ref v) = patch.terminal_id {
            payment.terminal_id = Some(v.clone());
        }
        if let Some(ref v) = patch.terminal_location {
            payment.terminal_location = Some(v.clone());
        }
        payment.last_payload = Some(patch.payload.clone());
        payment.last_webhook_at = Some(now);
        payment.updated_at = now;
        match patch.status {
            PaymentStatus::Completed => payment.completed_at = Some(now),
            PaymentStatus::Failed => payment.failed_at = Some(now),
            _ => {}
        }

        Ok(Some(payment.clone()))
    }

    async fn touch_webhook(&self, id: Uuid, payload: &serde_json::Value) -> Result<(), AppError> {
        let mut payments = self.payments.lock().unwrap();
        if let Some(payment) = payments.iter_mut().find(|p| p.id == id) {
            payment.last_webhook_at = Some(Utc::now());
            payment.last_payload = Some(payload.clone());
        }
        Ok(())
    }

    async fn record_booking_payment(
        &self,
        booking_id: Uuid,
        payment_id: Uuid,
        amount_cents: i64,
        method: &str,
    ) -> Result<(), AppError> {
        let mut bookings = self.bookings.lock().unwrap();
        let booking = bookings.get_mut(&booking_id).ok_or(AppError::BookingNotFound)?;

        booking.payment_status = "paid".to_string();
        booking.paid_amount_cents += amount_cents;
        booking
            .payments
            .as_array_mut()
            .expect("payments is an array")
            .push(json!({
                "payment_id": payment_id,
                "amount_cents": amount_cents,
                "method": method,
                "paid_at": Utc::now(),
            }));

        Ok(())
    }

    async fn push_token(&self, user_id: Uuid) -> Result<Option<DeviceToken>, AppError> {
        Ok(self.tokens.lock().unwrap().get(&user_id).cloned())
    }

    async fn insert_notification(&self, notification: NewNotification) -> Result<(), AppError> {
        self.notifications.lock().unwrap().push(notification);
        Ok(())
    }

    async fn find_api_key(&self, key_hash: &str) -> Result<Option<ApiKey>, AppError> {
        let keys = self.api_keys.lock().unwrap();
        Ok(keys
            .iter()
            .find(|k| k.key_hash == key_hash && k.is_active)
            .cloned())
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeEscrow {
    pub calls: Mutex<Vec<(Uuid, Uuid)>>,
}

#[async_trait]
impl EscrowClient for FakeEscrow {
    async fn fund_escrow(&self, escrow_id: Uuid, payment_id: Uuid) -> Result<(), AppError> {
        self.calls.lock().unwrap().push((escrow_id, payment_id));
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SentPush {
    pub token: String,
    pub title: String,
    pub body: String,
}

#[derive(Default)]
pub struct FakePush {
    pub sent: Mutex<Vec<SentPush>>,
    pub fail_sends: bool,
}

#[async_trait]
impl PushClient for FakePush {
    async fn send_push(
        &self,
        token: &str,
        title: &str,
        body: &str,
        _data: &serde_json::Value,
    ) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentPush {
            token: token.to_string(),
            title: title.to_string(),
            body: body.to_string(),
        });
        if self.fail_sends {
            return Err(AppError::Upstream("push gateway down".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeProvider {
    pub cleared: Mutex<Vec<String>>,
    pub fail_calls: bool,
}

#[async_trait]
impl ProviderClient for FakeProvider {
    async fn clear_pending_payment(&self, reference_id: &str) -> Result<(), AppError> {
        if self.fail_calls {
            return Err(AppError::Upstream("provider rejected the call".to_string()));
        }
        self.cleared.lock().unwrap().push(reference_id.to_string());
        Ok(())
    }
}

/// Everything a test needs to drive the controller and inspect outcomes.
pub struct TestHarness {
    pub state: AppState,
    pub store: Arc<FakeStore>,
    pub escrow: Arc<FakeEscrow>,
    pub push: Arc<FakePush>,
    pub provider: Arc<FakeProvider>,
}

pub fn harness() -> TestHarness {
    harness_with(FakePush::default(), FakeProvider::default())
}

pub fn harness_with(push: FakePush, provider: FakeProvider) -> TestHarness {
    let store = Arc::new(FakeStore::default());
    let escrow = Arc::new(FakeEscrow::default());
    let push = Arc::new(push);
    let provider = Arc::new(provider);

    let state = AppState {
        store: store.clone(),
        escrow: escrow.clone(),
        push: push.clone(),
        provider: provider.clone(),
        webhook_secret: None,
    };

    TestHarness {
        state,
        store,
        escrow,
        push,
        provider,
    }
}

/// A pending payment with every optional field empty.
pub fn pending_payment(reference: &str) -> PaymentRecord {
    let now = Utc::now();
    PaymentRecord {
        id: Uuid::new_v4(),
        reference: reference.to_string(),
        reference_number: None,
        status: PaymentStatus::Pending,
        amount_cents: None,
        paid_amount_cents: None,
        booking_id: None,
        supplier_id: None,
        user_id: None,
        provider_payment_id: None,
        transaction_id: None,
        failure_reason: None,
        terminal_id: None,
        terminal_location: None,
        escrow_id: None,
        method: "online_gateway".to_string(),
        last_payload: None,
        last_webhook_at: None,
        completed_at: None,
        failed_at: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn empty_booking(id: Uuid) -> Booking {
    let now = Utc::now();
    Booking {
        id,
        payment_status: "unpaid".to_string(),
        paid_amount_cents: 0,
        payments: json!([]),
        created_at: now,
        updated_at: now,
    }
}

pub fn device_token(user_id: Uuid, token: &str) -> DeviceToken {
    DeviceToken {
        user_id,
        token: token.to_string(),
        platform: "android".to_string(),
        updated_at: Utc::now(),
    }
}

pub fn api_key(raw_key: &str, label: &str, is_admin: bool) -> ApiKey {
    let mut hasher = Sha256::new();
    hasher.update(raw_key.as_bytes());
    ApiKey {
        id: Uuid::new_v4(),
        key_hash: hex::encode(hasher.finalize()),
        label: label.to_string(),
        is_admin,
        is_active: true,
        created_at: Utc::now(),
    }
}
