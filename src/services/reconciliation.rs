//! Reconciliation service - the webhook processing state machine.
//!
//! This service receives classified provider notifications, maps them onto
//! the internal payment state machine, applies a single guarded update to
//! the payment record, and runs completion/failure side effects exactly
//! when the update reports that a transition actually happened.
//!
//! # Idempotence
//!
//! The provider delivers at-least-once, so every step here assumes it may
//! run twice for the same notification. The status transition is a
//! conditional write (`status = 'pending'` guard inside the store); a
//! duplicate delivery loses that race, gets its `last_webhook_at` refreshed
//! via `touch_webhook`, and skips the booking increment, escrow call, and
//! notifications entirely.
//!
//! # Error Handling
//!
//! Errors returned from here are logged by the webhook handler, which
//! acknowledges the delivery anyway; side effects additionally swallow
//! their own failures so they stay independent of each other.

use serde_json::json;

use crate::AppState;
use crate::error::AppError;
use crate::models::payment::{PaymentPatch, PaymentRecord, PaymentStatus};
use crate::models::webhook::{OnlineGatewayNotification, ProviderNotification, ReferenceNotification};
use crate::services::notifications;
use crate::store::ReferenceKey;

/// Fallback body for the client's failure notification when the provider
/// supplied no reason.
const GENERIC_FAILURE_MESSAGE: &str = "Your payment could not be processed. Please try again.";

/// Process one classified provider notification.
///
/// Dispatches to the rail-specific branch; the two branches share the
/// completion side-effect path.
pub async fn process_notification(
    state: &AppState,
    raw: &serde_json::Value,
    notification: ProviderNotification,
) -> Result<(), AppError> {
    match notification {
        ProviderNotification::OnlineGateway(n) => process_online_gateway(state, raw, n).await,
        ProviderNotification::Reference(n) => process_reference(state, raw, n).await,
    }
}

/// Online-gateway rail: per-transaction mobile payment push.
///
/// # Process
///
/// 1. Reject (logged no-op) if `reference_id` is missing
/// 2. Look up the payment by `reference`; a miss is a logged no-op, often
///    a race with record creation or a stale provider retry, so failing
///    loudly would only cause the provider to retry without benefit
/// 3. Map the provider status onto the internal state machine
/// 4. Apply the guarded patch
/// 5. On a won `completed` transition: booking increment, escrow trigger,
///    supplier + client notifications
/// 6. On a won `failed` transition: client notification with the failure
///    reason (generic fallback)
/// 7. Other statuses: persist the patch only
async fn process_online_gateway(
    state: &AppState,
    raw: &serde_json::Value,
    notification: OnlineGatewayNotification,
) -> Result<(), AppError> {
    let Some(reference) = notification.reference_id.as_deref() else {
        tracing::warn!("online-gateway webhook without reference_id, ignoring");
        return Ok(());
    };

    let Some(payment) = state
        .store
        .find_by_reference(ReferenceKey::Reference, reference)
        .await?
    else {
        tracing::warn!(reference, "no payment matches online-gateway webhook, ignoring");
        return Ok(());
    };

    let status = PaymentStatus::from_provider(notification.status.as_deref().unwrap_or(""));

    let patch = PaymentPatch {
        status,
        provider_payment_id: notification.id.clone(),
        // Settlement id only means something once the payment completed.
        transaction_id: match status {
            PaymentStatus::Completed => notification.transaction_id.clone(),
            _ => None,
        },
        failure_reason: match status {
            PaymentStatus::Failed => notification.failure_reason.clone(),
            _ => None,
        },
        paid_amount_cents: None,
        terminal_id: None,
        terminal_location: None,
        payload: raw.clone(),
    };

    let Some(updated) = state.store.apply_patch(payment.id, &patch).await? else {
        // Record was already terminal: duplicate or stale delivery.
        state.store.touch_webhook(payment.id, raw).await?;
        tracing::info!(
            reference,
            current_status = ?payment.status,
            "duplicate online-gateway webhook, no transition"
        );
        return Ok(());
    };

    match status {
        PaymentStatus::Completed => {
            run_completion_effects(state, &updated, notification.amount).await;
        }
        PaymentStatus::Failed => {
            let reason = updated
                .failure_reason
                .as_deref()
                .unwrap_or(GENERIC_FAILURE_MESSAGE);

            if let Some(user_id) = updated.user_id {
                notifications::notify(
                    state.store.as_ref(),
                    state.push.as_ref(),
                    user_id,
                    "Payment failed",
                    reason,
                    "payment_failed",
                    json!({
                        "payment_id": updated.id,
                        "reference": updated.reference,
                    }),
                )
                .await;
            }
            tracing::info!(reference, reason, "payment failed");
        }
        // Cancelled/expired are persisted without user-facing noise, and a
        // pending/unrecognized status only refreshed the auxiliary fields.
        _ => {}
    }

    Ok(())
}

/// Reference/ATM rail: provider-initiated notification against a
/// long-lived reference code.
///
/// # Process
///
/// 1. Look up the payment by `reference_number`, falling back to the
///    generic `reference` field: the rail's code is long-lived and may be
///    recorded under either, depending on when the record was created
/// 2. A miss under both keys is a logged no-op
/// 3. This rail only ever signals completion, so no status mapping: the
///    patch unconditionally targets `completed` and trusts the provider's
///    paid amount figure
/// 4. Same completion side effects as the online-gateway path
async fn process_reference(
    state: &AppState,
    raw: &serde_json::Value,
    notification: ReferenceNotification,
) -> Result<(), AppError> {
    let reference = notification.reference.as_str();

    let mut payment = state
        .store
        .find_by_reference(ReferenceKey::ReferenceNumber, reference)
        .await?;
    if payment.is_none() {
        payment = state
            .store
            .find_by_reference(ReferenceKey::Reference, reference)
            .await?;
    }

    let Some(payment) = payment else {
        tracing::warn!(reference, "no payment matches reference webhook, ignoring");
        return Ok(());
    };

    let patch = PaymentPatch {
        status: PaymentStatus::Completed,
        provider_payment_id: None,
        transaction_id: notification.transaction_id.clone(),
        failure_reason: None,
        paid_amount_cents: Some(notification.amount),
        terminal_id: notification.terminal_id.clone(),
        terminal_location: notification.terminal_location.clone(),
        payload: raw.clone(),
    };

    let Some(updated) = state.store.apply_patch(payment.id, &patch).await? else {
        state.store.touch_webhook(payment.id, raw).await?;
        tracing::info!(
            reference,
            current_status = ?payment.status,
            "duplicate reference webhook, no transition"
        );
        return Ok(());
    };

    run_completion_effects(state, &updated, Some(notification.amount)).await;

    Ok(())
}

/// Side effects of a payment reaching `completed`.
///
/// Runs only after a *won* transition, so each effect fires at most once
/// per payment under duplicate delivery. The effects are independent:
/// each failure is logged and the rest still run.
///
/// Booking accounting uses the record's own amount when set, else the
/// provider-reported figure.
async fn run_completion_effects(
    state: &AppState,
    payment: &PaymentRecord,
    provider_amount: Option<i64>,
) {
    // 1. Booking increment
    let amount = payment.amount_cents.or(provider_amount);
    if let Some(booking_id) = payment.booking_id {
        match amount {
            Some(amount) => {
                if let Err(e) = state
                    .store
                    .record_booking_payment(booking_id, payment.id, amount, &payment.method)
                    .await
                {
                    tracing::warn!(
                        %booking_id,
                        payment_id = %payment.id,
                        error = ?e,
                        "failed to attach payment to booking"
                    );
                }
            }
            None => {
                tracing::warn!(
                    %booking_id,
                    payment_id = %payment.id,
                    "completed payment has no known amount, booking not updated"
                );
            }
        }
    }

    // 2. Escrow trigger (no-op without escrow metadata; the collaborator's
    //    fund operation is idempotent by contract)
    if let Some(escrow_id) = payment.escrow_id {
        if let Err(e) = state.escrow.fund_escrow(escrow_id, payment.id).await {
            tracing::error!(
                %escrow_id,
                payment_id = %payment.id,
                error = ?e,
                "escrow funding call failed"
            );
        }
    }

    // 3. Counterparty notifications, independent of each other
    if let Some(supplier_id) = payment.supplier_id {
        notifications::notify(
            state.store.as_ref(),
            state.push.as_ref(),
            supplier_id,
            "Payment received",
            "A payment for one of your bookings has been received.",
            "payment_received",
            json!({
                "payment_id": payment.id,
                "booking_id": payment.booking_id,
                "amount_cents": amount,
            }),
        )
        .await;
    }

    if let Some(user_id) = payment.user_id {
        notifications::notify(
            state.store.as_ref(),
            state.push.as_ref(),
            user_id,
            "Payment confirmed",
            "Your payment has been confirmed. Thank you!",
            "payment_confirmed",
            json!({
                "payment_id": payment.id,
                "booking_id": payment.booking_id,
                "amount_cents": amount,
            }),
        )
        .await;
    }

    tracing::info!(
        payment_id = %payment.id,
        reference = %payment.reference,
        "payment completed"
    );
}
