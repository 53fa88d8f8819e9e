//! Admin operations.
//!
//! Unlike the webhook path, these are synchronous operator-driven actions:
//! failures are surfaced directly to the caller instead of being swallowed.

use axum::{Extension, Json, extract::Path, extract::State};
use serde_json::{Value, json};

use crate::AppState;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;

/// Acknowledge a consumed reference payment back to the provider.
///
/// # Request
///
/// `POST /api/v1/reference-payments/{reference_id}/acknowledge`
///
/// Tells the upstream provider the notification for `reference_id` has been
/// consumed, clearing it from the provider's pending queue.
///
/// # Response
///
/// ```json
/// { "success": true }
/// ```
///
/// # Errors
///
/// - 401 without a valid API key (middleware)
/// - 403 when the key lacks the admin privilege
/// - 400 when the reference id is blank
/// - 502 when the provider does not report success
///
/// # Security
///
/// - Requires valid API key authentication
/// - Restricted to admin keys
pub async fn acknowledge_reference_payment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(reference_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    if !auth.is_admin {
        return Err(AppError::PermissionDenied);
    }

    let reference_id = reference_id.trim();
    if reference_id.is_empty() {
        return Err(AppError::InvalidArgument(
            "reference_id must not be empty".to_string(),
        ));
    }

    state.provider.clear_pending_payment(reference_id).await?;

    tracing::info!(reference_id, operator = %auth.label, "reference payment acknowledged");

    Ok(Json(json!({ "success": true })))
}
