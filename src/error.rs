//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// This enum represents all possible errors that can occur in the application.
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Bad webhook signatures or API keys
/// - **Authorization Errors**: Valid callers lacking admin privilege
/// - **Resource Errors**: Referenced records that do not exist
/// - **Validation Errors**: Malformed payloads or arguments
/// - **Upstream Errors**: Failed calls to the payment provider's API
///
/// Note that most errors inside webhook processing are *not* surfaced
/// through this type at the HTTP boundary: the ingestion handler logs them
/// and acknowledges the webhook anyway (see `handlers::webhooks`).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Webhook shared-secret header is missing or does not match the
    /// configured secret.
    ///
    /// Returns HTTP 401 Unauthorized. This is the one webhook failure the
    /// provider is expected to retry after fixing its configuration.
    #[error("Invalid webhook signature")]
    InvalidSignature,

    /// Admin API key is missing, invalid, or inactive.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Caller is authenticated but does not carry the admin privilege
    /// required for the requested operation.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("Permission denied")]
    PermissionDenied,

    /// Request argument is invalid (e.g., blank reference id).
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Webhook body matched neither provider payload shape.
    ///
    /// Returns HTTP 400 Bad Request. This is the only payload-level
    /// rejection; recognized payloads are always acknowledged.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Referenced booking does not exist.
    ///
    /// Returns HTTP 404 Not Found when surfaced; inside webhook processing
    /// this is logged and swallowed instead.
    #[error("Booking not found")]
    BookingNotFound,

    /// An outbound call to a collaborator (escrow service, push gateway,
    /// payment provider API) did not report success.
    ///
    /// Returns HTTP 502 Bad Gateway when surfaced (admin path only).
    #[error("Upstream call failed: {0}")]
    Upstream(String),
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// All errors return JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidSignature` / `InvalidApiKey` → 401 Unauthorized
/// - `PermissionDenied` → 403 Forbidden
/// - `InvalidArgument` / `MalformedPayload` → 400 Bad Request
/// - `BookingNotFound` → 404 Not Found
/// - `Upstream` → 502 Bad Gateway
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            AppError::InvalidSignature => (
                StatusCode::UNAUTHORIZED,
                "invalid_signature",
                self.to_string(),
            ),
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key",
                self.to_string(),
            ),
            AppError::PermissionDenied => {
                (StatusCode::FORBIDDEN, "permission_denied", self.to_string())
            }
            AppError::InvalidArgument(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_argument", msg.clone())
            }
            AppError::MalformedPayload(ref msg) => {
                (StatusCode::BAD_REQUEST, "malformed_payload", msg.clone())
            }
            AppError::BookingNotFound => {
                (StatusCode::NOT_FOUND, "booking_not_found", self.to_string())
            }
            AppError::Upstream(ref msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg.clone()),
            AppError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An internal error occurred".to_string(),
            ),
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        // Return the response with status code and JSON body
        (status, body).into_response()
    }
}
