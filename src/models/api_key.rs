//! API key model for admin authentication.
//!
//! API keys authenticate operators calling the admin endpoints. They are stored in the database as SHA-256 hashes for security.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Represents an API key record from the database.
///
/// # Database Table
///
/// Maps to the `api_keys` table with columns:
/// - `id`: Unique identifier (UUID)
/// - `key_hash`: SHA-256 hash of the actual API key
/// - `label`: Human-readable name for the key holder
/// - `is_admin`: Whether this key may call admin-only operations
/// - `is_active`: Whether the key is currently valid
/// - `created_at`: When the key was created
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKey {
    /// Unique identifier for this API key
    pub id: Uuid,

    /// SHA-256 hash of the actual API key (64 hex characters)
    ///
    /// When a request comes in with "Bearer abc123", we:
    /// 1. Hash "abc123" with SHA-256
    /// 2. Look up this hash in the database
    /// 3. If found and active, authenticate the request
    pub key_hash: String,

    /// Human-readable name of the operator using this API key
    pub label: String,

    /// Whether this key carries the admin privilege
    ///
    /// Only admin keys may acknowledge reference payments back to the
    /// provider; non-admin keys are rejected with 403.
    pub is_admin: bool,

    /// Whether this API key is currently active
    ///
    /// Inactive keys are rejected during authentication. This provides a way to revoke access without deleting the record.
    pub is_active: bool,

    /// Timestamp when this API key was created
    pub created_at: DateTime<Utc>,
}
