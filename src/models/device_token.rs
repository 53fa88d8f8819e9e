//! Push device token model.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A user's registered push token.
///
/// Maps to the `device_tokens` table. Written by the client applications
/// when a device registers for push; this service only reads it. A user
/// without a row here simply receives no push messages.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DeviceToken {
    pub user_id: Uuid,

    /// Opaque token understood by the push gateway
    pub token: String,

    /// Delivery platform ("android" / "ios"), used for platform hints
    pub platform: String,

    pub updated_at: DateTime<Utc>,
}
