//! Notification history models.
//!
//! Every push notification sent gets a persisted copy for in-app history.
//! The record is the durable, user-visible artifact; push delivery itself is
//! best-effort.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Represents a notification record from the database.
///
/// # Database Table
///
/// Maps to the `notifications` table. Created once per dispatch attempt
/// (whenever a device token existed and a send was attempted); never
/// mutated by this service. `is_read` is flipped by the client app.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct NotificationRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub notification_type: String,
    pub data: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// A notification about to be persisted.
#[derive(Debug, Clone)]
pub struct NewNotification {
    pub user_id: Uuid,
    pub title: String,
    pub body: String,
    pub notification_type: String,

    /// Free-form key/value payload shipped alongside the push message
    pub data: serde_json::Value,
}
