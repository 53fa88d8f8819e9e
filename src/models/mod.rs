//! Data models representing database entities and provider payloads.
//!
//! This module contains all data structures that map to database tables,
//! plus the typed forms of the two provider webhook payload shapes.

/// Admin API key authentication model
pub mod api_key;
/// Booking aggregate (paid total + payment entries)
pub mod booking;
/// Push device token model
pub mod device_token;
/// Persisted notification history model
pub mod notification;
/// Payment record, status state machine, and update patch
pub mod payment;
/// Provider webhook payload shapes and classification
pub mod webhook;
