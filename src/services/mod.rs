//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They orchestrate the store adapter and outbound collaborators.

pub mod notifications;
pub mod reconciliation;
