//! Outbound collaborator clients.
//!
//! Each collaborator sits behind a small trait so the controller can be
//! tested with fakes. Every HTTP implementation builds its reqwest client
//! with an explicit timeout: a hung collaborator must never stall webhook
//! acknowledgement indefinitely.

/// Escrow-funding service client
pub mod escrow;
/// Payment provider API client (reference-payment acknowledgement)
pub mod provider;
/// Push-message gateway client
pub mod push;
