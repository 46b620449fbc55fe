//! Data models representing database entities and wire types.
//!
//! This module contains all data structures that map to database tables,
//! plus the request/response types of the HTTP API.

/// Auth endpoint request/response types
pub mod auth;
/// Gated lesson content model
pub mod lesson;
/// One-time login code model
pub mod login_code;
/// Payment order model
pub mod order;
/// Payment-provider wire types (invoice, notification, ack)
pub mod payment;
/// Bearer session model
pub mod session;
