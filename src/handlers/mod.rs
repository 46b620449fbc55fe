//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Performs business logic (database queries, validation)
//! 3. Returns HTTP response (JSON, status code)

/// OTP login, logout, whoami endpoints
pub mod auth;
/// Catalog, access listing and gated lessons endpoints
pub mod content;
/// Health check endpoint
pub mod health;
/// Purchase and payment-callback endpoints
pub mod payments;
