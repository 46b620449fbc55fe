//! Business logic services.
//!
//! Services contain core business logic separated from HTTP handlers.
//! They handle database transactions, validation, and complex operations.

pub mod access_service;
pub mod grant_service;
pub mod otp_service;
pub mod payment_service;
pub mod signature;
