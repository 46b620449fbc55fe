//! One-time login code model.
//!
//! A code proves control of an email address. Only its SHA-256 digest is
//! stored; the raw six digits travel by email and are never persisted.

use chrono::{DateTime, Utc};

/// Represents a login code record from the database.
///
/// # Database Table
///
/// Maps to the `login_codes` table. Issuing a new code deletes all prior
/// rows for the same email first, so at most one row is live per identity.
///
/// # Lifecycle
///
/// Created on code request, deleted on successful verification (single
/// use). Expiry is lazy: rows past `expires_at` fail verification but are
/// not swept by any background job.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LoginCode {
    /// Row identifier
    pub id: i64,

    /// Normalized (lowercased, trimmed) email this code was issued for
    pub email: String,

    /// SHA-256 hex digest of the six-digit code
    pub code_hash: String,

    /// Moment after which verification fails with `expired`
    pub expires_at: DateTime<Utc>,

    /// Timestamp when this code was issued
    pub created_at: DateTime<Utc>,
}
