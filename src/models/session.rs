//! Bearer session model.

use chrono::{DateTime, Utc};

/// Represents a session record from the database.
///
/// # Database Table
///
/// Maps to the `sessions` table, keyed by `token_hash`.
///
/// # Security
///
/// The raw token is handed to the client exactly once, inside the session
/// cookie; the server keeps only its SHA-256 digest. Possession of the raw
/// token is the sole proof of identity. Multiple concurrent sessions per
/// email are allowed; a new login never invalidates older ones.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// SHA-256 hex digest of the bearer token (64 hex characters)
    pub token_hash: String,

    /// Normalized email this session authenticates
    pub email: String,

    /// Moment after which the session resolves to Anonymous
    pub expires_at: DateTime<Utc>,

    /// Timestamp when this session was minted
    pub created_at: DateTime<Utc>,
}
