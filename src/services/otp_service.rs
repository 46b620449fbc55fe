//! OTP service - issuing and verifying one-time login codes.
//!
//! This service handles:
//! - Identity normalization
//! - Code issuance with single-live-code-per-identity semantics
//! - Single-use verification and session minting
//!
//! # Atomicity Guarantees
//!
//! "Delete prior codes then insert the new one" runs inside one PostgreSQL
//! transaction, so a concurrent verification sees either the old code or
//! the new one, never a half-applied state. Verification likewise deletes
//! the code and mints the session in one transaction.

use chrono::{Duration, Utc};
use rand::Rng;

use crate::{
    db::DbPool,
    error::{AppError, CodeRejection},
    mailer::Mailer,
    models::login_code::LoginCode,
    services::signature,
};

/// Codes are guessable (10^6 space) so the window stays short.
const CODE_TTL_MINUTES: i64 = 5;

/// Sessions are long-lived bearer credentials.
const SESSION_TTL_DAYS: i64 = 30;

/// Normalize a raw email into the canonical identity key.
///
/// Lowercased and trimmed; the same address always maps to the same key.
///
/// # Errors
///
/// `InvalidRequest` when the value is empty or not shaped like an email.
/// This is an input error: nothing is written before it is raised.
pub fn normalize_identity(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::InvalidRequest("Missing email".to_string()));
    }

    // Just enough shape checking to catch mistakes; real proof of control
    // is the code landing in the mailbox.
    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::InvalidRequest("Invalid email".to_string()));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(AppError::InvalidRequest("Invalid email".to_string()));
    }

    Ok(email)
}

/// Issue a one-time code for an identity.
///
/// # Process
///
/// 1. Normalize the identity
/// 2. Generate a uniform six-digit code (leading zeros allowed)
/// 3. In one transaction: delete all prior codes for the identity, insert
///    the digest of the new one with a 5-minute TTL
/// 4. Dispatch the raw code via the mailer (best-effort, never fatal)
///
/// Succeeds unconditionally once storage succeeds, and reveals nothing
/// about whether the identity has prior history.
///
/// # Errors
///
/// - `InvalidRequest`: the email is malformed
/// - `Database`: storage failed; the caller gets a real fault, not a false
///   success
pub async fn request_code(pool: &DbPool, mailer: &Mailer, raw_email: &str) -> Result<(), AppError> {
    let email = normalize_identity(raw_email)?;

    let code = generate_code();
    let code_hash = signature::sha256_hex(&code);
    let expires_at = Utc::now() + Duration::minutes(CODE_TTL_MINUTES);

    // Delete-then-insert must be atomic against concurrent verification
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM login_codes WHERE email = $1")
        .bind(&email)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        INSERT INTO login_codes (email, code_hash, expires_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&email)
    .bind(&code_hash)
    .bind(expires_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    // Delivery failure is logged inside the mailer and never fails issuance
    mailer.send_code(&email, &code).await;

    Ok(())
}

/// Verify a submitted code and mint a session.
///
/// # Process
///
/// 1. Normalize the identity and fetch its stored code
/// 2. Reject with `not_found` / `expired` / `mismatch`
/// 3. In one transaction: delete the code row (single use) and insert a
///    session row holding the digest of a fresh 256-bit token
///
/// # Returns
///
/// The raw session token. It is returned exactly once and never persisted
/// or logged in raw form.
///
/// # Errors
///
/// - `CodeRejected`: the code is absent, expired, or wrong
/// - `InvalidRequest`: the email or code is malformed
/// - `Database`: storage failed
pub async fn verify_code(
    pool: &DbPool,
    raw_email: &str,
    submitted_code: &str,
) -> Result<String, AppError> {
    let email = normalize_identity(raw_email)?;

    let submitted = submitted_code.trim();
    if submitted.is_empty() {
        return Err(AppError::InvalidRequest("Missing code".to_string()));
    }

    let record = sqlx::query_as::<_, LoginCode>(
        r#"
        SELECT id, email, code_hash, expires_at, created_at
        FROM login_codes
        WHERE email = $1
        "#,
    )
    .bind(&email)
    .fetch_optional(pool)
    .await?
    .ok_or(AppError::CodeRejected(CodeRejection::NotFound))?;

    // Lazy expiry: checked here, never swept
    if record.expires_at < Utc::now() {
        return Err(AppError::CodeRejected(CodeRejection::Expired));
    }

    if signature::sha256_hex(submitted) != record.code_hash {
        return Err(AppError::CodeRejected(CodeRejection::Mismatch));
    }

    let token = generate_token();
    let token_hash = signature::sha256_hex(&token);
    let session_expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);

    // Consume the code and mint the session atomically
    let mut tx = pool.begin().await?;

    let deleted = sqlx::query("DELETE FROM login_codes WHERE id = $1")
        .bind(record.id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    // A concurrent verification already consumed it
    if deleted == 0 {
        tx.rollback().await?;
        return Err(AppError::CodeRejected(CodeRejection::NotFound));
    }

    sqlx::query(
        r#"
        INSERT INTO sessions (token_hash, email, expires_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(&token_hash)
    .bind(&email)
    .bind(session_expires_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(token)
}

/// Generate a uniformly random six-digit code, leading zeros allowed.
fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:06}")
}

/// Generate a session token with 256 bits of entropy (64 hex characters).
fn generate_token() -> String {
    let bytes: [u8; 32] = rand::random();
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_lowercased_and_trimmed() {
        assert_eq!(normalize_identity("  A@X.Com ").unwrap(), "a@x.com");
    }

    #[test]
    fn malformed_identities_are_input_errors() {
        for raw in ["", "   ", "no-at-sign", "@x.com", "a@", "a@@x.com"] {
            assert!(
                matches!(normalize_identity(raw), Err(AppError::InvalidRequest(_))),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn codes_are_six_digits_with_leading_zeros() {
        for _ in 0..200 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            assert!(code.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn tokens_carry_256_bits() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert_ne!(token, generate_token());
    }
}
