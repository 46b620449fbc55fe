//! Access authorization - resolving a bearer token to an identity and its
//! entitlement set.
//!
//! Nothing is cached between requests: every call re-resolves from storage,
//! so the storage layer is the single serialization point.

use std::collections::HashSet;

use chrono::Utc;

use crate::{db::DbPool, error::AppError, models::session::Session, services::signature};

/// Outcome of resolving a request's credentials.
///
/// Absence of credentials is a normal state, not an error. Expired, forged
/// and missing tokens all collapse into `Anonymous` so a caller cannot
/// probe token validity.
#[derive(Debug, Clone)]
pub enum AuthState {
    Anonymous,
    Known {
        email: String,
        entitlements: HashSet<String>,
    },
}

impl AuthState {
    pub fn email(&self) -> Option<&str> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Known { email, .. } => Some(email),
        }
    }

    /// The entitlement set; empty for anonymous callers.
    pub fn entitlements(&self) -> HashSet<String> {
        match self {
            AuthState::Anonymous => HashSet::new(),
            AuthState::Known { entitlements, .. } => entitlements.clone(),
        }
    }
}

/// Resolve a raw session token to an identity and its entitlements.
///
/// Fail-closed: access is only ever granted on a positive, verified match.
///
/// # Errors
///
/// Only `Database` — credential problems degrade to `Anonymous`, never to
/// an error.
pub async fn authorize(pool: &DbPool, raw_token: Option<&str>) -> Result<AuthState, AppError> {
    let Some(raw_token) = raw_token else {
        return Ok(AuthState::Anonymous);
    };

    let token_hash = signature::sha256_hex(raw_token);

    let session = sqlx::query_as::<_, Session>(
        r#"
        SELECT token_hash, email, expires_at, created_at
        FROM sessions
        WHERE token_hash = $1
        "#,
    )
    .bind(&token_hash)
    .fetch_optional(pool)
    .await?;

    let Some(session) = session else {
        return Ok(AuthState::Anonymous);
    };

    // Expired sessions are indistinguishable from absent ones
    if session.expires_at < Utc::now() {
        return Ok(AuthState::Anonymous);
    }

    let entitlements = super::grant_service::list_entitlements(pool, &session.email)
        .await?
        .into_iter()
        .collect();

    Ok(AuthState::Known {
        email: session.email,
        entitlements,
    })
}

/// Destroy the session matching a presented token.
///
/// Idempotent: no session, an expired session and a live session all end
/// the same way. Grant rows are untouched; only the credential dies.
pub async fn logout(pool: &DbPool, raw_token: Option<&str>) -> Result<(), AppError> {
    let Some(raw_token) = raw_token else {
        return Ok(());
    };

    sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
        .bind(signature::sha256_hex(raw_token))
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_no_identity_and_no_entitlements() {
        let state = AuthState::Anonymous;
        assert!(state.email().is_none());
        assert!(state.entitlements().is_empty());
    }

    #[test]
    fn known_exposes_identity_and_set() {
        let state = AuthState::Known {
            email: "a@x.com".to_string(),
            entitlements: ["course-1-full".to_string()].into_iter().collect(),
        };
        assert_eq!(state.email(), Some("a@x.com"));
        assert!(state.entitlements().contains("course-1-full"));
    }
}
