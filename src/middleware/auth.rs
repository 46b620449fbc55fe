//! Session-cookie authentication middleware.
//!
//! This middleware intercepts every purchase request to:
//! 1. Extract the session token from the session cookie
//! 2. Hash it and resolve it against the sessions table
//! 3. Inject the authenticated identity into the request
//! 4. Reject anonymous requests with HTTP 401
//!
//! Read-only endpoints (whoami, access listing, lessons) resolve the cookie
//! themselves instead, because anonymous is a normal state for them.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::{
    error::AppError,
    services::access_service::{self, AuthState},
    state::AppState,
};

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Session cookie lifetime, matching the stored session TTL.
const SESSION_COOKIE_DAYS: i64 = 30;

/// Authentication context attached to authenticated requests.
///
/// Inserted into the request's extension map; purchase handlers extract it
/// with `Extension<AuthContext>` to know who is buying.
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Normalized email of the logged-in identity
    pub email: String,
}

/// Build the session cookie for a freshly minted token.
///
/// HttpOnly + Secure + SameSite=Lax, 30-day max age, whole-site path.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(SESSION_COOKIE_DAYS))
        .build()
}

/// A removal cookie matching [`session_cookie`]'s name and path.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, ""))
        .path("/")
        .build()
}

/// The raw session token presented by a request, if any.
pub fn token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(SESSION_COOKIE).map(|c| c.value().to_string())
}

/// Session authentication middleware function.
///
/// # Flow
///
/// 1. Read the session cookie from the request
/// 2. Resolve it through the access authorizer (digest lookup + expiry)
/// 3. If known: inject `AuthContext`, call next handler
/// 4. If anonymous: return 401 (purchase requires login)
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let jar = CookieJar::from_headers(request.headers());
    let token = token_from_jar(&jar);

    match access_service::authorize(&state.pool, token.as_deref()).await? {
        AuthState::Known { email, .. } => {
            request.extensions_mut().insert(AuthContext { email });
            Ok(next.run(request).await)
        }
        AuthState::Anonymous => Err(AppError::LoginRequired),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_cookie_attributes() {
        let cookie = session_cookie("token-value".to_string());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "token-value");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::days(30)));
    }

    #[test]
    fn clear_cookie_matches_name_and_path() {
        let cookie = clear_session_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.value(), "");
    }
}
