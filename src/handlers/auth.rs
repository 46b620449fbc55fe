//! OTP authentication HTTP handlers.
//!
//! This module implements the login endpoints:
//! - POST /api/auth/request-code - issue a one-time code
//! - POST /api/auth/verify-code - verify a code, mint a session
//! - POST /api/auth/logout - destroy the presented session
//! - GET  /api/me - whoami from the session cookie

use axum::{Json, extract::State};
use axum_extra::extract::cookie::CookieJar;

use crate::{
    error::AppError,
    middleware::auth::{clear_session_cookie, session_cookie, token_from_jar},
    models::auth::{AcceptedResponse, MeResponse, RequestCodeRequest, VerifyCodeRequest},
    services::{access_service, otp_service},
    state::AppState,
};

/// Issue a one-time login code.
///
/// # Endpoint
///
/// `POST /api/auth/request-code`
///
/// # Request Body
///
/// ```json
/// { "email": "a@x.com" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "accepted": true }` — always, on storage
///   success; the response never reveals whether the email has an account
/// - **Error (400)**: malformed email
/// - **Error (500)**: storage failure
///
/// Code delivery is best-effort; a failed relay does not fail this call.
pub async fn request_code(
    State(state): State<AppState>,
    Json(request): Json<RequestCodeRequest>,
) -> Result<Json<AcceptedResponse>, AppError> {
    otp_service::request_code(&state.pool, &state.mailer, &request.email).await?;
    Ok(Json(AcceptedResponse::ok()))
}

/// Verify a one-time code and log the identity in.
///
/// # Endpoint
///
/// `POST /api/auth/verify-code`
///
/// # Request Body
///
/// ```json
/// { "email": "a@x.com", "code": "042137" }
/// ```
///
/// # Response
///
/// - **Success (200 OK)**: `{ "accepted": true }` plus a `Set-Cookie` with
///   the 30-day session token (HttpOnly, Secure, SameSite=Lax)
/// - **Error (400)**: `{ "accepted": false, "reason": "not_found" |
///   "expired" | "mismatch" }`
///
/// The code is consumed on success; submitting it again yields
/// `not_found`.
pub async fn verify_code(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<VerifyCodeRequest>,
) -> Result<(CookieJar, Json<AcceptedResponse>), AppError> {
    let token = otp_service::verify_code(&state.pool, &request.email, &request.code).await?;
    let jar = jar.add(session_cookie(token));
    Ok((jar, Json(AcceptedResponse::ok())))
}

/// Log out.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
///
/// Deletes the session record matching the presented token's digest and
/// clears the cookie. Idempotent: succeeds with or without a live session.
/// Grant rows are untouched.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<AcceptedResponse>), AppError> {
    let token = token_from_jar(&jar);
    access_service::logout(&state.pool, token.as_deref()).await?;
    let jar = jar.remove(clear_session_cookie());
    Ok((jar, Json(AcceptedResponse::ok())))
}

/// Whoami.
///
/// # Endpoint
///
/// `GET /api/me`
///
/// Resolves the session cookie to an identity. Anonymous callers get
/// `{ "email": null }`; the endpoint never errors on credential problems.
pub async fn me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<MeResponse>, AppError> {
    let token = token_from_jar(&jar);
    let auth = access_service::authorize(&state.pool, token.as_deref()).await?;
    Ok(Json(MeResponse {
        email: auth.email().map(str::to_string),
    }))
}
