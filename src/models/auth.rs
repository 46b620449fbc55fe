//! Auth endpoint request/response types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/auth/request-code`.
///
/// ```json
/// { "email": "a@x.com" }
/// ```
#[derive(Debug, Deserialize)]
pub struct RequestCodeRequest {
    pub email: String,
}

/// Request body for `POST /api/auth/verify-code`.
///
/// ```json
/// { "email": "a@x.com", "code": "042137" }
/// ```
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub code: String,
}

/// Success body shared by the auth endpoints.
///
/// Request-code returns this unconditionally on storage success — it never
/// reveals whether the email has prior history.
#[derive(Debug, Serialize)]
pub struct AcceptedResponse {
    pub accepted: bool,
}

impl AcceptedResponse {
    pub fn ok() -> Self {
        Self { accepted: true }
    }
}

/// Response body for `GET /api/me`.
///
/// `email` is null for anonymous callers; the endpoint never errors.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub email: Option<String>,
}

/// Response body for `GET /api/access`: the caller's full entitlement set,
/// empty for anonymous callers.
#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub allowed: Vec<String>,
}
