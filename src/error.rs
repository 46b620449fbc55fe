//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Why a submitted one-time code was rejected.
///
/// These are the only distinctions the verify endpoint reveals. All three
/// are an ordinary rejection, never a server fault, and the wording stays
/// generic so valid identities cannot be enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeRejection {
    /// No code is stored for this identity.
    NotFound,
    /// The stored code's TTL has passed.
    Expired,
    /// The submitted code's digest does not match the stored digest.
    Mismatch,
}

impl CodeRejection {
    /// Wire value for the `reason` field of the verify-code contract.
    pub fn as_str(self) -> &'static str {
        match self {
            CodeRejection::NotFound => "not_found",
            CodeRejection::Expired => "expired",
            CodeRejection::Mismatch => "mismatch",
        }
    }
}

/// Application-wide error type.
///
/// Each variant maps to a specific HTTP status code and error message.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Credential Errors**: rejected one-time codes, missing sessions
/// - **Authorization Errors**: content requested without an entitlement
/// - **Payment Errors**: bad callback signatures, unknown orders
/// - **Validation Errors**: invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    ///
    /// This wraps any sqlx::Error using the `#[from]` attribute, which
    /// automatically implements `From<sqlx::Error> for AppError`.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request. No storage mutation was attempted.
    #[error("Invalid request")]
    InvalidRequest(String),

    /// A one-time code was rejected.
    ///
    /// Returns HTTP 400 with the `{accepted: false, reason}` body the
    /// verify-code contract specifies.
    #[error("Code rejected")]
    CodeRejected(CodeRejection),

    /// The route requires a logged-in session and none was presented.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Login required")]
    LoginRequired,

    /// The resolved identity holds no entitlement covering the requested
    /// content. The client shows a locked state, not an error page.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("No access to this content")]
    NotEntitled,

    /// The requested entitlement id does not exist in the catalog.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Unknown entitlement")]
    UnknownEntitlement,

    /// A payment callback referenced an order we never created.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Order not found")]
    OrderNotFound,

    /// A payment callback's keyed digest did not match its signature field.
    /// The order stays pending and the provider may redeliver.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Payment endpoints were hit without merchant credentials configured.
    ///
    /// Returns HTTP 503 Service Unavailable.
    #[error("Payments are not configured")]
    PaymentsUnavailable,
}

/// Convert AppError into an HTTP response.
///
/// This implementation allows Axum handlers to return `Result<T, AppError>`
/// and have errors automatically converted to proper HTTP responses.
///
/// # Response Format
///
/// Code rejections use the verify-code contract body:
/// ```json
/// { "accepted": false, "reason": "expired" }
/// ```
///
/// Every other error returns JSON in this format:
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// Database errors are logged server-side and reported as a generic 500;
/// the client never sees storage details.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map each error variant to (HTTP status, error code, message)
        let (status, code, message) = match self {
            // Credential rejections carry their own body shape
            AppError::CodeRejected(reason) => {
                let body = Json(json!({
                    "accepted": false,
                    "reason": reason.as_str()
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::LoginRequired => {
                (StatusCode::UNAUTHORIZED, "login_required", self.to_string())
            }
            AppError::NotEntitled => (StatusCode::FORBIDDEN, "not_entitled", self.to_string()),
            AppError::UnknownEntitlement => (
                StatusCode::BAD_REQUEST,
                "unknown_entitlement",
                self.to_string(),
            ),
            AppError::OrderNotFound => {
                (StatusCode::NOT_FOUND, "order_not_found", self.to_string())
            }
            AppError::InvalidSignature => (
                StatusCode::BAD_REQUEST,
                "invalid_signature",
                self.to_string(),
            ),
            AppError::PaymentsUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "payments_unavailable",
                self.to_string(),
            ),
            AppError::Database(ref e) => {
                tracing::error!("storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        // Build JSON response body
        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_reasons_match_contract() {
        assert_eq!(CodeRejection::NotFound.as_str(), "not_found");
        assert_eq!(CodeRejection::Expired.as_str(), "expired");
        assert_eq!(CodeRejection::Mismatch.as_str(), "mismatch");
    }

    #[test]
    fn code_rejection_maps_to_400() {
        let response = AppError::CodeRejected(CodeRejection::Mismatch).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_entitled_maps_to_403() {
        let response = AppError::NotEntitled.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
