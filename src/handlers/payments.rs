//! Purchase and payment HTTP handlers.
//!
//! - POST /api/payment/create     - manual/development direct grant
//! - POST /api/pay/create-invoice - create a pending order + signed form
//! - POST /api/pay/callback       - provider notification webhook
//!
//! The first two sit behind the session middleware: purchase requires
//! login. The callback authenticates itself by signature instead.

use axum::{Extension, Json, extract::State};

use crate::{
    entitlements,
    error::AppError,
    middleware::auth::AuthContext,
    models::payment::{
        CallbackAck, DirectGrantResponse, InvoiceResponse, PaymentNotification, PurchaseRequest,
    },
    services::{grant_service, payment_service},
    state::AppState,
};

/// Grant an entitlement directly (manual/development flow).
///
/// # Endpoint
///
/// `POST /api/payment/create`
///
/// # Request Body
///
/// ```json
/// { "entitlement_id": "course-1-block-2" }
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok", "redirect_url": "/block.html?bid=course-1-block-2" }
/// ```
///
/// Granting is idempotent: buying the same entitlement twice leaves one
/// grant row and both calls succeed.
pub async fn create_purchase(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<PurchaseRequest>,
) -> Result<Json<DirectGrantResponse>, AppError> {
    if !state.catalog.contains(&request.entitlement_id) {
        return Err(AppError::UnknownEntitlement);
    }

    grant_service::grant(&state.pool, &auth.email, &request.entitlement_id).await?;

    let redirect_url = if entitlements::is_block(&request.entitlement_id) {
        format!("/block.html?bid={}", request.entitlement_id)
    } else {
        "/dashboard.html".to_string()
    };

    Ok(Json(DirectGrantResponse {
        status: "ok".to_string(),
        redirect_url,
    }))
}

/// Create a pending order and its signed gateway form.
///
/// # Endpoint
///
/// `POST /api/pay/create-invoice`
///
/// # Request Body
///
/// ```json
/// { "entitlement_id": "course-1-full" }
/// ```
///
/// Returns 503 `payments_unavailable` until merchant credentials are
/// configured.
pub async fn create_invoice(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<PurchaseRequest>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let merchant = state.config.merchant().ok_or(AppError::PaymentsUnavailable)?;

    let invoice = payment_service::create_invoice(
        &state.pool,
        &state.config,
        &merchant,
        &state.catalog,
        &auth.email,
        &request.entitlement_id,
    )
    .await?;

    Ok(Json(invoice))
}

/// Provider notification webhook.
///
/// # Endpoint
///
/// `POST /api/pay/callback`
///
/// Verifies the notification's keyed digest, applies the
/// `pending -> approved | declined` transition, and answers with a signed
/// acknowledgment. An invalid signature leaves the order pending and is
/// safe for the provider to retry; a repeated valid notification is a
/// no-op that still acknowledges.
pub async fn payment_callback(
    State(state): State<AppState>,
    Json(notification): Json<PaymentNotification>,
) -> Result<Json<CallbackAck>, AppError> {
    let merchant = state.config.merchant().ok_or(AppError::PaymentsUnavailable)?;

    let ack = payment_service::handle_callback(&state.pool, &merchant, &notification).await?;

    Ok(Json(ack))
}
