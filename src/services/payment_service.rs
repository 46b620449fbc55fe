//! Payment service - invoice creation and the callback state machine.
//!
//! An order moves `pending -> approved` or `pending -> declined`, terminal
//! in both cases. The approved transition produces exactly one grant; the
//! row lock plus the grant upsert make repeated or concurrent callbacks
//! harmless.

use chrono::Utc;
use uuid::Uuid;

use crate::{
    catalog::Catalog,
    config::{Config, MerchantConfig},
    db::DbPool,
    error::AppError,
    models::{
        order::{Order, status},
        payment::{CallbackAck, InvoiceResponse, PaymentNotification, format_amount_cents},
    },
    services::{grant_service, signature},
};

/// Create a pending order and the signed gateway form for it.
///
/// # Process
///
/// 1. Resolve the entitlement against the catalog (price, display name)
/// 2. Insert a `pending` order with a fresh reference
/// 3. Sign the gateway form fields with the merchant secret
///
/// # Errors
///
/// - `UnknownEntitlement`: the id names nothing purchasable
/// - `Database`: storage failed; no order row exists in that case
pub async fn create_invoice(
    pool: &DbPool,
    config: &Config,
    merchant: &MerchantConfig,
    catalog: &Catalog,
    email: &str,
    entitlement_id: &str,
) -> Result<InvoiceResponse, AppError> {
    let item = catalog
        .item(entitlement_id)
        .ok_or(AppError::UnknownEntitlement)?;

    let order_reference = format!("order-{}", Uuid::new_v4());
    let order_date = Utc::now().timestamp();

    sqlx::query(
        r#"
        INSERT INTO orders (order_reference, email, entitlement_id, amount_cents, currency, status)
        VALUES ($1, $2, $3, $4, $5, 'pending')
        "#,
    )
    .bind(&order_reference)
    .bind(email)
    .bind(&item.entitlement_id)
    .bind(item.price_cents)
    .bind(&config.currency)
    .execute(pool)
    .await?;

    let amount = format_amount_cents(item.price_cents);
    let product_count = 1u32;

    let merchant_signature = signature::sign_fields(
        &merchant.secret,
        &[
            &merchant.account,
            &merchant.domain,
            &order_reference,
            &order_date.to_string(),
            &amount,
            &config.currency,
            &item.name,
            &product_count.to_string(),
            &amount,
        ],
    );

    Ok(InvoiceResponse {
        gateway_url: config.pay_gateway_url.clone(),
        merchant_account: merchant.account.clone(),
        merchant_domain_name: merchant.domain.clone(),
        order_reference,
        order_date,
        amount: amount.clone(),
        currency: config.currency.clone(),
        product_name: item.name,
        product_count,
        product_price: amount,
        return_url: format!("{}/dashboard.html", config.public_base_url),
        service_url: format!("{}/api/pay/callback", config.public_base_url),
        merchant_signature,
    })
}

/// Apply a provider notification to its order.
///
/// # Process
///
/// 1. Verify the keyed digest over the notification's own fields; a
///    mismatch is fatal for this notification and leaves the order pending
/// 2. Lock the order row and check amount/currency against what we priced
/// 3. Transition `pending -> approved | declined`; approved inserts the
///    grant inside the same transaction
/// 4. Answer with a signed acknowledgment
///
/// A repeated notification for a terminal order changes nothing and still
/// acknowledges — the provider is free to redeliver.
///
/// # Errors
///
/// - `InvalidSignature`: digest mismatch or foreign merchant account
/// - `OrderNotFound`: the reference was never issued by us
/// - `InvalidRequest`: amount/currency mismatch or unknown status value
/// - `Database`: storage failed
pub async fn handle_callback(
    pool: &DbPool,
    merchant: &MerchantConfig,
    notification: &PaymentNotification,
) -> Result<CallbackAck, AppError> {
    // A notification for some other merchant can never verify
    if notification.merchant_account != merchant.account {
        return Err(AppError::InvalidSignature);
    }

    let amount_field = notification.amount_field();
    let verified = signature::verify_fields(
        &merchant.secret,
        &[
            &notification.merchant_account,
            &notification.order_reference,
            &amount_field,
            &notification.currency,
            &notification.auth_code,
            &notification.card_pan,
            &notification.transaction_status,
            &notification.reason_code.to_string(),
        ],
        &notification.merchant_signature,
    );
    if !verified {
        return Err(AppError::InvalidSignature);
    }

    let target_status = match notification.transaction_status.as_str() {
        "Approved" => status::APPROVED,
        "Declined" => status::DECLINED,
        other => {
            return Err(AppError::InvalidRequest(format!(
                "Unsupported transaction status: {other}"
            )));
        }
    };

    let mut tx = pool.begin().await?;

    // Lock the row so concurrent callbacks for one order serialize here
    let order = sqlx::query_as::<_, Order>(
        r#"
        SELECT id, order_reference, email, entitlement_id, amount_cents,
               currency, status, created_at, paid_at
        FROM orders
        WHERE order_reference = $1
        FOR UPDATE
        "#,
    )
    .bind(&notification.order_reference)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or(AppError::OrderNotFound)?;

    // A signed-but-wrong notification must not approve at another price
    if notification.amount_cents() != order.amount_cents
        || notification.currency != order.currency
    {
        tx.rollback().await?;
        return Err(AppError::InvalidRequest(
            "Amount or currency does not match the order".to_string(),
        ));
    }

    if order.status == status::PENDING {
        sqlx::query(
            r#"
            UPDATE orders
            SET status = $1,
                paid_at = CASE WHEN $1 = 'approved' THEN NOW() ELSE paid_at END
            WHERE id = $2 AND status = 'pending'
            "#,
        )
        .bind(target_status)
        .bind(order.id)
        .execute(&mut *tx)
        .await?;

        if target_status == status::APPROVED {
            grant_service::grant(&mut *tx, &order.email, &order.entitlement_id).await?;
            tracing::info!(
                "order {} approved, granted {} to {}",
                order.order_reference,
                order.entitlement_id,
                order.email
            );
        } else {
            tracing::info!("order {} declined", order.order_reference);
        }
    } else if order.status == target_status {
        // Redelivery of the notification we already applied. Re-running the
        // grant upsert covers a crash between the transition and the grant.
        if target_status == status::APPROVED {
            grant_service::grant(&mut *tx, &order.email, &order.entitlement_id).await?;
        }
    } else {
        // Terminal orders accept no further transitions
        tracing::warn!(
            "order {} is {} but provider sent {}; ignoring",
            order.order_reference,
            order.status,
            notification.transaction_status
        );
    }

    tx.commit().await?;

    Ok(build_ack(merchant, &notification.order_reference))
}

/// Signed acknowledgment for a processed notification.
fn build_ack(merchant: &MerchantConfig, order_reference: &str) -> CallbackAck {
    let ack_status = "accept";
    let time = Utc::now().timestamp();
    let ack_signature = signature::sign_fields(
        &merchant.secret,
        &[order_reference, ack_status, &time.to_string()],
    );

    CallbackAck {
        order_reference: order_reference.to_string(),
        status: ack_status.to_string(),
        time,
        signature: ack_signature,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merchant() -> MerchantConfig {
        MerchantConfig {
            account: "shop".to_string(),
            secret: "secret".to_string(),
            domain: "shop.example".to_string(),
        }
    }

    #[test]
    fn ack_is_signed_over_reference_status_time() {
        let merchant = merchant();
        let ack = build_ack(&merchant, "order-1");
        assert_eq!(ack.status, "accept");
        assert!(signature::verify_fields(
            &merchant.secret,
            &[&ack.order_reference, &ack.status, &ack.time.to_string()],
            &ack.signature,
        ));
    }
}
