//! Payment-provider wire types.
//!
//! The provider protocol is camelCase JSON with keyed-digest signatures
//! over `;`-joined field lists (see `services::signature`). Three shapes
//! cross the wire: the signed invoice form the client submits to the
//! gateway, the signed notification the gateway posts back, and the signed
//! acknowledgment we answer the notification with.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/pay/create-invoice` and the manual
/// `POST /api/payment/create` flow.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub entitlement_id: String,
}

/// Response of the manual grant flow: where the client goes next.
#[derive(Debug, Serialize)]
pub struct DirectGrantResponse {
    pub status: String,
    pub redirect_url: String,
}

/// Signed payment form returned by create-invoice.
///
/// The client POSTs these fields to `gateway_url`. `merchant_signature`
/// covers, in order: merchantAccount;merchantDomainName;orderReference;
/// orderDate;amount;currency;productName;productCount;productPrice.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub gateway_url: String,
    pub merchant_account: String,
    pub merchant_domain_name: String,
    pub order_reference: String,
    /// Unix timestamp of order creation
    pub order_date: i64,
    /// Decimal string, e.g. "1499" or "499.50"
    pub amount: String,
    pub currency: String,
    pub product_name: String,
    pub product_count: u32,
    pub product_price: String,
    /// Where the gateway sends the buyer after payment
    pub return_url: String,
    /// Where the gateway posts the signed notification
    pub service_url: String,
    pub merchant_signature: String,
}

/// Signed notification posted by the gateway to `POST /api/pay/callback`.
///
/// The signature covers, in order: merchantAccount;orderReference;amount;
/// currency;authCode;cardPan;transactionStatus;reasonCode. A notification
/// whose recomputed digest differs from `merchant_signature` is rejected
/// without touching the order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentNotification {
    pub merchant_account: String,
    pub order_reference: String,
    /// Decimal amount as the provider sent it
    pub amount: f64,
    pub currency: String,
    #[serde(default)]
    pub auth_code: String,
    #[serde(default)]
    pub card_pan: String,
    /// "Approved" or "Declined"
    pub transaction_status: String,
    #[serde(default)]
    pub reason_code: i64,
    pub merchant_signature: String,
}

impl PaymentNotification {
    /// The notification amount in integer cents, for comparison against the
    /// stored order.
    pub fn amount_cents(&self) -> i64 {
        (self.amount * 100.0).round() as i64
    }

    /// The amount exactly as it enters the signature string.
    pub fn amount_field(&self) -> String {
        format_amount(self.amount)
    }
}

/// Signed acknowledgment returned to the gateway.
///
/// The signature covers orderReference;status;time.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackAck {
    pub order_reference: String,
    /// Always "accept": the notification was received and processed
    pub status: String,
    /// Unix timestamp of the acknowledgment
    pub time: i64,
    pub signature: String,
}

/// Render integer cents as the provider's decimal string.
///
/// Whole amounts drop the fraction ("1499"), everything else keeps two
/// places ("499.50"). This is the canonical rendering used in signatures,
/// so it must stay stable.
pub fn format_amount_cents(cents: i64) -> String {
    if cents % 100 == 0 {
        format!("{}", cents / 100)
    } else {
        format!("{}.{:02}", cents / 100, (cents % 100).abs())
    }
}

/// Canonical signature rendering of a wire amount.
///
/// Matches serde_json's number formatting: whole floats print without a
/// fraction ("1499"), others print as sent ("499.5").
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{amount}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cents_render_like_provider_amounts() {
        assert_eq!(format_amount_cents(149900), "1499");
        assert_eq!(format_amount_cents(49950), "499.50");
        assert_eq!(format_amount_cents(100), "1");
        assert_eq!(format_amount_cents(5), "0.05");
    }

    #[test]
    fn notification_deserializes_provider_json() {
        let raw = r#"{
            "merchantAccount": "shop",
            "orderReference": "order-1",
            "amount": 1499,
            "currency": "UAH",
            "transactionStatus": "Approved",
            "merchantSignature": "deadbeef"
        }"#;
        let notification: PaymentNotification = serde_json::from_str(raw).unwrap();
        assert_eq!(notification.amount_cents(), 149900);
        assert_eq!(notification.amount_field(), "1499");
        assert_eq!(notification.auth_code, "");
        assert_eq!(notification.reason_code, 0);
    }

    #[test]
    fn fractional_amount_keeps_its_rendering() {
        let raw = r#"{
            "merchantAccount": "shop",
            "orderReference": "order-1",
            "amount": 499.5,
            "currency": "UAH",
            "transactionStatus": "Declined",
            "merchantSignature": ""
        }"#;
        let notification: PaymentNotification = serde_json::from_str(raw).unwrap();
        assert_eq!(notification.amount_field(), "499.5");
        assert_eq!(notification.amount_cents(), 49950);
    }

    #[test]
    fn ack_serializes_camel_case() {
        let ack = CallbackAck {
            order_reference: "order-1".to_string(),
            status: "accept".to_string(),
            time: 1_700_000_000,
            signature: "ab".to_string(),
        };
        let value = serde_json::to_value(&ack).unwrap();
        assert!(value.get("orderReference").is_some());
        assert!(value.get("status").is_some());
    }
}
