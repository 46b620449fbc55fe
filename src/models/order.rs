//! Payment order model.
//!
//! An order tracks one payment-provider transaction for one entitlement.
//! Its lifecycle is independent of the Grant it produces: the grant row
//! survives even if the order record is later archived.

use chrono::{DateTime, Utc};

/// Order status values as stored in the `status` column.
///
/// State machine: `pending -> approved` or `pending -> declined`, terminal
/// in both cases. Transitions are guarded in SQL (`WHERE status =
/// 'pending'`) so concurrent or repeated callbacks cannot double-apply.
pub mod status {
    pub const PENDING: &str = "pending";
    pub const APPROVED: &str = "approved";
    pub const DECLINED: &str = "declined";
}

/// Represents an order record from the database.
///
/// # Database Table
///
/// Maps to the `orders` table, unique on `order_reference`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Order {
    pub id: i64,

    /// Provider-facing reference, generated at invoice creation
    pub order_reference: String,

    /// Normalized email of the buyer (login-before-purchase is required,
    /// so this always comes from a verified session)
    pub email: String,

    /// Entitlement the buyer is paying for
    pub entitlement_id: String,

    /// Price at order time, in cents (never floats)
    pub amount_cents: i64,

    /// Currency code the order was priced in
    pub currency: String,

    /// One of the `status` module constants
    pub status: String,

    pub created_at: DateTime<Utc>,

    /// Set when the order transitions to approved
    pub paid_at: Option<DateTime<Utc>>,
}
