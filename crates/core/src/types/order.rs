//! Orders and order lines.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::id::{OrderId, ProductId, UserId};
use super::status::OrderStatus;
use super::user::User;

/// A line of a placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    #[serde(default)]
    pub product: Option<Product>,
    pub quantity: i64,
    /// Unit price at the time the order was placed.
    pub price: Decimal,
}

impl OrderItem {
    /// Quantity times the unit price captured at checkout.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    /// Owning user, present on admin listings.
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default, alias = "order_items")]
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Sum of line totals, for cross-checking against the server's `total`.
    #[must_use]
    pub fn items_total(&self) -> Decimal {
        self.items.iter().map(OrderItem::line_total).sum()
    }
}
