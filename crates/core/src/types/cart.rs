//! The per-user server-side cart, mirrored transiently by the client.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::id::{CartItemId, ProductId};

/// A cart line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product_id: ProductId,
    #[serde(default)]
    pub product: Option<Product>,
    pub quantity: i64,
}

impl CartItem {
    /// Stock of the embedded product, when the backend included it.
    #[must_use]
    pub fn known_stock(&self) -> Option<i64> {
        self.product.as_ref().map(|p| p.stock)
    }

    /// Line total at the product's current price (zero if not embedded).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product
            .as_ref()
            .map_or(Decimal::ZERO, |p| p.price * Decimal::from(self.quantity))
    }
}

/// The current user's cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Look up a line by id.
    #[must_use]
    pub fn item(&self, id: CartItemId) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_cart_totals() {
        let cart: Cart = serde_json::from_value(json!([
            { "id": 1, "product_id": 5, "quantity": 2,
              "product": { "id": 5, "name": "Pen", "price": "1.50", "stock": 10 } },
            { "id": 2, "product_id": 6, "quantity": 1 }
        ]))
        .unwrap();

        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal(), Decimal::new(300, 2));
        assert_eq!(cart.item(CartItemId::new(1)).unwrap().known_stock(), Some(10));
        assert_eq!(cart.item(CartItemId::new(2)).unwrap().known_stock(), None);
    }
}
