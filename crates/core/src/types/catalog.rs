//! Catalog entities: products and categories.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// A product as returned by the backend.
///
/// The copy held by the client is whatever the last successful fetch
/// returned; nothing here is kept in sync with the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    /// Units in stock. Older backends call this `quantity`.
    #[serde(default, alias = "quantity")]
    pub stock: i64,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Embedded category, present when the backend eager-loads it.
    #[serde(default)]
    pub category: Option<Category>,
    /// Image path relative to the backend's storage root.
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Name of the embedded category, if loaded.
    #[must_use]
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    /// Whether at least one unit can be ordered.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_accepts_string_price_and_quantity_alias() {
        let product: Product = serde_json::from_value(json!({
            "id": 3,
            "name": "Desk Lamp",
            "price": "24.50",
            "quantity": 4,
            "category": { "id": 1, "name": "Lighting", "slug": "lighting" }
        }))
        .unwrap();

        assert_eq!(product.price, Decimal::new(2450, 2));
        assert_eq!(product.stock, 4);
        assert_eq!(product.category_name(), Some("Lighting"));
        assert!(product.description.is_none());
    }

    #[test]
    fn test_product_accepts_numeric_price() {
        let product: Product =
            serde_json::from_value(json!({ "id": 1, "name": "Mug", "price": 9, "stock": 0 }))
                .unwrap();
        assert_eq!(product.price, Decimal::new(9, 0));
        assert!(!product.in_stock());
    }
}
