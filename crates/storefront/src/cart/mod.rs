//! The signed-in user's server-side cart.
//!
//! - `GET /cart`
//! - `POST /cart` - add a product
//! - `PUT /cart/{id}` - set a line's quantity
//! - `DELETE /cart/{id}`
//! - `DELETE /cart/clear`
//! - `POST /cart/checkout` → the placed order
//!
//! Every mutation publishes [`AppEvent::CartChanged`] so the cart badge can
//! refetch; adding also publishes [`AppEvent::OpenCart`].

mod controller;

pub use controller::{
    CartBackend, CartController, LineView, Outcome, QuantityError, UpdateTicket,
};

use tracing::instrument;

use shopfront_core::{Cart, CartItem, CartItemId, CartLineInput, Order, ProductId, QuantityUpdate};

use crate::api::ApiClient;
use crate::error::{ApiError, Result};
use crate::events::AppEvent;

impl ApiClient {
    /// The current cart.
    ///
    /// # Errors
    ///
    /// `ApiError::AuthRequired` when signed out, or any other [`ApiError`].
    #[instrument(skip(self))]
    pub async fn get_cart(&self) -> Result<Cart> {
        let items: Vec<CartItem> = self.get_list("/cart", &[]).await?;
        Ok(Cart { items })
    }

    /// Add `quantity` units of a product.
    ///
    /// # Errors
    ///
    /// `ApiError::InvalidInput` for a non-positive quantity, otherwise any
    /// error from the backend (for instance a stock validation error).
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_cart(&self, product_id: ProductId, quantity: i64) -> Result<CartItem> {
        if quantity < 1 {
            return Err(ApiError::InvalidInput(
                "quantity must be at least 1".to_string(),
            ));
        }
        let item: CartItem = self
            .post(
                "/cart",
                &CartLineInput {
                    product_id,
                    quantity,
                },
            )
            .await?;
        self.events().emit(AppEvent::CartChanged);
        self.events().emit(AppEvent::OpenCart);
        Ok(item)
    }

    /// Set a line's quantity.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[instrument(skip(self), fields(cart_item_id = %id))]
    pub async fn update_cart_item(&self, id: CartItemId, quantity: i64) -> Result<CartItem> {
        let item: CartItem = self
            .put(&format!("/cart/{id}"), &QuantityUpdate { quantity })
            .await?;
        self.events().emit(AppEvent::CartChanged);
        Ok(item)
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[instrument(skip(self), fields(cart_item_id = %id))]
    pub async fn remove_cart_item(&self, id: CartItemId) -> Result<()> {
        self.delete(&format!("/cart/{id}")).await?;
        self.events().emit(AppEvent::CartChanged);
        Ok(())
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[instrument(skip(self))]
    pub async fn clear_cart(&self) -> Result<()> {
        self.delete("/cart/clear").await?;
        self.events().emit(AppEvent::CartChanged);
        Ok(())
    }

    /// Turn the cart into an order. The backend empties the cart.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`], typically a validation error for an empty cart or
    /// insufficient stock.
    #[instrument(skip(self))]
    pub async fn checkout(&self) -> Result<Order> {
        let order: Order = self.post_action("/cart/checkout").await?;
        tracing::info!(order_id = %order.id, total = %order.total, "Order placed");
        self.events().emit(AppEvent::CartChanged);
        Ok(order)
    }
}
