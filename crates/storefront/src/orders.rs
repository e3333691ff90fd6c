//! The signed-in user's order history.
//!
//! - `GET /orders`
//! - `GET /orders/{id}`

use tracing::instrument;

use shopfront_core::{Order, OrderId};

use crate::api::ApiClient;
use crate::error::Result;

impl ApiClient {
    /// Orders placed by the current user, newest first as the backend
    /// returns them.
    ///
    /// # Errors
    ///
    /// `ApiError::AuthRequired` when signed out, or any other
    /// [`ApiError`](crate::ApiError).
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        self.get_list("/orders", &[]).await
    }

    /// One of the current user's orders.
    ///
    /// # Errors
    ///
    /// `ApiError::NotFound` for an unknown id or another user's order.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn order(&self, id: OrderId) -> Result<Order> {
        self.get(&format!("/orders/{id}")).await
    }
}
