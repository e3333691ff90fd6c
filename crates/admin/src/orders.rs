//! Order management.
//!
//! - `GET /admin/orders` - every customer's orders
//! - `PUT /admin/orders/{id}/status`
//! - `DELETE /orders/{id}`

use tracing::instrument;

use shopfront_core::{Order, OrderId, OrderStatus, StatusUpdate};
use shopfront_storefront::{ApiError, Result};

use crate::client::AdminClient;

impl AdminClient {
    /// All orders, across users.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>> {
        self.api().get_list("/admin/orders", &[]).await
    }

    /// Move an order to another status.
    ///
    /// # Errors
    ///
    /// `ApiError::InvalidInput` for a status the backend does not accept,
    /// otherwise any error from the backend.
    #[instrument(skip(self), fields(order_id = %id, status = %status))]
    pub async fn update_order_status(&self, id: OrderId, status: OrderStatus) -> Result<Order> {
        if !OrderStatus::ASSIGNABLE.contains(&status) {
            return Err(ApiError::InvalidInput(format!(
                "cannot assign order status {status}"
            )));
        }
        let order: Order = self
            .api()
            .put(&format!("/admin/orders/{id}/status"), &StatusUpdate { status })
            .await?;
        tracing::info!(order_id = %order.id, status = %order.status, "Order status changed");
        Ok(order)
    }

    /// # Errors
    ///
    /// Any [`ApiError`], including `NotFound` when already gone.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn delete_order(&self, id: OrderId) -> Result<()> {
        self.api().delete(&format!("/orders/{id}")).await
    }
}
