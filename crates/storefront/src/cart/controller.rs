//! Optimistic cart quantity editing.
//!
//! A quantity change is shown immediately and sent to the backend. Each
//! request carries a sequence number; only the response to the newest
//! request for a line may change what that line shows. Older responses can
//! still advance the last confirmed quantity, and older failures are dropped.
//! After the newest request settles the display is either the server's
//! answer or the last confirmed quantity, whatever order responses arrive in.
//!
//! [`CartController::begin`] and [`CartController::complete`] are the
//! synchronous halves; [`CartController::set_quantity`] drives both around a
//! [`CartBackend`] call.

use std::future::Future;

use shopfront_core::{Cart, CartItem, CartItemId, ProductId};

use crate::api::ApiClient;
use crate::error::{ApiError, Result};

/// The single backend call the controller needs.
pub trait CartBackend: Send + Sync {
    /// Set a line's quantity, returning the quantity the server stored.
    fn update_quantity(
        &self,
        id: CartItemId,
        quantity: i64,
    ) -> impl Future<Output = Result<i64>> + Send;
}

impl CartBackend for ApiClient {
    async fn update_quantity(&self, id: CartItemId, quantity: i64) -> Result<i64> {
        self.update_cart_item(id, quantity)
            .await
            .map(|item| item.quantity)
    }
}

/// A rejected quantity, caught before any request is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuantityError {
    #[error("quantity must be at least 1")]
    NotPositive,

    #[error("only {stock} in stock (requested {requested})")]
    ExceedsStock { requested: i64, stock: i64 },

    #[error("cart line {0} not found")]
    UnknownItem(CartItemId),
}

/// An update in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateTicket {
    pub item: CartItemId,
    pub seq: u64,
    pub quantity: i64,
}

/// What a completed request did to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Newest request succeeded; the line shows `quantity`.
    Applied { quantity: i64 },
    /// Newest request failed; the line went back to `to`.
    Reverted { to: i64 },
    /// A newer request exists, so the display was left to it.
    Stale,
}

/// A cart line as it should be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct LineView {
    pub id: CartItemId,
    pub product_id: ProductId,
    pub name: Option<String>,
    pub quantity: i64,
    /// The newest request for this line has not answered yet.
    pub pending: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
struct LineState {
    item: CartItem,
    displayed: i64,
    confirmed: i64,
    confirmed_seq: u64,
    latest_seq: u64,
    pending: bool,
    error: Option<String>,
}

impl LineState {
    fn new(item: CartItem) -> Self {
        Self {
            displayed: item.quantity,
            confirmed: item.quantity,
            confirmed_seq: 0,
            latest_seq: 0,
            pending: false,
            error: None,
            item,
        }
    }

    fn view(&self) -> LineView {
        LineView {
            id: self.item.id,
            product_id: self.item.product_id,
            name: self.item.product.as_ref().map(|p| p.name.clone()),
            quantity: self.displayed,
            pending: self.pending,
            error: self.error.clone(),
        }
    }
}

/// Client-side view of the cart with optimistic quantity edits.
#[derive(Debug, Default)]
pub struct CartController {
    lines: Vec<LineState>,
    next_seq: u64,
}

impl CartController {
    #[must_use]
    pub fn new(cart: Cart) -> Self {
        Self {
            lines: cart.items.into_iter().map(LineState::new).collect(),
            next_seq: 0,
        }
    }

    /// Replace the lines with a freshly fetched cart. In-flight tickets for
    /// the old lines complete as [`Outcome::Stale`].
    pub fn reset(&mut self, cart: Cart) {
        self.lines = cart.items.into_iter().map(LineState::new).collect();
    }

    #[must_use]
    pub fn lines(&self) -> Vec<LineView> {
        self.lines.iter().map(LineState::view).collect()
    }

    #[must_use]
    pub fn line(&self, id: CartItemId) -> Option<LineView> {
        self.find(id).map(LineState::view)
    }

    /// Units shown across all lines.
    #[must_use]
    pub fn displayed_count(&self) -> i64 {
        self.lines.iter().map(|l| l.displayed).sum()
    }

    fn find(&self, id: CartItemId) -> Option<&LineState> {
        self.lines.iter().find(|l| l.item.id == id)
    }

    fn find_mut(&mut self, id: CartItemId) -> Option<&mut LineState> {
        self.lines.iter_mut().find(|l| l.item.id == id)
    }

    /// Validate and show a new quantity, returning the ticket for the
    /// request the caller must now send.
    ///
    /// The upper bound is the embedded product's stock; lines without an
    /// embedded product are only checked for positivity.
    ///
    /// # Errors
    ///
    /// Returns a [`QuantityError`] and records it on the line; the display
    /// is not changed.
    pub fn begin(&mut self, id: CartItemId, quantity: i64) -> std::result::Result<UpdateTicket, QuantityError> {
        self.next_seq += 1;
        let seq = self.next_seq;
        let line = self.find_mut(id).ok_or(QuantityError::UnknownItem(id))?;

        let rejected = if quantity < 1 {
            Some(QuantityError::NotPositive)
        } else {
            line.item
                .known_stock()
                .filter(|&stock| quantity > stock)
                .map(|stock| QuantityError::ExceedsStock {
                    requested: quantity,
                    stock,
                })
        };
        if let Some(e) = rejected {
            line.error = Some(e.to_string());
            return Err(e);
        }

        line.displayed = quantity;
        line.latest_seq = seq;
        line.pending = true;
        line.error = None;

        Ok(UpdateTicket {
            item: id,
            seq,
            quantity,
        })
    }

    /// Apply the backend's answer to a ticket.
    pub fn complete(&mut self, ticket: &UpdateTicket, result: Result<i64>) -> Outcome {
        let Some(line) = self.find_mut(ticket.item) else {
            return Outcome::Stale;
        };
        let newest = ticket.seq == line.latest_seq;

        match result {
            Ok(quantity) => {
                if ticket.seq > line.confirmed_seq {
                    line.confirmed = quantity;
                    line.confirmed_seq = ticket.seq;
                    line.item.quantity = quantity;
                }
                if newest {
                    line.displayed = quantity;
                    line.pending = false;
                    line.error = None;
                    Outcome::Applied { quantity }
                } else {
                    // newest already failed and reverted; show what the server now holds
                    if !line.pending {
                        line.displayed = line.confirmed;
                    }
                    Outcome::Stale
                }
            }
            Err(e) if newest => {
                tracing::warn!(cart_item_id = %ticket.item, error = %e, "Quantity update failed; reverting");
                line.displayed = line.confirmed;
                line.pending = false;
                line.error = Some(error_message(&e));
                Outcome::Reverted { to: line.confirmed }
            }
            Err(e) => {
                tracing::debug!(cart_item_id = %ticket.item, seq = ticket.seq, error = %e, "Dropping stale update failure");
                Outcome::Stale
            }
        }
    }

    /// Show `quantity`, send it and settle the line.
    ///
    /// # Errors
    ///
    /// Only validation errors; request failures are absorbed into the line's
    /// error state and reported as [`Outcome::Reverted`].
    pub async fn set_quantity<B: CartBackend>(
        &mut self,
        backend: &B,
        id: CartItemId,
        quantity: i64,
    ) -> std::result::Result<Outcome, QuantityError> {
        let ticket = self.begin(id, quantity)?;
        let result = backend.update_quantity(id, quantity).await;
        Ok(self.complete(&ticket, result))
    }
}

fn error_message(error: &ApiError) -> String {
    match error {
        ApiError::Validation(message) => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use shopfront_core::Product;

    use super::*;

    fn cart(quantity: i64, stock: Option<i64>) -> Cart {
        Cart {
            items: vec![CartItem {
                id: CartItemId::new(1),
                product_id: ProductId::new(10),
                product: stock.map(|stock| Product {
                    id: ProductId::new(10),
                    name: "Lamp".to_string(),
                    description: None,
                    price: Decimal::new(1999, 2),
                    stock,
                    category_id: None,
                    category: None,
                    image: None,
                }),
                quantity,
            }],
        }
    }

    const LINE: CartItemId = CartItemId::new(1);

    fn shown(c: &CartController) -> i64 {
        c.line(LINE).unwrap().quantity
    }

    struct Backend(Result<i64>);

    impl CartBackend for Backend {
        async fn update_quantity(&self, _id: CartItemId, _quantity: i64) -> Result<i64> {
            match &self.0 {
                Ok(q) => Ok(*q),
                Err(_) => Err(ApiError::Validation("quantity: not enough stock".to_string())),
            }
        }
    }

    #[test]
    fn test_begin_shows_quantity_immediately() {
        let mut c = CartController::new(cart(1, Some(5)));
        let ticket = c.begin(LINE, 3).unwrap();
        assert_eq!(shown(&c), 3);
        assert!(c.line(LINE).unwrap().pending);

        assert_eq!(c.complete(&ticket, Ok(3)), Outcome::Applied { quantity: 3 });
        assert!(!c.line(LINE).unwrap().pending);
    }

    #[test]
    fn test_validation_bounds() {
        let mut c = CartController::new(cart(2, Some(5)));
        assert_eq!(c.begin(LINE, 0), Err(QuantityError::NotPositive));
        assert_eq!(
            c.begin(LINE, 6),
            Err(QuantityError::ExceedsStock {
                requested: 6,
                stock: 5
            })
        );
        assert_eq!(shown(&c), 2);
        assert!(c.line(LINE).unwrap().error.is_some());
        assert!(c.begin(LINE, 5).is_ok());

        let mut unknown_stock = CartController::new(cart(1, None));
        assert!(unknown_stock.begin(LINE, 500).is_ok());
        assert_eq!(
            unknown_stock.begin(CartItemId::new(9), 1),
            Err(QuantityError::UnknownItem(CartItemId::new(9)))
        );
    }

    #[test]
    fn test_failure_reverts_to_last_confirmed() {
        let mut c = CartController::new(cart(2, Some(5)));
        let ticket = c.begin(LINE, 4).unwrap();
        let outcome = c.complete(&ticket, Err(ApiError::Validation("quantity: too many".into())));

        assert_eq!(outcome, Outcome::Reverted { to: 2 });
        let line = c.line(LINE).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.error.as_deref(), Some("quantity: too many"));
    }

    #[test]
    fn test_out_of_order_success_keeps_latest_intent() {
        let mut c = CartController::new(cart(1, Some(9)));
        let first = c.begin(LINE, 2).unwrap();
        let second = c.begin(LINE, 3).unwrap();

        assert_eq!(c.complete(&second, Ok(3)), Outcome::Applied { quantity: 3 });
        assert_eq!(c.complete(&first, Ok(2)), Outcome::Stale);
        assert_eq!(shown(&c), 3);
    }

    #[test]
    fn test_stale_failure_is_ignored() {
        let mut c = CartController::new(cart(1, Some(9)));
        let first = c.begin(LINE, 2).unwrap();
        let second = c.begin(LINE, 3).unwrap();

        assert_eq!(c.complete(&first, Err(ApiError::AuthRequired)), Outcome::Stale);
        assert_eq!(shown(&c), 3);
        assert!(c.line(LINE).unwrap().error.is_none());
        assert_eq!(c.complete(&second, Ok(3)), Outcome::Applied { quantity: 3 });
    }

    #[test]
    fn test_late_success_after_latest_failed_shows_server_state() {
        let mut c = CartController::new(cart(1, Some(9)));
        let first = c.begin(LINE, 2).unwrap();
        let second = c.begin(LINE, 8).unwrap();

        assert_eq!(
            c.complete(&second, Err(ApiError::Validation("no".into()))),
            Outcome::Reverted { to: 1 }
        );
        assert_eq!(c.complete(&first, Ok(2)), Outcome::Stale);
        assert_eq!(shown(&c), 2);
        assert_eq!(c.displayed_count(), 2);
    }

    #[test]
    fn test_reset_makes_old_tickets_stale() {
        let mut c = CartController::new(cart(1, Some(9)));
        let ticket = c.begin(LINE, 2).unwrap();
        c.reset(Cart::default());
        assert_eq!(c.complete(&ticket, Ok(2)), Outcome::Stale);
        assert!(c.lines().is_empty());
    }

    #[tokio::test]
    async fn test_set_quantity_round_trip() {
        let mut c = CartController::new(cart(1, Some(9)));
        let outcome = c.set_quantity(&Backend(Ok(4)), LINE, 4).await.unwrap();
        assert_eq!(outcome, Outcome::Applied { quantity: 4 });

        let outcome = c
            .set_quantity(&Backend(Err(ApiError::AuthRequired)), LINE, 6)
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Reverted { to: 4 });
        assert_eq!(
            c.line(LINE).unwrap().error.as_deref(),
            Some("quantity: not enough stock")
        );
    }
}
