//! Cart mutations, optimistic quantity edits and checkout.

use shopfront_core::{CartItemId, OrderId, ProductId};
use shopfront_integration_tests::MockBackend;
use shopfront_storefront::{ApiError, AppEvent, CartController, Outcome, QuantityError};

const LINE: CartItemId = CartItemId::new(100);

#[tokio::test]
async fn test_cart_requires_sign_in() {
    let backend = MockBackend::start().await;
    let err = backend.client().get_cart().await.unwrap_err();
    assert!(matches!(err, ApiError::AuthRequired));
}

#[tokio::test]
async fn test_add_to_cart_announces_change() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;
    let mut events = api.events().subscribe();

    let item = api.add_to_cart(ProductId::new(3), 2).await.unwrap();
    assert_eq!(item.quantity, 2);
    assert_eq!(events.try_recv().unwrap(), AppEvent::CartChanged);
    assert_eq!(events.try_recv().unwrap(), AppEvent::OpenCart);

    let cart = api.get_cart().await.unwrap();
    assert_eq!(cart.item_count(), 3);
    assert_eq!(cart.subtotal().to_string(), "69.50");
}

#[tokio::test]
async fn test_quantity_update_applies_server_answer() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;
    let mut cart = CartController::new(api.get_cart().await.unwrap());

    let outcome = cart.set_quantity(&api, LINE, 4).await.unwrap();
    assert_eq!(outcome, Outcome::Applied { quantity: 4 });
    assert_eq!(backend.state().cart[0]["quantity"], 4);
}

#[tokio::test]
async fn test_rejected_quantity_reverts_with_message() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;
    // stock drops after the cart was loaded
    let mut cart = CartController::new(api.get_cart().await.unwrap());
    backend.state().cart[0]["product"]["stock"] = serde_json::json!(2);

    let outcome = cart.set_quantity(&api, LINE, 4).await.unwrap();
    assert_eq!(outcome, Outcome::Reverted { to: 1 });

    let line = cart.line(LINE).unwrap();
    assert_eq!(line.quantity, 1);
    assert_eq!(line.error.as_deref(), Some("Only 2 left in stock."));
}

#[tokio::test]
async fn test_quantity_above_known_stock_is_not_sent() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;
    let mut cart = CartController::new(api.get_cart().await.unwrap());

    let err = cart.set_quantity(&api, LINE, 6).await.unwrap_err();
    assert_eq!(
        err,
        QuantityError::ExceedsStock {
            requested: 6,
            stock: 5
        }
    );
    assert!(backend.requests_to("PUT", "/cart/100").is_empty());
}

#[tokio::test]
async fn test_checkout_and_history() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;

    let order = api.checkout().await.unwrap();
    assert_eq!(order.items.len(), 1);
    assert!(api.get_cart().await.unwrap().is_empty());

    let err = api.checkout().await.unwrap_err();
    assert_eq!(err.tag(), "server-error");
    assert!(err.to_string().contains("Your cart is empty"));

    let orders = api.list_orders().await.unwrap();
    assert_eq!(orders.len(), 2);
    let first = api.order(OrderId::new(500)).await.unwrap();
    assert_eq!(first.items_total(), first.total);
}

#[tokio::test]
async fn test_remove_and_clear() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;
    api.add_to_cart(ProductId::new(2), 1).await.unwrap();

    api.remove_cart_item(LINE).await.unwrap();
    assert_eq!(api.get_cart().await.unwrap().items.len(), 1);

    api.clear_cart().await.unwrap();
    assert!(api.get_cart().await.unwrap().is_empty());
}
