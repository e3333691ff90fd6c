//! Catalog, cart and order history.

use shopfront_core::{CartItemId, OrderId, ProductId};
use shopfront_storefront::catalog::paginate;
use shopfront_storefront::{ApiClient, CartController, Outcome, ProductBrowser, require_user};

use super::CommandResult;
use crate::output;

pub async fn products_list(api: &ApiClient, page_size: usize, page: usize) -> CommandResult {
    let mut browser = ProductBrowser::open(api.clone(), page_size).await?;
    if page > 1 {
        browser.goto_page(page).await?;
    }
    output::products(browser.view());
    Ok(())
}

pub async fn product_show(api: &ApiClient, id: ProductId) -> CommandResult {
    output::product(&api.product(id).await?);
    Ok(())
}

/// Search locally over the full catalog, or with `server` ask the backend.
pub async fn products_search(
    api: &ApiClient,
    page_size: usize,
    query: &str,
    page: usize,
    server: bool,
) -> CommandResult {
    if server {
        let results = api.search_products(query).await?;
        output::products(&paginate(&results, page_size, page));
        return Ok(());
    }

    let mut browser = ProductBrowser::open(api.clone(), page_size).await?;
    browser.search(query).await?;
    if page > 1 {
        browser.goto_page(page).await?;
    }
    output::products(browser.view());
    Ok(())
}

pub async fn categories(api: &ApiClient) -> CommandResult {
    output::categories(&api.list_categories().await?);
    Ok(())
}

pub async fn cart_show(api: &ApiClient) -> CommandResult {
    require_user(api.session()).await?;
    output::cart(&api.get_cart().await?);
    Ok(())
}

pub async fn cart_add(api: &ApiClient, product: ProductId, quantity: i64) -> CommandResult {
    require_user(api.session()).await?;
    let item = api.add_to_cart(product, quantity).await?;
    output::message(&format!(
        "Added to cart (line {}, quantity {}).",
        item.id, item.quantity
    ));
    Ok(())
}

pub async fn cart_set(api: &ApiClient, item: CartItemId, quantity: i64) -> CommandResult {
    require_user(api.session()).await?;
    let mut cart = CartController::new(api.get_cart().await?);
    let outcome = cart.set_quantity(api, item, quantity).await?;

    if let Some(line) = cart.line(item) {
        output::cart_line(&line);
    }
    match outcome {
        Outcome::Reverted { .. } => Err("quantity update failed".into()),
        Outcome::Applied { .. } | Outcome::Stale => Ok(()),
    }
}

pub async fn cart_remove(api: &ApiClient, item: CartItemId) -> CommandResult {
    require_user(api.session()).await?;
    api.remove_cart_item(item).await?;
    output::message("Removed.");
    Ok(())
}

pub async fn cart_clear(api: &ApiClient) -> CommandResult {
    require_user(api.session()).await?;
    api.clear_cart().await?;
    output::message("Cart cleared.");
    Ok(())
}

pub async fn checkout(api: &ApiClient) -> CommandResult {
    require_user(api.session()).await?;
    let order = api.checkout().await?;
    output::message("Thank you! Your order has been placed.");
    output::order(&order);
    Ok(())
}

pub async fn orders_list(api: &ApiClient) -> CommandResult {
    require_user(api.session()).await?;
    output::orders(&api.list_orders().await?);
    Ok(())
}

pub async fn order_show(api: &ApiClient, id: OrderId) -> CommandResult {
    require_user(api.session()).await?;
    output::order(&api.order(id).await?);
    Ok(())
}
