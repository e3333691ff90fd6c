//! Catalog listing, envelopes and search.

use shopfront_core::ProductId;
use shopfront_integration_tests::MockBackend;
use shopfront_storefront::{ApiError, BrowserMode, ProductBrowser};

fn ids<'a>(products: impl IntoIterator<Item = &'a shopfront_core::Product>) -> Vec<i64> {
    products.into_iter().map(|p| p.id.as_i64()).collect()
}

#[tokio::test]
async fn test_paginator_envelope_is_normalised() {
    let backend = MockBackend::start().await;
    let api = backend.client();

    let page = api.list_products(2).await.unwrap();
    assert_eq!(ids(&page.items), vec![7, 17, 27]);
    assert_eq!((page.current_page, page.last_page, page.total), (2, 3, 7));
    assert!(page.has_more());

    let product = api.product(ProductId::new(17)).await.unwrap();
    assert_eq!(product.name, "Kettle");
    assert_eq!(product.category_name(), Some("Kitchen"));

    let categories = api.list_categories().await.unwrap();
    assert_eq!(categories.len(), 2);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let backend = MockBackend::start().await;
    let err = backend
        .client()
        .product(ProductId::new(999))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(err, ApiError::NotFound(ref m) if m == "Product not found"));
}

#[tokio::test]
async fn test_fetch_all_pages() {
    let backend = MockBackend::start().await;
    let all = backend.client().fetch_all_products().await.unwrap();
    assert_eq!(ids(&all), vec![1, 2, 3, 7, 17, 27, 30]);
}

#[tokio::test]
async fn test_fetch_all_falls_back_to_first_page() {
    let backend = MockBackend::start().await;
    backend.state().failing_pages.insert(3);

    let all = backend.client().fetch_all_products().await.unwrap();
    assert_eq!(ids(&all), vec![1, 2, 3]);
    assert_eq!(backend.requests_to("GET", "/products").len(), 3);
}

#[tokio::test]
async fn test_server_search_accepts_bare_array() {
    let backend = MockBackend::start().await;
    let results = backend.client().search_products("mug").await.unwrap();
    assert_eq!(ids(&results), vec![1, 30]);
}

#[tokio::test]
async fn test_browser_searches_locally_and_restores_server_page() {
    let backend = MockBackend::start().await;
    let mut browser = ProductBrowser::open(backend.client(), 2).await.unwrap();
    assert_eq!(browser.mode(), BrowserMode::Server);
    assert_eq!(ids(&browser.view().items), vec![1, 2, 3]);

    let view = browser.search("7").await.unwrap();
    assert_eq!(ids(&view.items), vec![7, 17]);
    assert_eq!((view.current_page, view.last_page, view.total), (1, 2, 3));

    let view = browser.goto_page(2).await.unwrap();
    assert_eq!(ids(&view.items), vec![27]);

    // The catalog is fetched once and reused for later queries
    let fetched = backend.requests_to("GET", "/products").len();
    let view = browser.search("kitchen").await.unwrap();
    assert_eq!(view.total, 5);
    assert_eq!(backend.requests_to("GET", "/products").len(), fetched);
    assert_eq!(browser.query(), Some("kitchen"));

    let view = browser.search("   ").await.unwrap();
    assert_eq!(ids(&view.items), vec![1, 2, 3]);
    assert_eq!((view.current_page, view.last_page, view.total), (1, 3, 7));
    assert_eq!(browser.mode(), BrowserMode::Server);
    assert_eq!(browser.query(), None);
    assert_eq!(backend.requests_to("GET", "/products").len(), fetched + 1);
}

#[tokio::test]
async fn test_browser_refetches_partial_catalog() {
    let backend = MockBackend::start().await;
    backend.state().failing_pages.insert(3);
    let mut browser = ProductBrowser::open(backend.client(), 5).await.unwrap();

    let view = browser.search("7").await.unwrap();
    assert!(view.items.is_empty());
    assert!(!browser.has_catalog());

    backend.state().failing_pages.clear();
    let view = browser.search("7").await.unwrap();
    assert_eq!(ids(&view.items), vec![7, 17, 27]);
    assert!(browser.has_catalog());

    let fetched = backend.requests_to("GET", "/products").len();
    browser.search("kettle").await.unwrap();
    assert_eq!(backend.requests_to("GET", "/products").len(), fetched);
}

#[tokio::test]
async fn test_collect_pages_flags_fallback() {
    let backend = MockBackend::start().await;
    let api = backend.client();
    assert!(api.collect_all_products().await.unwrap().complete);

    backend.state().failing_pages.insert(2);
    let all = api.collect_all_products().await.unwrap();
    assert!(!all.complete);
    assert_eq!(ids(&all.items), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_browser_search_without_matches_is_an_empty_page() {
    let backend = MockBackend::start().await;
    let mut browser = ProductBrowser::open(backend.client(), 4).await.unwrap();

    let view = browser.search("zebra").await.unwrap();
    assert!(view.items.is_empty());
    assert_eq!((view.current_page, view.last_page, view.total), (1, 1, 0));
}
