//! Admin CRUD against the mock backend.

use rust_decimal::Decimal;
use shopfront_admin::{AdminClient, ImageUpload, ManagedList, Removal, delete_tolerant};
use shopfront_core::{
    CategoryId, CategoryInput, OrderId, OrderStatus, ProductId, ProductInput, Role, UserId,
    UserInput,
};
use shopfront_integration_tests::MockBackend;
use shopfront_storefront::ApiError;

async fn admin(backend: &MockBackend) -> AdminClient {
    AdminClient::connect(backend.signed_in("admin@shop.test").await)
        .await
        .unwrap()
}

fn mug() -> ProductInput {
    ProductInput {
        name: "Green Mug".to_string(),
        description: Some("Stoneware".to_string()),
        price: Decimal::new(1100, 2),
        stock: 6,
        category_id: CategoryId::new(2),
    }
}

fn image() -> ImageUpload {
    ImageUpload {
        file_name: "mug.png".to_string(),
        mime: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}

#[tokio::test]
async fn test_non_admin_is_refused_before_any_request() {
    let backend = MockBackend::start().await;
    let api = backend.signed_in("grace@shop.test").await;
    let before = backend.state().requests.len();

    let err = AdminClient::connect(api).await.unwrap_err();
    assert!(matches!(err, ApiError::Forbidden(_)));
    assert_eq!(backend.state().requests.len(), before);

    let err = AdminClient::connect(backend.client()).await.unwrap_err();
    assert!(matches!(err, ApiError::AuthRequired));
}

#[tokio::test]
async fn test_create_product_is_multipart_with_image() {
    let backend = MockBackend::start().await;
    let admin = admin(&backend).await;

    let product = admin.create_product(&mug(), Some(image())).await.unwrap();
    assert_eq!(product.name, "Green Mug");
    assert_eq!(product.image.as_deref(), Some("products/mug.png"));

    let sent = backend.requests_to("POST", "/products");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].fields["price"], "11.00");
    assert_eq!(sent[0].fields["category_id"], "2");
    assert_eq!(sent[0].files["image"], "mug.png");
    assert!(!sent[0].fields.contains_key("_method"));
}

#[tokio::test]
async fn test_update_with_image_tunnels_put_through_post() {
    let backend = MockBackend::start().await;
    let admin = admin(&backend).await;

    let product = admin
        .update_product(ProductId::new(2), &mug(), Some(image()))
        .await
        .unwrap();
    assert_eq!(product.id, ProductId::new(2));

    let sent = backend.requests_to("POST", "/products/2");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].fields["_method"], "PUT");
    assert!(backend.requests_to("PUT", "/products/2").is_empty());
}

#[tokio::test]
async fn test_update_without_image_is_json_put() {
    let backend = MockBackend::start().await;
    let admin = admin(&backend).await;

    admin
        .update_product(ProductId::new(2), &mug(), None)
        .await
        .unwrap();

    let sent = backend.requests_to("PUT", "/products/2");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].json.as_ref().unwrap()["name"], "Green Mug");
    assert!(backend.requests_to("POST", "/products/2").is_empty());
}

#[tokio::test]
async fn test_invalid_product_is_not_sent() {
    let backend = MockBackend::start().await;
    let admin = admin(&backend).await;

    let mut input = mug();
    input.name = "  ".to_string();
    let err = admin.create_product(&input, None).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert!(backend.requests_to("POST", "/products").is_empty());
}

#[tokio::test]
async fn test_delete_tolerates_rows_already_gone() {
    let backend = MockBackend::start().await;
    let admin = admin(&backend).await;
    let mut rows = ManagedList::new(admin.list_categories().await.unwrap());

    // Someone else deleted category 2 first
    backend.state().categories.retain(|c| c["id"] != 2);

    let removal = rows
        .remove(CategoryId::new(2), |id| admin.delete_category(id))
        .await
        .unwrap();
    assert_eq!(removal, Removal::AlreadyGone);

    let removal = rows
        .remove(CategoryId::new(1), |id| admin.delete_category(id))
        .await
        .unwrap();
    assert_eq!(removal, Removal::Deleted);
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_single_delete_sends_only_the_delete() {
    let backend = MockBackend::start().await;
    let admin = admin(&backend).await;
    let before = backend.state().requests.len();

    let removal = delete_tolerant(ProductId::new(7), |id| admin.delete_product(id))
        .await
        .unwrap();
    assert_eq!(removal, Removal::Deleted);
    let removal = delete_tolerant(ProductId::new(7), |id| admin.delete_product(id))
        .await
        .unwrap();
    assert_eq!(removal, Removal::AlreadyGone);

    let sent: Vec<_> = backend.state().requests[before..]
        .iter()
        .map(|r| (r.method.clone(), r.path.clone()))
        .collect();
    assert_eq!(
        sent,
        vec![
            ("DELETE".to_string(), "/products/7".to_string()),
            ("DELETE".to_string(), "/products/7".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_categories_create_and_update_slug() {
    let backend = MockBackend::start().await;
    let admin = admin(&backend).await;

    let created = admin
        .create_category(&CategoryInput::new("Home & Garden", None))
        .await
        .unwrap();
    assert_eq!(created.slug, "home-garden");

    let updated = admin
        .update_category(created.id, &CategoryInput::new("Garden", Some("outdoor")))
        .await
        .unwrap();
    assert_eq!(updated.slug, "outdoor");
}

#[tokio::test]
async fn test_user_password_only_sent_when_given() {
    let backend = MockBackend::start().await;
    let admin = admin(&backend).await;

    let input = UserInput {
        name: "Marie".to_string(),
        email: "marie@shop.test".parse().unwrap(),
        password: Some("longenough".to_string()),
        role: Role::User,
        phone: None,
        address: None,
        city: Some("Paris".to_string()),
    };
    let created = admin.create_user(&input).await.unwrap();
    assert_eq!(created.city.as_deref(), Some("Paris"));

    let update = UserInput {
        password: None,
        role: Role::Admin,
        ..input
    };
    let updated = admin.update_user(created.id, &update).await.unwrap();
    assert!(updated.is_admin());

    let created_body = backend.requests_to("POST", "/users")[0].json.clone().unwrap();
    assert_eq!(created_body["password"], "longenough");
    let path = format!("/users/{}", created.id);
    let updated_body = backend.requests_to("PUT", &path)[0].json.clone().unwrap();
    assert!(updated_body.get("password").is_none());
    assert!(updated_body.get("phone").is_none());
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let backend = MockBackend::start().await;
    let admin = admin(&backend).await;

    let err = admin.delete_user(UserId::new(2)).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));
    assert_eq!(admin.list_users().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_orders_status_and_delete() {
    let backend = MockBackend::start().await;
    let admin = admin(&backend).await;

    let orders = admin.list_orders().await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].user.as_ref().unwrap().name, "Grace");

    let order = admin
        .update_order_status(OrderId::new(500), OrderStatus::Shipped)
        .await
        .unwrap();
    assert_eq!(order.status, OrderStatus::Shipped);

    let err = admin
        .update_order_status(OrderId::new(500), OrderStatus::Other("lost".to_string()))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput(_)));

    admin.delete_order(OrderId::new(500)).await.unwrap();
    assert!(admin.delete_order(OrderId::new(500)).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn test_fetch_all_products_for_admin_table() {
    let backend = MockBackend::start().await;
    let admin = admin(&backend).await;

    let products = admin.all_products().await.unwrap();
    assert_eq!(products.len(), 7);
    let first = admin.list_products(1).await.unwrap();
    assert_eq!(first.items.len(), 3);
}
