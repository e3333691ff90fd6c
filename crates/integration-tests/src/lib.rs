//! Integration tests for Shopfront.
//!
//! [`MockBackend`] serves the REST API the clients talk to from an axum
//! router on `127.0.0.1:0`, keeps its data in memory and records every
//! request, so tests can drive the real [`ApiClient`] over HTTP and then
//! inspect what was sent.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Seed Data
//!
//! - users `grace@shop.test` (user) and `admin@shop.test` (admin), both with
//!   password [`PASSWORD`]
//! - seven products served three per page
//! - two categories
//! - one cart line and one order for grace

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use shopfront_storefront::{ApiClient, ClientConfig, EventBus, SessionStore};

/// Password of every seeded user.
pub const PASSWORD: &str = "secret123";

/// Products per server page.
pub const PER_PAGE: usize = 3;

/// A request as the backend saw it.
#[derive(Debug, Clone, Default)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub json: Option<Value>,
    /// Multipart text fields.
    pub fields: BTreeMap<String, String>,
    /// Multipart file names by field.
    pub files: BTreeMap<String, String>,
}

/// Backend data and the request log.
#[derive(Debug, Default)]
pub struct MockState {
    pub products: Vec<Value>,
    pub categories: Vec<Value>,
    pub users: Vec<Value>,
    pub cart: Vec<Value>,
    pub orders: Vec<Value>,
    /// token → user id
    pub tokens: HashMap<String, i64>,
    /// Product pages that answer 500.
    pub failing_pages: HashSet<usize>,
    /// Hold back `/me` rejections this long.
    pub unauthorized_delay: Option<Duration>,
    pub requests: Vec<Recorded>,
    next_id: i64,
}

impl MockState {
    fn seeded() -> Self {
        let categories = vec![
            json!({ "id": 1, "name": "Kitchen", "slug": "kitchen" }),
            json!({ "id": 2, "name": "Tableware", "slug": "tableware" }),
        ];
        let product = |id: i64, name: &str, price: &str, stock: i64, category: usize| {
            json!({
                "id": id,
                "name": name,
                "description": format!("{name} for everyday use"),
                "price": price,
                "stock": stock,
                "category_id": categories[category]["id"],
                "category": categories[category],
            })
        };
        let products = vec![
            product(1, "Red Mug", "9.50", 5, 1),
            product(2, "Blue Plate", "12.00", 8, 1),
            product(3, "Tea Pot", "30.00", 2, 0),
            product(7, "Mixer", "120.00", 1, 0),
            product(17, "Kettle", "45.00", 4, 0),
            product(27, "Blender", "80.00", 3, 0),
            product(30, "Mug Tree", "15.00", 0, 0),
        ];

        let users = vec![
            json!({ "id": 1, "name": "Grace", "email": "grace@shop.test", "role": "user" }),
            json!({ "id": 2, "name": "Ada", "email": "admin@shop.test", "role": "admin" }),
        ];
        let cart = vec![json!({
            "id": 100, "product_id": 1, "quantity": 1, "product": products[0],
        })];
        let orders = vec![json!({
            "id": 500,
            "user_id": 1,
            "user": users[0],
            "order_items": [{ "product_id": 2, "quantity": 2, "price": "12.00" }],
            "total": "24.00",
            "status": "pending",
            "created_at": "2026-01-05T10:00:00Z",
        })];

        Self {
            products,
            categories,
            users,
            cart,
            orders,
            next_id: 1000,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<Value> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Bearer ")?;
        let id = *self.tokens.get(token)?;
        self.users.iter().find(|u| u["id"] == id).cloned()
    }
}

type Shared = Arc<Mutex<MockState>>;

/// In-process backend.
pub struct MockBackend {
    pub base_url: String,
    state: Shared,
}

impl MockBackend {
    /// Start a seeded backend on an ephemeral port.
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::seeded()));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let app = router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    /// Lock the backend's data.
    pub fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap()
    }

    /// Make every issued token invalid.
    pub fn revoke_tokens(&self) {
        self.state().tokens.clear();
    }

    /// Requests seen so far for `method` and `path`.
    pub fn requests_to(&self, method: &str, path: &str) -> Vec<Recorded> {
        self.state()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .cloned()
            .collect()
    }

    /// A signed-out client with its own in-memory session.
    pub fn client(&self) -> ApiClient {
        let base = self.base_url.clone();
        let config =
            ClientConfig::from_lookup(|key| (key == "SHOPFRONT_API_URL").then(|| base.clone()))
                .unwrap();
        ApiClient::new(&config, SessionStore::in_memory(), EventBus::default()).unwrap()
    }

    /// A client signed in as `email`.
    pub async fn signed_in(&self, email: &str) -> ApiClient {
        let api = self.client();
        api.login(&shopfront_core::Credentials {
            email: email.parse().unwrap(),
            password: PASSWORD.to_string(),
        })
        .await
        .unwrap();
        api
    }
}

// =============================================================================
// Router
// =============================================================================

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/profile", get(me).put(update_profile))
        .route("/products", get(list_products).post(create_product))
        .route("/products/search", get(search_products))
        .route(
            "/products/{id}",
            get(show_product)
                .post(override_product)
                .put(update_product)
                .delete(delete_product),
        )
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            put(update_category).delete(delete_category),
        )
        .route("/cart", get(show_cart).post(add_to_cart))
        .route("/cart/clear", delete(clear_cart))
        .route("/cart/checkout", post(checkout))
        .route("/cart/{id}", put(update_cart_line).delete(remove_cart_line))
        .route("/orders", get(my_orders))
        .route("/orders/{id}", get(show_order).delete(delete_order))
        .route("/admin/orders", get(all_orders))
        .route("/admin/orders/{id}/status", put(update_order_status))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(show_user).put(update_user).delete(delete_user),
        );

    Router::new().nest("/api", api).with_state(state)
}

fn record(state: &mut MockState, method: &Method, uri: &Uri, json: Option<&Value>) {
    state.requests.push(Recorded {
        method: method.to_string(),
        path: uri.path().trim_start_matches("/api").to_string(),
        json: json.cloned(),
        ..Recorded::default()
    });
}

fn not_found(what: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": format!("{what} not found") })),
    )
        .into_response()
}

fn unauthenticated() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthenticated." })),
    )
        .into_response()
}

fn invalid(errors: Value) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "message": "The given data was invalid.", "errors": errors })),
    )
        .into_response()
}

/// Run `f` as the bearer of the request's token, or answer 401.
fn authed(
    state: &Shared,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Option<&Value>,
    f: impl FnOnce(&mut MockState, Value) -> Response,
) -> Response {
    let mut s = state.lock().unwrap();
    record(&mut s, method, uri, body);
    match s.user_for(headers) {
        Some(user) => f(&mut s, user),
        None => unauthenticated(),
    }
}

fn admin_only(
    state: &Shared,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: Option<&Value>,
    f: impl FnOnce(&mut MockState) -> Response,
) -> Response {
    authed(state, method, uri, headers, body, |s, user| {
        if user["role"] == "admin" {
            f(s)
        } else {
            (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "This action is unauthorized." })),
            )
                .into_response()
        }
    })
}

fn issue_token(state: &mut MockState, user: &Value) -> String {
    let token = format!("tok-{}", state.next_id());
    state.tokens.insert(token.clone(), user["id"].as_i64().unwrap());
    token
}

// =============================================================================
// Auth
// =============================================================================

async fn login(State(state): State<Shared>, method: Method, uri: Uri, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    record(&mut s, &method, &uri, Some(&body));
    let user = s.users.iter().find(|u| u["email"] == body["email"]).cloned();
    match user {
        Some(user) if body["password"] == PASSWORD => {
            let token = issue_token(&mut s, &user);
            Json(json!({ "user": user, "token": token })).into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid credentials" })),
        )
            .into_response(),
    }
}

async fn register(State(state): State<Shared>, method: Method, uri: Uri, Json(body): Json<Value>) -> Response {
    let mut s = state.lock().unwrap();
    record(&mut s, &method, &uri, Some(&body));
    if s.users.iter().any(|u| u["email"] == body["email"]) {
        return invalid(json!({ "email": ["The email has already been taken."] }));
    }
    let user = json!({
        "id": s.next_id(),
        "name": body["name"],
        "email": body["email"],
        "role": "user",
    });
    s.users.push(user.clone());
    let token = issue_token(&mut s, &user);
    (
        StatusCode::CREATED,
        Json(json!({ "data": { "user": user, "access_token": token } })),
    )
        .into_response()
}

async fn logout(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    authed(&state, &method, &uri, &headers, None, |s, user| {
        s.tokens.retain(|_, id| user["id"] != *id);
        StatusCode::NO_CONTENT.into_response()
    })
}

async fn me(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    let response = authed(&state, &method, &uri, &headers, None, |_, user| {
        Json(json!({ "data": user })).into_response()
    });
    let delay = state.lock().unwrap().unauthorized_delay;
    if let Some(delay) = delay
        && response.status() == StatusCode::UNAUTHORIZED
    {
        tokio::time::sleep(delay).await;
    }
    response
}

async fn update_profile(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    authed(&state, &method, &uri, &headers, Some(&body), |s, user| {
        let Some(stored) = s.users.iter_mut().find(|u| u["id"] == user["id"]) else {
            return not_found("User");
        };
        for key in ["name", "phone", "address", "city"] {
            if let Some(value) = body.get(key) {
                stored[key] = value.clone();
            }
        }
        Json(json!({ "data": stored })).into_response()
    })
}

// =============================================================================
// Catalog
// =============================================================================

async fn list_products(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut s = state.lock().unwrap();
    record(&mut s, &method, &uri, None);

    let page: usize = query
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1)
        .max(1);
    if s.failing_pages.contains(&page) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "Server Error" })),
        )
            .into_response();
    }

    let total = s.products.len();
    let last_page = total.div_ceil(PER_PAGE).max(1);
    let items: Vec<Value> = s
        .products
        .iter()
        .skip((page - 1) * PER_PAGE)
        .take(PER_PAGE)
        .cloned()
        .collect();

    Json(json!({
        "data": items,
        "current_page": page,
        "last_page": last_page,
        "per_page": PER_PAGE,
        "total": total,
    }))
    .into_response()
}

async fn search_products(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut s = state.lock().unwrap();
    record(&mut s, &method, &uri, None);
    let q = query.get("q").map(|q| q.to_lowercase()).unwrap_or_default();
    let matches: Vec<Value> = s
        .products
        .iter()
        .filter(|p| {
            p["name"]
                .as_str()
                .is_some_and(|n| n.to_lowercase().contains(&q))
        })
        .cloned()
        .collect();
    Json(Value::Array(matches)).into_response()
}

async fn show_product(State(state): State<Shared>, method: Method, uri: Uri, Path(id): Path<i64>) -> Response {
    let mut s = state.lock().unwrap();
    record(&mut s, &method, &uri, None);
    match s.products.iter().find(|p| p["id"] == id) {
        Some(product) => Json(json!({ "data": product })).into_response(),
        None => not_found("Product"),
    }
}

async fn read_multipart(mut multipart: Multipart) -> (BTreeMap<String, String>, BTreeMap<String, String>) {
    let mut fields = BTreeMap::new();
    let mut files = BTreeMap::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                files.insert(name, file_name);
                field.bytes().await.unwrap();
            }
            None => {
                fields.insert(name, field.text().await.unwrap());
            }
        }
    }
    (fields, files)
}

fn product_from_fields(id: i64, fields: &BTreeMap<String, String>, image: Option<&String>) -> Value {
    json!({
        "id": id,
        "name": fields.get("name"),
        "description": fields.get("description"),
        "price": fields.get("price"),
        "stock": fields.get("stock").and_then(|s| s.parse::<i64>().ok()),
        "category_id": fields.get("category_id").and_then(|s| s.parse::<i64>().ok()),
        "image": image.map(|f| format!("products/{f}")),
    })
}

async fn create_product(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    let (fields, files) = read_multipart(multipart).await;
    admin_only(&state, &method, &uri, &headers, None, |s| {
        if let Some(last) = s.requests.last_mut() {
            last.fields.clone_from(&fields);
            last.files.clone_from(&files);
        }
        let product = product_from_fields(s.next_id(), &fields, files.get("image"));
        s.products.push(product.clone());
        (StatusCode::CREATED, Json(json!({ "data": product }))).into_response()
    })
}

/// `POST /products/{id}` with `_method=PUT`.
async fn override_product(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Response {
    let (fields, files) = read_multipart(multipart).await;
    admin_only(&state, &method, &uri, &headers, None, |s| {
        if let Some(last) = s.requests.last_mut() {
            last.fields.clone_from(&fields);
            last.files.clone_from(&files);
        }
        if fields.get("_method").map(String::as_str) != Some("PUT") {
            return StatusCode::METHOD_NOT_ALLOWED.into_response();
        }
        let Some(stored) = s.products.iter_mut().find(|p| p["id"] == id) else {
            return not_found("Product");
        };
        *stored = product_from_fields(id, &fields, files.get("image"));
        Json(json!({ "data": stored })).into_response()
    })
}

async fn update_product(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    admin_only(&state, &method, &uri, &headers, Some(&body), |s| {
        let Some(stored) = s.products.iter_mut().find(|p| p["id"] == id) else {
            return not_found("Product");
        };
        let mut updated = body.clone();
        updated["id"] = json!(id);
        *stored = updated;
        Json(json!({ "data": stored })).into_response()
    })
}

async fn delete_product(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    admin_only(&state, &method, &uri, &headers, None, |s| {
        let before = s.products.len();
        s.products.retain(|p| p["id"] != id);
        if s.products.len() == before {
            not_found("Product")
        } else {
            StatusCode::NO_CONTENT.into_response()
        }
    })
}

async fn list_categories(State(state): State<Shared>, method: Method, uri: Uri) -> Response {
    let mut s = state.lock().unwrap();
    record(&mut s, &method, &uri, None);
    Json(json!({ "data": s.categories })).into_response()
}

async fn create_category(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    admin_only(&state, &method, &uri, &headers, Some(&body), |s| {
        let category = json!({ "id": s.next_id(), "name": body["name"], "slug": body["slug"] });
        s.categories.push(category.clone());
        (StatusCode::CREATED, Json(category)).into_response()
    })
}

async fn update_category(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    admin_only(&state, &method, &uri, &headers, Some(&body), |s| {
        let Some(stored) = s.categories.iter_mut().find(|c| c["id"] == id) else {
            return not_found("Category");
        };
        stored["name"] = body["name"].clone();
        stored["slug"] = body["slug"].clone();
        Json(stored.clone()).into_response()
    })
}

async fn delete_category(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    admin_only(&state, &method, &uri, &headers, None, |s| {
        let before = s.categories.len();
        s.categories.retain(|c| c["id"] != id);
        if s.categories.len() == before {
            not_found("Category")
        } else {
            StatusCode::NO_CONTENT.into_response()
        }
    })
}

// =============================================================================
// Cart and orders
// =============================================================================

async fn show_cart(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    authed(&state, &method, &uri, &headers, None, |s, _| {
        Json(Value::Array(s.cart.clone())).into_response()
    })
}

async fn add_to_cart(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    authed(&state, &method, &uri, &headers, Some(&body), |s, _| {
        let Some(product) = s.products.iter().find(|p| p["id"] == body["product_id"]).cloned() else {
            return not_found("Product");
        };
        let id = s.next_id();
        let line = json!({
            "id": id,
            "product_id": product["id"],
            "quantity": body["quantity"],
            "product": product,
        });
        s.cart.push(line.clone());
        (StatusCode::CREATED, Json(json!({ "data": line }))).into_response()
    })
}

async fn update_cart_line(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    authed(&state, &method, &uri, &headers, Some(&body), |s, _| {
        let Some(line) = s.cart.iter_mut().find(|l| l["id"] == id) else {
            return not_found("Cart item");
        };
        let stock = line["product"]["stock"].as_i64().unwrap_or(0);
        let quantity = body["quantity"].as_i64().unwrap_or(0);
        if quantity > stock {
            return invalid(json!({ "quantity": [format!("Only {stock} left in stock.")] }));
        }
        line["quantity"] = json!(quantity);
        Json(json!({ "data": line })).into_response()
    })
}

async fn remove_cart_line(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    authed(&state, &method, &uri, &headers, None, |s, _| {
        s.cart.retain(|l| l["id"] != id);
        StatusCode::NO_CONTENT.into_response()
    })
}

async fn clear_cart(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    authed(&state, &method, &uri, &headers, None, |s, _| {
        s.cart.clear();
        StatusCode::NO_CONTENT.into_response()
    })
}

async fn checkout(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    authed(&state, &method, &uri, &headers, None, |s, user| {
        if s.cart.is_empty() {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "message": "Your cart is empty" })),
            )
                .into_response();
        }
        let items: Vec<Value> = s
            .cart
            .drain(..)
            .map(|l| {
                json!({
                    "product_id": l["product_id"],
                    "quantity": l["quantity"],
                    "price": l["product"]["price"],
                })
            })
            .collect();
        let order = json!({
            "id": s.next_id(),
            "user_id": user["id"],
            "items": items,
            "total": "19.00",
            "status": "pending",
        });
        s.orders.push(order.clone());
        (StatusCode::CREATED, Json(json!({ "data": order }))).into_response()
    })
}

async fn my_orders(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    authed(&state, &method, &uri, &headers, None, |s, user| {
        let mine: Vec<Value> = s
            .orders
            .iter()
            .filter(|o| o["user_id"] == user["id"])
            .cloned()
            .collect();
        Json(json!({ "data": mine })).into_response()
    })
}

async fn show_order(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    authed(&state, &method, &uri, &headers, None, |s, user| {
        match s
            .orders
            .iter()
            .find(|o| o["id"] == id && o["user_id"] == user["id"])
        {
            Some(order) => Json(json!({ "data": order })).into_response(),
            None => not_found("Order"),
        }
    })
}

async fn delete_order(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    admin_only(&state, &method, &uri, &headers, None, |s| {
        let before = s.orders.len();
        s.orders.retain(|o| o["id"] != id);
        if s.orders.len() == before {
            not_found("Order")
        } else {
            StatusCode::NO_CONTENT.into_response()
        }
    })
}

async fn all_orders(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    admin_only(&state, &method, &uri, &headers, None, |s| {
        Json(json!({ "data": { "data": s.orders, "current_page": 1, "last_page": 1, "total": s.orders.len() } }))
            .into_response()
    })
}

async fn update_order_status(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    admin_only(&state, &method, &uri, &headers, Some(&body), |s| {
        let Some(order) = s.orders.iter_mut().find(|o| o["id"] == id) else {
            return not_found("Order");
        };
        order["status"] = body["status"].clone();
        Json(json!({ "data": order })).into_response()
    })
}

// =============================================================================
// Users
// =============================================================================

async fn list_users(State(state): State<Shared>, method: Method, uri: Uri, headers: HeaderMap) -> Response {
    admin_only(&state, &method, &uri, &headers, None, |s| {
        Json(json!({ "data": s.users })).into_response()
    })
}

async fn show_user(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    admin_only(&state, &method, &uri, &headers, None, |s| {
        match s.users.iter().find(|u| u["id"] == id) {
            Some(user) => Json(json!({ "data": user })).into_response(),
            None => not_found("User"),
        }
    })
}

fn public_user(id: i64, body: &Value) -> Value {
    json!({
        "id": id,
        "name": body["name"],
        "email": body["email"],
        "role": body["role"],
        "phone": body.get("phone"),
        "address": body.get("address"),
        "city": body.get("city"),
    })
}

async fn create_user(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    admin_only(&state, &method, &uri, &headers, Some(&body), |s| {
        let user = public_user(s.next_id(), &body);
        s.users.push(user.clone());
        (StatusCode::CREATED, Json(json!({ "data": user }))).into_response()
    })
}

async fn update_user(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    admin_only(&state, &method, &uri, &headers, Some(&body), |s| {
        let Some(stored) = s.users.iter_mut().find(|u| u["id"] == id) else {
            return not_found("User");
        };
        *stored = public_user(id, &body);
        Json(json!({ "data": stored })).into_response()
    })
}

async fn delete_user(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    admin_only(&state, &method, &uri, &headers, None, |s| {
        let before = s.users.len();
        s.users.retain(|u| u["id"] != id);
        if s.users.len() == before {
            not_found("User")
        } else {
            StatusCode::NO_CONTENT.into_response()
        }
    })
}
