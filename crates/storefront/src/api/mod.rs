//! REST API client.
//!
//! [`ApiClient`] is the single place where HTTP happens. It attaches the
//! bearer token, classifies failures into [`ApiError`], normalises response
//! envelopes and handles the 401 policy:
//!
//! - the stored session is cleared
//! - [`AppEvent::LoginRequired`] is emitted once, then suppressed until the
//!   next successful sign-in, so a burst of concurrent 401s produces a single
//!   redirect to the login screen
//! - a 401 for a request sent with a token that has since been replaced by a
//!   new login is ignored
//!
//! Endpoint wrappers live next to the features that use them (`auth`,
//! `catalog`, `cart`, `orders`, `profile`) as further `impl ApiClient` blocks.

mod envelope;

pub use envelope::{Paginated, decode_list, decode_one, decode_page};

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use shopfront_core::User;

use crate::config::ClientConfig;
use crate::error::{ApiError, Result};
use crate::events::{AppEvent, EventBus};
use crate::session::SessionStore;

/// Items gathered from every page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct AllPages<T> {
    pub items: Vec<T>,
    /// `false` when some page failed and only the first page is present.
    pub complete: bool,
}

/// Field name Laravel-style backends read to emulate PUT over multipart POST.
pub const METHOD_OVERRIDE_FIELD: &str = "_method";

/// Whether a 401 on this request means "session expired".
///
/// Login and registration answer 401 for bad credentials; that must not
/// clear anything or trigger a redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unauthorized {
    ExpireSession,
    Report,
}

/// Client for the storefront REST backend.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    session: SessionStore,
    events: EventBus,
    /// Set once `LoginRequired` has been emitted; cleared on sign-in.
    login_prompted: AtomicBool,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig, session: SessionStore, events: EventBus) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("shopfront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.api_url.clone(),
                session,
                events,
                login_prompted: AtomicBool::new(false),
            }),
        })
    }

    /// The session store this client reads its token from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// The event bus this client publishes to.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    /// The backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Absolute URL for an API path such as `/products/3`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Absolute URL with query parameters.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if the path produces an invalid URL.
    pub fn url_with_query(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let mut url = Url::parse(&self.url(path))
            .map_err(|e| ApiError::InvalidInput(format!("invalid path {path}: {e}")))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url.into())
    }

    // =========================================================================
    // Session transitions
    // =========================================================================

    /// Record a successful login: store the session, re-arm the 401 prompt
    /// and announce it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Session` if the session cannot be persisted.
    pub async fn signed_in(&self, user: User, token: SecretString) -> Result<()> {
        let user_id = user.id;
        self.inner.session.sign_in(user, token).await?;
        self.inner.login_prompted.store(false, Ordering::SeqCst);
        self.inner.events.emit(AppEvent::SignedIn(user_id));
        Ok(())
    }

    /// Handle a 401 for a request that carried `sent_token`.
    async fn expire_session(&self, sent_token: Option<&SecretString>) {
        let cleared = match self.inner.session.clear_if_token(sent_token).await {
            Ok(cleared) => cleared,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to clear stored session after 401");
                true
            }
        };
        if !cleared {
            debug!("Ignoring 401 for a token that is no longer current");
            return;
        }
        if !self.inner.login_prompted.swap(true, Ordering::SeqCst) {
            tracing::info!("Session expired; login required");
            self.inner.events.emit(AppEvent::LoginRequired);
        }
    }

    // =========================================================================
    // Request execution
    // =========================================================================

    /// Build a request, returning the token it carries.
    async fn request(&self, method: Method, url: &str) -> (RequestBuilder, Option<SecretString>) {
        let builder = self
            .inner
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");

        let token = self.inner.session.token().await;
        let builder = match &token {
            Some(token) => {
                builder.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            }
            None => builder,
        };
        (builder, token)
    }

    async fn execute(
        &self,
        builder: RequestBuilder,
        sent_token: Option<SecretString>,
        on_401: Unauthorized,
    ) -> Result<String> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(%status, url = %response.url(), "API response");

        let body = response.text().await?;

        if status.is_success() {
            return Ok(body);
        }

        if status == StatusCode::UNAUTHORIZED && on_401 == Unauthorized::ExpireSession {
            self.expire_session(sent_token.as_ref()).await;
        } else if status.is_server_error() {
            tracing::error!(
                %status,
                body = %body.chars().take(500).collect::<String>(),
                "Backend returned server error"
            );
        }

        Err(ApiError::from_status(status, &body))
    }

    /// Send a request built against an absolute URL.
    async fn send(&self, method: Method, url: &str) -> Result<String> {
        let (builder, token) = self.request(method, url).await;
        self.execute(builder, token, Unauthorized::ExpireSession).await
    }

    /// Send a JSON body.
    async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        on_401: Unauthorized,
    ) -> Result<String> {
        let (builder, token) = self.request(method, &self.url(path)).await;
        self.execute(builder.json(body), token, on_401).await
    }

    /// GET a single resource.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from transport, status or decoding.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.send(Method::GET, &self.url(path)).await?;
        decode_one(&body)
    }

    /// GET a whole collection, ignoring pagination.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from transport, status or decoding.
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let url = self.url_with_query(path, query)?;
        let body = self.send(Method::GET, &url).await?;
        decode_list(&body)
    }

    /// GET one page of a paginated collection.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from transport, status or decoding.
    pub async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
    ) -> Result<Paginated<T>> {
        let page = page.max(1).to_string();
        let url = self.url_with_query(path, &[("page", &page)])?;
        let body = self.send(Method::GET, &url).await?;
        decode_page(&body)
    }

    /// GET every page of a paginated collection.
    ///
    /// Page 1 is fetched first to learn `last_page`; the remaining pages are
    /// requested concurrently and awaited together. If any of them fails the
    /// result falls back to page 1 alone. A 401 is still propagated.
    ///
    /// # Errors
    ///
    /// Errors from the first page, or `ApiError::AuthRequired`.
    pub async fn fetch_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        self.collect_pages(path).await.map(|all| all.items)
    }

    /// Like [`fetch_all_pages`](Self::fetch_all_pages), but reports whether
    /// the fallback to page 1 was taken.
    ///
    /// # Errors
    ///
    /// Errors from the first page, or `ApiError::AuthRequired`.
    pub async fn collect_pages<T: DeserializeOwned>(&self, path: &str) -> Result<AllPages<T>> {
        let first: Paginated<T> = self.get_page(path, 1).await?;
        if !first.has_more() {
            return Ok(AllPages {
                items: first.items,
                complete: true,
            });
        }

        let rest = futures::future::join_all(
            (2..=first.last_page).map(|page| self.get_page::<T>(path, page)),
        )
        .await;

        let mut pages = Vec::with_capacity(rest.len());
        for (page, result) in (2..).zip(rest) {
            match result {
                Ok(p) => pages.push(p.items),
                Err(ApiError::AuthRequired) => return Err(ApiError::AuthRequired),
                Err(e) => {
                    tracing::warn!(path, page, error = %e, "Page fetch failed; using first page only");
                    return Ok(AllPages {
                        items: first.items,
                        complete: false,
                    });
                }
            }
        }

        let mut items = first.items;
        items.extend(pages.into_iter().flatten());
        debug!(path, count = items.len(), "Fetched all pages");
        Ok(AllPages {
            items,
            complete: true,
        })
    }

    /// POST a JSON body and decode the created resource.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from transport, status or decoding.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .send_json(Method::POST, path, body, Unauthorized::ExpireSession)
            .await?;
        decode_one(&body)
    }

    /// POST credentials. A 401 here is reported, not treated as expiry.
    pub(crate) async fn post_credentials<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .send_json(Method::POST, path, body, Unauthorized::Report)
            .await?;
        decode_one(&body)
    }

    /// POST with no body, discarding the response.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from transport or status.
    pub async fn post_empty(&self, path: &str) -> Result<()> {
        self.send(Method::POST, &self.url(path)).await.map(drop)
    }

    /// POST with no body and decode the response.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from transport, status or decoding.
    pub async fn post_action<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let body = self.send(Method::POST, &self.url(path)).await?;
        decode_one(&body)
    }

    /// PUT a JSON body and decode the updated resource.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from transport, status or decoding.
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self
            .send_json(Method::PUT, path, body, Unauthorized::ExpireSession)
            .await?;
        decode_one(&body)
    }

    /// DELETE a resource.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from transport or status.
    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(Method::DELETE, &self.url(path)).await.map(drop)
    }

    /// POST a multipart form and decode the response.
    ///
    /// Pass `method_override` to tunnel another verb through POST using the
    /// `_method` form field.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] from transport, status or decoding.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        method_override: Option<Method>,
    ) -> Result<T> {
        let form = match method_override {
            Some(method) => form.text(METHOD_OVERRIDE_FIELD, method.as_str().to_string()),
            None => form,
        };
        let (builder, token) = self.request(Method::POST, &self.url(path)).await;
        let body = self
            .execute(builder.multipart(form), token, Unauthorized::ExpireSession)
            .await?;
        decode_one(&body)
    }
}
