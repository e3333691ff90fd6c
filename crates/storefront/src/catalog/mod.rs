//! Products and categories.
//!
//! - `GET /products?page=N` - server-paginated listing
//! - `GET /products/{id}`
//! - `GET /products/search?q=` - server-side search
//! - `GET /categories`

mod browser;
pub mod search;

pub use browser::{BrowserMode, ProductBrowser};
pub use search::{MatchRank, PageView, Query, filter_and_rank, matches, paginate, rank};

use tracing::instrument;

use shopfront_core::{Category, Product, ProductId};

use crate::api::{AllPages, ApiClient, Paginated};
use crate::error::Result;

impl ApiClient {
    /// One server page of products.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    #[instrument(skip(self))]
    pub async fn list_products(&self, page: u32) -> Result<Paginated<Product>> {
        self.get_page("/products", page).await
    }

    /// Every product, across all server pages.
    ///
    /// # Errors
    ///
    /// Errors fetching the first page.
    #[instrument(skip(self))]
    pub async fn fetch_all_products(&self) -> Result<Vec<Product>> {
        self.fetch_all_pages("/products").await
    }

    /// Every product, flagging a partial result.
    ///
    /// # Errors
    ///
    /// Errors fetching the first page.
    #[instrument(skip(self))]
    pub async fn collect_all_products(&self) -> Result<AllPages<Product>> {
        self.collect_pages("/products").await
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// `ApiError::NotFound` for an unknown id.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: ProductId) -> Result<Product> {
        self.get(&format!("/products/{id}")).await
    }

    /// Server-side search.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        self.get_list("/products/search", &[("q", query.trim())])
            .await
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`](crate::ApiError).
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.get_list("/categories", &[]).await
    }
}
