//! Product listing screen state.

use shopfront_core::Product;

use super::search::{PageView, Query, filter_and_rank, paginate};
use crate::api::{ApiClient, Paginated};
use crate::error::Result;

/// Where the visible page comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserMode {
    /// Pages are fetched from the server as the user navigates.
    Server,
    /// Pages are slices of locally ranked search results.
    Search,
}

/// State behind the product listing: server pagination when idle, local
/// search over the full catalog while a query is active.
///
/// The full catalog is fetched on the first search and kept for the
/// lifetime of the browser, once every page of it has loaded. A partial
/// catalog serves the current search only and is fetched again next time.
/// Clearing the query goes back to the server's first page, not to the
/// cached catalog.
pub struct ProductBrowser {
    client: ApiClient,
    page_size: usize,
    mode: BrowserMode,
    query: Option<Query>,
    catalog: Option<Vec<Product>>,
    results: Vec<Product>,
    view: PageView<Product>,
}

fn server_view(page: Paginated<Product>) -> PageView<Product> {
    PageView {
        current_page: page.current_page as usize,
        last_page: page.last_page as usize,
        total: usize::try_from(page.total).unwrap_or(usize::MAX),
        items: page.items,
    }
}

impl ProductBrowser {
    /// Open the listing on the server's first page.
    ///
    /// # Errors
    ///
    /// Any error fetching the first page.
    pub async fn open(client: ApiClient, page_size: usize) -> Result<Self> {
        let first = client.list_products(1).await?;
        Ok(Self {
            client,
            page_size: page_size.max(1),
            mode: BrowserMode::Server,
            query: None,
            catalog: None,
            results: Vec::new(),
            view: server_view(first),
        })
    }

    /// Apply a search query. A blank query restores the server's first page.
    ///
    /// # Errors
    ///
    /// Errors loading the catalog (first search only) or the server page.
    pub async fn search(&mut self, raw: &str) -> Result<&PageView<Product>> {
        let Some(query) = Query::parse(raw) else {
            self.query = None;
            self.results.clear();
            self.load_server_page(1).await?;
            return Ok(&self.view);
        };

        let mut partial = None;
        if self.catalog.is_none() {
            let all = self.client.collect_all_products().await?;
            if all.complete {
                self.catalog = Some(all.items);
            } else {
                tracing::warn!("Searching a partial catalog; it will be refetched");
                partial = Some(all.items);
            }
        }
        let catalog = partial
            .as_deref()
            .or(self.catalog.as_deref())
            .unwrap_or_default();
        self.results = filter_and_rank(catalog, &query)
            .into_iter()
            .cloned()
            .collect();
        tracing::debug!(query = query.as_str(), matches = self.results.len(), "Local search");

        self.query = Some(query);
        self.mode = BrowserMode::Search;
        self.view = paginate(&self.results, self.page_size, 1);
        Ok(&self.view)
    }

    /// Move to another page in the current mode.
    ///
    /// # Errors
    ///
    /// Errors fetching a server page.
    pub async fn goto_page(&mut self, page: usize) -> Result<&PageView<Product>> {
        match self.mode {
            BrowserMode::Server => {
                self.load_server_page(u32::try_from(page).unwrap_or(u32::MAX))
                    .await?;
            }
            BrowserMode::Search => {
                self.view = paginate(&self.results, self.page_size, page);
            }
        }
        Ok(&self.view)
    }

    async fn load_server_page(&mut self, page: u32) -> Result<()> {
        let fetched = self.client.list_products(page).await?;
        self.view = server_view(fetched);
        self.mode = BrowserMode::Server;
        Ok(())
    }

    /// The visible page.
    #[must_use]
    pub const fn view(&self) -> &PageView<Product> {
        &self.view
    }

    #[must_use]
    pub const fn mode(&self) -> BrowserMode {
        self.mode
    }

    /// The active (normalised) query.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_ref().map(Query::as_str)
    }

    /// Whether the full catalog has been loaded.
    #[must_use]
    pub const fn has_catalog(&self) -> bool {
        self.catalog.is_some()
    }
}
