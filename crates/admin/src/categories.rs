//! Category management.

use tracing::instrument;

use shopfront_core::{Category, CategoryId, CategoryInput};
use shopfront_storefront::{ApiError, Result};

use crate::client::AdminClient;

impl AdminClient {
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.api().list_categories().await
    }

    /// # Errors
    ///
    /// `ApiError::InvalidInput` for a blank name, otherwise any error from
    /// the backend.
    #[instrument(skip(self), fields(name = %input.name))]
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category> {
        input.validate().map_err(ApiError::InvalidInput)?;
        self.api().post("/categories", input).await
    }

    /// # Errors
    ///
    /// `ApiError::InvalidInput` for a blank name, otherwise any error from
    /// the backend.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn update_category(&self, id: CategoryId, input: &CategoryInput) -> Result<Category> {
        input.validate().map_err(ApiError::InvalidInput)?;
        self.api().put(&format!("/categories/{id}"), input).await
    }

    /// # Errors
    ///
    /// Any [`ApiError`], including `NotFound` when already gone.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<()> {
        self.api().delete(&format!("/categories/{id}")).await
    }
}
