//! Product management.
//!
//! Creates are multipart so an image can ride along. Updates with a new
//! image are multipart POSTs to the product URL carrying `_method=PUT`,
//! since the backend only parses multipart bodies on POST; updates without
//! an image are plain JSON PUTs.

use reqwest::Method;
use reqwest::multipart::Form;
use tracing::instrument;

use shopfront_core::{Product, ProductId, ProductInput};
use shopfront_storefront::{ApiError, Paginated, Result};

use crate::client::AdminClient;
use crate::upload::{IMAGE_FIELD, ImageUpload};

/// Build the multipart body for a product form.
///
/// # Errors
///
/// `ApiError::Http` if the image's MIME type is malformed.
pub fn product_form(input: &ProductInput, image: Option<ImageUpload>) -> Result<Form> {
    let form = input
        .form_fields()
        .into_iter()
        .fold(Form::new(), |form, (name, value)| form.text(name, value));
    match image {
        Some(image) => Ok(form.part(IMAGE_FIELD, image.into_part()?)),
        None => Ok(form),
    }
}

impl AdminClient {
    /// One page of the product table.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`].
    #[instrument(skip(self))]
    pub async fn list_products(&self, page: u32) -> Result<Paginated<Product>> {
        self.api().list_products(page).await
    }

    /// Every product, fetching the remaining pages concurrently.
    ///
    /// # Errors
    ///
    /// Errors fetching the first page.
    #[instrument(skip(self))]
    pub async fn all_products(&self) -> Result<Vec<Product>> {
        self.api().fetch_all_products().await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// `ApiError::InvalidInput` for an incomplete form, otherwise any error
    /// from the backend.
    #[instrument(skip(self, input, image), fields(name = %input.name))]
    pub async fn create_product(
        &self,
        input: &ProductInput,
        image: Option<ImageUpload>,
    ) -> Result<Product> {
        input.validate().map_err(ApiError::InvalidInput)?;
        let product: Product = self
            .api()
            .post_multipart("/products", product_form(input, image)?, None)
            .await?;
        tracing::info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    /// Update a product, replacing its image when one is given.
    ///
    /// # Errors
    ///
    /// `ApiError::InvalidInput` for an incomplete form, otherwise any error
    /// from the backend.
    #[instrument(skip(self, input, image), fields(product_id = %id, with_image = image.is_some()))]
    pub async fn update_product(
        &self,
        id: ProductId,
        input: &ProductInput,
        image: Option<ImageUpload>,
    ) -> Result<Product> {
        input.validate().map_err(ApiError::InvalidInput)?;
        let path = format!("/products/{id}");
        let product: Product = match image {
            Some(image) => {
                let form = product_form(input, Some(image))?;
                self.api()
                    .post_multipart(&path, form, Some(Method::PUT))
                    .await?
            }
            None => self.api().put(&path, input).await?,
        };
        tracing::info!(product_id = %product.id, "Product updated");
        Ok(product)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`], including `NotFound` when already gone.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<()> {
        self.api().delete(&format!("/products/{id}")).await
    }
}
