//! Product image attachments.

use std::path::Path;

use reqwest::multipart::Part;
use shopfront_storefront::{ApiError, Result};

/// Multipart field the backend reads the product image from.
pub const IMAGE_FIELD: &str = "image";

/// An image to send with a product form.
#[derive(Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    /// Read an image from disk, guessing its type from the extension.
    ///
    /// # Errors
    ///
    /// `ApiError::InvalidInput` if the file cannot be read or is not an image.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        if mime.type_() != mime_guess::mime::IMAGE {
            return Err(ApiError::InvalidInput(format!(
                "{} is not an image ({mime})",
                path.display()
            )));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| ApiError::InvalidInput(format!("cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_string(), |n| n.to_string_lossy().into_owned());

        Ok(Self {
            file_name,
            mime: mime.essence_str().to_string(),
            bytes,
        })
    }

    /// The multipart part for this image.
    ///
    /// # Errors
    ///
    /// `ApiError::Http` if the MIME type is malformed.
    pub fn into_part(self) -> Result<Part> {
        Ok(Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime)?)
    }
}
