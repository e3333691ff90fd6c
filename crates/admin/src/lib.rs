//! Shopfront Admin - back-office screens over the shop's REST backend.
//!
//! - [`AdminClient`] - admin-guarded wrapper around the storefront client
//! - products, categories, users, orders - CRUD endpoint wrappers
//! - [`ManagedList`] - table state with not-found-tolerant deletion
//! - [`ImageUpload`] - product images for multipart forms
//!
//! # Example
//!
//! ```rust,ignore
//! let admin = AdminClient::connect(api).await?;
//! let mut products = ManagedList::new(admin.all_products().await?);
//! products
//!     .remove(id, |id| admin.delete_product(id))
//!     .await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod categories;
mod client;
mod managed;
mod orders;
mod products;
mod upload;
mod users;

pub use client::AdminClient;
pub use managed::{Keyed, ManagedList, Removal, delete_tolerant};
pub use products::product_form;
pub use upload::{IMAGE_FIELD, ImageUpload};
