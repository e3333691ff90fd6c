//! Shopfront Core - Shared domain types.
//!
//! This crate provides the value records mirrored from the backend REST API
//! and used by every Shopfront component:
//! - `storefront` - API client, session store, catalog search, cart
//! - `admin` - CRUD screens for products, categories, users and orders
//! - `cli` - The `shop` console
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. The backend
//! owns every entity; the copies held here are transient and possibly stale.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, roles, statuses, entities and write payloads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
