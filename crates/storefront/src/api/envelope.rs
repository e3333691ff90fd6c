//! Response envelope normalisation.
//!
//! The backend is inconsistent about wrapping: single resources arrive bare or
//! as `{ "data": ... }`, collections as bare arrays, `{ "data": [...] }`,
//! Laravel paginators (`{ "data": [...], "current_page": .. }`), resource
//! collections with a `meta` block, or a paginator nested under `data`.
//! Everything is decoded here, once; callers only ever see `T` or
//! [`Paginated<T>`].

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// One page of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: Option<u32>,
    pub total: u64,
}

impl<T> Paginated<T> {
    /// Wrap an unpaginated collection as its own single page.
    #[must_use]
    pub fn single(items: Vec<T>) -> Self {
        let total = items.len() as u64;
        Self {
            items,
            current_page: 1,
            last_page: 1,
            per_page: None,
            total,
        }
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.current_page < self.last_page
    }
}

#[derive(Deserialize)]
struct PageMeta {
    current_page: u32,
    #[serde(default)]
    last_page: Option<u32>,
    #[serde(default)]
    per_page: Option<u32>,
    #[serde(default)]
    total: Option<u64>,
}

#[derive(Deserialize)]
struct Paginator<T> {
    data: Vec<T>,
    #[serde(flatten)]
    meta: PageMeta,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageEnvelope<T> {
    Nested { data: Paginator<T> },
    WithMeta { data: Vec<T>, meta: PageMeta },
    Flat(Paginator<T>),
    Wrapped { data: Vec<T> },
    Bare(Vec<T>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneEnvelope<T> {
    Wrapped { data: T },
    Bare(T),
}

fn into_page<T>(items: Vec<T>, meta: PageMeta) -> Paginated<T> {
    let total = meta.total.unwrap_or(items.len() as u64);
    Paginated {
        current_page: meta.current_page.max(1),
        last_page: meta.last_page.unwrap_or(meta.current_page).max(1),
        per_page: meta.per_page,
        total,
        items,
    }
}

fn shape_error(body: &str) -> ApiError {
    ApiError::Envelope(body.chars().take(200).collect())
}

/// Decode a single resource.
///
/// # Errors
///
/// `ApiError::Decode` for invalid JSON, `ApiError::Envelope` when the JSON
/// matches neither a bare nor a `data`-wrapped `T`.
pub fn decode_one<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    match serde_json::from_value::<OneEnvelope<T>>(value) {
        Ok(OneEnvelope::Wrapped { data } | OneEnvelope::Bare(data)) => Ok(data),
        Err(e) => {
            tracing::debug!(error = %e, "Response did not match a single-resource shape");
            Err(shape_error(body))
        }
    }
}

/// Decode one page of a collection.
///
/// # Errors
///
/// `ApiError::Decode` for invalid JSON, `ApiError::Envelope` when no known
/// collection shape matches.
pub fn decode_page<T: DeserializeOwned>(body: &str) -> Result<Paginated<T>, ApiError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    match serde_json::from_value::<PageEnvelope<T>>(value) {
        Ok(PageEnvelope::Nested { data }) => Ok(into_page(data.data, data.meta)),
        Ok(PageEnvelope::WithMeta { data, meta }) => Ok(into_page(data, meta)),
        Ok(PageEnvelope::Flat(paginator)) => Ok(into_page(paginator.data, paginator.meta)),
        Ok(PageEnvelope::Wrapped { data } | PageEnvelope::Bare(data)) => {
            Ok(Paginated::single(data))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Response did not match a collection shape");
            Err(shape_error(body))
        }
    }
}

/// Decode a whole collection, ignoring pagination metadata.
///
/// # Errors
///
/// Same as [`decode_page`].
pub fn decode_list<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, ApiError> {
    decode_page(body).map(|page| page.items)
}
