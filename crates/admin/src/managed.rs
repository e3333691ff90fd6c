//! List screen state for the admin tables.

use std::fmt::Display;
use std::future::Future;

use shopfront_core::{Category, CategoryId, Order, OrderId, Product, ProductId, User, UserId};
use shopfront_storefront::{ApiError, Result};

/// A row with a stable id.
pub trait Keyed {
    type Key: Copy + Eq + Display;

    fn key(&self) -> Self::Key;
}

impl Keyed for Product {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.id
    }
}

impl Keyed for Category {
    type Key = CategoryId;

    fn key(&self) -> CategoryId {
        self.id
    }
}

impl Keyed for User {
    type Key = UserId;

    fn key(&self) -> UserId {
        self.id
    }
}

impl Keyed for Order {
    type Key = OrderId;

    fn key(&self) -> OrderId {
        self.id
    }
}

/// How a row left the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The server deleted it.
    Deleted,
    /// The server no longer had it.
    AlreadyGone,
}

/// Delete `key` through `delete`, counting a not-found answer as success.
///
/// # Errors
///
/// The delete call's error, other than `ApiError::NotFound`.
pub async fn delete_tolerant<K, F, Fut>(key: K, delete: F) -> Result<Removal>
where
    K: Copy + Display,
    F: FnOnce(K) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    match delete(key).await {
        Ok(()) => Ok(Removal::Deleted),
        Err(ApiError::NotFound(message)) => {
            tracing::warn!(%key, %message, "Delete target already gone");
            Ok(Removal::AlreadyGone)
        }
        Err(e) => Err(e),
    }
}

/// Rows shown on an admin table.
#[derive(Debug, Clone)]
pub struct ManagedList<T> {
    items: Vec<T>,
}

impl<T> Default for ManagedList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> ManagedList<T> {
    #[must_use]
    pub const fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn get(&self, key: T::Key) -> Option<&T> {
        self.items.iter().find(|item| item.key() == key)
    }

    /// Replace the row with the same key, or append.
    pub fn upsert(&mut self, item: T) {
        match self.items.iter_mut().find(|row| row.key() == item.key()) {
            Some(row) => *row = item,
            None => self.items.push(item),
        }
    }

    /// Replace every row after a refetch.
    pub fn replace_all(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Delete a row through `delete` and drop it locally.
    ///
    /// A not-found answer means the row is already gone elsewhere, so it is
    /// dropped too. Any other error leaves the row in place.
    ///
    /// # Errors
    ///
    /// The delete call's error, other than `ApiError::NotFound`.
    pub async fn remove<F, Fut>(&mut self, key: T::Key, delete: F) -> Result<Removal>
    where
        F: FnOnce(T::Key) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let removal = delete_tolerant(key, delete).await?;
        self.items.retain(|item| item.key() != key);
        Ok(removal)
    }
}
