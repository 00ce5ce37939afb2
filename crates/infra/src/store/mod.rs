//! Beer record storage boundary.
//!
//! This module defines an infrastructure-facing abstraction for persisting beer
//! records by id and looking them up by name, without making any storage
//! assumptions. Business rules (uniqueness, capacity) are enforced by
//! `StockManager`, not by the stores.

pub mod in_memory;
pub mod postgres;

use std::sync::Arc;

use thiserror::Error;

use beerstock_core::{BeerId, DomainError};
use beerstock_inventory::{Beer, NewBeer};

pub use in_memory::InMemoryBeerStore;
pub use postgres::PostgresBeerStore;

/// Infrastructure failure raised by a `BeerStore`.
///
/// - **Conflict**: a storage-level uniqueness constraint rejected the write
/// - **Corrupt**: a stored row could not be rebuilt into a valid `Beer`
/// - **Backend**: anything else (connection loss, pool closed, driver errors)
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage conflict: {0}")]
    Conflict(String),

    #[error("corrupt record: {0}")]
    Corrupt(#[from] DomainError),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Record store keyed by `BeerId`, with secondary lookup by name.
///
/// `insert` assigns a fresh id; `update` fully replaces an existing record.
/// `delete_by_id` reports whether a record was actually removed so callers can
/// distinguish "deleted" from "did not exist".
#[async_trait::async_trait]
pub trait BeerStore: Send + Sync {
    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError>;

    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError>;

    async fn insert(&self, beer: NewBeer) -> Result<Beer, StoreError>;

    async fn update(&self, beer: Beer) -> Result<Beer, StoreError>;

    async fn delete_by_id(&self, id: BeerId) -> Result<bool, StoreError>;

    /// All records in ascending id order.
    async fn list_all(&self) -> Result<Vec<Beer>, StoreError>;
}

#[async_trait::async_trait]
impl<S> BeerStore for Arc<S>
where
    S: BeerStore + ?Sized,
{
    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError> {
        (**self).find_by_name(name).await
    }

    async fn insert(&self, beer: NewBeer) -> Result<Beer, StoreError> {
        (**self).insert(beer).await
    }

    async fn update(&self, beer: Beer) -> Result<Beer, StoreError> {
        (**self).update(beer).await
    }

    async fn delete_by_id(&self, id: BeerId) -> Result<bool, StoreError> {
        (**self).delete_by_id(id).await
    }

    async fn list_all(&self) -> Result<Vec<Beer>, StoreError> {
        (**self).list_all().await
    }
}
