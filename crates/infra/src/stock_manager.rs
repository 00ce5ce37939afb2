//! Stock management pipeline (application-level orchestration).
//!
//! `StockManager` owns the business rules that need storage to decide:
//!
//! ```text
//! Operation
//!   ↓
//! 1. Serialize (per-id lock for mutations, creation lock for create)
//!   ↓
//! 2. Load the record(s) from the store
//!   ↓
//! 3. Decide (uniqueness / existence checks, pure quantity transition)
//!   ↓
//! 4. Persist (insert / update / delete)
//! ```
//!
//! The quantity arithmetic itself lives in `beerstock_inventory::Beer`; this
//! module only loads, decides through the domain, and writes back. A rejected
//! transition never reaches the store.

use thiserror::Error;
use tracing::{info, instrument, warn};

use beerstock_core::{BeerId, DomainError, Entity};
use beerstock_inventory::{Beer, NewBeer, StockViolation};

use crate::lock::KeyedLocks;
use crate::store::{BeerStore, StoreError};

/// How a missing record was referenced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BeerRef {
    Id(BeerId),
    Name(String),
}

impl core::fmt::Display for BeerRef {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BeerRef::Id(id) => write!(f, "ID {id}"),
            BeerRef::Name(name) => write!(f, "name {name}"),
        }
    }
}

/// Failure of a stock operation.
///
/// The first four variants are expected business-rule outcomes; `Invalid` and
/// `Store` are infrastructure failures passed through unchanged.
#[derive(Debug, Error)]
pub enum StockError {
    #[error("Beer with name {0} already registered in the system.")]
    AlreadyExists(String),

    #[error("Beer with {0} not found in the system.")]
    NotFound(BeerRef),

    #[error("Beers with {0} ID to increment informed exceeds the max stock capacity")]
    StockExceeded(BeerId),

    #[error("Beers with {0} ID to decrement informed make stock capacity less than 0")]
    StockBelowZero(BeerId),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for StockError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Corrupt(e) => StockError::Invalid(e),
            other => StockError::Store(other),
        }
    }
}

impl StockError {
    /// True for the business-rule outcomes a caller is expected to handle.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            StockError::AlreadyExists(_)
                | StockError::NotFound(_)
                | StockError::StockExceeded(_)
                | StockError::StockBelowZero(_)
        )
    }
}

/// Stock manager over any `BeerStore`.
///
/// Mutations on one id are serialized through `KeyedLocks`; creates share a
/// single creation lock so the name check and the insert cannot interleave
/// with another create. Reads take no lock.
#[derive(Debug)]
pub struct StockManager<S> {
    store: S,
    locks: KeyedLocks<BeerId>,
    create_lock: tokio::sync::Mutex<()>,
}

impl<S> StockManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: KeyedLocks::new(),
            create_lock: tokio::sync::Mutex::new(()),
        }
    }
}

impl<S> StockManager<S>
where
    S: BeerStore,
{
    /// Register a new beer; the name must not be taken.
    #[instrument(skip(self, candidate), fields(name = %candidate.name()))]
    pub async fn create(&self, candidate: NewBeer) -> Result<Beer, StockError> {
        let _guard = self.create_lock.lock().await;

        if self.store.find_by_name(candidate.name()).await?.is_some() {
            warn!("beer name already registered");
            return Err(StockError::AlreadyExists(candidate.name().to_string()));
        }

        let name = candidate.name().to_string();
        let saved = match self.store.insert(candidate).await {
            Ok(saved) => saved,
            // Another process sharing the store won the race.
            Err(StoreError::Conflict(_)) => return Err(StockError::AlreadyExists(name)),
            Err(e) => return Err(e.into()),
        };

        info!(
            beer_id = %saved.id(),
            quantity = saved.quantity(),
            max = saved.max(),
            "beer registered"
        );
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> Result<Beer, StockError> {
        self.store
            .find_by_name(name)
            .await?
            .ok_or_else(|| StockError::NotFound(BeerRef::Name(name.to_string())))
    }

    /// All records in store order; empty when nothing is registered.
    pub async fn list_all(&self) -> Result<Vec<Beer>, StockError> {
        Ok(self.store.list_all().await?)
    }

    #[instrument(skip(self), fields(beer_id = %id))]
    pub async fn delete_by_id(&self, id: BeerId) -> Result<(), StockError> {
        let deleted = {
            let _guard = self.locks.acquire(&id).await;
            self.verify_if_exists(id).await?;
            self.store.delete_by_id(id).await?
        };
        self.locks.prune(&id);

        if !deleted {
            return Err(StockError::NotFound(BeerRef::Id(id)));
        }
        info!("beer deleted");
        Ok(())
    }

    /// Add `amount` units, rejecting anything that would exceed `max`.
    #[instrument(skip(self), fields(beer_id = %id))]
    pub async fn increment(&self, id: BeerId, amount: u32) -> Result<Beer, StockError> {
        let saved = self
            .adjust(id, |beer| {
                beer.increment(amount).map_err(|violation| {
                    log_violation(id, amount, &violation);
                    StockError::StockExceeded(id)
                })
            })
            .await?;
        info!(amount, quantity = saved.quantity(), "stock incremented");
        Ok(saved)
    }

    /// Remove `amount` units, rejecting anything that would go below zero.
    #[instrument(skip(self), fields(beer_id = %id))]
    pub async fn decrement(&self, id: BeerId, amount: u32) -> Result<Beer, StockError> {
        let saved = self
            .adjust(id, |beer| {
                beer.decrement(amount).map_err(|violation| {
                    log_violation(id, amount, &violation);
                    StockError::StockBelowZero(id)
                })
            })
            .await?;
        info!(amount, quantity = saved.quantity(), "stock decremented");
        Ok(saved)
    }

    /// Load, decide and save under the id's lock.
    ///
    /// The lock entry is pruned on every outcome, so ids that never existed
    /// leave nothing behind.
    async fn adjust<F>(&self, id: BeerId, decide: F) -> Result<Beer, StockError>
    where
        F: FnOnce(&Beer) -> Result<Beer, StockError>,
    {
        let result: Result<Beer, StockError> = {
            let _guard = self.locks.acquire(&id).await;
            async {
                let beer = self.verify_if_exists(id).await?;
                let updated = decide(&beer)?;
                Ok(self.store.update(updated).await?)
            }
            .await
        };
        self.locks.prune(&id);
        result
    }

    async fn verify_if_exists(&self, id: BeerId) -> Result<Beer, StockError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(StockError::NotFound(BeerRef::Id(id)))
    }
}

fn log_violation(id: BeerId, amount: u32, violation: &StockViolation) {
    warn!(beer_id = %id, amount, %violation, "stock change rejected");
}
