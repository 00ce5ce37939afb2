use std::collections::BTreeMap;
use std::sync::RwLock;

use beerstock_core::{BeerId, Entity};
use beerstock_inventory::{Beer, NewBeer};

use super::{BeerStore, StoreError};

#[derive(Debug)]
struct Inner {
    beers: BTreeMap<BeerId, Beer>,
    next_id: i64,
}

/// In-memory beer store.
///
/// Intended for tests/dev. Ids start at 1 and are never reused, even after a
/// delete.
#[derive(Debug)]
pub struct InMemoryBeerStore {
    inner: RwLock<Inner>,
}

impl InMemoryBeerStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                beers: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.beers.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryBeerStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory store lock poisoned".to_string())
}

#[async_trait::async_trait]
impl BeerStore for InMemoryBeerStore {
    async fn find_by_id(&self, id: BeerId) -> Result<Option<Beer>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.beers.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Beer>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.beers.values().find(|b| b.name() == name).cloned())
    }

    async fn insert(&self, beer: NewBeer) -> Result<Beer, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.beers.values().any(|b| b.name() == beer.name()) {
            return Err(StoreError::Conflict(format!(
                "name {} is already taken",
                beer.name()
            )));
        }

        let id = BeerId::new(inner.next_id);
        inner.next_id += 1;

        let saved = Beer::from_new(id, beer);
        inner.beers.insert(id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, beer: Beer) -> Result<Beer, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let id = *beer.id();
        match inner.beers.get_mut(&id) {
            Some(slot) => {
                *slot = beer.clone();
                Ok(beer)
            }
            None => Err(StoreError::Backend(format!(
                "cannot update beer {id}: no such record"
            ))),
        }
    }

    async fn delete_by_id(&self, id: BeerId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        Ok(inner.beers.remove(&id).is_some())
    }

    async fn list_all(&self) -> Result<Vec<Beer>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.beers.values().cloned().collect())
    }
}
