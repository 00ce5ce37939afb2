//! Per-key async locks.
//!
//! Stock mutations are read-modify-write sequences against a `BeerStore`. Two
//! of them on the same id must not interleave, or one update is lost.
//! `KeyedLocks` hands out one `tokio::sync::Mutex` per key so writers on the
//! same record queue up while writers on different records proceed.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Lazily-created lock per key.
///
/// Repeated lookups of the same key return the same `Arc` until the entry is
/// pruned.
#[derive(Debug)]
pub struct KeyedLocks<K> {
    locks: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> KeyedLocks<K> {
    pub fn new() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl<K> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> KeyedLocks<K>
where
    K: Clone + Eq + Hash,
{
    /// Get (or create) the lock for `key`.
    pub fn get_lock(&self, key: &K) -> Arc<AsyncMutex<()>> {
        // The map only holds Arcs; a panic elsewhere cannot leave it half-written.
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    /// Wait until `key` is free and hold it until the guard is dropped.
    pub async fn acquire(&self, key: &K) -> OwnedMutexGuard<()> {
        self.get_lock(key).lock_owned().await
    }

    /// Drop the entry for `key` if nobody holds or waits on it.
    pub fn prune(&self, key: &K) {
        let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(lock) = locks.get(key) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
