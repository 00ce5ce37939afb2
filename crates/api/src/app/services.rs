//! Infrastructure wiring for the HTTP layer.

use std::sync::Arc;

use beerstock_infra::{
    config::{StorageBackend, StorageConfig},
    BeerStore, InMemoryBeerStore, PostgresBeerStore, StockManager, StoreError,
};

/// Type-erased store so handlers do not care which backend is configured.
pub type SharedBeerStore = Arc<dyn BeerStore>;

/// Services shared by every request handler.
pub struct AppServices {
    stock: StockManager<SharedBeerStore>,
    backend: StorageBackend,
}

impl AppServices {
    pub fn new(store: SharedBeerStore, backend: StorageBackend) -> Self {
        Self {
            stock: StockManager::new(store),
            backend,
        }
    }

    /// Fresh in-memory services (tests/dev).
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBeerStore::new()), StorageBackend::Memory)
    }

    pub fn stock(&self) -> &StockManager<SharedBeerStore> {
        &self.stock
    }

    pub fn backend(&self) -> StorageBackend {
        self.backend
    }
}

/// Build services for the configured storage backend.
///
/// For Postgres this connects the pool and creates the schema if needed.
pub async fn build_services(config: &StorageConfig) -> Result<AppServices, StoreError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory beer store");
            Ok(AppServices::in_memory())
        }
        StorageBackend::Postgres => {
            let url = config.database_url.as_deref().ok_or_else(|| {
                StoreError::Backend("storage.database_url is not set".to_string())
            })?;
            let store = PostgresBeerStore::connect(url, config.max_connections).await?;
            store.ensure_schema().await?;
            tracing::info!(max_connections = config.max_connections, "using postgres beer store");
            Ok(AppServices::new(Arc::new(store), StorageBackend::Postgres))
        }
    }
}
