//! Infrastructure layer: record stores, stock orchestration, config.

pub mod config;
pub mod lock;
pub mod stock_manager;
pub mod store;

pub use stock_manager::{BeerRef, StockError, StockManager};
pub use store::{BeerStore, InMemoryBeerStore, PostgresBeerStore, StoreError};
