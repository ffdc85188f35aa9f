//! Persistence Gateway
//!
//! The durable system of record for orders, consumed through the
//! [`OrderStorage`] trait. The SQL backend lives outside this crate;
//! [`InMemoryStorage`] is the bundled implementation.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Order;

pub use memory::InMemoryStorage;

// == Store Error ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached or refused the operation
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with an unexpected failure
    #[error("store backend error: {0}")]
    Backend(String),
}

// == Order Storage ==
/// Durable order store keyed by `order_uid`.
#[async_trait]
pub trait OrderStorage: Send + Sync {
    /// Persists an order. Saving the same `order_uid` again must not corrupt
    /// state or create a duplicate.
    async fn save(&self, order: &Order) -> Result<(), StoreError>;

    /// Loads one order; `Ok(None)` when no such order exists.
    async fn load(&self, order_uid: &str) -> Result<Option<Order>, StoreError>;

    /// Loads every stored order, newest `date_created` first.
    async fn load_all(&self) -> Result<Vec<Order>, StoreError>;

    /// Loads at most `limit` orders, newest `date_created` first.
    async fn load_recent(&self, limit: usize) -> Result<Vec<Order>, StoreError>;
}
