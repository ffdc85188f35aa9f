//! Read-Through Accessor
//!
//! Serves orders from the cache, falling back to the store on a miss and
//! back-filling the cache with what the store returned.

use std::sync::Arc;

use tracing::debug;

use crate::cache::SharedCache;
use crate::error::{OrderError, Result};
use crate::models::Order;
use crate::storage::OrderStorage;

/// Read path used by the serving layer.
///
/// Concurrent misses for the same id may each load from the store and each
/// fill the cache; the value is the same, so the last write wins harmlessly.
#[derive(Clone)]
pub struct ReadThrough {
    cache: SharedCache<Arc<Order>>,
    storage: Arc<dyn OrderStorage>,
}

impl ReadThrough {
    pub fn new(cache: SharedCache<Arc<Order>>, storage: Arc<dyn OrderStorage>) -> Self {
        Self { cache, storage }
    }

    /// Returns the order for `order_uid`.
    ///
    /// # Errors
    /// - [`OrderError::NotFound`] if neither cache nor store has it
    /// - [`OrderError::Storage`] if the store lookup failed (not retried)
    pub async fn fetch(&self, order_uid: &str) -> Result<Arc<Order>> {
        if let Some(order) = self.cache.get(order_uid).await {
            debug!(order_uid, "Cache hit");
            return Ok(order);
        }

        debug!(order_uid, "Cache miss, loading from store");
        let order = self
            .storage
            .load(order_uid)
            .await
            .map_err(|e| OrderError::Storage(e.to_string()))?
            .map(Arc::new)
            .ok_or_else(|| OrderError::NotFound(order_uid.to_string()))?;

        self.cache.put(order_uid, Arc::clone(&order)).await;
        Ok(order)
    }
}
