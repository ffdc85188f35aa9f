//! Warm-Start Loader
//!
//! Fills the cache from the store once at startup, before ingestion and the
//! HTTP server begin.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::SharedCache;
use crate::models::Order;
use crate::storage::OrderStorage;

/// Loads every stored order into the cache and returns how many were inserted.
///
/// A store failure is not fatal: it is logged and the cache stays as it was,
/// relying on read-through misses to fill it later. Orders are inserted oldest
/// first, so when the store holds more than the cache can, the newest survive.
pub async fn warm(cache: &SharedCache<Arc<Order>>, storage: &dyn OrderStorage) -> usize {
    let orders = match storage.load_all().await {
        Ok(orders) => orders,
        Err(e) => {
            warn!(error = %e, "Failed to load orders for cache warm-up, starting cold");
            return 0;
        }
    };

    let count = orders.len();
    // load_all yields newest first
    for order in orders.into_iter().rev() {
        let key = order.order_uid.clone();
        cache.put(key, Arc::new(order)).await;
    }

    info!(count, "Cache warmed");
    count
}
