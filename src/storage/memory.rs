//! In-memory order store

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{OrderStorage, StoreError};
use crate::models::Order;

/// Order store held in process memory.
///
/// `save` is an upsert keyed by `order_uid`. Reads and writes can be switched
/// off independently to simulate an unreachable database, and every call is
/// counted.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    orders: RwLock<HashMap<String, Order>>,
    reads_down: AtomicBool,
    writes_down: AtomicBool,
    save_calls: AtomicUsize,
    load_calls: AtomicUsize,
    load_all_calls: AtomicUsize,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `orders`.
    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let map = orders
            .into_iter()
            .map(|order| (order.order_uid.clone(), order))
            .collect();
        Self {
            orders: RwLock::new(map),
            ..Self::default()
        }
    }

    /// Switches reads on or off; while off they fail with [`StoreError::Unavailable`].
    pub fn set_reads_available(&self, available: bool) {
        self.reads_down.store(!available, Ordering::SeqCst);
    }

    /// Switches writes on or off; while off they fail with [`StoreError::Unavailable`].
    pub fn set_writes_available(&self, available: bool) {
        self.writes_down.store(!available, Ordering::SeqCst);
    }

    pub fn save_calls(&self) -> usize {
        self.save_calls.load(Ordering::SeqCst)
    }

    pub fn load_calls(&self) -> usize {
        self.load_calls.load(Ordering::SeqCst)
    }

    pub fn load_all_calls(&self) -> usize {
        self.load_all_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }

    pub async fn contains(&self, order_uid: &str) -> bool {
        self.orders.read().await.contains_key(order_uid)
    }

    fn check_reads(&self) -> Result<(), StoreError> {
        if self.reads_down.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("reads are disabled".to_string()));
        }
        Ok(())
    }

    async fn newest_first(&self, limit: Option<usize>) -> Vec<Order> {
        let orders = self.orders.read().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| {
            b.date_created
                .cmp(&a.date_created)
                .then_with(|| a.order_uid.cmp(&b.order_uid))
        });
        if let Some(limit) = limit {
            all.truncate(limit);
        }
        all
    }
}

#[async_trait]
impl OrderStorage for InMemoryStorage {
    async fn save(&self, order: &Order) -> Result<(), StoreError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        if self.writes_down.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes are disabled".to_string()));
        }

        let mut orders = self.orders.write().await;
        orders.insert(order.order_uid.clone(), order.clone());
        Ok(())
    }

    async fn load(&self, order_uid: &str) -> Result<Option<Order>, StoreError> {
        self.load_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;

        let orders = self.orders.read().await;
        Ok(orders.get(order_uid).cloned())
    }

    async fn load_all(&self) -> Result<Vec<Order>, StoreError> {
        self.load_all_calls.fetch_add(1, Ordering::SeqCst);
        self.check_reads()?;

        Ok(self.newest_first(None).await)
    }

    async fn load_recent(&self, limit: usize) -> Result<Vec<Order>, StoreError> {
        self.check_reads()?;
        Ok(self.newest_first(Some(limit)).await)
    }
}
