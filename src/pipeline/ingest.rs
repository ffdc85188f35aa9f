//! Ingestion Loop
//!
//! Consumes order records from the stream and, per record, runs
//! decode → validate → persist → cache → acknowledge.
//!
//! Decode and validation failures are poison messages: logged, acknowledged
//! and dropped. A failed persist leaves the record unacknowledged so the
//! stream redelivers it later; the loop itself never retries.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::cache::SharedCache;
use crate::error::OrderError;
use crate::models::{Order, OrderValidator};
use crate::storage::OrderStorage;
use crate::stream::{Delivery, StreamError, StreamSource};

// == Outcome ==
/// Terminal state reached by one received record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Persisted and cached. `acknowledged` is false if the commit failed.
    Stored {
        order_uid: String,
        acknowledged: bool,
    },
    /// Dropped as malformed or invalid, and acknowledged.
    Rejected { error: OrderError },
    /// Store write failed; left unacknowledged for redelivery.
    PersistFailed { order_uid: String, error: OrderError },
}

// == Stats ==
/// Running counters for the ingestion loop.
#[derive(Debug, Default)]
pub struct IngestStats {
    received: AtomicU64,
    stored: AtomicU64,
    rejected: AtomicU64,
    persist_failed: AtomicU64,
    ack_failed: AtomicU64,
}

/// Point-in-time copy of [`IngestStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSnapshot {
    pub received: u64,
    pub stored: u64,
    pub rejected: u64,
    pub persist_failed: u64,
    pub ack_failed: u64,
}

impl IngestStats {
    pub fn snapshot(&self) -> IngestSnapshot {
        IngestSnapshot {
            received: self.received.load(Ordering::Relaxed),
            stored: self.stored.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            persist_failed: self.persist_failed.load(Ordering::Relaxed),
            ack_failed: self.ack_failed.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

// == Ingestion Loop ==
pub struct IngestionLoop {
    source: Arc<dyn StreamSource>,
    storage: Arc<dyn OrderStorage>,
    cache: SharedCache<Arc<Order>>,
    validator: OrderValidator,
    stats: Arc<IngestStats>,
    receive_backoff: Duration,
}

impl IngestionLoop {
    pub fn new(
        source: Arc<dyn StreamSource>,
        storage: Arc<dyn OrderStorage>,
        cache: SharedCache<Arc<Order>>,
        validator: OrderValidator,
    ) -> Self {
        Self {
            source,
            storage,
            cache,
            validator,
            stats: Arc::new(IngestStats::default()),
            receive_backoff: Duration::from_millis(100),
        }
    }

    /// Pause taken after a failed receive before trying again.
    pub fn with_receive_backoff(mut self, backoff: Duration) -> Self {
        self.receive_backoff = backoff;
        self
    }

    /// Shared counters, readable while the loop runs.
    pub fn stats(&self) -> Arc<IngestStats> {
        Arc::clone(&self.stats)
    }

    // == Run ==
    /// Consumes records until `shutdown` flips to true (or its sender is
    /// dropped) or the stream closes.
    ///
    /// Cancellation is checked at the top of every cycle and also interrupts
    /// an idle receive. A record already being processed is finished first;
    /// nothing is left half-applied.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!("Ingestion loop started");

        loop {
            if *shutdown.borrow() {
                break;
            }

            let received = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
                received = self.source.receive() => received,
            };

            match received {
                Ok(delivery) => {
                    self.handle(delivery).await;
                }
                Err(StreamError::Closed) => {
                    info!("Order stream closed");
                    break;
                }
                Err(e) => {
                    error!(error = %e, "Failed to receive from order stream");
                    tokio::time::sleep(self.receive_backoff).await;
                }
            }
        }

        info!("Ingestion loop stopped");
    }

    // == Handle ==
    /// Runs one record through the pipeline.
    pub async fn handle(&self, delivery: Delivery) -> IngestOutcome {
        IngestStats::bump(&self.stats.received);
        let Delivery { payload, token } = delivery;
        let offset = token.offset();

        let decoded = Order::from_json(&payload)
            .and_then(|order| self.validator.validate(&order).map(|()| order));

        let order = match decoded {
            Ok(order) => order,
            Err(error) => {
                warn!(offset, error = %error, "Dropping order record");
                IngestStats::bump(&self.stats.rejected);
                if let Err(e) = self.source.acknowledge(token).await {
                    warn!(offset, error = %e, "Failed to acknowledge dropped record");
                    IngestStats::bump(&self.stats.ack_failed);
                }
                return IngestOutcome::Rejected { error };
            }
        };

        let order_uid = order.order_uid.clone();

        if let Err(e) = self.storage.save(&order).await {
            warn!(
                offset,
                order_uid = %order_uid,
                error = %e,
                "Failed to persist order, leaving it for redelivery"
            );
            IngestStats::bump(&self.stats.persist_failed);
            return IngestOutcome::PersistFailed {
                order_uid,
                error: OrderError::PersistenceUnavailable(e.to_string()),
            };
        }
        debug!(order_uid = %order_uid, "Order persisted");

        self.cache.put(order_uid.clone(), Arc::new(order)).await;
        IngestStats::bump(&self.stats.stored);

        let acknowledged = match self.source.acknowledge(token).await {
            Ok(()) => true,
            Err(e) => {
                warn!(offset, order_uid = %order_uid, error = %e, "Failed to acknowledge order");
                IngestStats::bump(&self.stats.ack_failed);
                false
            }
        };

        info!(offset, order_uid = %order_uid, "Order ingested");
        IngestOutcome::Stored {
            order_uid,
            acknowledged,
        }
    }
}

/// Spawns the ingestion loop as a background task.
///
/// # Example
/// ```ignore
/// let (shutdown_tx, shutdown_rx) = watch::channel(false);
/// let handle = spawn_ingestion_task(Arc::new(ingestion), shutdown_rx);
/// // Later, during shutdown:
/// let _ = shutdown_tx.send(true);
/// handle.await?;
/// ```
pub fn spawn_ingestion_task(
    ingestion: Arc<IngestionLoop>,
    shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move { ingestion.run(shutdown).await })
}
