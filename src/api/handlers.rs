//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::cache::SharedCache;
use crate::error::{OrderError, Result};
use crate::models::{HealthResponse, Order, PublishResponse, StatsResponse};
use crate::pipeline::{IngestStats, ReadThrough};
use crate::storage::OrderStorage;
use crate::stream::MemoryStream;

/// Application state shared across all handlers.
///
/// Holds handles to the one cache, store and stream of the process; cloning
/// the state clones the handles, not the data.
#[derive(Clone)]
pub struct AppState {
    pub cache: SharedCache<Arc<Order>>,
    pub reader: ReadThrough,
    pub storage: Arc<dyn OrderStorage>,
    /// Where POST /api/orders publishes raw payloads
    pub stream: MemoryStream,
    pub ingest_stats: Arc<IngestStats>,
    /// Length of the recent orders list
    pub recent_limit: usize,
}

impl AppState {
    pub fn new(
        cache: SharedCache<Arc<Order>>,
        storage: Arc<dyn OrderStorage>,
        stream: MemoryStream,
        ingest_stats: Arc<IngestStats>,
        recent_limit: usize,
    ) -> Self {
        Self {
            reader: ReadThrough::new(cache.clone(), Arc::clone(&storage)),
            cache,
            storage,
            stream,
            ingest_stats,
            recent_limit,
        }
    }
}

/// Handler for GET /api/order/:order_uid
///
/// Read-through lookup: cache first, then the store.
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(order_uid): Path<String>,
) -> Result<Json<Order>> {
    if order_uid.is_empty() {
        return Err(OrderError::InvalidRequest(
            "Order identifier is required".to_string(),
        ));
    }

    let order = state.reader.fetch(&order_uid).await?;
    Ok(Json(order.as_ref().clone()))
}

/// Handler for GET /api/orders/recent
///
/// Newest orders straight from the store; does not touch the cache.
pub async fn recent_orders_handler(State(state): State<AppState>) -> Result<Json<Vec<Order>>> {
    let orders = state
        .storage
        .load_recent(state.recent_limit)
        .await
        .map_err(|e| OrderError::Storage(e.to_string()))?;

    Ok(Json(orders))
}

/// Handler for POST /api/orders
///
/// Publishes the raw body onto the order stream. Decoding and validation
/// happen later, in the ingestion loop.
pub async fn publish_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<PublishResponse>)> {
    if body.is_empty() {
        return Err(OrderError::InvalidRequest(
            "Request body cannot be empty".to_string(),
        ));
    }

    let offset = state
        .stream
        .publish(body)
        .await
        .map_err(|e| OrderError::Internal(e.to_string()))?;
    info!(offset, "Order record published");

    Ok((StatusCode::ACCEPTED, Json(PublishResponse { offset })))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.stats().await;
    Json(StatsResponse::new(cache, state.ingest_stats.snapshot()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
