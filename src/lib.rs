//! Order Cache - order ingestion with a read-through LRU cache
//!
//! Consumes order records from a stream, persists them, and serves them from
//! a fixed-capacity LRU cache in front of the order store.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod stream;

pub use api::AppState;
pub use config::Config;
pub use error::OrderError;
pub use pipeline::{spawn_ingestion_task, warm, IngestionLoop, ReadThrough};
