//! Pipeline Module
//!
//! The three paths that move orders into and out of the cache.
//!
//! # Components
//! - Ingestion: stream → store → cache → acknowledge, as a long-lived task
//! - Read-through: cache first, store on miss, used by the HTTP layer
//! - Warm-start: one bulk load from the store before anything else runs

mod ingest;
mod read_through;
mod warm;

pub use ingest::{
    spawn_ingestion_task, IngestOutcome, IngestSnapshot, IngestStats, IngestionLoop,
};
pub use read_through::ReadThrough;
pub use warm::warm;
