//! Stream Source
//!
//! Ordered delivery of serialized order records with an acknowledgment
//! handshake. The broker client lives outside this crate; [`MemoryStream`]
//! is the bundled in-process source.

mod memory;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use memory::MemoryStream;

// == Stream Error ==
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The source is closed and fully drained
    #[error("stream closed")]
    Closed,

    /// Acknowledged an offset that is not in flight
    #[error("unknown delivery token for offset {0}")]
    UnknownToken(u64),

    /// Transport-level failure reported by the source
    #[error("stream transport error: {0}")]
    Transport(String),
}

// == Delivery Token ==
/// Opaque acknowledgment handle tied to exactly one received record.
///
/// Not `Clone`: [`StreamSource::acknowledge`] consumes it, so a token cannot
/// be used twice.
#[derive(Debug, PartialEq, Eq)]
pub struct DeliveryToken {
    offset: u64,
}

impl DeliveryToken {
    pub fn new(offset: u64) -> Self {
        Self { offset }
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

/// One received record and its acknowledgment token.
#[derive(Debug)]
pub struct Delivery {
    pub payload: Bytes,
    pub token: DeliveryToken,
}

// == Stream Source ==
#[async_trait]
pub trait StreamSource: Send + Sync {
    /// Waits for the next record. Suspends while none is available.
    async fn receive(&self) -> Result<Delivery, StreamError>;

    /// Marks the record behind `token` as consumed, advancing the checkpoint.
    async fn acknowledge(&self, token: DeliveryToken) -> Result<(), StreamError>;
}
