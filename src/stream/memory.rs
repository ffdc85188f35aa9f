//! In-process order stream
//!
//! Records are published with increasing offsets and stay in flight until
//! acknowledged. Unacknowledged records can be put back at the head of the
//! queue, which is what a broker does after a consumer restart.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::{Mutex, Notify};
use tracing::debug;

use super::{Delivery, DeliveryToken, StreamError, StreamSource};

#[derive(Debug)]
struct Record {
    offset: u64,
    payload: Bytes,
}

#[derive(Debug, Default)]
struct State {
    next_offset: u64,
    queue: VecDeque<Record>,
    in_flight: BTreeMap<u64, Bytes>,
    acknowledged: Vec<u64>,
    closed: bool,
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<State>,
    available: Notify,
}

/// Cloneable handle to one in-process stream; clones publish to and consume
/// from the same queue.
#[derive(Debug, Clone, Default)]
pub struct MemoryStream {
    inner: Arc<Inner>,
}

impl MemoryStream {
    pub fn new() -> Self {
        Self::default()
    }

    // == Publish ==
    /// Appends a record and returns its offset.
    pub async fn publish(&self, payload: impl Into<Bytes>) -> Result<u64, StreamError> {
        let mut state = self.inner.state.lock().await;
        if state.closed {
            return Err(StreamError::Closed);
        }

        let offset = state.next_offset;
        state.next_offset += 1;
        state.queue.push_back(Record {
            offset,
            payload: payload.into(),
        });
        drop(state);

        self.inner.available.notify_one();
        Ok(offset)
    }

    // == Close ==
    /// Stops accepting records. Receivers drain what is queued, then get
    /// [`StreamError::Closed`].
    pub async fn close(&self) {
        self.inner.state.lock().await.closed = true;
        self.inner.available.notify_waiters();
    }

    // == Redelivery ==
    /// Moves every unacknowledged in-flight record back to the head of the
    /// queue in offset order. Returns how many were re-queued.
    pub async fn redeliver_pending(&self) -> usize {
        let mut state = self.inner.state.lock().await;
        let pending = std::mem::take(&mut state.in_flight);
        let count = pending.len();

        for (offset, payload) in pending.into_iter().rev() {
            state.queue.push_front(Record { offset, payload });
        }
        drop(state);

        if count > 0 {
            debug!(count, "re-queued unacknowledged records");
            self.inner.available.notify_one();
        }
        count
    }

    // == Inspection ==
    /// Offsets acknowledged so far, in acknowledgment order.
    pub async fn acknowledged(&self) -> Vec<u64> {
        self.inner.state.lock().await.acknowledged.clone()
    }

    /// Offsets received but not yet acknowledged.
    pub async fn in_flight(&self) -> Vec<u64> {
        self.inner.state.lock().await.in_flight.keys().copied().collect()
    }

    /// Number of records waiting to be received.
    pub async fn queued(&self) -> usize {
        self.inner.state.lock().await.queue.len()
    }
}

#[async_trait]
impl StreamSource for MemoryStream {
    async fn receive(&self) -> Result<Delivery, StreamError> {
        loop {
            // Registered before checking the queue so a publish in between
            // still wakes us.
            let notified = self.inner.available.notified();
            {
                let mut state = self.inner.state.lock().await;
                if let Some(record) = state.queue.pop_front() {
                    state.in_flight.insert(record.offset, record.payload.clone());
                    return Ok(Delivery {
                        payload: record.payload,
                        token: DeliveryToken::new(record.offset),
                    });
                }
                if state.closed {
                    return Err(StreamError::Closed);
                }
            }
            notified.await;
        }
    }

    async fn acknowledge(&self, token: DeliveryToken) -> Result<(), StreamError> {
        let mut state = self.inner.state.lock().await;
        let offset = token.offset();
        if state.in_flight.remove(&offset).is_none() {
            return Err(StreamError::UnknownToken(offset));
        }
        state.acknowledged.push(offset);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_publish_receive_acknowledge() {
        let stream = MemoryStream::new();
        assert_eq!(stream.publish("a").await.unwrap(), 0);
        assert_eq!(stream.publish("b").await.unwrap(), 1);

        let first = stream.receive().await.unwrap();
        assert_eq!(first.payload, Bytes::from("a"));
        assert_eq!(first.token.offset(), 0);
        assert_eq!(stream.in_flight().await, vec![0]);

        stream.acknowledge(first.token).await.unwrap();
        assert_eq!(stream.acknowledged().await, vec![0]);
        assert!(stream.in_flight().await.is_empty());
        assert_eq!(stream.queued().await, 1);
    }

    #[tokio::test]
    async fn test_acknowledge_unknown_offset() {
        let stream = MemoryStream::new();
        let result = stream.acknowledge(DeliveryToken::new(42)).await;
        assert_eq!(result, Err(StreamError::UnknownToken(42)));
    }

    #[tokio::test]
    async fn test_second_ack_of_same_offset_is_rejected() {
        let stream = MemoryStream::new();
        stream.publish("a").await.unwrap();
        let delivery = stream.receive().await.unwrap();
        stream.acknowledge(delivery.token).await.unwrap();

        let forged = DeliveryToken::new(0);
        assert_eq!(
            stream.acknowledge(forged).await,
            Err(StreamError::UnknownToken(0))
        );
    }

    #[tokio::test]
    async fn test_receive_waits_for_publish() {
        let stream = MemoryStream::new();
        let consumer = stream.clone();

        let handle = tokio::spawn(async move { consumer.receive().await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished());

        stream.publish("late").await.unwrap();
        let delivery = handle.await.unwrap().unwrap();
        assert_eq!(delivery.payload, Bytes::from("late"));
    }

    #[tokio::test]
    async fn test_close_drains_then_reports_closed() {
        let stream = MemoryStream::new();
        stream.publish("a").await.unwrap();
        stream.close().await;

        assert_eq!(stream.publish("b").await, Err(StreamError::Closed));
        assert!(stream.receive().await.is_ok());
        assert!(matches!(stream.receive().await, Err(StreamError::Closed)));
    }

    #[tokio::test]
    async fn test_close_wakes_blocked_receiver() {
        let stream = MemoryStream::new();
        let consumer = stream.clone();

        let handle = tokio::spawn(async move { consumer.receive().await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        stream.close().await;

        let result = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(result, Err(StreamError::Closed)));
    }

    #[tokio::test]
    async fn test_redeliver_pending_puts_records_first() {
        let stream = MemoryStream::new();
        stream.publish("a").await.unwrap();
        stream.publish("b").await.unwrap();
        stream.publish("c").await.unwrap();

        let a = stream.receive().await.unwrap();
        let b = stream.receive().await.unwrap();
        stream.acknowledge(a.token).await.unwrap();
        drop(b);

        assert_eq!(stream.redeliver_pending().await, 1);

        let again = stream.receive().await.unwrap();
        assert_eq!(again.token.offset(), 1);
        assert_eq!(again.payload, Bytes::from("b"));
        let next = stream.receive().await.unwrap();
        assert_eq!(next.token.offset(), 2);
    }
}
