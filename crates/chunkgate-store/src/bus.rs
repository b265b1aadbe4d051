//! Event fan-out shared by the backends
//!
//! Built on a bounded `tokio::sync::broadcast` channel. Publishing never
//! blocks. A subscriber that falls more than `capacity` events behind loses
//! the oldest ones, gets a warning logged with the skipped count, and resumes
//! at the oldest event still buffered.

use chunkgate_core::ChunkEvent;
use futures::StreamExt;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::repo::EventStream;

/// Events buffered per subscriber before the oldest are dropped
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ChunkEvent>,
}

impl EventBus {
    /// Bus buffering up to `capacity` events (at least 1)
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publish events in order
    ///
    /// Having no subscribers is not an error; the events are simply dropped.
    pub fn publish(&self, events: &[ChunkEvent]) {
        for event in events {
            let _ = self.sender.send(event.clone());
        }
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Subscribe; only events published after this call are delivered
    pub fn subscribe(&self) -> EventStream {
        let receiver = self.sender.subscribe();

        futures::stream::unfold(receiver, |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => return Some((Ok(event), receiver)),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Event subscriber lagged, oldest events dropped");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
        .boxed()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}
