//! Repository port

use std::sync::Arc;

use async_trait::async_trait;
use chunkgate_core::{ChunkEvent, ChunkSystemState};
use futures::stream::BoxStream;

use crate::errors::Result;

/// Stream of committed events, in commit order
pub type EventStream = BoxStream<'static, Result<ChunkEvent>>;

/// Durable home of the scheduler state
///
/// `save` is atomic: the state is replaced and its events published as one
/// step, or neither happens and `RepositoryFailure` is returned.
#[async_trait]
pub trait ChunkRepository: Send + Sync {
    /// Last committed state
    ///
    /// # Errors
    /// Returns `RepositoryFailure` when nothing has been saved yet or the
    /// backend cannot be read.
    async fn load(&self) -> Result<ChunkSystemState>;

    /// Commit `state` and publish `events` in order
    ///
    /// # Errors
    /// Returns `RepositoryFailure` if the state could not be stored; no
    /// events are published in that case.
    async fn save(&self, state: &ChunkSystemState, events: &[ChunkEvent]) -> Result<()>;

    /// Subscribe to events committed from now on
    fn observe(&self) -> EventStream;
}

#[async_trait]
impl<R> ChunkRepository for Arc<R>
where
    R: ChunkRepository + ?Sized,
{
    async fn load(&self) -> Result<ChunkSystemState> {
        (**self).load().await
    }

    async fn save(&self, state: &ChunkSystemState, events: &[ChunkEvent]) -> Result<()> {
        (**self).save(state, events).await
    }

    fn observe(&self) -> EventStream {
        (**self).observe()
    }
}
