//! Durable document backend
//!
//! The whole state is stored as one JSON document, `<dir>/state.json`,
//! replaced atomically on every save. Events are published only after the
//! rename has succeeded, from the same blocking task that performed it, so a
//! caller that stops waiting cannot separate the two.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chunkgate_core::{ChunkEvent, ChunkSystemState};
use tokio::sync::Mutex;

use crate::atomic::atomic_write;
use crate::bus::EventBus;
use crate::errors::{io_failure, missing_state, serialization_failure, task_failure, Result};
use crate::repo::{ChunkRepository, EventStream};

/// Name of the state document inside the repository directory
pub const STATE_FILE_NAME: &str = "state.json";

pub struct FileRepository {
    path: PathBuf,
    bus: EventBus,
    write_gate: Arc<Mutex<()>>,
}

impl FileRepository {
    /// Repository rooted at `dir`; nothing is touched until the first save
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self::with_bus(dir, EventBus::default())
    }

    /// Same as [`FileRepository::open`] with a custom subscriber buffer
    pub fn with_capacity(dir: impl AsRef<Path>, capacity: usize) -> Self {
        Self::with_bus(dir, EventBus::new(capacity))
    }

    fn with_bus(dir: impl AsRef<Path>, bus: EventBus) -> Self {
        Self {
            path: dir.as_ref().join(STATE_FILE_NAME),
            bus,
            write_gate: Arc::new(Mutex::new(())),
        }
    }

    /// Location of the state document
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read_document(path: &Path) -> Result<ChunkSystemState> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(missing_state(&path.display().to_string()))
        }
        Err(e) => return Err(io_failure("read", path, e)),
    };

    // Deserialization runs the state's own validation, capacity included
    serde_json::from_slice(&bytes)
        .map_err(|e| serialization_failure(&format!("decode {}", path.display()), e))
}

#[async_trait]
impl ChunkRepository for FileRepository {
    async fn load(&self) -> Result<ChunkSystemState> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || read_document(&path))
            .await
            .map_err(|e| task_failure("load", e))?
    }

    async fn save(&self, state: &ChunkSystemState, events: &[ChunkEvent]) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(state)
            .map_err(|e| serialization_failure("encode state", e))?;

        let gate = Arc::clone(&self.write_gate).lock_owned().await;
        let path = self.path.clone();
        let bus = self.bus.clone();
        let events = events.to_vec();
        let tick = state.tick();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let _gate = gate;
            atomic_write(&path, &bytes)?;
            bus.publish(&events);

            tracing::debug!(
                path = %path.display(),
                tick,
                event_count = events.len() as u64,
                "Committed state document"
            );
            Ok(())
        })
        .await
        .map_err(|e| task_failure("save", e))?
    }

    fn observe(&self) -> EventStream {
        self.bus.subscribe()
    }
}
