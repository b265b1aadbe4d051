//! chunkgate Store - persistence port and backends
//!
//! The [`ChunkRepository`] trait is the only thing the orchestration layer
//! knows about storage. Backends:
//!
//! - [`InMemoryRepository`]: volatile cell, immediate commit
//! - [`LatencyRepository`]: decorator adding a fixed commit delay
//! - [`FileRepository`]: JSON document on disk, atomic replace
//!
//! Every backend publishes committed events through an [`EventBus`].

pub mod atomic;
pub mod bus;
pub mod errors;
pub mod file;
pub mod latency;
pub mod memory;
pub mod repo;

pub use bus::{EventBus, DEFAULT_EVENT_CAPACITY};
pub use file::{FileRepository, STATE_FILE_NAME};
pub use latency::{LatencyRepository, MIN_SAVE_LATENCY};
pub use memory::InMemoryRepository;
pub use repo::{ChunkRepository, EventStream};
