//! chunkgate Engine - Orchestration layer
//!
//! Wires the pure state machine in `chunkgate-core` to a repository from
//! `chunkgate-store`: commands are applied against the cached state, the
//! result is committed, then the cache moves forward.

pub mod config;
pub mod service;

pub use config::{EngineConfig, StoreSettings};
pub use service::ChunkService;
