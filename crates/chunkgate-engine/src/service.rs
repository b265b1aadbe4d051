//! Orchestration service
//!
//! `ChunkService` is the single owner of a scheduler instance. It serializes
//! dispatches, runs the pure transition, commits through the repository and
//! only then advances its cached state.
//!
//! The apply, save and cache update of one dispatch run as a detached task
//! holding the dispatch gate. Dropping the `dispatch` future stops the caller
//! from waiting but never stops a commit halfway, so the cache cannot fall
//! behind the repository.
//!
//! ## Logging Ownership
//!
//! This layer owns lifecycle logging for every entry point:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Each dispatch also runs in a span carrying a fresh correlation id.

use std::sync::Arc;
use std::time::Instant;

use chunkgate_core::decode::decode_command;
use chunkgate_core::errors::{ChunkSystemError, ExError, Result};
use chunkgate_core::{
    apply_command, log_op_end, log_op_error, log_op_start, make_initial_state, ChunkSystemState,
    Clock, Command, SystemConfig, Transition,
};
use chunkgate_core_types::CorrelationId;
use chunkgate_store::{ChunkRepository, EventStream};
use tokio::sync::{watch, Mutex};
use tracing::Instrument;

use crate::config::EngineConfig;

pub struct ChunkService {
    repository: Arc<dyn ChunkRepository>,
    clock: Arc<dyn Clock>,
    gate: Arc<Mutex<()>>,
    state_tx: Arc<watch::Sender<Arc<ChunkSystemState>>>,
}

impl ChunkService {
    /// Resume from the repository, or start fresh from `config`
    ///
    /// A failed load is not fatal: the service starts from
    /// `make_initial_state`. That fresh state is only persisted by the first
    /// successful dispatch.
    pub async fn start(
        repository: Arc<dyn ChunkRepository>,
        config: &SystemConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        log_op_start!("service_start");
        let start = Instant::now();

        let state = match repository.load().await {
            Ok(state) => {
                tracing::info!(tick = state.tick(), "Resumed persisted scheduler state");
                state
            }
            Err(err) => {
                tracing::warn!(error = %err, "No usable persisted state, starting fresh");
                make_initial_state(config, clock.now())
            }
        };

        log_op_end!(
            "service_start",
            duration_ms = start.elapsed().as_millis() as u64,
            tick = state.tick()
        );

        let (state_tx, _) = watch::channel(Arc::new(state));
        Self {
            repository,
            clock,
            gate: Arc::new(Mutex::new(())),
            state_tx: Arc::new(state_tx),
        }
    }

    /// Open the repository described by `config.store` and start on it
    pub async fn open(config: &EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self::start(config.store.open_repository(), &config.system, clock).await
    }

    /// Apply one command and commit the result
    ///
    /// Dispatches are serialized. On any error the cached and persisted
    /// state stay where they were.
    ///
    /// # Errors
    /// * `ResourceBudgetExceeded` / `RequestNotFound` from the state machine
    /// * `RepositoryFailure` if the commit fails
    pub async fn dispatch(&self, command: Command) -> Result<Transition> {
        let correlation_id = CorrelationId::new();
        let span = tracing::info_span!(
            "dispatch",
            correlation_id = %correlation_id,
            command = command.name()
        );

        self.dispatch_logged(command, correlation_id)
            .instrument(span)
            .await
    }

    /// Decode an external JSON command and dispatch it
    ///
    /// # Errors
    /// Returns `ValidationError` for a malformed payload, without touching
    /// the state machine; otherwise the same errors as [`Self::dispatch`].
    pub async fn dispatch_json(&self, payload: &str) -> Result<Transition> {
        let command = decode_command(payload).map_err(|e| {
            tracing::warn!(error = %e, "Rejected command payload");
            e
        })?;
        self.dispatch(command).await
    }

    /// Latest committed state
    pub fn current(&self) -> Arc<ChunkSystemState> {
        self.state_tx.borrow().clone()
    }

    /// Receiver notified after every successful dispatch
    pub fn watch_state(&self) -> watch::Receiver<Arc<ChunkSystemState>> {
        self.state_tx.subscribe()
    }

    /// Events committed from now on, straight from the repository
    pub fn events(&self) -> EventStream {
        self.repository.observe()
    }

    async fn dispatch_logged(
        &self,
        command: Command,
        correlation_id: CorrelationId,
    ) -> Result<Transition> {
        log_op_start!("dispatch", command = command.name());
        let start = Instant::now();

        match self.commit(command).await {
            Ok(transition) => {
                log_op_end!(
                    "dispatch",
                    duration_ms = start.elapsed().as_millis() as u64,
                    tick = transition.state.tick(),
                    event_count = transition.events.len() as u64
                );
                Ok::<_, ChunkSystemError>(transition)
            }
            Err(err) => {
                log_op_error!(
                    "dispatch",
                    ExError::from(err.clone()).with_correlation_id(correlation_id),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                Err(err)
            }
        }
    }

    async fn commit(&self, command: Command) -> Result<Transition> {
        let gate = Arc::clone(&self.gate).lock_owned().await;
        let repository = Arc::clone(&self.repository);
        let clock = Arc::clone(&self.clock);
        let state_tx = Arc::clone(&self.state_tx);

        let task = tokio::spawn(
            async move {
                let _gate = gate;

                let current = state_tx.borrow().clone();
                let transition = apply_command(&current, command, clock.as_ref())?;

                repository
                    .save(&transition.state, &transition.events)
                    .await?;
                state_tx.send_replace(Arc::new(transition.state.clone()));

                Ok::<_, ChunkSystemError>(transition)
            }
            .in_current_span(),
        );

        task.await.map_err(|e| {
            ChunkSystemError::repository(format!("commit task failed: {}", e))
        })?
    }
}
