//! # Batch Coordinator
//!
//! The core state machine. Orchestrates process lifecycle
//! (start/pause/complete) and the transactional claim-process-commit cycle
//! over the process and element stores.
//!
//! Any number of coordinator instances may run against the same database.
//! Correctness under that concurrency rests on two store-level primitives:
//!
//! - the partial unique index on `processes.status` serializes lifecycle
//!   transitions into RUNNING, and
//! - skip-locked claiming lets concurrent workers partition the element
//!   backlog instead of serializing on it.
//!
//! Completion detection is best-effort by design: a worker that claims
//! nothing but sees fewer claim records than eligible elements assumes the
//! remainder is held by another worker's in-flight transaction and defers to
//! the next poll tick. Starvation is bounded by the poll interval.

use sqlx::PgPool;
use tracing::{debug, info, instrument};

use crate::error::{ProcessorError, Result};
use crate::models::process::is_unique_violation;
use crate::models::{Element, Process, ProcessStatus};

/// Coordinates process lifecycle and batch claiming over a shared pool.
#[derive(Debug, Clone)]
pub struct BatchCoordinator {
    pool: PgPool,
}

impl BatchCoordinator {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Start the backlog-draining job.
    ///
    /// Resume takes priority over creating new work: an existing PAUSED
    /// process is flipped back to RUNNING under its own identity. Otherwise a
    /// new RUNNING process is created; `RunningProcessExists` if the store's
    /// single-RUNNING guarantee rejects the attempt.
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<()> {
        let paused = Process::find_by_status(&self.pool, ProcessStatus::Paused).await?;

        if let Some(process) = paused.first() {
            info!(process_id = process.id, "resuming paused process");
            return Process::update_status(&self.pool, process.id, ProcessStatus::Running)
                .await
                .map_err(|e| {
                    if is_unique_violation(&e) {
                        ProcessorError::RunningProcessExists
                    } else {
                        ProcessorError::Database(e)
                    }
                });
        }

        let process = Process::create_running(&self.pool).await?;
        info!(process_id = process.id, "created new running process");
        Ok(())
    }

    /// Pause the latest process.
    ///
    /// `NoProcessExists` if none was ever created, `NoRunningProcessExists`
    /// if the latest one is not RUNNING. Both are expected outcomes when
    /// control requests race each other.
    #[instrument(skip(self))]
    pub async fn pause(&self) -> Result<()> {
        let latest = Process::find_latest(&self.pool)
            .await?
            .ok_or(ProcessorError::NoProcessExists)?;

        if latest.status != ProcessStatus::Running {
            return Err(ProcessorError::NoRunningProcessExists);
        }

        Process::update_status(&self.pool, latest.id, ProcessStatus::Paused).await?;
        info!(process_id = latest.id, "paused process");
        Ok(())
    }

    /// Whether any RUNNING process exists.
    pub async fn running_process_exists(&self) -> Result<bool> {
        let running = Process::find_by_status(&self.pool, ProcessStatus::Running).await?;
        Ok(!running.is_empty())
    }

    /// Process one batch for the running process. Executed once per poll tick.
    ///
    /// Claims up to `batch_size` eligible elements inside a single
    /// transaction, uppercases each payload, and records the claims. A
    /// failure on any element aborts the whole batch. When nothing could be
    /// claimed, distinguishes "remaining work is locked by a concurrent
    /// worker" (benign no-op) from "no eligible work remains anywhere"
    /// (flip to COMPLETE).
    #[instrument(skip(self))]
    pub async fn process_batch(&self, batch_size: i64) -> Result<()> {
        if batch_size < 1 {
            return Err(ProcessorError::Configuration(format!(
                "batch size must be positive, got {batch_size}"
            )));
        }

        let mut running = Process::find_by_status(&self.pool, ProcessStatus::Running).await?;

        if running.is_empty() {
            return Err(ProcessorError::NoRunningProcessExists);
        }
        if running.len() > 1 {
            // Invariant violation from outside the system. Abort without
            // mutation; never pick one of the matches and carry on.
            return Err(ProcessorError::MultipleRunningProcesses(running.len()));
        }
        let process = running.remove(0);

        let mut tx = self.pool.begin().await?;

        let elements =
            Element::claim_for_update(&mut *tx, process.id, process.created_at, batch_size)
                .await?;

        if !elements.is_empty() {
            info!(
                process_id = process.id,
                count = elements.len(),
                "processing claimed elements"
            );

            for mut element in elements {
                element.data = element.data.to_uppercase();
                Element::update_and_claim(&mut *tx, &element, process.id).await?;
            }

            tx.commit().await?;
            return Ok(());
        }

        let claimed = Element::count_claimed_by(&mut *tx, process.id).await?;
        let eligible = Element::count_created_before(&mut *tx, process.created_at).await?;

        if claimed < eligible {
            // The remainder is held by another worker's in-flight claim.
            // Not an error; the next tick will see it settled.
            debug!(
                process_id = process.id,
                claimed, eligible, "eligible elements locked elsewhere, deferring"
            );
            tx.commit().await?;
            return Ok(());
        }

        info!(process_id = process.id, "completing process");
        Process::update_status(&mut *tx, process.id, ProcessStatus::Complete).await?;
        tx.commit().await?;
        Ok(())
    }

    /// Number of elements claimed by the latest process.
    #[instrument(skip(self))]
    pub async fn get_latest_stat(&self) -> Result<i64> {
        let latest = Process::find_latest(&self.pool)
            .await?
            .ok_or(ProcessorError::NoProcessExists)?;

        let count = Element::count_claimed_by(&self.pool, latest.id).await?;
        Ok(count)
    }
}
