//! # Poll Driver
//!
//! Long-lived background task that drives the coordinator: each tick, if a
//! running process exists, process one batch, then sleep the configured
//! interval. Retry policy is simply "the next tick".

use std::time::Duration;

use tracing::{debug, error, info};

use crate::error::{ProcessorError, Result};
use crate::orchestration::BatchCoordinator;

/// Run the poll loop until an unrecoverable error occurs.
///
/// Control-flow signals from the coordinator are benign here: another
/// instance may pause or complete the process between the running check and
/// the batch call. Infrastructure errors and the multiple-RUNNING invariant
/// violation are fatal; the loop returns the error so the instance stops
/// rather than polling on a potentially inconsistent view.
pub async fn run_poll_loop(
    coordinator: BatchCoordinator,
    batch_size: i64,
    poll_interval: Duration,
) -> Result<()> {
    info!(
        batch_size,
        poll_interval_secs = poll_interval.as_secs(),
        "starting poll loop"
    );

    loop {
        if coordinator.running_process_exists().await? {
            debug!("running process found, processing batch");

            match coordinator.process_batch(batch_size).await {
                Ok(()) => {}
                Err(ProcessorError::NoRunningProcessExists) => {
                    // Paused or completed between the check and the batch.
                    debug!("process no longer running, skipping tick");
                }
                Err(e) => {
                    error!(error = %e, "batch processing failed, stopping poll loop");
                    return Err(e);
                }
            }
        }

        tokio::time::sleep(poll_interval).await;
    }
}
