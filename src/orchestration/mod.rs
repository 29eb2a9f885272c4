//! # Orchestration
//!
//! The batch coordinator (process lifecycle + the claim-process-commit cycle)
//! and the poll driver that feeds it.

pub mod batch_coordinator;
pub mod poller;

pub use batch_coordinator::BatchCoordinator;
pub use poller::run_poll_loop;
