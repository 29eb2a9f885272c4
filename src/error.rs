//! # Error Types
//!
//! Two classes of outcomes flow through the coordinator:
//!
//! - **Control-flow signals** (`NoProcessExists`, `NoRunningProcessExists`,
//!   `RunningProcessExists`): expected precondition results that callers
//!   branch on. They are never logged as failures and never retried by the
//!   coordinator itself.
//! - **Infrastructure errors** (`Database`, `Configuration`): abort the
//!   current operation and roll back its transaction.
//!
//! `MultipleRunningProcesses` is its own animal: it means the single-RUNNING
//! invariant was violated outside this system. It is unrecoverable and must
//! never be auto-repaired by picking one of the matches.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("no process exists")]
    NoProcessExists,

    #[error("no running process exists")]
    NoRunningProcessExists,

    #[error("running process exists")]
    RunningProcessExists,

    #[error("{0} processes in status RUNNING, expected exactly one")]
    MultipleRunningProcesses(usize),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ProcessorError {
    /// Whether this is an expected precondition outcome rather than a failure.
    pub fn is_control_flow(&self) -> bool {
        matches!(
            self,
            ProcessorError::NoProcessExists
                | ProcessorError::NoRunningProcessExists
                | ProcessorError::RunningProcessExists
        )
    }
}

pub type Result<T> = std::result::Result<T, ProcessorError>;
