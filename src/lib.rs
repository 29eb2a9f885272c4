//! # Batchproc
//!
//! Backlog batch processor: drains a table of work items ("elements") in
//! bounded batches under the control of a single logical job ("process")
//! that can be started, paused, resumed, and polled for progress.
//!
//! Multiple instances can run against the same database. Concurrent workers
//! partition the backlog via `FOR UPDATE SKIP LOCKED` claiming, and a partial
//! unique index keeps at most one process RUNNING system-wide, so correctness
//! holds even when several instances race on the same batch.
//!
//! ## Module Organization
//!
//! - [`models`] - process, element, and claim-record data layer
//! - [`orchestration`] - the batch coordinator state machine and poll driver
//! - [`web`] - HTTP control surface (start/pause/stat)
//! - [`database`] - pool construction and embedded migrations
//! - [`config`] - environment-based configuration
//! - [`error`] - structured error handling
//! - [`logging`] - tracing subscriber setup

pub mod config;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod orchestration;
pub mod web;

pub use config::AppConfig;
pub use error::{ProcessorError, Result};
pub use orchestration::BatchCoordinator;
