//! Shared state for the web control surface.

use std::sync::Arc;

use crate::orchestration::BatchCoordinator;

/// Handler state: the coordinator, shared with the poll driver.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<BatchCoordinator>,
}

impl AppState {
    pub fn new(coordinator: Arc<BatchCoordinator>) -> Self {
        Self { coordinator }
    }
}
