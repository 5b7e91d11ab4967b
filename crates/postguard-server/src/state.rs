//! Application state for the API server.

use std::sync::Arc;

use postguard_core::{ModerationConfig, ModerationCoordinator};

/// Shared application state.
///
/// The coordinator guards its own configuration, so handlers share it
/// without an outer lock.
#[derive(Clone)]
pub struct AppState {
    /// Moderation pipeline and its active configuration.
    pub coordinator: Arc<ModerationCoordinator>,
}

impl AppState {
    /// Creates application state with the given moderation config.
    pub fn new(config: ModerationConfig) -> Self {
        Self::with_coordinator(Arc::new(ModerationCoordinator::new(config)))
    }

    /// Creates application state around an existing coordinator.
    pub fn with_coordinator(coordinator: Arc<ModerationCoordinator>) -> Self {
        Self { coordinator }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(ModerationConfig::default())
    }
}
