//! Application state for the leave optimisation API.

use std::sync::Arc;

use crate::config::ConfigLoader;
use crate::planner::Planner;

/// Shared application state.
///
/// Holds the planner, which owns the loaded reference data and the memo
/// tables shared by all requests.
#[derive(Clone)]
pub struct AppState {
    planner: Arc<Planner>,
}

impl AppState {
    /// Creates application state from a loaded configuration directory.
    pub fn new(config: ConfigLoader) -> Self {
        Self::with_planner(Planner::new(config.into_config()))
    }

    /// Creates application state around an existing planner.
    pub fn with_planner(planner: Planner) -> Self {
        Self {
            planner: Arc::new(planner),
        }
    }

    /// Returns the planner.
    pub fn planner(&self) -> &Planner {
        &self.planner
    }
}
