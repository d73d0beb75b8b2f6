//! Application state for the web layer.

use std::sync::Arc;

use crate::domain::Graph;
use crate::planner::PlannerConfig;

/// Shared application state.
///
/// The graph is immutable once loaded, so every request reads the same
/// instance without locking.
#[derive(Clone)]
pub struct AppState {
    /// The loaded metro network
    pub graph: Arc<Graph>,

    /// Planner limits
    pub config: Arc<PlannerConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(graph: Graph, config: PlannerConfig) -> Self {
        Self {
            graph: Arc::new(graph),
            config: Arc::new(config),
        }
    }
}
