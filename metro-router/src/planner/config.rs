//! Configuration for the patrol planner.

use std::time::Duration;

/// Configuration parameters for patrol planning.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Maximum number of required stations in one patrol.
    /// The exact search is factorial in this number.
    pub max_required_stations: usize,

    /// Wall-clock budget for one patrol search, if any.
    pub patrol_deadline: Option<Duration>,
}

impl PlannerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(max_required_stations: usize, patrol_deadline: Option<Duration>) -> Self {
        Self {
            max_required_stations,
            patrol_deadline,
        }
    }

    /// Set a wall-clock budget for each patrol search.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.patrol_deadline = Some(deadline);
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            max_required_stations: 8,
            patrol_deadline: None,
        }
    }
}
