//! Search strategies for the shortest-path engine.
//!
//! Dijkstra, A* and BFS share one relaxation loop in
//! [`ShortestPathEngine`](super::ShortestPathEngine). A strategy only decides
//! how the frontier is ordered, which relaxations are admitted, and the
//! priority a newly discovered station is queued with.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Position;

/// How the frontier hands stations back to the search loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierKind {
    /// Lowest priority first.
    Priority,
    /// First in, first out; priorities are ignored.
    Fifo,
}

/// Hooks that specialise the shared relaxation loop.
pub trait SearchStrategy {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn frontier(&self) -> FrontierKind {
        FrontierKind::Priority
    }

    /// Estimated remaining cost from `station` to `end`.
    fn heuristic(&self, _station: &Position, _end: &Position) -> f64 {
        0.0
    }

    /// Frontier priority for a station reached at distance `dist`.
    fn priority(&self, dist: u64, station: &Position, end: &Position) -> f64 {
        dist as f64 + self.heuristic(station, end)
    }

    /// Whether reaching a station at `candidate` should update it.
    ///
    /// `current` is the station's best known distance and `seen` whether it
    /// has ever been queued.
    fn admits(&self, candidate: u64, current: Option<u64>, _seen: bool) -> bool {
        current.is_none_or(|best| candidate < best)
    }
}

/// Uniform-cost search: priority is the distance so far.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dijkstra;

impl SearchStrategy for Dijkstra {
    fn name(&self) -> &'static str {
        "dijkstra"
    }
}

/// Dijkstra guided by straight-line distance between display positions.
///
/// Connection weights are travel times while the heuristic is measured in
/// coordinate units, so it is only admissible when every connection's time
/// is at least the displacement between its endpoints. Otherwise A* may
/// return a longer route than Dijkstra.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStar;

impl SearchStrategy for AStar {
    fn name(&self) -> &'static str {
        "a_star"
    }

    fn heuristic(&self, station: &Position, end: &Position) -> f64 {
        station.distance_to(end)
    }
}

/// Breadth-first search: hop-optimal, not weight-optimal.
///
/// Stations are queued at most once, in discovery order. Distances are still
/// recorded as the sum of weights along the discovered tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bfs;

impl SearchStrategy for Bfs {
    fn name(&self) -> &'static str {
        "bfs"
    }

    fn frontier(&self) -> FrontierKind {
        FrontierKind::Fifo
    }

    fn priority(&self, _dist: u64, _station: &Position, _end: &Position) -> f64 {
        0.0
    }

    fn admits(&self, _candidate: u64, _current: Option<u64>, seen: bool) -> bool {
        !seen
    }
}

/// Selectable search algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    #[default]
    Dijkstra,
    AStar,
    Bfs,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Dijkstra, Algorithm::AStar, Algorithm::Bfs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Dijkstra => Dijkstra.name(),
            Algorithm::AStar => AStar.name(),
            Algorithm::Bfs => Bfs.name(),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
