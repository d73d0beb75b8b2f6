//! Route planning over a metro graph.
//!
//! This module implements the core planning algorithms:
//! - point-to-point routes with Dijkstra, A* or BFS, sharing one
//!   relaxation loop parametrised by a [`SearchStrategy`]
//! - route reconstruction with a per-line segment summary
//! - exact minimum-time patrols through a set of required stations

mod config;
mod engine;
mod error;
mod patrol;
mod route;
mod strategy;

#[cfg(test)]
mod fixtures;

pub use config::PlannerConfig;
pub use engine::{SearchOutcome, ShortestPathEngine, find_path};
pub use error::PlanError;
pub use patrol::{PatrolDescription, PatrolPlanner, PatrolRoute, plan_patrol};
pub use route::{LineSegment, Route, RouteDescription, reconstruct};
pub use strategy::{AStar, Algorithm, Bfs, Dijkstra, FrontierKind, SearchStrategy};
