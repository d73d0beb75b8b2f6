//! Domain types for the metro route planner.
//!
//! This module contains the station/connection graph and its building
//! blocks. All types enforce their invariants at construction time, so code
//! that receives a [`Graph`] can trust its structure.

mod connection;
mod error;
mod graph;
mod line;
mod station;

pub use connection::Connection;
pub use error::GraphError;
pub use graph::Graph;
pub use line::{LineCatalog, LineId, LineMeta};
pub use station::{Attributes, Position, Station, StationId};
