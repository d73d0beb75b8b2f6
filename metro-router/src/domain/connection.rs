//! Connection (edge) types.

use super::{Attributes, LineId, StationId};

/// An undirected, weighted, line-tagged link between two stations.
///
/// Several connections may join the same pair of stations on different
/// lines. Self-loops are rejected when the graph is built.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub node1: StationId,
    pub node2: StationId,
    pub line: LineId,
    /// Traversal time.
    pub time: u32,
    pub attributes: Attributes,
}

impl Connection {
    /// Creates a connection with no extension attributes.
    pub fn new(node1: u32, node2: u32, line: u32, time: u32) -> Self {
        Self {
            node1: StationId(node1),
            node2: StationId(node2),
            line: LineId(line),
            time,
            attributes: Attributes::new(),
        }
    }

    /// Returns the endpoint opposite `station`.
    ///
    /// If `station` is not an endpoint, `node1` is returned.
    pub fn other(&self, station: StationId) -> StationId {
        if self.node1 == station {
            self.node2
        } else {
            self.node1
        }
    }

    /// Returns true if `station` is one of the endpoints.
    pub fn touches(&self, station: StationId) -> bool {
        self.node1 == station || self.node2 == station
    }
}
