//! The immutable station/connection graph.
//!
//! A `Graph` is built once from validated stations, connections and a line
//! catalogue, and is read-only afterwards. Station ids are mapped onto dense
//! indices so searches can keep their per-query state in plain vectors.

use std::collections::HashMap;

use super::{Connection, GraphError, LineCatalog, Position, Station, StationId};

/// An undirected transit graph with an adjacency index.
///
/// # Invariants
///
/// - Station ids are unique
/// - Every connection's endpoints exist and differ
/// - A connection appears in the adjacency lists of both of its endpoints,
///   in edge-list order, and nowhere else
#[derive(Debug, Clone)]
pub struct Graph {
    /// Stations in ascending id order.
    stations: Vec<Station>,
    /// Station id → position in `stations`.
    index: HashMap<StationId, usize>,
    connections: Vec<Connection>,
    /// Connection index → dense endpoint indices.
    endpoints: Vec<(usize, usize)>,
    /// Station index → indices into `connections`.
    adjacency: Vec<Vec<usize>>,
    lines: LineCatalog,
}

impl Graph {
    /// Builds a graph, validating its structure.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DuplicateStation`] if two stations share an id
    /// - [`GraphError::InvalidConnection`] if a connection references an
    ///   unknown station or joins a station to itself
    ///
    /// # Examples
    ///
    /// ```
    /// use metro_router::domain::{Connection, Graph, LineCatalog, Station, StationId};
    ///
    /// let graph = Graph::build(
    ///     vec![Station::new(1, 0.0, 0.0), Station::new(2, 1.0, 0.0)],
    ///     vec![Connection::new(1, 2, 1, 3)],
    ///     LineCatalog::new(),
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(graph.neighbors(StationId(1)).unwrap().count(), 1);
    ///
    /// // Self-loops are rejected
    /// assert!(Graph::build(
    ///     vec![Station::new(1, 0.0, 0.0)],
    ///     vec![Connection::new(1, 1, 1, 3)],
    ///     LineCatalog::new(),
    /// )
    /// .is_err());
    /// ```
    pub fn build(
        stations: impl IntoIterator<Item = Station>,
        connections: impl IntoIterator<Item = Connection>,
        lines: LineCatalog,
    ) -> Result<Self, GraphError> {
        let mut stations: Vec<Station> = stations.into_iter().collect();
        stations.sort_by_key(|s| s.id);

        let mut index = HashMap::with_capacity(stations.len());
        for (idx, station) in stations.iter().enumerate() {
            if index.insert(station.id, idx).is_some() {
                return Err(GraphError::DuplicateStation(station.id));
            }
        }

        let connections: Vec<Connection> = connections.into_iter().collect();
        let mut adjacency = vec![Vec::new(); stations.len()];
        let mut endpoints = Vec::with_capacity(connections.len());

        for (ci, conn) in connections.iter().enumerate() {
            let invalid = |reason| GraphError::InvalidConnection {
                index: ci,
                node1: conn.node1,
                node2: conn.node2,
                reason,
            };

            if conn.node1 == conn.node2 {
                return Err(invalid("self-loop"));
            }
            let a = *index.get(&conn.node1).ok_or_else(|| invalid("unknown endpoint"))?;
            let b = *index.get(&conn.node2).ok_or_else(|| invalid("unknown endpoint"))?;

            adjacency[a].push(ci);
            adjacency[b].push(ci);
            endpoints.push((a, b));
        }

        Ok(Self {
            stations,
            index,
            connections,
            endpoints,
            adjacency,
            lines,
        })
    }

    /// Connections incident to a station, in edge-list order.
    ///
    /// Yields nothing for an isolated station.
    pub fn neighbors(
        &self,
        id: StationId,
    ) -> Result<impl Iterator<Item = &Connection> + '_, GraphError> {
        let idx = self.require(id)?;
        Ok(self.adjacency[idx].iter().map(|&ci| &self.connections[ci]))
    }

    /// Position of a station.
    pub fn position(&self, id: StationId) -> Result<Position, GraphError> {
        Ok(self.station(id)?.position)
    }

    /// Looks up a station by id.
    pub fn station(&self, id: StationId) -> Result<&Station, GraphError> {
        let idx = self.require(id)?;
        Ok(&self.stations[idx])
    }

    /// Returns true if the station exists.
    pub fn contains(&self, id: StationId) -> bool {
        self.index.contains_key(&id)
    }

    /// Stations in ascending id order.
    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    /// All connections, in the order they were supplied.
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn lines(&self) -> &LineCatalog {
        &self.lines
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Dense index for a station id.
    pub(crate) fn index_of(&self, id: StationId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub(crate) fn require(&self, id: StationId) -> Result<usize, GraphError> {
        self.index_of(id).ok_or(GraphError::UnknownStation(id))
    }

    pub(crate) fn station_at(&self, idx: usize) -> &Station {
        &self.stations[idx]
    }

    /// Connection indices incident to the station at `idx`.
    pub(crate) fn incident(&self, idx: usize) -> &[usize] {
        &self.adjacency[idx]
    }

    pub(crate) fn connection(&self, ci: usize) -> &Connection {
        &self.connections[ci]
    }

    /// Dense index of the endpoint of connection `ci` opposite `idx`.
    pub(crate) fn opposite(&self, ci: usize, idx: usize) -> usize {
        let (a, b) = self.endpoints[ci];
        if a == idx { b } else { a }
    }
}
