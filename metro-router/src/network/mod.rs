//! Network documents.
//!
//! The server reads its graph from a single JSON document holding stations,
//! connections and lines. Field types are checked while decoding; structural
//! checks (unknown endpoints, self-loops, duplicate ids) are left to
//! [`Graph::build`].
//!
//! Keys other than the known fields are kept as extension attributes.

mod error;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::{
    Attributes, Connection, Graph, LineCatalog, LineId, LineMeta, Position, Station, StationId,
};

pub use error::NetworkError;

/// A station as written in a network document.
///
/// `longitude`/`latitude` are accepted in place of `x`/`y`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationRecord {
    pub id: u32,
    #[serde(alias = "longitude")]
    pub x: f64,
    #[serde(alias = "latitude")]
    pub y: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A connection as written in a network document.
///
/// `station1`/`station2` are accepted in place of `node1`/`node2`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionRecord {
    #[serde(alias = "station1")]
    pub node1: u32,
    #[serde(alias = "station2")]
    pub node2: u32,
    pub line: u32,
    pub time: u32,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A line as written in a network document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineRecord {
    pub line: u32,
    pub name: String,
    #[serde(default, alias = "color")]
    pub colour: String,
}

/// The whole network document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkDocument {
    pub stations: Vec<StationRecord>,
    pub connections: Vec<ConnectionRecord>,
    #[serde(default)]
    pub lines: Vec<LineRecord>,
}

impl NetworkDocument {
    /// Decode a document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, NetworkError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and decode a document from disk.
    pub fn read(path: &Path) -> Result<Self, NetworkError> {
        let contents = std::fs::read_to_string(path).map_err(|source| NetworkError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Build a validated graph from the document.
    pub fn into_graph(self) -> Result<Graph, NetworkError> {
        let stations = self.stations.into_iter().map(|r| Station {
            id: StationId(r.id),
            position: Position::new(r.x, r.y),
            attributes: attributes(r.extra),
        });
        let connections = self.connections.into_iter().map(|r| Connection {
            node1: StationId(r.node1),
            node2: StationId(r.node2),
            line: LineId(r.line),
            time: r.time,
            attributes: attributes(r.extra),
        });
        let lines: LineCatalog = self
            .lines
            .into_iter()
            .map(|r| (LineId(r.line), LineMeta::new(r.name, r.colour)))
            .collect();

        Ok(Graph::build(stations, connections, lines)?)
    }
}

/// Load a network document from disk and build its graph.
pub fn load_network(path: &Path) -> Result<Graph, NetworkError> {
    let graph = NetworkDocument::read(path)?.into_graph()?;
    info!(
        path = %path.display(),
        stations = graph.station_count(),
        connections = graph.connection_count(),
        lines = graph.lines().len(),
        "network loaded"
    );
    Ok(graph)
}

/// Flatten extension values to strings; JSON strings lose their quotes.
fn attributes(extra: BTreeMap<String, serde_json::Value>) -> Attributes {
    extra
        .into_iter()
        .map(|(k, v)| {
            let value = match v {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            (k, value)
        })
        .collect()
}
