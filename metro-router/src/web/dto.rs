//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Connection, Graph, LineId, StationId};
use crate::planner::{Algorithm, LineSegment, PatrolRoute, Route};

/// Request to plan a point-to-point route.
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Origin station id
    pub from: u32,

    /// Destination station id
    pub to: u32,

    /// Search strategy (defaults to Dijkstra)
    #[serde(default)]
    pub strategy: Algorithm,
}

/// Request to plan a patrol.
#[derive(Debug, Deserialize)]
pub struct PatrolRequest {
    /// Station the patrol starts and ends at
    pub origin: u32,

    /// Stations that must be visited, in any order
    pub required: Vec<u32>,
}

/// A station for display.
#[derive(Debug, Serialize, PartialEq)]
pub struct StationInfo {
    pub id: u32,
    pub name: Option<String>,
    pub x: f64,
    pub y: f64,
}

/// A connection traversed by a route.
#[derive(Debug, Serialize, PartialEq)]
pub struct ConnectionInfo {
    pub from: u32,
    pub to: u32,
    pub line: u32,
    pub time: u32,
}

/// A maximal run of a route on one line.
#[derive(Debug, Serialize, PartialEq)]
pub struct SegmentResult {
    pub line: u32,

    /// Line name, when the network document names the line
    pub line_name: Option<String>,

    /// Line colour as written in the network document
    pub colour: Option<String>,

    pub from: u32,
    pub to: u32,
}

/// Response for route planning.
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub strategy: Algorithm,
    pub stations: Vec<StationInfo>,
    pub connections: Vec<ConnectionInfo>,
    pub segments: Vec<SegmentResult>,
    pub total_time: u64,

    /// Number of line changes
    pub changes: usize,

    /// Number of stations the search settled
    pub visited_count: usize,

    /// Human-readable itinerary
    pub description: String,
}

/// One trip of a patrol.
#[derive(Debug, Serialize)]
pub struct TripResult {
    pub from: u32,
    pub to: u32,
    pub stations: Vec<u32>,
    pub total_time: u64,
}

/// Response for patrol planning.
#[derive(Debug, Serialize)]
pub struct PatrolResponse {
    /// Order the stations are visited in, starting and ending at the origin
    pub visit_order: Vec<u32>,

    pub stations: Vec<StationInfo>,
    pub trips: Vec<TripResult>,

    /// Time of the closed loop, including the return trip
    pub total_time: u64,

    /// Time until the last required station is reached
    pub outbound_time: u64,

    /// Number of point-to-point searches the planner ran
    pub oracle_searches: usize,

    /// Human-readable itinerary
    pub description: String,
}

/// A line in the network.
#[derive(Debug, Serialize, PartialEq)]
pub struct LineResult {
    pub line: u32,
    pub name: String,
    pub colour: String,
}

/// Response listing lines.
#[derive(Debug, Serialize)]
pub struct LinesResponse {
    pub lines: Vec<LineResult>,
}

/// Response listing the connections incident to a station.
#[derive(Debug, Serialize)]
pub struct NeighborsResponse {
    pub station: StationInfo,
    pub connections: Vec<ConnectionInfo>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl StationInfo {
    /// Look a station up in the graph. Ids missing from the graph keep
    /// their id and get a zero position.
    pub fn from_id(graph: &Graph, id: StationId) -> Self {
        match graph.station(id) {
            Ok(station) => Self {
                id: id.0,
                name: station.name().map(str::to_string),
                x: station.position.x,
                y: station.position.y,
            },
            Err(_) => Self {
                id: id.0,
                name: None,
                x: 0.0,
                y: 0.0,
            },
        }
    }
}

impl ConnectionInfo {
    /// Orient a connection so that it leaves `from`.
    pub fn leaving(connection: &Connection, from: StationId) -> Self {
        Self {
            from: from.0,
            to: connection.other(from).0,
            line: connection.line.0,
            time: connection.time,
        }
    }
}

impl SegmentResult {
    /// Create from a route segment, resolving line metadata.
    pub fn from_segment(segment: &LineSegment, graph: &Graph) -> Self {
        let meta = graph.lines().get(segment.line);
        Self {
            line: segment.line.0,
            line_name: meta.map(|m| m.name.clone()),
            colour: meta.map(|m| m.colour.clone()),
            from: segment.from.0,
            to: segment.to.0,
        }
    }
}

impl RouteResponse {
    /// Create from a planned route.
    pub fn from_route(route: &Route, strategy: Algorithm, graph: &Graph) -> Self {
        Self {
            strategy,
            stations: route
                .stations
                .iter()
                .map(|&id| StationInfo::from_id(graph, id))
                .collect(),
            connections: route
                .stations
                .iter()
                .zip(&route.connections)
                .map(|(&from, c)| ConnectionInfo::leaving(c, from))
                .collect(),
            segments: route
                .segments
                .iter()
                .map(|s| SegmentResult::from_segment(s, graph))
                .collect(),
            total_time: route.total_time,
            changes: route.change_count(),
            visited_count: route.visited.len(),
            description: route.describe(graph).to_string(),
        }
    }
}

impl PatrolResponse {
    /// Create from a planned patrol.
    pub fn from_patrol(patrol: &PatrolRoute, graph: &Graph) -> Self {
        let trips = patrol
            .legs
            .iter()
            .filter_map(|leg| {
                Some(TripResult {
                    from: leg.origin()?.0,
                    to: leg.destination()?.0,
                    stations: leg.stations.iter().map(|s| s.0).collect(),
                    total_time: leg.total_time,
                })
            })
            .collect();

        Self {
            visit_order: patrol.visit_order.iter().map(|s| s.0).collect(),
            stations: patrol
                .stations
                .iter()
                .map(|&id| StationInfo::from_id(graph, id))
                .collect(),
            trips,
            total_time: patrol.total_time,
            outbound_time: patrol.outbound_time(),
            oracle_searches: patrol.oracle_searches,
            description: patrol.describe(graph).to_string(),
        }
    }
}

impl LineResult {
    /// Create from a catalog entry.
    pub fn new(id: LineId, name: &str, colour: &str) -> Self {
        Self {
            line: id.0,
            name: name.to_string(),
            colour: colour.to_string(),
        }
    }
}
