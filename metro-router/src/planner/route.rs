//! Route reconstruction.
//!
//! Turns a search tree into an ordered station/connection sequence and a
//! per-line summary of which line to ride between which stations.

use std::fmt;

use crate::domain::{Connection, Graph, LineId, StationId};

use super::engine::SearchOutcome;
use super::error::PlanError;

/// A stretch of a route ridden on one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSegment {
    pub line: LineId,
    pub from: StationId,
    pub to: StationId,
}

/// A route between two stations.
///
/// # Invariants
///
/// - `stations` has exactly one more element than `connections`
/// - `connections[i]` joins `stations[i]` and `stations[i + 1]`
/// - `total_time` is the sum of the connections' times
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub stations: Vec<StationId>,
    pub connections: Vec<Connection>,
    pub total_time: u64,
    pub segments: Vec<LineSegment>,
    /// Stations extracted by the search that produced this route.
    pub visited: Vec<StationId>,
}

impl Route {
    /// Origin station.
    pub fn origin(&self) -> Option<StationId> {
        self.stations.first().copied()
    }

    /// Destination station.
    pub fn destination(&self) -> Option<StationId> {
        self.stations.last().copied()
    }

    /// Number of line changes along the route.
    pub fn change_count(&self) -> usize {
        self.segments.len().saturating_sub(1)
    }

    /// Human-readable description, resolving line and station names from
    /// `graph`.
    pub fn describe<'a>(&'a self, graph: &'a Graph) -> RouteDescription<'a> {
        RouteDescription { route: self, graph }
    }
}

/// Walks predecessor connections back from the destination of `outcome`.
///
/// # Errors
///
/// [`PlanError::Unreachable`] if the walk cannot reach the start within one
/// step per station. This covers both a destination the search never reached
/// and a corrupt predecessor chain.
///
/// The route's `total_time` is the summed weight of its connections.
pub fn reconstruct(graph: &Graph, outcome: &SearchOutcome) -> Result<Route, PlanError> {
    let start = outcome.start;
    let end = outcome.end;
    let unreachable = || PlanError::Unreachable {
        from: graph.station_at(start).id,
        to: graph.station_at(end).id,
    };

    let mut stations = vec![graph.station_at(end).id];
    let mut connections = Vec::new();
    let mut current = end;

    while current != start {
        if connections.len() >= graph.station_count() {
            return Err(unreachable());
        }
        let ci = outcome.predecessor[current].ok_or_else(unreachable)?;
        current = graph.opposite(ci, current);
        connections.push(graph.connection(ci).clone());
        stations.push(graph.station_at(current).id);
    }

    stations.reverse();
    connections.reverse();

    // Not dist[end]: under an inconsistent A* heuristic a station on the
    // chain can improve after `end` was relaxed through it.
    let total_time = connections.iter().map(|c| u64::from(c.time)).sum();
    let segments = summarize_lines(&stations, &connections);

    Ok(Route {
        stations,
        connections,
        total_time,
        segments,
        visited: outcome.visited.clone(),
    })
}

/// Collapses consecutive connections on the same line into one segment.
pub(crate) fn summarize_lines(
    stations: &[StationId],
    connections: &[Connection],
) -> Vec<LineSegment> {
    let mut segments = Vec::new();
    let Some(first) = connections.first() else {
        return segments;
    };

    let mut line = first.line;
    let mut from = stations[0];
    for (i, conn) in connections.iter().enumerate().skip(1) {
        if conn.line != line {
            segments.push(LineSegment {
                line,
                from,
                to: stations[i],
            });
            line = conn.line;
            from = stations[i];
        }
    }
    segments.push(LineSegment {
        line,
        from,
        to: stations[connections.len()],
    });

    segments
}

/// Display adapter produced by [`Route::describe`].
pub struct RouteDescription<'a> {
    route: &'a Route,
    graph: &'a Graph,
}

impl fmt::Display for RouteDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let route = self.route;
        let path: Vec<String> = route.stations.iter().map(|s| s.to_string()).collect();
        writeln!(f, "Route: {}", path.join(" -> "))?;

        for (i, seg) in route.segments.iter().enumerate() {
            write!(f, "Take line {}", seg.line)?;
            if let Some(name) = self.graph.lines().name(seg.line) {
                write!(f, " ({name})")?;
            }
            write!(f, " from ")?;
            write_station(f, self.graph, seg.from)?;
            write!(f, " to ")?;
            write_station(f, self.graph, seg.to)?;
            let end = if i + 1 == route.segments.len() { "." } else { "," };
            writeln!(f, "{end}")?;
        }

        write!(f, "Total trip time: {}", route.total_time)
    }
}

pub(crate) fn write_station(
    f: &mut fmt::Formatter<'_>,
    graph: &Graph,
    id: StationId,
) -> fmt::Result {
    write!(f, "Station {id}")?;
    if let Some(name) = graph.station(id).ok().and_then(|s| s.name()) {
        write!(f, " ({name})")?;
    }
    Ok(())
}
