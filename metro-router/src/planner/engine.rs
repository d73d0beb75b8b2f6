//! Strategy-parametrised shortest-path search.
//!
//! One relaxation loop serves Dijkstra, A* and BFS. All per-query state
//! (distances, predecessor connections, frontier, visitation log) is
//! allocated fresh for every call, so an engine can be shared freely and
//! concurrent queries never observe each other's state.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use tracing::{debug, trace};

use crate::domain::{Connection, Graph, Position, StationId};

use super::error::PlanError;
use super::route::{Route, reconstruct};
use super::strategy::{AStar, Algorithm, Bfs, Dijkstra, FrontierKind, SearchStrategy};

/// A queued station with the priority and distance it was queued at.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    priority: f64,
    dist: u64,
    station: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Min-heap on priority
        other.priority.total_cmp(&self.priority)
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Discovered-but-unprocessed stations.
enum Frontier {
    Priority(BinaryHeap<FrontierEntry>),
    Fifo(VecDeque<FrontierEntry>),
}

impl Frontier {
    fn new(kind: FrontierKind) -> Self {
        match kind {
            FrontierKind::Priority => Frontier::Priority(BinaryHeap::new()),
            FrontierKind::Fifo => Frontier::Fifo(VecDeque::new()),
        }
    }

    fn push(&mut self, entry: FrontierEntry) {
        match self {
            Frontier::Priority(heap) => heap.push(entry),
            Frontier::Fifo(queue) => queue.push_back(entry),
        }
    }

    fn pop(&mut self) -> Option<FrontierEntry> {
        match self {
            Frontier::Priority(heap) => heap.pop(),
            Frontier::Fifo(queue) => queue.pop_front(),
        }
    }
}

/// Per-query search state, indexed by dense station index.
struct SearchState {
    dist: Vec<Option<u64>>,
    predecessor: Vec<Option<usize>>,
    seen: Vec<bool>,
    frontier: Frontier,
    visited: Vec<StationId>,
    relaxations: usize,
}

impl SearchState {
    fn new(station_count: usize, kind: FrontierKind) -> Self {
        Self {
            dist: vec![None; station_count],
            predecessor: vec![None; station_count],
            seen: vec![false; station_count],
            frontier: Frontier::new(kind),
            visited: Vec::new(),
            relaxations: 0,
        }
    }
}

/// The result of one search: the shortest-path tree as far as it was grown.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) dist: Vec<Option<u64>>,
    pub(crate) predecessor: Vec<Option<usize>>,
    pub(crate) visited: Vec<StationId>,
    pub(crate) reached: bool,
    pub(crate) relaxations: usize,
}

impl SearchOutcome {
    /// True if the destination was extracted from the frontier.
    pub fn reached(&self) -> bool {
        self.reached
    }

    /// Stations in the order they were extracted from the frontier.
    pub fn visited(&self) -> &[StationId] {
        &self.visited
    }

    /// Number of successful relaxations.
    pub fn relaxations(&self) -> usize {
        self.relaxations
    }

    /// Distance recorded for the destination, if any.
    pub fn end_distance(&self) -> Option<u64> {
        self.dist[self.end]
    }

    /// Distance recorded for any station, if it was reached.
    pub fn distance_to(&self, graph: &Graph, station: StationId) -> Option<u64> {
        graph.index_of(station).and_then(|idx| self.dist[idx])
    }

    /// Connection through which `station` was last reached.
    pub fn predecessor<'g>(&self, graph: &'g Graph, station: StationId) -> Option<&'g Connection> {
        let idx = graph.index_of(station)?;
        self.predecessor[idx].map(|ci| graph.connection(ci))
    }
}

/// Relaxation-based shortest-path search over a [`Graph`].
#[derive(Debug, Clone, Copy)]
pub struct ShortestPathEngine<'g> {
    graph: &'g Graph,
}

impl<'g> ShortestPathEngine<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Runs `strategy` from `start` until `end` is extracted or the frontier
    /// empties.
    ///
    /// # Errors
    ///
    /// [`PlanError::UnknownStation`] if either endpoint is absent. An
    /// unreachable destination is not an error here; it surfaces when the
    /// route is reconstructed.
    pub fn search<S: SearchStrategy>(
        &self,
        strategy: &S,
        start: StationId,
        end: StationId,
    ) -> Result<SearchOutcome, PlanError> {
        let graph = self.graph;
        let start_idx = graph.require(start)?;
        let end_idx = graph.require(end)?;
        let end_pos = graph.station_at(end_idx).position;

        let mut state = SearchState::new(graph.station_count(), strategy.frontier());
        state.dist[start_idx] = Some(0);
        state.seen[start_idx] = true;
        state.frontier.push(FrontierEntry {
            priority: 0.0,
            dist: 0,
            station: start_idx,
        });

        let mut reached = false;
        while let Some(entry) = state.frontier.pop() {
            let u = entry.station;

            // Superseded by a shorter path queued later
            if state.dist[u].is_some_and(|best| entry.dist > best) {
                continue;
            }

            state.visited.push(graph.station_at(u).id);
            if u == end_idx {
                reached = true;
                break;
            }

            self.relax(strategy, &mut state, u, entry.dist, &end_pos);
        }

        debug!(
            strategy = strategy.name(),
            %start,
            %end,
            visited = state.visited.len(),
            relaxations = state.relaxations,
            reached,
            "search complete"
        );

        Ok(SearchOutcome {
            start: start_idx,
            end: end_idx,
            dist: state.dist,
            predecessor: state.predecessor,
            visited: state.visited,
            reached,
            relaxations: state.relaxations,
        })
    }

    /// Relaxes every connection incident to the station at `u`.
    fn relax<S: SearchStrategy>(
        &self,
        strategy: &S,
        state: &mut SearchState,
        u: usize,
        dist_u: u64,
        end_pos: &Position,
    ) {
        let graph = self.graph;
        for &ci in graph.incident(u) {
            let v = graph.opposite(ci, u);
            let candidate = dist_u + u64::from(graph.connection(ci).time);

            if !strategy.admits(candidate, state.dist[v], state.seen[v]) {
                continue;
            }

            state.dist[v] = Some(candidate);
            state.predecessor[v] = Some(ci);
            state.seen[v] = true;
            state.relaxations += 1;

            let position = &graph.station_at(v).position;
            let priority = strategy.priority(candidate, position, end_pos);
            trace!(
                station = %graph.station_at(v).id,
                dist = candidate,
                priority,
                "relaxed"
            );
            state.frontier.push(FrontierEntry {
                priority,
                dist: candidate,
                station: v,
            });
        }
    }

    /// Runs the chosen algorithm and returns the raw search tree.
    pub fn search_with(
        &self,
        algorithm: Algorithm,
        start: StationId,
        end: StationId,
    ) -> Result<SearchOutcome, PlanError> {
        match algorithm {
            Algorithm::Dijkstra => self.search(&Dijkstra, start, end),
            Algorithm::AStar => self.search(&AStar, start, end),
            Algorithm::Bfs => self.search(&Bfs, start, end),
        }
    }

    /// Finds a route from `start` to `end`.
    ///
    /// # Errors
    ///
    /// - [`PlanError::UnknownStation`] if either endpoint is absent
    /// - [`PlanError::Unreachable`] if no path exists
    pub fn find_path(
        &self,
        algorithm: Algorithm,
        start: StationId,
        end: StationId,
    ) -> Result<Route, PlanError> {
        let outcome = self.search_with(algorithm, start, end)?;
        reconstruct(self.graph, &outcome)
    }
}

/// Finds a route between two stations with a fresh engine.
///
/// # Examples
///
/// ```
/// use metro_router::domain::{Connection, Graph, LineCatalog, Station, StationId};
/// use metro_router::planner::{Algorithm, find_path};
///
/// let graph = Graph::build(
///     vec![
///         Station::new(1, 0.0, 0.0),
///         Station::new(2, 0.0, 1.0),
///         Station::new(3, 1.0, 1.0),
///     ],
///     vec![Connection::new(1, 2, 1, 4), Connection::new(2, 3, 1, 4)],
///     LineCatalog::new(),
/// )
/// .unwrap();
///
/// let route = find_path(&graph, Algorithm::Dijkstra, StationId(1), StationId(3)).unwrap();
/// assert_eq!(route.total_time, 8);
/// assert_eq!(route.stations, vec![StationId(1), StationId(2), StationId(3)]);
/// ```
pub fn find_path(
    graph: &Graph,
    algorithm: Algorithm,
    start: StationId,
    end: StationId,
) -> Result<Route, PlanError> {
    ShortestPathEngine::new(graph).find_path(algorithm, start, end)
}
