//! Exact multi-stop patrol planning.
//!
//! Finds the minimum-time closed patrol that starts at an origin, visits
//! every required station, and returns to the origin. The search explores
//! every visiting order recursively, using memoised pairwise Dijkstra
//! distances as its cost primitive. Only pairwise distances are cached, not
//! per-subset optima, so the cost grows factorially with the number of
//! required stations and callers must cap it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{debug, trace};

use crate::domain::{Connection, Graph, StationId};

use super::config::PlannerConfig;
use super::engine::ShortestPathEngine;
use super::error::PlanError;
use super::route::{Route, write_station};
use super::strategy::{Algorithm, Dijkstra};

/// A planned patrol.
///
/// # Invariants
///
/// - `visit_order` starts and ends at `origin`
/// - `legs[i]` runs from `visit_order[i]` to `visit_order[i + 1]`
/// - `stations`/`connections` are the legs stitched end to end, with the
///   shared boundary station between consecutive legs listed once
/// - `total_time` is the sum of the legs' times
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolRoute {
    pub origin: StationId,
    pub visit_order: Vec<StationId>,
    pub legs: Vec<Route>,
    pub stations: Vec<StationId>,
    pub connections: Vec<Connection>,
    pub total_time: u64,
    /// Number of distinct shortest-path searches run by the distance oracle.
    pub oracle_searches: usize,
    /// Concatenated visitation logs of the oracle's searches.
    pub visited: Vec<StationId>,
}

impl PatrolRoute {
    /// Time to reach the last required station, excluding the return leg.
    ///
    /// Among loops of equal total time the planner keeps the one with the
    /// smallest outbound time.
    pub fn outbound_time(&self) -> u64 {
        let back = self.legs.last().map_or(0, |leg| leg.total_time);
        self.total_time - back
    }

    /// Human-readable description, resolving station names from `graph`.
    pub fn describe<'a>(&'a self, graph: &'a Graph) -> PatrolDescription<'a> {
        PatrolDescription {
            patrol: self,
            graph,
        }
    }
}

/// Plans minimum-time patrols over a graph.
pub struct PatrolPlanner<'a> {
    engine: ShortestPathEngine<'a>,
    config: &'a PlannerConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> PatrolPlanner<'a> {
    /// Create a new planner.
    pub fn new(graph: &'a Graph, config: &'a PlannerConfig) -> Self {
        Self {
            engine: ShortestPathEngine::new(graph),
            config,
            cancel: None,
        }
    }

    /// Abort planning with [`PlanError::Cancelled`] once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Plans a closed patrol from `origin` through every station in `required`.
    ///
    /// Duplicates in `required`, and the origin itself, are ignored. If only
    /// the origin remains, the patrol is empty and takes no time.
    ///
    /// # Errors
    ///
    /// Input-contract errors are returned before any search runs:
    /// - [`PlanError::EmptyRequiredSet`] if `required` is empty
    /// - [`PlanError::UnknownStation`] if any station is absent
    /// - [`PlanError::TooManyRequiredStations`] above the configured cap
    ///
    /// During the search:
    /// - [`PlanError::Unreachable`] if two stations are disconnected
    /// - [`PlanError::Cancelled`] / [`PlanError::DeadlineExceeded`]
    pub fn plan(&self, origin: StationId, required: &[StationId]) -> Result<PatrolRoute, PlanError> {
        let graph = self.engine.graph();
        if required.is_empty() {
            return Err(PlanError::EmptyRequiredSet);
        }
        graph.require(origin)?;
        for &station in required {
            graph.require(station)?;
        }

        let mut stops: Vec<StationId> = Vec::with_capacity(required.len());
        for &station in required {
            if station != origin && !stops.contains(&station) {
                stops.push(station);
            }
        }

        let max = self.config.max_required_stations;
        if stops.len() > max {
            return Err(PlanError::TooManyRequiredStations {
                requested: stops.len(),
                max,
            });
        }

        if stops.is_empty() {
            return Ok(PatrolRoute {
                origin,
                visit_order: vec![origin],
                legs: Vec::new(),
                stations: vec![origin],
                connections: Vec::new(),
                total_time: 0,
                oracle_searches: 0,
                visited: Vec::new(),
            });
        }

        let mut search = PatrolSearch {
            engine: self.engine,
            memo: HashMap::new(),
            oracle_searches: 0,
            visited: Vec::new(),
            deadline: self.config.patrol_deadline.map(|d| Instant::now() + d),
            cancel: self.cancel.as_deref(),
            checkpoints: 0,
        };

        let tour = search.solve(origin, origin, &stops)?;
        let best = tour.time;
        let mut order = tour.order;
        order.reverse();

        let mut visit_order = Vec::with_capacity(order.len() + 2);
        visit_order.push(origin);
        visit_order.extend(order);
        visit_order.push(origin);

        debug!(
            %origin,
            stops = stops.len(),
            total_time = best,
            outbound_time = best - tour.back,
            oracle_searches = search.oracle_searches,
            checkpoints = search.checkpoints,
            "patrol order found"
        );

        let mut patrol = self.stitch(origin, visit_order)?;
        debug_assert_eq!(patrol.total_time, best);
        patrol.oracle_searches = search.oracle_searches;
        patrol.visited = search.visited;
        Ok(patrol)
    }

    /// Joins shortest routes between consecutive stops into one patrol.
    fn stitch(&self, origin: StationId, visit_order: Vec<StationId>) -> Result<PatrolRoute, PlanError> {
        let mut legs = Vec::with_capacity(visit_order.len() - 1);
        let mut stations = vec![origin];
        let mut connections = Vec::new();
        let mut total_time = 0;

        for pair in visit_order.windows(2) {
            let leg = self.engine.find_path(Algorithm::Dijkstra, pair[0], pair[1])?;
            stations.extend(leg.stations.iter().skip(1));
            connections.extend(leg.connections.iter().cloned());
            total_time += leg.total_time;
            legs.push(leg);
        }

        Ok(PatrolRoute {
            origin,
            visit_order,
            legs,
            stations,
            connections,
            total_time,
            oracle_searches: 0,
            visited: Vec::new(),
        })
    }
}

/// Plans a patrol with a fresh planner capped at `max_k` required stations.
///
/// # Examples
///
/// ```
/// use metro_router::domain::{Connection, Graph, LineCatalog, Station, StationId};
/// use metro_router::planner::plan_patrol;
///
/// let graph = Graph::build(
///     (1..=3u32).map(|i| Station::new(i, 0.0, f64::from(i))),
///     vec![Connection::new(1, 2, 1, 3), Connection::new(2, 3, 1, 4)],
///     LineCatalog::new(),
/// )
/// .unwrap();
///
/// let patrol = plan_patrol(&graph, StationId(1), &[StationId(3), StationId(2)], 4).unwrap();
/// assert_eq!(patrol.total_time, 14);
/// assert_eq!(patrol.outbound_time(), 7);
/// ```
pub fn plan_patrol(
    graph: &Graph,
    origin: StationId,
    required: &[StationId],
    max_k: usize,
) -> Result<PatrolRoute, PlanError> {
    let config = PlannerConfig::new(max_k, None);
    PatrolPlanner::new(graph, &config).plan(origin, required)
}

/// State for one planning call: the pairwise-distance memo and budget checks.
struct PatrolSearch<'a> {
    engine: ShortestPathEngine<'a>,
    /// Shortest distance keyed by the unordered pair (smaller id first).
    memo: HashMap<(StationId, StationId), u64>,
    oracle_searches: usize,
    visited: Vec<StationId>,
    deadline: Option<Instant>,
    cancel: Option<&'a AtomicBool>,
    /// Recursive calls that passed the budget check.
    checkpoints: usize,
}

impl PatrolSearch<'_> {
    /// Shortest-path distance between two stations, computed at most once
    /// per unordered pair.
    fn weight(&mut self, a: StationId, b: StationId) -> Result<u64, PlanError> {
        if a == b {
            return Ok(0);
        }
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&w) = self.memo.get(&key) {
            return Ok(w);
        }

        let outcome = self.engine.search(&Dijkstra, key.0, key.1)?;
        self.oracle_searches += 1;
        self.visited.extend_from_slice(outcome.visited());

        let w = outcome.end_distance().ok_or(PlanError::Unreachable {
            from: key.0,
            to: key.1,
        })?;
        trace!(from = %key.0, to = %key.1, weight = w, "oracle miss");
        self.memo.insert(key, w);
        Ok(w)
    }

    fn checkpoint(&self) -> Result<(), PlanError> {
        if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            return Err(PlanError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Err(PlanError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Cheapest tour that leaves `source`, visits all of `remaining`, and
    /// returns to `main_origin`. The tour's order is reversed.
    fn solve(
        &mut self,
        main_origin: StationId,
        source: StationId,
        remaining: &[StationId],
    ) -> Result<Tour, PlanError> {
        self.checkpoint()?;
        self.checkpoints += 1;

        if let [last] = remaining {
            let back = self.weight(main_origin, *last)?;
            return Ok(Tour {
                time: self.weight(source, *last)? + back,
                back,
                order: vec![*last],
            });
        }

        let mut best: Option<Tour> = None;
        for (i, &next) in remaining.iter().enumerate() {
            let rest: Vec<StationId> = remaining
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != i)
                .map(|(_, &s)| s)
                .collect();

            let mut tour = self.solve(main_origin, next, &rest)?;
            tour.time += self.weight(source, next)?;
            tour.order.push(next);

            if best.as_ref().is_none_or(|b| tour.beats(b)) {
                best = Some(tour);
            }
        }

        best.ok_or(PlanError::EmptyRequiredSet)
    }
}

/// A candidate closed tour.
#[derive(Debug)]
struct Tour {
    time: u64,
    /// Time of the final leg back to the origin
    back: u64,
    order: Vec<StationId>,
}

impl Tour {
    fn outbound(&self) -> u64 {
        self.time - self.back
    }

    /// Shorter tours win; between equal tours, the one that reaches its last
    /// stop sooner. Full ties keep the incumbent.
    fn beats(&self, other: &Tour) -> bool {
        (self.time, self.outbound()) < (other.time, other.outbound())
    }
}

/// Display adapter produced by [`PatrolRoute::describe`].
pub struct PatrolDescription<'a> {
    patrol: &'a PatrolRoute,
    graph: &'a Graph,
}

impl fmt::Display for PatrolDescription<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let patrol = self.patrol;
        let order: Vec<String> = patrol.visit_order.iter().map(|s| s.to_string()).collect();
        write!(f, "Patrol from ")?;
        write_station(f, self.graph, patrol.origin)?;
        writeln!(f)?;
        writeln!(f, "- Order: {}", order.join(" -> "))?;
        for (i, leg) in patrol.legs.iter().enumerate() {
            let path: Vec<String> = leg.stations.iter().map(|s| s.to_string()).collect();
            writeln!(f, "\t- Trip {}: {} ({})", i + 1, path.join(" -> "), leg.total_time)?;
        }
        write!(f, "- Time: {}", patrol.total_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::{LineCatalog, Station};
    use crate::planner::find_path;

    fn sid(id: u32) -> StationId {
        StationId(id)
    }

    /// Line 1-2-3 with times 3 and 4.
    fn three_in_a_row() -> Graph {
        Graph::build(
            (1..=3u32).map(|i| Station::new(i, 0.0, f64::from(i))),
            vec![Connection::new(1, 2, 1, 3), Connection::new(2, 3, 1, 4)],
            LineCatalog::new(),
        )
        .unwrap()
    }

    /// Star around hub 1: spokes to 2 (1), 3 (2), 4 (3), 5 (4), plus 2-3 (1).
    fn star() -> Graph {
        Graph::build(
            (1..=5u32).map(|i| Station::new(i, f64::from(i), 0.0)),
            vec![
                Connection::new(1, 2, 1, 1),
                Connection::new(1, 3, 1, 2),
                Connection::new(1, 4, 2, 3),
                Connection::new(1, 5, 3, 4),
                Connection::new(2, 3, 4, 1),
            ],
            LineCatalog::new(),
        )
        .unwrap()
    }

    #[test]
    fn two_station_patrol_is_a_round_trip() {
        let g = three_in_a_row();
        let config = PlannerConfig::default();
        let patrol = PatrolPlanner::new(&g, &config)
            .plan(sid(1), &[sid(3)])
            .unwrap();

        let direct = find_path(&g, Algorithm::Dijkstra, sid(1), sid(3)).unwrap();

        // Closed loop: there and back
        assert_eq!(patrol.total_time, 2 * direct.total_time);
        // Open-path reading: just the outbound leg
        assert_eq!(patrol.outbound_time(), direct.total_time);

        assert_eq!(patrol.visit_order, vec![sid(1), sid(3), sid(1)]);
        assert_eq!(
            patrol.stations,
            vec![sid(1), sid(2), sid(3), sid(2), sid(1)]
        );
        assert_eq!(patrol.connections.len(), 4);
        assert_eq!(patrol.legs.len(), 2);
    }

    #[test]
    fn equal_loops_prefer_shorter_outbound() {
        let g = three_in_a_row();
        // 1-2-3-1 and 1-3-2-1 both take 14; only the first reaches 3 in 7
        for required in [[sid(3), sid(2)], [sid(2), sid(3)]] {
            let patrol = plan_patrol(&g, sid(1), &required, 8).unwrap();
            assert_eq!(patrol.total_time, 14);
            assert_eq!(patrol.visit_order, vec![sid(1), sid(2), sid(3), sid(1)]);
            assert_eq!(patrol.outbound_time(), 7);
            assert_eq!(patrol.legs.last().map(|l| l.total_time), Some(7));
        }
    }

    #[test]
    fn star_patrol_visits_all() {
        let g = star();
        let patrol = plan_patrol(&g, sid(1), &[sid(5), sid(3), sid(2), sid(4)], 8).unwrap();

        // 1-2-3 loop costs 1+1+2, spokes to 4 and 5 are out and back
        assert_eq!(patrol.total_time, 4 + 6 + 8);
        assert_eq!(patrol.visit_order.first(), Some(&sid(1)));
        assert_eq!(patrol.visit_order.last(), Some(&sid(1)));
        for s in [2, 3, 4, 5] {
            assert!(patrol.visit_order.contains(&sid(s)));
        }
        let sum: u64 = patrol.connections.iter().map(|c| u64::from(c.time)).sum();
        assert_eq!(sum, patrol.total_time);
    }

    #[test]
    fn stitched_path_is_continuous() {
        let g = star();
        let patrol = plan_patrol(&g, sid(4), &[sid(5), sid(2)], 8).unwrap();
        assert_eq!(patrol.stations.len(), patrol.connections.len() + 1);
        for (i, conn) in patrol.connections.iter().enumerate() {
            assert!(conn.touches(patrol.stations[i]));
            assert!(conn.touches(patrol.stations[i + 1]));
        }
        assert_eq!(patrol.stations.first(), Some(&sid(4)));
        assert_eq!(patrol.stations.last(), Some(&sid(4)));
    }

    #[test]
    fn oracle_runs_once_per_pair() {
        let g = star();
        let patrol = plan_patrol(&g, sid(1), &[sid(2), sid(3), sid(4)], 8).unwrap();
        // Pairs among {1, 2, 3, 4}: 6
        assert_eq!(patrol.oracle_searches, 6);
        assert!(!patrol.visited.is_empty());
    }

    #[test]
    fn empty_required_set() {
        let g = star();
        assert_eq!(
            plan_patrol(&g, sid(1), &[], 8),
            Err(PlanError::EmptyRequiredSet)
        );
    }

    #[test]
    fn origin_only_is_trivial() {
        let g = star();
        let patrol = plan_patrol(&g, sid(1), &[sid(1), sid(1)], 8).unwrap();
        assert_eq!(patrol.total_time, 0);
        assert_eq!(patrol.visit_order, vec![sid(1)]);
        assert_eq!(patrol.stations, vec![sid(1)]);
        assert!(patrol.legs.is_empty());
        assert_eq!(patrol.outbound_time(), 0);
    }

    #[test]
    fn duplicates_are_ignored() {
        let g = star();
        let once = plan_patrol(&g, sid(1), &[sid(4)], 8).unwrap();
        let twice = plan_patrol(&g, sid(1), &[sid(4), sid(4), sid(1)], 1).unwrap();
        assert_eq!(once.total_time, twice.total_time);
        assert_eq!(once.visit_order, twice.visit_order);
    }

    #[test]
    fn too_many_required_stations() {
        let g = star();
        assert_eq!(
            plan_patrol(&g, sid(1), &[sid(2), sid(3), sid(4)], 2),
            Err(PlanError::TooManyRequiredStations {
                requested: 3,
                max: 2
            })
        );
    }

    #[test]
    fn unknown_stations() {
        let g = star();
        assert_eq!(
            plan_patrol(&g, sid(99), &[sid(2)], 8),
            Err(PlanError::UnknownStation(sid(99)))
        );
        assert_eq!(
            plan_patrol(&g, sid(1), &[sid(2), sid(42)], 8),
            Err(PlanError::UnknownStation(sid(42)))
        );
    }

    #[test]
    fn unreachable_stop() {
        let g = Graph::build(
            (1..=4u32).map(|i| Station::new(i, 0.0, 0.0)),
            vec![Connection::new(1, 2, 1, 1), Connection::new(3, 4, 1, 1)],
            LineCatalog::new(),
        )
        .unwrap();
        let err = plan_patrol(&g, sid(1), &[sid(2), sid(4)], 8).unwrap_err();
        assert!(matches!(err, PlanError::Unreachable { .. }));
    }

    #[test]
    fn cancelled_before_start() {
        let g = star();
        let config = PlannerConfig::default();
        let flag = Arc::new(AtomicBool::new(true));
        let result = PatrolPlanner::new(&g, &config)
            .with_cancel_flag(flag)
            .plan(sid(1), &[sid(2), sid(3)]);
        assert_eq!(result, Err(PlanError::Cancelled));
    }

    #[test]
    fn zero_deadline_is_exceeded() {
        let g = star();
        let config = PlannerConfig::default().with_deadline(Duration::ZERO);
        let result = PatrolPlanner::new(&g, &config).plan(sid(1), &[sid(2), sid(3)]);
        assert_eq!(result, Err(PlanError::DeadlineExceeded));
    }

    /// Hub 0 with spokes to 1..=n (time i) and a ring 1-2-..-n (time 1).
    fn wide_star(n: u32) -> Graph {
        let mut connections: Vec<Connection> = (1..=n).map(|i| Connection::new(0, i, 1, i)).collect();
        connections.extend((1..n).map(|i| Connection::new(i, i + 1, 2, 1)));
        Graph::build(
            (0..=n).map(|i| Station::new(i, f64::from(i), 0.0)),
            connections,
            LineCatalog::new(),
        )
        .unwrap()
    }

    #[test]
    fn budget_is_checked_on_every_branch() {
        let g = star();
        let mut search = PatrolSearch {
            engine: ShortestPathEngine::new(&g),
            memo: HashMap::new(),
            oracle_searches: 0,
            visited: Vec::new(),
            deadline: None,
            cancel: None,
            checkpoints: 0,
        };
        search.solve(sid(1), sid(1), &[sid(2), sid(3), sid(4)]).unwrap();
        // One call for three stops, three for two, six for one
        assert_eq!(search.checkpoints, 1 + 3 + 6);
    }

    #[test]
    fn cancellation_interrupts_a_running_search() {
        let g = wide_star(10);
        let config = PlannerConfig::new(10, None);
        let stops: Vec<StationId> = (1..=10).map(sid).collect();
        let flag = Arc::new(AtomicBool::new(false));

        let result = std::thread::scope(|scope| {
            let planner = scope.spawn(|| {
                PatrolPlanner::new(&g, &config)
                    .with_cancel_flag(Arc::clone(&flag))
                    .plan(sid(0), &stops)
            });
            std::thread::sleep(Duration::from_millis(20));
            flag.store(true, Ordering::Relaxed);
            planner.join().unwrap()
        });

        assert_eq!(result, Err(PlanError::Cancelled));
    }

    #[test]
    fn deadline_interrupts_a_running_search() {
        let g = wide_star(10);
        let config = PlannerConfig::new(10, Some(Duration::from_millis(20)));
        let stops: Vec<StationId> = (1..=10).map(sid).collect();

        let started = Instant::now();
        let result = PatrolPlanner::new(&g, &config).plan(sid(0), &stops);

        assert_eq!(result, Err(PlanError::DeadlineExceeded));
        assert!(started.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn describe_patrol() {
        let g = three_in_a_row();
        let patrol = plan_patrol(&g, sid(1), &[sid(3)], 8).unwrap();
        assert_eq!(
            patrol.describe(&g).to_string(),
            "Patrol from Station 1\n\
             - Order: 1 -> 3 -> 1\n\
             \t- Trip 1: 1 -> 2 -> 3 (7)\n\
             \t- Trip 2: 3 -> 2 -> 1 (7)\n\
             - Time: 14"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::planner::fixtures::{connected_graph, for_each_permutation};
    use proptest::prelude::*;
    use proptest::sample::Index;

    proptest! {
        /// The recursive search finds the cheapest closed tour over all orders,
        /// and among those the one reaching its last stop soonest
        #[test]
        fn matches_brute_force_tour(
            graph in connected_graph(),
            origin in any::<Index>(),
            picks in prop::collection::vec(any::<Index>(), 1..5),
        ) {
            let ids: Vec<StationId> = graph.stations().iter().map(|s| s.id).collect();
            let origin = ids[origin.index(ids.len())];
            let required: Vec<StationId> = picks.iter().map(|p| ids[p.index(ids.len())]).collect();

            let patrol = plan_patrol(&graph, origin, &required, 8).unwrap();

            let mut stops: Vec<StationId> = Vec::new();
            for &s in &required {
                if s != origin && !stops.contains(&s) {
                    stops.push(s);
                }
            }

            let engine = ShortestPathEngine::new(&graph);
            let dist = |a: StationId, b: StationId| {
                engine.search(&Dijkstra, a, b).unwrap().end_distance().unwrap()
            };

            // (loop time, time to the last stop), minimised in that order
            let mut best = if stops.is_empty() { (0, 0) } else { (u64::MAX, u64::MAX) };
            for_each_permutation(&mut stops.clone(), 0, &mut |order: &[StationId]| {
                if order.is_empty() {
                    return;
                }
                let mut total = dist(origin, order[0]);
                for pair in order.windows(2) {
                    total += dist(pair[0], pair[1]);
                }
                let back = dist(order[order.len() - 1], origin);
                best = best.min((total + back, total));
            });

            prop_assert_eq!(patrol.total_time, best.0);
            prop_assert_eq!(patrol.outbound_time(), best.1);

            let sum: u64 = patrol.connections.iter().map(|c| u64::from(c.time)).sum();
            prop_assert_eq!(sum, patrol.total_time);
            for s in &stops {
                prop_assert!(patrol.stations.contains(s));
            }
        }
    }
}
