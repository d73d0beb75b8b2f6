//! Random graph generation and brute-force oracles for property tests.

use proptest::prelude::*;

use crate::domain::{Connection, Graph, LineCatalog, Station, StationId};

/// Strategy for small connected graphs.
///
/// A random spanning tree guarantees connectivity; extra random connections
/// (possibly parallel, on other lines) add cycles.
pub fn connected_graph() -> impl Strategy<Value = Graph> {
    (2usize..8).prop_flat_map(|n| {
        let tree = prop::collection::vec((any::<prop::sample::Index>(), 1u32..20, 1u32..4), n - 1);
        let extra = prop::collection::vec((0..n, 0..n, 1u32..20, 1u32..4), 0..n * 2);
        let coords = prop::collection::vec((0.0f64..10.0, 0.0f64..10.0), n);
        (Just(n), tree, extra, coords).prop_map(|(n, tree, extra, coords)| {
            let stations: Vec<Station> = coords
                .iter()
                .enumerate()
                .map(|(i, &(x, y))| Station::new(i as u32, x, y))
                .collect();

            let mut connections = Vec::new();
            for (i, (parent, time, line)) in tree.into_iter().enumerate() {
                let child = i + 1;
                let parent = parent.index(child);
                connections.push(Connection::new(parent as u32, child as u32, line, time));
            }
            for (a, b, time, line) in extra {
                if a != b {
                    connections.push(Connection::new(a as u32, b as u32, line, time));
                }
            }

            debug_assert_eq!(stations.len(), n);
            Graph::build(stations, connections, LineCatalog::new())
                .expect("generated graph is valid")
        })
    })
}

/// Minimum total weight over all simple paths, by exhaustive enumeration.
pub fn brute_force_distance(graph: &Graph, from: StationId, to: StationId) -> Option<u64> {
    fn walk(
        graph: &Graph,
        at: StationId,
        to: StationId,
        so_far: u64,
        on_path: &mut Vec<StationId>,
        best: &mut Option<u64>,
    ) {
        if at == to {
            if best.is_none_or(|b| so_far < b) {
                *best = Some(so_far);
            }
            return;
        }
        let next: Vec<(StationId, u64)> = graph
            .neighbors(at)
            .expect("station exists")
            .map(|c| (c.other(at), u64::from(c.time)))
            .collect();
        for (v, w) in next {
            if on_path.contains(&v) {
                continue;
            }
            on_path.push(v);
            walk(graph, v, to, so_far + w, on_path, best);
            on_path.pop();
        }
    }

    let mut best = None;
    walk(graph, from, to, 0, &mut vec![from], &mut best);
    best
}

/// Minimum hop count between two stations.
pub fn hop_distance(graph: &Graph, from: StationId, to: StationId) -> Option<usize> {
    let mut frontier = vec![from];
    let mut seen = vec![from];
    let mut hops = 0;
    while !frontier.is_empty() {
        if frontier.contains(&to) {
            return Some(hops);
        }
        let mut next = Vec::new();
        for &s in &frontier {
            for c in graph.neighbors(s).expect("station exists") {
                let v = c.other(s);
                if !seen.contains(&v) {
                    seen.push(v);
                    next.push(v);
                }
            }
        }
        frontier = next;
        hops += 1;
    }
    None
}

/// Calls `f` with every permutation of `items`.
pub fn for_each_permutation(items: &mut Vec<StationId>, k: usize, f: &mut impl FnMut(&[StationId])) {
    if k == items.len() {
        f(items);
        return;
    }
    for i in k..items.len() {
        items.swap(k, i);
        for_each_permutation(items, k + 1, f);
        items.swap(k, i);
    }
}
