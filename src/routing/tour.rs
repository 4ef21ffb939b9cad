//! Multi-stop tour planning
//!
//! Plans the least-cost closed tour visiting a small waypoint set exactly
//! once: builds the complete pairwise shortest-path matrix through the
//! configured engine, searches the minimum-cost Hamiltonian cycle over it,
//! and stitches the per-pair hop sequences into one continuous route.
//!
//! The pairwise queries are independent and fan out across the rayon pool;
//! a failed or unreachable pair aborts the whole request, because a
//! missing pair breaks every candidate cycle that would use it.

use hashbrown::HashSet;
use itertools::Itertools;
use petgraph::graph::NodeIndex;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cost::Channel;
use crate::model::RouteGraph;
use crate::routing::ShortestPathEngine;
use crate::{Error, MAX_WAYPOINTS, NodeId};

/// Bitmask width limit of the dynamic-programming search.
const HARD_WAYPOINT_CAP: usize = 16;

/// Tour planner knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourConfig {
    /// Largest accepted waypoint set
    pub max_waypoints: usize,
    /// Waypoint count up to which the cycle search enumerates orderings
    /// exactly; larger sets switch to dynamic programming
    pub exact_search_limit: usize,
    /// Worker threads for the pairwise matrix; `None` uses the global pool
    pub threads: Option<usize>,
}

impl Default for TourConfig {
    fn default() -> Self {
        Self {
            max_waypoints: MAX_WAYPOINTS,
            exact_search_limit: 10,
            threads: None,
        }
    }
}

/// A closed multi-stop route.
///
/// `waypoints` is the visiting order with the starting waypoint repeated at
/// the end; `path` is the fully expanded hop sequence, which likewise
/// starts and ends at the starting waypoint.
#[derive(Debug, Clone, Serialize)]
pub struct Tour {
    pub waypoints: Vec<NodeId>,
    pub total_cost: f64,
    pub path: Vec<NodeId>,
}

struct PairPath {
    cost: f64,
    nodes: Vec<NodeIndex>,
}

/// Least-cost closed tour over the waypoint set for the chosen channel.
///
/// # Errors
///
/// `InvalidWaypoints` for sets outside the configured bounds or containing
/// duplicates, `UnknownNode` for ids not in the graph, and
/// `DisconnectedWaypoint` when any waypoint pair has no path.
pub fn plan_tour(
    graph: &RouteGraph,
    engine: &impl ShortestPathEngine,
    waypoints: &[NodeId],
    channel: Channel,
    config: &TourConfig,
) -> Result<Tour, Error> {
    let n = waypoints.len();
    let cap = config.max_waypoints.min(HARD_WAYPOINT_CAP);
    if n < 2 || n > cap {
        return Err(Error::InvalidWaypoints(format!(
            "expected between 2 and {cap} waypoints, got {n}"
        )));
    }
    if waypoints.iter().collect::<HashSet<_>>().len() != n {
        return Err(Error::InvalidWaypoints(
            "waypoint ids must be distinct".to_string(),
        ));
    }

    let indices = waypoints
        .iter()
        .map(|&id| graph.index_of(id))
        .collect::<Result<Vec<_>, _>>()?;

    let matrix = match config.threads {
        Some(workers) => rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| Error::ThreadPool(e.to_string()))?
            .install(|| pairwise_matrix(graph, engine, &indices, waypoints, channel)),
        None => pairwise_matrix(graph, engine, &indices, waypoints, channel),
    }?;
    log::debug!("pairwise matrix built: {} pairs", n * (n - 1) / 2);

    let pair_cost = |a: usize, b: usize| -> f64 {
        matrix[a][b]
            .as_ref()
            .map_or(f64::INFINITY, |pair| pair.cost)
    };
    let (order, search_cost) = if n <= config.exact_search_limit {
        exact_search(n, &pair_cost)
    } else {
        held_karp(n, &pair_cost)
    };
    log::debug!("tour search selected an ordering of cost {search_cost}");

    let (path, total_cost) = stitch(&order, &matrix, graph)?;

    let mut ordered: Vec<NodeId> = order.iter().map(|&k| waypoints[k]).collect();
    ordered.push(waypoints[order[0]]);

    log::info!(
        "planned tour over {n} waypoints: cost {total_cost}, {} hops",
        path.len()
    );
    Ok(Tour {
        waypoints: ordered,
        total_cost,
        path,
    })
}

/// Shortest paths between all unordered waypoint pairs. The matrix is
/// filled symmetrically, with the hop sequence oriented row to column.
fn pairwise_matrix(
    graph: &RouteGraph,
    engine: &impl ShortestPathEngine,
    indices: &[NodeIndex],
    ids: &[NodeId],
    channel: Channel,
) -> Result<Vec<Vec<Option<PairPath>>>, Error> {
    let n = indices.len();
    let pairs: Vec<(usize, usize)> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .collect();

    let found: Vec<((usize, usize), f64, Vec<NodeIndex>)> = pairs
        .par_iter()
        .map(|&(i, j)| {
            let path = engine
                .shortest_path(graph, indices[i], indices[j], channel)?
                .ok_or(Error::DisconnectedWaypoint {
                    source: ids[i],
                    target: ids[j],
                })?;
            Ok(((i, j), path.total_cost, path.nodes))
        })
        .collect::<Result<_, Error>>()?;

    let mut matrix: Vec<Vec<Option<PairPath>>> =
        (0..n).map(|_| (0..n).map(|_| None).collect()).collect();
    for ((i, j), cost, nodes) in found {
        let mut reversed = nodes.clone();
        reversed.reverse();
        matrix[j][i] = Some(PairPath {
            cost,
            nodes: reversed,
        });
        matrix[i][j] = Some(PairPath { cost, nodes });
    }
    Ok(matrix)
}

/// Exact cycle search: enumerate orderings with the first waypoint fixed to
/// remove rotations, skipping each ordering's mirror since the cost matrix
/// is symmetric.
fn exact_search(n: usize, cost: &impl Fn(usize, usize) -> f64) -> (Vec<usize>, f64) {
    let mut best_cost = f64::INFINITY;
    let mut best: Vec<usize> = (1..n).collect();

    for perm in (1..n).permutations(n - 1) {
        if perm.len() >= 2 && perm[0] > perm[perm.len() - 1] {
            continue;
        }
        let mut total = cost(0, perm[0]) + cost(perm[perm.len() - 1], 0);
        for (&a, &b) in perm.iter().tuple_windows() {
            total += cost(a, b);
        }
        if total < best_cost {
            best_cost = total;
            best = perm;
        }
    }

    let mut order = Vec::with_capacity(n);
    order.push(0);
    order.extend(best);
    (order, best_cost)
}

/// Held-Karp dynamic programming over subsets, for waypoint counts where
/// the factorial scan is prohibitive.
fn held_karp(n: usize, cost: &impl Fn(usize, usize) -> f64) -> (Vec<usize>, f64) {
    let m = n - 1;
    let full = 1usize << m;
    let mut best_to = vec![f64::INFINITY; full * m];
    let mut parent = vec![usize::MAX; full * m];

    for j in 0..m {
        best_to[(1 << j) * m + j] = cost(0, j + 1);
    }
    for mask in 1..full {
        for j in 0..m {
            if mask & (1 << j) == 0 {
                continue;
            }
            let base = best_to[mask * m + j];
            if !base.is_finite() {
                continue;
            }
            for k in 0..m {
                if mask & (1 << k) != 0 {
                    continue;
                }
                let next = (mask | (1 << k)) * m + k;
                let candidate = base + cost(j + 1, k + 1);
                if candidate < best_to[next] {
                    best_to[next] = candidate;
                    parent[next] = j;
                }
            }
        }
    }

    let mut best_cost = f64::INFINITY;
    let mut last = 0;
    for j in 0..m {
        let total = best_to[(full - 1) * m + j] + cost(j + 1, 0);
        if total < best_cost {
            best_cost = total;
            last = j;
        }
    }

    let mut order = Vec::with_capacity(n);
    let mut mask = full - 1;
    let mut j = last;
    while j != usize::MAX {
        order.push(j + 1);
        let up = parent[mask * m + j];
        mask &= !(1 << j);
        j = up;
    }
    order.push(0);
    order.reverse();
    (order, best_cost)
}

/// Replaces every consecutive waypoint pair of the winning cycle with its
/// recorded hop sequence, contributing each shared boundary node once and
/// closing the cycle back to the start.
fn stitch(
    order: &[usize],
    matrix: &[Vec<Option<PairPath>>],
    graph: &RouteGraph,
) -> Result<(Vec<NodeId>, f64), Error> {
    let mut hops: Vec<NodeIndex> = Vec::new();
    let mut total = 0.0;

    for (&a, &b) in order.iter().circular_tuple_windows() {
        let pair = matrix[a][b].as_ref().ok_or_else(|| {
            Error::InvalidData("pairwise matrix is missing a computed pair".to_string())
        })?;
        total += pair.cost;
        let skip = usize::from(!hops.is_empty());
        hops.extend(pair.nodes.iter().skip(skip));
    }

    Ok((hops.iter().map(|&index| graph.node(index).id).collect(), total))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Symmetric cost matrix of a 7-point instance with a known optimum
    const COSTS: [[f64; 7]; 7] = [
        [0.0, 2.0, 9.0, 10.0, 7.0, 6.0, 8.0],
        [2.0, 0.0, 6.0, 4.0, 3.0, 8.0, 5.0],
        [9.0, 6.0, 0.0, 8.0, 5.0, 2.0, 7.0],
        [10.0, 4.0, 8.0, 0.0, 6.0, 9.0, 3.0],
        [7.0, 3.0, 5.0, 6.0, 0.0, 4.0, 9.0],
        [6.0, 8.0, 2.0, 9.0, 4.0, 0.0, 10.0],
        [8.0, 5.0, 7.0, 3.0, 9.0, 10.0, 0.0],
    ];

    fn cycle_cost(order: &[usize]) -> f64 {
        let mut total = 0.0;
        for (&a, &b) in order.iter().circular_tuple_windows() {
            total += COSTS[a][b];
        }
        total
    }

    #[test]
    fn exact_and_dynamic_search_agree() {
        let cost = |a: usize, b: usize| COSTS[a][b];
        for n in 3..=7 {
            let (exact_order, exact_cost) = exact_search(n, &cost);
            let (dp_order, dp_cost) = held_karp(n, &cost);
            assert!((exact_cost - dp_cost).abs() < 1e-9, "n={n}");
            assert!((cycle_cost(&exact_order) - exact_cost).abs() < 1e-9);
            assert!((cycle_cost(&dp_order) - dp_cost).abs() < 1e-9);
        }
    }

    #[test]
    fn search_orders_start_at_the_fixed_waypoint() {
        let cost = |a: usize, b: usize| COSTS[a][b];
        let (order, _) = exact_search(5, &cost);
        assert_eq!(order[0], 0);
        assert_eq!(order.len(), 5);
        let (order, _) = held_karp(5, &cost);
        assert_eq!(order[0], 0);
        assert_eq!(order.len(), 5);
    }

    #[test]
    fn two_waypoints_make_an_out_and_back() {
        let cost = |a: usize, b: usize| COSTS[a][b];
        let (order, total) = exact_search(2, &cost);
        assert_eq!(order, vec![0, 1]);
        assert!((total - 4.0).abs() < 1e-9);
    }
}
