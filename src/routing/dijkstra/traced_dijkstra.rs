use std::collections::BinaryHeap;

use hashbrown::HashMap;
use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;

use super::state::State;
use crate::cost::Channel;
use crate::model::RouteGraph;
use crate::routing::PathResult;

/// Dijkstra's algorithm over one cost channel, with predecessor tracing.
///
/// Edges that do not carry the requested channel are not traversable, so a
/// search over an uncomposed channel finds nothing rather than finding a
/// wrong answer. Returns `None` when the target is unreachable.
pub(crate) fn dijkstra_path(
    graph: &RouteGraph,
    start: NodeIndex,
    target: NodeIndex,
    channel: Channel,
) -> Option<PathResult> {
    // Estimate capacity based on graph size (adjust as needed)
    let estimated_nodes = graph.graph.node_count().min(1000);
    let mut distances: HashMap<NodeIndex, f64> = HashMap::with_capacity(estimated_nodes);
    let mut predecessors: HashMap<NodeIndex, (NodeIndex, EdgeIndex)> =
        HashMap::with_capacity(estimated_nodes);
    let mut heap = BinaryHeap::with_capacity(estimated_nodes / 4);

    heap.push(State {
        cost: 0.0,
        node: start,
    });
    distances.insert(start, 0.0);

    while let Some(State { cost, node }) = heap.pop() {
        if node == target {
            break;
        }

        // Skip if we've found a better path
        if let Some(&best) = distances.get(&node) {
            if cost > best {
                continue;
            }
        }

        for edge in graph.graph.edges(node) {
            let next = edge.target();
            let Some(weight) = edge.weight().channel_weight(channel) else {
                continue;
            };
            let next_cost = cost + weight;

            match distances.entry(next) {
                hashbrown::hash_map::Entry::Vacant(entry) => {
                    entry.insert(next_cost);
                    heap.push(State {
                        cost: next_cost,
                        node: next,
                    });
                    predecessors.insert(next, (node, edge.id()));
                }
                hashbrown::hash_map::Entry::Occupied(mut entry) => {
                    if next_cost < *entry.get() {
                        *entry.get_mut() = next_cost;
                        heap.push(State {
                            cost: next_cost,
                            node: next,
                        });
                        predecessors.insert(next, (node, edge.id()));
                    }
                }
            }
        }
    }

    let total_cost = *distances.get(&target)?;
    if target != start && !predecessors.contains_key(&target) {
        return None;
    }

    // Follow predecessors backward from target to start
    let mut nodes = vec![target];
    let mut edges = Vec::new();
    let mut current = target;
    while current != start {
        let &(previous, edge) = predecessors.get(&current)?;
        nodes.push(previous);
        edges.push(edge);
        current = previous;
    }
    nodes.reverse();
    edges.reverse();

    Some(PathResult {
        total_cost,
        nodes,
        edges,
    })
}
