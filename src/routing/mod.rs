//! Routing over the weighted street network
//!
//! Single-pair shortest-path search is a capability the planners consume,
//! not own: anything implementing [`ShortestPathEngine`] can serve them.
//! The crate ships [`DijkstraEngine`] as the default implementation.

pub mod dijkstra;
mod to_geojson;
pub mod tour;

use petgraph::graph::{EdgeIndex, NodeIndex};
use serde::Serialize;

use crate::cost::Channel;
use crate::model::RouteGraph;
use crate::{Error, NodeId};

pub use dijkstra::DijkstraEngine;
pub use tour::{Tour, TourConfig, plan_tour};

/// A single-pair shortest path in graph-index space.
#[derive(Debug, Clone)]
pub struct PathResult {
    pub total_cost: f64,
    pub nodes: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
}

/// Single-pair shortest-path capability over non-negative channel weights.
///
/// Implementations search the requested cost channel and return `Ok(None)`
/// when the target is unreachable; any other failure is propagated to the
/// caller unchanged.
pub trait ShortestPathEngine: Sync {
    fn shortest_path(
        &self,
        graph: &RouteGraph,
        source: NodeIndex,
        target: NodeIndex,
        channel: Channel,
    ) -> Result<Option<PathResult>, Error>;
}

/// Point-to-point routing result in external id space.
#[derive(Debug, Clone, Serialize)]
pub struct RouteResult {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<usize>,
    pub total_cost: f64,
}

/// Least-cost path between two nodes for the chosen cost channel.
///
/// # Errors
///
/// `UnknownNode` when an endpoint id is not in the graph and
/// `DisconnectedWaypoint` when no path exists between the endpoints.
pub fn find_route(
    graph: &RouteGraph,
    engine: &impl ShortestPathEngine,
    source: NodeId,
    target: NodeId,
    channel: Channel,
) -> Result<RouteResult, Error> {
    let source_index = graph.index_of(source)?;
    let target_index = graph.index_of(target)?;

    let path = engine
        .shortest_path(graph, source_index, target_index, channel)?
        .ok_or(Error::DisconnectedWaypoint { source, target })?;

    Ok(RouteResult {
        nodes: path
            .nodes
            .iter()
            .map(|&index| graph.node(index).id)
            .collect(),
        edges: path.edges.iter().map(|&index| index.index()).collect(),
        total_cost: path.total_cost,
    })
}
