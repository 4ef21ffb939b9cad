mod state;
mod traced_dijkstra;

use petgraph::graph::NodeIndex;

use crate::cost::Channel;
use crate::model::RouteGraph;
use crate::routing::{PathResult, ShortestPathEngine};
use crate::Error;

/// Default single-pair shortest-path engine: binary-heap Dijkstra with
/// predecessor tracing over the chosen cost channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraEngine;

impl ShortestPathEngine for DijkstraEngine {
    fn shortest_path(
        &self,
        graph: &RouteGraph,
        source: NodeIndex,
        target: NodeIndex,
        channel: Channel,
    ) -> Result<Option<PathResult>, Error> {
        Ok(traced_dijkstra::dijkstra_path(graph, source, target, channel))
    }
}
