//! Street network graph
//!
//! Wraps a petgraph `UnGraph` so that every street segment is stored once
//! and exposed in both travel directions with identical weights. The
//! external id space (OSM node ids) is interned into petgraph indices on
//! insertion.

pub mod components;

use geo::{Distance, Haversine, Point};
use hashbrown::HashMap;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};

use crate::cost::tags::RoadClass;
use crate::{Error, NodeId};
use components::{RouteEdge, RouteNode};

/// Undirected street graph with id interning.
#[derive(Debug, Default)]
pub struct RouteGraph {
    pub graph: UnGraph<RouteNode, RouteEdge>,
    node_index: HashMap<NodeId, NodeIndex>,
}

impl RouteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: UnGraph::with_capacity(nodes, edges),
            node_index: HashMap::with_capacity(nodes),
        }
    }

    /// Inserts a node, or returns the existing index when the id is already
    /// present. Nodes are created once by the ingestion pipeline; re-adding
    /// an id does not replace its attributes.
    pub fn add_node(&mut self, node: RouteNode) -> NodeIndex {
        match self.node_index.entry(node.id) {
            hashbrown::hash_map::Entry::Occupied(entry) => *entry.get(),
            hashbrown::hash_map::Entry::Vacant(entry) => {
                let index = self.graph.add_node(node);
                entry.insert(index);
                index
            }
        }
    }

    /// Connects two known nodes with a segment whose length is the
    /// great-circle distance between their coordinates.
    pub fn add_edge(
        &mut self,
        a: NodeId,
        b: NodeId,
        class: RoadClass,
        way: Option<i64>,
    ) -> Result<EdgeIndex, Error> {
        let (ai, bi) = (self.index_of(a)?, self.index_of(b)?);
        let distance = Haversine.distance(self.graph[ai].geometry, self.graph[bi].geometry);
        Ok(self.insert_edge(ai, bi, RouteEdge::new(distance, class, way)))
    }

    /// Connects two known nodes with an ingestion-supplied (projected)
    /// segment length.
    pub fn add_edge_with_distance(
        &mut self,
        a: NodeId,
        b: NodeId,
        distance: f64,
        class: RoadClass,
        way: Option<i64>,
    ) -> Result<EdgeIndex, Error> {
        let (ai, bi) = (self.index_of(a)?, self.index_of(b)?);
        Ok(self.insert_edge(ai, bi, RouteEdge::new(distance, class, way)))
    }

    fn insert_edge(&mut self, a: NodeIndex, b: NodeIndex, edge: RouteEdge) -> EdgeIndex {
        // One stored edge serves both directions; duplicates are collapsed
        match self.graph.find_edge(a, b) {
            Some(existing) => existing,
            None => self.graph.add_edge(a, b, edge),
        }
    }

    pub fn index_of(&self, id: NodeId) -> Result<NodeIndex, Error> {
        self.node_index
            .get(&id)
            .copied()
            .ok_or(Error::UnknownNode(id))
    }

    pub fn node(&self, index: NodeIndex) -> &RouteNode {
        &self.graph[index]
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&RouteNode> {
        self.node_index.get(&id).map(|&index| &self.graph[index])
    }

    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&RouteEdge> {
        let (ai, bi) = (*self.node_index.get(&a)?, *self.node_index.get(&b)?);
        self.graph
            .find_edge(ai, bi)
            .and_then(|e| self.graph.edge_weight(e))
    }

    pub fn edge_between_mut(&mut self, a: NodeId, b: NodeId) -> Option<&mut RouteEdge> {
        let (ai, bi) = (*self.node_index.get(&a)?, *self.node_index.get(&b)?);
        self.graph
            .find_edge(ai, bi)
            .and_then(|e| self.graph.edge_weight_mut(e))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn coordinates(&self, index: NodeIndex) -> Point<f64> {
        self.graph[index].geometry
    }
}
