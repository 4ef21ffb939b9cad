//! Connectivity filtering
//!
//! Raw street graphs contain many small fragments (service driveways,
//! indoor ways) next to the actual travel network. Routing runs on the
//! dominant weakly-connected component of the subgraph that survives the
//! road-class exclusion list; everything else is marked unreachable for the
//! mode.

use fixedbitset::FixedBitSet;
use petgraph::graph::UnGraph;
use petgraph::visit::EdgeRef;
use rustworkx_core::connectivity::connected_components;

use crate::cost::tags::RoadClass;
use crate::model::{RouteGraph, TravelMode};
use crate::{ComponentId, Error};

/// Outcome of a dominant-network selection run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOutcome {
    pub dominant: ComponentId,
    pub components: usize,
    pub dominant_nodes: usize,
}

/// Road classes excluded from the travel network of a mode.
pub fn default_exclusions(mode: TravelMode) -> &'static [RoadClass] {
    match mode {
        TravelMode::Pedestrian => &[RoadClass::Motorway, RoadClass::Trunk],
        TravelMode::Cyclist => &[
            RoadClass::Motorway,
            RoadClass::Trunk,
            RoadClass::Primary,
            RoadClass::Steps,
        ],
    }
}

/// Structural copy of the graph without the excluded edge classes. Node
/// indices are preserved, so component sets translate back directly.
pub fn filter_subgraph(graph: &RouteGraph, excluded: &[RoadClass]) -> UnGraph<(), ()> {
    let mut filtered = UnGraph::with_capacity(graph.node_count(), graph.edge_count());
    for _ in graph.graph.node_indices() {
        filtered.add_node(());
    }
    for edge in graph.graph.edge_references() {
        if !excluded.contains(&edge.weight().class) {
            filtered.add_edge(edge.source(), edge.target(), ());
        }
    }
    filtered
}

/// Labels every node with the weakly-connected component it belongs to in
/// the class-filtered subgraph. Labels are assigned in discovery order over
/// ascending node indices, so repeated runs on the same graph agree.
/// Returns the component sizes indexed by label.
pub fn label_components(graph: &mut RouteGraph, excluded: &[RoadClass]) -> Vec<usize> {
    let filtered = filter_subgraph(graph, excluded);
    let components = connected_components(&filtered);

    let mut sizes = Vec::with_capacity(components.len());
    for (label, members) in components.iter().enumerate() {
        sizes.push(members.len());
        for &index in members {
            graph.graph[index].component = Some(label);
        }
    }
    log::debug!(
        "labeled {} components over {} nodes ({} edge classes excluded)",
        sizes.len(),
        graph.node_count(),
        excluded.len()
    );
    sizes
}

/// Selects the dominant component for a mode and rewrites reachability.
///
/// Nodes inside the dominant component keep the mode label they carried
/// from ingestion; every other node loses it. Ties on size break toward
/// the lowest component label.
pub fn select_dominant_network(
    graph: &mut RouteGraph,
    mode: TravelMode,
    excluded: &[RoadClass],
) -> Result<FilterOutcome, Error> {
    let sizes = label_components(graph, excluded);

    let (dominant, dominant_nodes) = sizes
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))
        .ok_or(Error::EmptyDominantComponent)?;
    // A single stranded node is not a travel network
    if dominant_nodes < 2 {
        return Err(Error::EmptyDominantComponent);
    }

    let mut members = FixedBitSet::with_capacity(graph.node_count());
    for index in graph.graph.node_indices() {
        if graph.graph[index].component == Some(dominant) {
            members.insert(index.index());
        }
    }
    for index in graph.graph.node_indices() {
        let node = &mut graph.graph[index];
        let eligible = members.contains(index.index()) && node.modes.allows(mode);
        node.reachable.set(mode, eligible);
    }

    log::info!(
        "dominant component {dominant} holds {dominant_nodes} of {} nodes ({} components, {mode:?})",
        graph.node_count(),
        sizes.len(),
    );
    Ok(FilterOutcome {
        dominant,
        components: sizes.len(),
        dominant_nodes,
    })
}
