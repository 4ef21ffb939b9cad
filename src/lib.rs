//! Travel-cost modelling and multi-stop routing for pedestrian and cyclist
//! street networks.
//!
//! The crate turns heterogeneous raw signals attached to a street graph
//! (surface quality, incline, bridges, green-area proximity, air pollution,
//! historical crash risk, road danger class) into named, comparable cost
//! channels, selects the dominant connected component of the mode-filtered
//! network, and answers two routing questions over the weighted graph:
//! point-to-point least-cost paths and least-cost closed tours over a small
//! waypoint set.

pub mod algo;
pub mod cost;
pub mod error;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use model::RouteGraph;

/// Stable external node identifier (OSM node id).
pub type NodeId = i64;

/// Connected-component label assigned by the connectivity filter.
///
/// Labels are only meaningful relative to the filter run that produced them;
/// rerunning the filter may reassign them.
pub type ComponentId = usize;

/// Waypoint-set size accepted by the default tour configuration.
pub const MAX_WAYPOINTS: usize = 8;
