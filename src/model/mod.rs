//! Data model for the street travel network
//!
//! Contains the graph structure and the per-node/per-edge attribute types
//! the cost engine and the planners operate on.

pub mod network;

pub use network::RouteGraph;
pub use network::components::{
    CrashSample, ModeFlags, RouteEdge, RouteNode, TravelMode, WayRef, WayTags,
};
