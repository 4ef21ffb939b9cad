pub use crate::MAX_WAYPOINTS;

// Re-export key components
pub use crate::algo::components::{
    FilterOutcome, default_exclusions, label_components, select_dominant_network,
};
pub use crate::cost::Channel;
pub use crate::cost::compose::{ComposeConfig, compose_all};
pub use crate::cost::normalize::{MinMax, normalize_channel};
pub use crate::cost::tags::{RoadClass, TimeBucket};
pub use crate::model::{
    CrashSample, ModeFlags, RouteEdge, RouteGraph, RouteNode, TravelMode, WayRef, WayTags,
};
pub use crate::routing::tour::{Tour, TourConfig, plan_tour};
pub use crate::routing::{
    DijkstraEngine, PathResult, RouteResult, ShortestPathEngine, find_route,
};

// Core identifier types
pub use crate::{ComponentId, NodeId};

pub use crate::Error;
