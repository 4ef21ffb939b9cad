//! Street network components - nodes, edges and their raw attributes

use geo::Point;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::cost::Channel;
use crate::cost::tags::{RoadClass, TimeBucket};
use crate::{ComponentId, NodeId};

/// Travel mode a node or edge may serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TravelMode {
    Pedestrian,
    Cyclist,
}

/// Per-mode membership flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeFlags {
    pub pedestrian: bool,
    pub cyclist: bool,
}

impl ModeFlags {
    pub fn allows(&self, mode: TravelMode) -> bool {
        match mode {
            TravelMode::Pedestrian => self.pedestrian,
            TravelMode::Cyclist => self.cyclist,
        }
    }

    pub(crate) fn set(&mut self, mode: TravelMode, value: bool) {
        match mode {
            TravelMode::Pedestrian => self.pedestrian = value,
            TravelMode::Cyclist => self.cyclist = value,
        }
    }
}

/// Raw qualitative tags a node inherits from its enclosing way.
///
/// Values are kept as uncurated OSM strings; the mapping tables in
/// [`crate::cost::tags`] turn them into numeric penalties, treating unknown
/// or absent values as neutral.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WayTags {
    pub surface: Option<String>,
    pub smoothness: Option<String>,
    pub incline: Option<String>,
    pub bridge: Option<String>,
}

/// Weak back-reference to the way a node or edge was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WayRef {
    pub id: i64,
    pub class: RoadClass,
}

/// Street graph node
#[derive(Debug, Clone)]
pub struct RouteNode {
    /// OSM id of the node; stable across runs
    pub id: NodeId,
    /// Node coordinates (lon/lat)
    pub geometry: Point<f64>,
    /// Qualitative tags inherited from the enclosing way
    pub tags: WayTags,
    /// Whether the node lies inside a mapped green area
    pub green_area: bool,
    /// Mode labels assigned by the ingestion pipeline
    pub modes: ModeFlags,
    /// Mode labels surviving the connectivity filter
    pub reachable: ModeFlags,
    /// Component label from the most recent filter run
    pub component: Option<ComponentId>,
    /// Originating way, when known
    pub way: Option<WayRef>,
}

impl RouteNode {
    pub fn new(id: NodeId, lat: f64, lon: f64) -> Self {
        Self {
            id,
            geometry: Point::new(lon, lat),
            tags: WayTags::default(),
            green_area: false,
            modes: ModeFlags::default(),
            reachable: ModeFlags::default(),
            component: None,
            way: None,
        }
    }
}

/// Crash counts sampled in a buffer around an edge, by time-of-day bucket,
/// together with the buffer area used for density computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrashSample {
    pub counts: [f64; 4],
    pub area: f64,
}

impl CrashSample {
    pub fn count(&self, bucket: TimeBucket) -> f64 {
        self.counts[bucket.index()]
    }

    /// Crashes per unit buffer area for one bucket. A non-positive area
    /// reads as zero density rather than infinity.
    pub fn density(&self, bucket: TimeBucket) -> f64 {
        if self.area > 0.0 {
            self.count(bucket) / self.area
        } else {
            0.0
        }
    }
}

/// Street graph edge (street segment)
///
/// Stored once in the undirected graph; both travel directions share the
/// same weights by construction.
#[derive(Debug, Clone)]
pub struct RouteEdge {
    /// Segment length in meters
    pub distance: f64,
    /// Road class of the enclosing way
    pub class: RoadClass,
    /// Originating way id, when known
    pub way: Option<i64>,
    /// Mean pollutant concentration sampled along the segment
    pub pollutant: Option<f64>,
    /// Crash counts sampled in a buffer around the segment
    pub crash: Option<CrashSample>,
    channels: HashMap<Channel, f64>,
}

impl RouteEdge {
    pub fn new(distance: f64, class: RoadClass, way: Option<i64>) -> Self {
        Self {
            distance,
            class,
            way,
            pollutant: None,
            crash: None,
            channels: HashMap::new(),
        }
    }

    /// Value of a composed channel, if set.
    pub fn channel(&self, channel: Channel) -> Option<f64> {
        self.channels.get(&channel).copied()
    }

    /// Routing weight for a channel. `Distance` always resolves to the raw
    /// segment length; every other channel must have been composed first.
    pub fn channel_weight(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Distance => Some(self.distance),
            _ => self.channel(channel),
        }
    }

    /// Writes a channel value unless one is already present. Returns whether
    /// the write happened; a `false` is the idempotent no-op, not a failure.
    pub fn set_channel(&mut self, channel: Channel, value: f64) -> bool {
        match self.channels.entry(channel) {
            hashbrown::hash_map::Entry::Vacant(entry) => {
                entry.insert(value);
                true
            }
            hashbrown::hash_map::Entry::Occupied(_) => false,
        }
    }

    /// Number of channels composed onto this edge.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}
