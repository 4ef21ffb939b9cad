//! Edge cost composition
//!
//! Converts raw per-edge and per-node attributes into named, comparable
//! cost channels: categorical tags become numeric penalties
//! ([`tags`]), raw signals are rescaled against graph-global extrema
//! ([`normalize`]), and fixed linear-combination formulas write the
//! composite weights onto the edges ([`compose`]).

pub mod compose;
pub mod normalize;
pub mod tags;

use std::fmt;

use serde::{Deserialize, Serialize};

use tags::TimeBucket;

/// A named, graph-global edge quantity usable as a routing weight.
///
/// Channels are written append-only: a composition stage never overwrites a
/// value that is already present, so rerunning a stage on a partially
/// composed graph is a no-op for the edges it already covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Raw segment length in meters
    Distance,
    /// Road danger class 1-5
    Danger,
    /// Crossing time in seconds at the policy travel speed
    TravelTime,
    /// Crossing time at the fastest plausible speed
    MinTravelTime,
    /// Crossing time at the slowest plausible speed
    MaxTravelTime,
    /// Blend of travel-time deviation and danger deviation
    Comfort,
    /// Comfort scaled by endpoint terrain penalties and green coverage
    TerrainComfort,
    /// Distance discounted by green-area coverage
    GreenDistance,
    /// Pollutant exposure accumulated over the segment
    PollutantPerMeter,
    /// Blend of normalized pollutant exposure and normalized green distance
    AirGreenBlend,
    /// Crash-risk density scaled by segment length, per time bucket
    CrashRiskPerMeter(TimeBucket),
    /// Min-max normalized crash-risk density, per time bucket
    CrashRiskNorm(TimeBucket),
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Distance => write!(f, "distance"),
            Channel::Danger => write!(f, "danger"),
            Channel::TravelTime => write!(f, "travel_time"),
            Channel::MinTravelTime => write!(f, "min_travel_time"),
            Channel::MaxTravelTime => write!(f, "max_travel_time"),
            Channel::Comfort => write!(f, "comfort"),
            Channel::TerrainComfort => write!(f, "terrain_comfort"),
            Channel::GreenDistance => write!(f, "green_distance"),
            Channel::PollutantPerMeter => write!(f, "pollutant_per_meter"),
            Channel::AirGreenBlend => write!(f, "air_green_blend"),
            Channel::CrashRiskPerMeter(bucket) => write!(f, "crash_risk_per_meter_{bucket}"),
            Channel::CrashRiskNorm(bucket) => write!(f, "crash_risk_norm_{bucket}"),
        }
    }
}
