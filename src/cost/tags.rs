//! Categorical attribute mapping
//!
//! Total lookup tables from qualitative OSM tags to numeric penalty
//! contributions. Every function here accepts arbitrary strings and maps
//! anything unrecognized to the neutral value, so uncurated tag data can be
//! fed straight through.

use std::fmt;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// Surface penalty: paved 0.0, uneven paving 0.1, loose ground 0.2.
pub fn surface_penalty(tag: Option<&str>) -> f64 {
    match tag {
        Some("asphalt" | "concrete" | "concrete:plates" | "compacted" | "paved") => 0.0,
        Some(
            "grass_paver" | "sett" | "unhewn_cobblestone" | "grass" | "cobblestone"
            | "paving_stones",
        ) => 0.1,
        Some(
            "unpaved" | "rock" | "wood" | "gravel" | "fine_gravel" | "pebblestone" | "ground"
            | "dirt",
        ) => 0.2,
        _ => 0.0,
    }
}

/// Smoothness penalty. An excellent surface reads as a bonus; the neutral
/// default for unknown tags is "good" (0.0).
pub fn smoothness_penalty(tag: Option<&str>) -> f64 {
    match tag {
        Some("excellent") => -0.05,
        Some("good") => 0.0,
        Some("intermediate") => 0.1,
        Some("bad") => 0.2,
        _ => 0.0,
    }
}

/// Incline penalty: only an explicit `yes` counts.
pub fn incline_penalty(tag: Option<&str>) -> f64 {
    match tag {
        Some("yes") => 0.1,
        _ => 0.0,
    }
}

/// Bridge penalty: only an explicit `yes` counts.
pub fn bridge_penalty(tag: Option<&str>) -> f64 {
    match tag {
        Some("yes") => 0.1,
        _ => 0.0,
    }
}

/// Green coverage of a segment by endpoint agreement: neither endpoint in a
/// green area 0.0, one 0.5, both 1.0.
pub fn green_share(a: bool, b: bool) -> f64 {
    match (a, b) {
        (true, true) => 1.0,
        (false, false) => 0.0,
        _ => 0.5,
    }
}

/// Road class of a way, reduced from the OSM `highway` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoadClass {
    Footway,
    Path,
    Steps,
    Pedestrian,
    Track,
    Cycleway,
    LivingStreet,
    Residential,
    Service,
    Unclassified,
    Tertiary,
    Secondary,
    Primary,
    Trunk,
    Motorway,
    Unknown,
}

impl RoadClass {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "footway" => RoadClass::Footway,
            "path" => RoadClass::Path,
            "steps" => RoadClass::Steps,
            "pedestrian" => RoadClass::Pedestrian,
            "track" => RoadClass::Track,
            "cycleway" => RoadClass::Cycleway,
            "living_street" => RoadClass::LivingStreet,
            "residential" => RoadClass::Residential,
            "service" => RoadClass::Service,
            "unclassified" => RoadClass::Unclassified,
            "tertiary" | "tertiary_link" => RoadClass::Tertiary,
            "secondary" | "secondary_link" => RoadClass::Secondary,
            "primary" | "primary_link" => RoadClass::Primary,
            "trunk" | "trunk_link" => RoadClass::Trunk,
            "motorway" | "motorway_link" => RoadClass::Motorway,
            _ => RoadClass::Unknown,
        }
    }

    /// Danger class 1-5: dedicated foot/cycle infrastructure 1, quiet
    /// streets 2, medium-speed roads 3, high-speed roads 4, unknown 5.
    pub fn danger(self) -> u8 {
        match self {
            RoadClass::Footway
            | RoadClass::Path
            | RoadClass::Steps
            | RoadClass::Pedestrian
            | RoadClass::Track
            | RoadClass::Cycleway => 1,
            RoadClass::LivingStreet
            | RoadClass::Residential
            | RoadClass::Service
            | RoadClass::Unclassified => 2,
            RoadClass::Tertiary | RoadClass::Secondary => 3,
            RoadClass::Primary | RoadClass::Trunk | RoadClass::Motorway => 4,
            RoadClass::Unknown => 5,
        }
    }
}

/// Time-of-day bucket used by the crash-risk channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeBucket {
    Night,
    Morning,
    Afternoon,
    Evening,
}

impl TimeBucket {
    pub const ALL: [TimeBucket; 4] = [
        TimeBucket::Night,
        TimeBucket::Morning,
        TimeBucket::Afternoon,
        TimeBucket::Evening,
    ];

    /// Position of this bucket in crash-count vectors.
    pub fn index(self) -> usize {
        match self {
            TimeBucket::Night => 0,
            TimeBucket::Morning => 1,
            TimeBucket::Afternoon => 2,
            TimeBucket::Evening => 3,
        }
    }

    /// Bucket for an hour of day: night from 22:00 to 03:59, morning until
    /// 09:59, afternoon until 15:59, evening otherwise.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            22.. => TimeBucket::Night,
            0..4 => TimeBucket::Night,
            4..10 => TimeBucket::Morning,
            10..16 => TimeBucket::Afternoon,
            _ => TimeBucket::Evening,
        }
    }

    pub fn from_time(time: NaiveTime) -> Self {
        Self::from_hour(time.hour())
    }
}

impl fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeBucket::Night => write!(f, "night"),
            TimeBucket::Morning => write!(f, "morning"),
            TimeBucket::Afternoon => write!(f, "afternoon"),
            TimeBucket::Evening => write!(f, "evening"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_table_is_total() {
        assert_eq!(surface_penalty(Some("asphalt")), 0.0);
        assert_eq!(surface_penalty(Some("cobblestone")), 0.1);
        assert_eq!(surface_penalty(Some("dirt")), 0.2);
        assert_eq!(surface_penalty(Some("lava")), 0.0);
        assert_eq!(surface_penalty(None), 0.0);
    }

    #[test]
    fn smoothness_has_excellent_bonus() {
        assert_eq!(smoothness_penalty(Some("excellent")), -0.05);
        assert_eq!(smoothness_penalty(Some("bad")), 0.2);
        assert_eq!(smoothness_penalty(Some("horrible")), 0.0);
        assert_eq!(smoothness_penalty(None), 0.0);
    }

    #[test]
    fn incline_and_bridge_need_explicit_yes() {
        assert_eq!(incline_penalty(Some("yes")), 0.1);
        assert_eq!(incline_penalty(Some("5%")), 0.0);
        assert_eq!(bridge_penalty(Some("yes")), 0.1);
        assert_eq!(bridge_penalty(Some("viaduct")), 0.0);
    }

    #[test]
    fn green_share_by_endpoint_agreement() {
        assert_eq!(green_share(false, false), 0.0);
        assert_eq!(green_share(true, false), 0.5);
        assert_eq!(green_share(false, true), 0.5);
        assert_eq!(green_share(true, true), 1.0);
    }

    #[test]
    fn danger_classes() {
        assert_eq!(RoadClass::from_tag("footway").danger(), 1);
        assert_eq!(RoadClass::from_tag("residential").danger(), 2);
        assert_eq!(RoadClass::from_tag("secondary").danger(), 3);
        assert_eq!(RoadClass::from_tag("motorway").danger(), 4);
        assert_eq!(RoadClass::from_tag("construction").danger(), 5);
    }

    #[test]
    fn time_buckets() {
        assert_eq!(TimeBucket::from_hour(23), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(3), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(8), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(12), TimeBucket::Afternoon);
        assert_eq!(TimeBucket::from_hour(19), TimeBucket::Evening);
        let t = NaiveTime::from_hms_opt(16, 30, 0).unwrap();
        assert_eq!(TimeBucket::from_time(t), TimeBucket::Evening);
    }
}
