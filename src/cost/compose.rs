//! Composite weight computation
//!
//! Each stage walks the edge set, derives one channel from raw attributes
//! and previously composed channels, and writes it through the
//! presence-guarded channel store. Stages are idempotent: rerunning one
//! over a live graph never changes an edge that already carries the
//! channel, so partial results from an interrupted run are safe to resume.

use petgraph::graph::EdgeIndex;
use serde::{Deserialize, Serialize};

use crate::cost::normalize::{channel_stats, min_max_components};
use crate::cost::tags::{
    TimeBucket, bridge_penalty, green_share, incline_penalty, smoothness_penalty, surface_penalty,
};
use crate::cost::Channel;
use crate::model::{RouteGraph, RouteNode};
use crate::Error;

/// Policy constants for the composition stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComposeConfig {
    /// Assumed travel speed in km/h
    pub speed_kmh: f64,
    /// Slowest plausible speed, bounds the travel-time range from above
    pub min_speed_kmh: f64,
    /// Fastest plausible speed, bounds the travel-time range from below
    pub max_speed_kmh: f64,
    /// Weight of normalized pollutant exposure in the air/green blend
    pub pollutant_ratio: f64,
    /// Weight of normalized green distance in the air/green blend
    pub green_ratio: f64,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            speed_kmh: 4.0,
            min_speed_kmh: 2.0,
            max_speed_kmh: 6.0,
            pollutant_ratio: 0.7,
            green_ratio: 0.3,
        }
    }
}

impl ComposeConfig {
    fn validate(&self) -> Result<(), Error> {
        if self.min_speed_kmh <= 0.0 || self.speed_kmh <= 0.0 || self.max_speed_kmh <= 0.0 {
            return Err(Error::InvalidData(
                "travel speeds must be positive".to_string(),
            ));
        }
        if self.min_speed_kmh >= self.max_speed_kmh {
            return Err(Error::InvalidData(format!(
                "speed bounds are inverted: {} >= {}",
                self.min_speed_kmh, self.max_speed_kmh
            )));
        }
        if self.pollutant_ratio < 0.0 || self.green_ratio < 0.0 {
            return Err(Error::InvalidData(
                "blend ratios must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Runs every composition stage in dependency order.
pub fn compose_all(graph: &mut RouteGraph, config: &ComposeConfig) -> Result<(), Error> {
    config.validate()?;

    let written = compose_distance(graph)
        + compose_danger(graph)
        + compose_travel_time(graph, config)?
        + compose_comfort(graph)
        + compose_terrain_comfort(graph)
        + compose_green_distance(graph)
        + compose_pollutant(graph)
        + compose_air_green_blend(graph, config)?
        + compose_crash_risk(graph);

    log::info!(
        "composed {written} channel values across {} edges",
        graph.edge_count()
    );
    Ok(())
}

fn edge_indices(graph: &RouteGraph) -> Vec<EdgeIndex> {
    graph.graph.edge_indices().collect()
}

/// Raw distance passthrough.
pub fn compose_distance(graph: &mut RouteGraph) -> usize {
    let mut written = 0;
    for index in edge_indices(graph) {
        let distance = graph.graph[index].distance;
        if graph.graph[index].set_channel(Channel::Distance, distance) {
            written += 1;
        }
    }
    log::debug!("distance channel written on {written} edges");
    written
}

/// Danger class per edge. Where an edge joins two different ways, its
/// danger is the ceiling of the average of the two way classes; elsewhere
/// it is the class of the enclosing way.
pub fn compose_danger(graph: &mut RouteGraph) -> usize {
    let mut written = 0;
    for index in edge_indices(graph) {
        let Some((u, v)) = graph.graph.edge_endpoints(index) else {
            continue;
        };
        let danger = match (graph.graph[u].way, graph.graph[v].way) {
            (Some(a), Some(b)) if a.id != b.id => {
                f64::from(u16::from(a.class.danger()) + u16::from(b.class.danger())) / 2.0
            }
            _ => f64::from(graph.graph[index].class.danger()),
        }
        .ceil();
        if graph.graph[index].set_channel(Channel::Danger, danger) {
            written += 1;
        }
    }
    log::debug!("danger channel written on {written} edges");
    written
}

/// Travel time in seconds at the policy speed, plus the fastest/slowest
/// plausible crossing times.
pub fn compose_travel_time(graph: &mut RouteGraph, config: &ComposeConfig) -> Result<usize, Error> {
    config.validate()?;
    let mut written = 0;
    for index in edge_indices(graph) {
        let distance = graph.graph[index].distance;
        let edge = &mut graph.graph[index];
        for (channel, speed) in [
            (Channel::TravelTime, config.speed_kmh),
            (Channel::MinTravelTime, config.max_speed_kmh),
            (Channel::MaxTravelTime, config.min_speed_kmh),
        ] {
            if edge.set_channel(channel, distance * 3.6 / speed) {
                written += 1;
            }
        }
    }
    log::debug!("travel-time channels written on {written} edge slots");
    Ok(written)
}

/// Comfort cost: half the travel-time deviation within the plausible range
/// plus half the danger deviation within class bounds [1, 4]. Edges missing
/// a prerequisite channel are skipped.
pub fn compose_comfort(graph: &mut RouteGraph) -> usize {
    let mut written = 0;
    let mut skipped = 0;
    for index in edge_indices(graph) {
        let edge = &graph.graph[index];
        let (Some(tt), Some(min_tt), Some(max_tt), Some(danger)) = (
            edge.channel(Channel::TravelTime),
            edge.channel(Channel::MinTravelTime),
            edge.channel(Channel::MaxTravelTime),
            edge.channel(Channel::Danger),
        ) else {
            skipped += 1;
            continue;
        };
        let span = max_tt - min_tt;
        let time_deviation = if span > 0.0 { (tt - min_tt) / span } else { 0.0 };
        let danger_deviation = (danger - 1.0) / 3.0;
        let comfort = 0.5 * time_deviation + 0.5 * danger_deviation;
        if graph.graph[index].set_channel(Channel::Comfort, comfort) {
            written += 1;
        }
    }
    if skipped > 0 {
        log::warn!("comfort skipped {skipped} edges missing travel-time or danger channels");
    }
    log::debug!("comfort channel written on {written} edges");
    written
}

fn terrain_penalty(node: &RouteNode) -> f64 {
    surface_penalty(node.tags.surface.as_deref())
        + smoothness_penalty(node.tags.smoothness.as_deref())
        + incline_penalty(node.tags.incline.as_deref())
        + bridge_penalty(node.tags.bridge.as_deref())
}

/// Comfort scaled by the terrain of both endpoints: green coverage lowers
/// the factor, surface/smoothness/incline/bridge penalties raise it. With
/// all-neutral endpoints the factor is 2 and the value equals plain
/// comfort.
pub fn compose_terrain_comfort(graph: &mut RouteGraph) -> usize {
    let mut written = 0;
    let mut skipped = 0;
    for index in edge_indices(graph) {
        let Some((u, v)) = graph.graph.edge_endpoints(index) else {
            continue;
        };
        let Some(comfort) = graph.graph[index].channel(Channel::Comfort) else {
            skipped += 1;
            continue;
        };
        let (from, to) = (&graph.graph[u], &graph.graph[v]);
        let green = green_share(from.green_area, to.green_area);
        let factor = 2.0 - 0.4 * green + terrain_penalty(from) + terrain_penalty(to);
        if graph.graph[index].set_channel(Channel::TerrainComfort, 0.5 * comfort * factor) {
            written += 1;
        }
    }
    if skipped > 0 {
        log::warn!("terrain comfort skipped {skipped} edges missing the comfort channel");
    }
    log::debug!("terrain-comfort channel written on {written} edges");
    written
}

/// Distance discounted by green coverage: a fully green segment reads half
/// as long, making greener detours competitive.
pub fn compose_green_distance(graph: &mut RouteGraph) -> usize {
    let mut written = 0;
    for index in edge_indices(graph) {
        let Some((u, v)) = graph.graph.edge_endpoints(index) else {
            continue;
        };
        let green = green_share(graph.graph[u].green_area, graph.graph[v].green_area);
        let value = graph.graph[index].distance / (1.0 + green);
        if graph.graph[index].set_channel(Channel::GreenDistance, value) {
            written += 1;
        }
    }
    log::debug!("green-distance channel written on {written} edges");
    written
}

/// Pollutant exposure accumulated over the segment. A missing sample is
/// neutral: no measured pollutant, no exposure.
pub fn compose_pollutant(graph: &mut RouteGraph) -> usize {
    let mut written = 0;
    for index in edge_indices(graph) {
        let edge = &graph.graph[index];
        let value = edge.pollutant.unwrap_or(0.0) * edge.distance;
        if graph.graph[index].set_channel(Channel::PollutantPerMeter, value) {
            written += 1;
        }
    }
    log::debug!("pollutant channel written on {written} edges");
    written
}

/// Caller-weighted blend of normalized pollutant exposure and normalized
/// green distance. Two-pass: global extrema of both inputs first, then the
/// guarded writes.
pub fn compose_air_green_blend(
    graph: &mut RouteGraph,
    config: &ComposeConfig,
) -> Result<usize, Error> {
    config.validate()?;
    let pollutant_stats = channel_stats(graph, Channel::PollutantPerMeter);
    let green_stats = channel_stats(graph, Channel::GreenDistance);

    let mut written = 0;
    let mut skipped = 0;
    for index in edge_indices(graph) {
        let edge = &graph.graph[index];
        let (Some(pollutant), Some(green)) = (
            edge.channel(Channel::PollutantPerMeter),
            edge.channel(Channel::GreenDistance),
        ) else {
            skipped += 1;
            continue;
        };
        let blend = config.pollutant_ratio * pollutant_stats.normalize(pollutant)
            + config.green_ratio * green_stats.normalize(green);
        if graph.graph[index].set_channel(Channel::AirGreenBlend, blend) {
            written += 1;
        }
    }
    if skipped > 0 {
        log::warn!("air/green blend skipped {skipped} edges missing an input channel");
    }
    log::debug!("air/green blend written on {written} edges");
    Ok(written)
}

/// Crash-risk channels per time bucket: density scaled by segment length,
/// and the min-max normalized density against the whole edge population.
/// Each bucket is normalized against its own extrema. Edges without a
/// crash sample contribute zero density.
pub fn compose_crash_risk(graph: &mut RouteGraph) -> usize {
    let indices = edge_indices(graph);
    let densities: Vec<[f64; 4]> = indices
        .iter()
        .map(|&index| {
            let edge = &graph.graph[index];
            match edge.crash {
                Some(sample) => {
                    let mut row = [0.0; 4];
                    for bucket in TimeBucket::ALL {
                        row[bucket.index()] = sample.density(bucket);
                    }
                    row
                }
                None => [0.0; 4],
            }
        })
        .collect();
    let stats = min_max_components(&densities);

    let mut written = 0;
    for (&index, row) in indices.iter().zip(&densities) {
        let distance = graph.graph[index].distance;
        for bucket in TimeBucket::ALL {
            let density = row[bucket.index()];
            let edge = &mut graph.graph[index];
            if edge.set_channel(Channel::CrashRiskPerMeter(bucket), density * distance) {
                written += 1;
            }
            let normalized = stats[bucket.index()].normalize(density);
            if edge.set_channel(Channel::CrashRiskNorm(bucket), normalized) {
                written += 1;
            }
        }
    }
    log::debug!("crash-risk channels written on {written} edge slots");
    written
}
