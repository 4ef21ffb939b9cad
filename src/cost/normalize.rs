//! Global min-max statistics and normalization
//!
//! Normalization is a strict two-pass operation: the global extrema of a
//! signal are reduced over the whole edge population first, then values are
//! rescaled into [0, 1] against them. Pass one is a parallel reduction;
//! edges are sharded across the rayon pool and the partial extrema merged.

use petgraph::graph::EdgeIndex;
use rayon::prelude::*;

use crate::cost::Channel;
use crate::model::RouteGraph;

/// Running min/max over a signal population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinMax {
    pub min: f64,
    pub max: f64,
}

impl Default for MinMax {
    fn default() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl MinMax {
    pub fn observe(&mut self, value: f64) {
        // Non-finite samples carry no information about the range
        if value.is_finite() {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// A range is degenerate when it is empty or all samples were equal.
    pub fn is_degenerate(&self) -> bool {
        !(self.max > self.min)
    }

    /// Rescales `value` into [0, 1]. The degenerate range maps every value
    /// to the constant 0.0, never to NaN or infinity.
    pub fn normalize(&self, value: f64) -> f64 {
        if self.is_degenerate() || !value.is_finite() {
            0.0
        } else {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
        }
    }
}

/// Parallel min/max reduction over a sample slice.
pub fn min_max(values: &[f64]) -> MinMax {
    values
        .par_iter()
        .fold(MinMax::default, |mut acc, &v| {
            acc.observe(v);
            acc
        })
        .reduce(MinMax::default, MinMax::merge)
}

/// Per-component min/max over vector-valued samples. Each component is
/// reduced against its own population, not a global extremum across
/// components.
pub fn min_max_components<const K: usize>(values: &[[f64; K]]) -> [MinMax; K] {
    values
        .par_iter()
        .fold(
            || [MinMax::default(); K],
            |mut acc, sample| {
                for (slot, &v) in acc.iter_mut().zip(sample.iter()) {
                    slot.observe(v);
                }
                acc
            },
        )
        .reduce(
            || [MinMax::default(); K],
            |a, b| {
                let mut merged = [MinMax::default(); K];
                for ((slot, x), y) in merged.iter_mut().zip(a).zip(b) {
                    *slot = x.merge(y);
                }
                merged
            },
        )
}

/// Extrema of a composed channel over all edges carrying it.
pub fn channel_stats(graph: &RouteGraph, channel: Channel) -> MinMax {
    let values: Vec<f64> = graph
        .graph
        .edge_weights()
        .filter_map(|edge| edge.channel_weight(channel))
        .collect();
    min_max(&values)
}

/// Writes the min-max normalized image of `source` as channel `target` on
/// every edge that carries `source`. Already-normalized edges are left
/// untouched; returns the number of edges written.
pub fn normalize_channel(graph: &mut RouteGraph, source: Channel, target: Channel) -> usize {
    let samples: Vec<(EdgeIndex, f64)> = graph
        .graph
        .edge_indices()
        .filter_map(|index| {
            graph.graph[index]
                .channel_weight(source)
                .map(|value| (index, value))
        })
        .collect();

    let stats = min_max(
        &samples
            .iter()
            .map(|&(_, value)| value)
            .collect::<Vec<f64>>(),
    );

    let mut written = 0;
    for (index, value) in samples {
        if graph.graph[index].set_channel(target, stats.normalize(value)) {
            written += 1;
        }
    }
    log::debug!("normalized {source} into {target} on {written} edges");
    written
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_into_unit_range() {
        let stats = min_max(&[2.0, 4.0, 10.0]);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.normalize(2.0), 0.0);
        assert_eq!(stats.normalize(10.0), 1.0);
        assert!((stats.normalize(4.0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn degenerate_population_maps_to_zero() {
        let stats = min_max(&[3.0, 3.0, 3.0]);
        assert!(stats.is_degenerate());
        assert_eq!(stats.normalize(3.0), 0.0);

        let empty = min_max(&[]);
        assert!(empty.is_degenerate());
        assert_eq!(empty.normalize(1.0), 0.0);
    }

    #[test]
    fn non_finite_samples_are_ignored() {
        let stats = min_max(&[1.0, f64::NAN, 5.0, f64::INFINITY]);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert_eq!(stats.normalize(f64::NAN), 0.0);
    }

    #[test]
    fn components_normalize_independently() {
        let stats = min_max_components(&[[0.0, 100.0], [10.0, 300.0]]);
        assert_eq!(stats[0].max, 10.0);
        assert_eq!(stats[1].min, 100.0);
        assert!((stats[0].normalize(5.0) - 0.5).abs() < 1e-12);
        assert!((stats[1].normalize(200.0) - 0.5).abs() < 1e-12);
    }
}
