//! Latency statistics.
//!
//! Percentiles use the nearest-rank rule without interpolation: sort ascending
//! and take the sample at `floor(p * n)`. Results stay comparable with earlier
//! runs that used the same rule.

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Aggregate over a non-empty set of latency samples, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyStats {
    pub mean: f64,
    pub median: f64,
    pub p95: f64,
    pub p99: f64,
    pub min: f64,
    pub max: f64,
}

impl LatencyStats {
    /// Aggregate `samples`. Fails on an empty slice.
    pub fn from_samples(samples: &[f64]) -> Result<Self, StatsError> {
        if samples.is_empty() {
            return Err(StatsError::Empty);
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let n = sorted.len();
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            sorted[n / 2]
        } else {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        };

        Ok(Self {
            mean,
            median,
            p95: nearest_rank(&sorted, 0.95),
            p99: nearest_rank(&sorted, 0.99),
            min: sorted[0],
            max: sorted[n - 1],
        })
    }
}

/// Sample at index `floor(percentile * len)` of an ascending, non-empty slice.
pub fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    let idx = (percentile * sorted.len() as f64).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}
