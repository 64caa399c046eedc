//! Accumulated run results and their JSON form.
//!
//! The file layout is `{ "<size>": { "<system>": { load_time, query_stats } } }`.
//! Systems keep the order in which they ran.

use std::collections::BTreeMap;
use std::path::Path;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::BenchError;
use crate::stats::LatencyStats;

/// Outcome of one (size, system) cell of the matrix.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SystemResult {
    /// Upload time in seconds.
    pub load_time: f64,
    pub query_stats: LatencyStats,
}

impl SystemResult {
    /// Inserted entries per second, 0 when the load took no measurable time.
    pub fn ops_per_second(&self, size: usize) -> f64 {
        if self.load_time > 0.0 {
            size as f64 / self.load_time
        } else {
            0.0
        }
    }
}

/// Results for one dataset size, in run order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SizeResults {
    systems: Vec<(String, SystemResult)>,
}

impl SizeResults {
    pub fn get(&self, system: &str) -> Option<&SystemResult> {
        self.systems
            .iter()
            .find(|(name, _)| name == system)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SystemResult)> {
        self.systems.iter().map(|(name, result)| (name.as_str(), result))
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    fn insert(&mut self, system: String, result: SystemResult) {
        match self.systems.iter_mut().find(|(name, _)| *name == system) {
            Some((_, existing)) => *existing = result,
            None => self.systems.push((system, result)),
        }
    }
}

impl Serialize for SizeResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.systems.len()))?;
        for (name, result) in &self.systems {
            map.serialize_entry(name, result)?;
        }
        map.end()
    }
}

/// Everything recorded during a run, keyed by dataset size.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(transparent)]
pub struct RunResults {
    sizes: BTreeMap<usize, SizeResults>,
}

impl RunResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a size so it appears in the output even if every system fails.
    pub fn begin_size(&mut self, size: usize) {
        self.sizes.entry(size).or_default();
    }

    pub fn record(&mut self, size: usize, system: impl Into<String>, result: SystemResult) {
        self.sizes.entry(size).or_default().insert(system.into(), result);
    }

    pub fn get(&self, size: usize, system: &str) -> Option<&SystemResult> {
        self.sizes.get(&size).and_then(|s| s.get(system))
    }

    pub fn size(&self, size: usize) -> Option<&SizeResults> {
        self.sizes.get(&size)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &SizeResults)> {
        self.sizes.iter().map(|(size, results)| (*size, results))
    }

    /// Number of recorded (size, system) cells.
    pub fn len(&self) -> usize {
        self.sizes.values().map(SizeResults::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_json_pretty(&self) -> Result<String, BenchError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the results to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), BenchError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(load_time: f64, mean: f64) -> SystemResult {
        SystemResult {
            load_time,
            query_stats: LatencyStats {
                mean,
                median: mean,
                p95: mean,
                p99: mean,
                min: mean,
                max: mean,
            },
        }
    }

    #[test]
    fn test_record_keeps_run_order() {
        let mut results = RunResults::new();
        results.record(1000, "TMC", result(1.0, 2.0));
        results.record(1000, "Elasticsearch", result(1.0, 3.0));
        results.record(1000, "Flat", result(1.0, 4.0));

        let names: Vec<&str> = results.size(1000).unwrap().iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["TMC", "Elasticsearch", "Flat"]);
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_record_replaces_existing() {
        let mut results = RunResults::new();
        results.record(10, "TMC", result(1.0, 2.0));
        results.record(10, "TMC", result(5.0, 6.0));
        assert_eq!(results.len(), 1);
        assert_eq!(results.get(10, "TMC").unwrap().load_time, 5.0);
    }

    #[test]
    fn test_ops_per_second() {
        assert_eq!(result(2.0, 1.0).ops_per_second(1000), 500.0);
        assert_eq!(result(0.0, 1.0).ops_per_second(1000), 0.0);
    }

    #[test]
    fn test_json_layout() {
        let mut results = RunResults::new();
        results.begin_size(100);
        results.record(1000, "TMC", result(1.5, 2.0));

        let value: serde_json::Value = serde_json::from_str(&results.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["100"], serde_json::json!({}));
        assert_eq!(value["1000"]["TMC"]["load_time"], 1.5);
        assert_eq!(value["1000"]["TMC"]["query_stats"]["p99"], 2.0);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");
        std::fs::write(&path, "stale").unwrap();

        let mut results = RunResults::new();
        results.record(1000, "TMC", result(1.0, 2.0));
        results.save(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["1000"]["TMC"]["query_stats"]["mean"], 2.0);
    }
}
