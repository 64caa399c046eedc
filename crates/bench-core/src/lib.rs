//! # TMC Benchmark Core
//!
//! Everything needed to compare the TMC vector-memory service against other
//! vector search systems, minus the network plumbing.
//!
//! ## Components
//!
//! - **Embedding**: deterministic bag-of-words hashing into a fixed-size vector
//! - **Dataset**: synthetic text/importance entries at a requested cardinality
//! - **Stats**: mean, median and nearest-rank percentiles over latency samples
//! - **Flat**: exact brute-force index used by the in-process baseline
//! - **Adapter**: the load/query contract every benchmarked system implements
//! - **Orchestrator**: runs the size × system matrix sequentially
//! - **Report**: console tables and speed ratios against the baseline
//!
//! ## Example
//!
//! ```rust,ignore
//! use bench_core::{BenchConfig, Orchestrator, select_available};
//!
//! let config = BenchConfig::from_env();
//! let mut adapters = select_available(&config, adapters).await?;
//! let results = Orchestrator::new(&config).run(&mut adapters).await;
//! println!("{}", bench_core::report::render(&results, &config));
//! ```

pub mod adapter;
pub mod config;
pub mod dataset;
pub mod distance;
pub mod embedding;
pub mod error;
pub mod flat;
pub mod orchestrator;
pub mod report;
pub mod results;
pub mod stats;

// Re-export commonly used items
pub use adapter::{QueryPlan, SystemAdapter};
pub use config::{BatchSizes, BenchConfig, Endpoints, Profile, SystemKind};
pub use dataset::{Dataset, DatasetEntry, DatasetTemplate};
pub use embedding::HashEmbedder;
pub use error::{AdapterError, BenchError, ConfigError, StatsError};
pub use flat::FlatIndex;
pub use orchestrator::{select_available, Orchestrator};
pub use results::{RunResults, SystemResult};
pub use stats::LatencyStats;

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// A dense vector embedding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    data: Vec<f32>,
}

impl Embedding {
    /// Create a new embedding from raw data
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Create a zero embedding of given dimension
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    /// Get the dimension of this embedding
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    /// Normalize the embedding in-place (L2 norm). The zero vector stays zero.
    pub fn normalize(&mut self) {
        let norm = distance::l2_norm(&self.data);
        if norm > 1e-10 {
            for x in &mut self.data {
                *x /= norm;
            }
        }
    }

    /// Get the raw slice
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Check whether every coordinate is zero
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&x| x == 0.0)
    }
}

impl Deref for Embedding {
    type Target = [f32];

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl From<Vec<f32>> for Embedding {
    fn from(data: Vec<f32>) -> Self {
        Self::new(data)
    }
}

/// Node ID in the flat index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// A search result with distance score
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub id: NodeId,
    pub score: f32,
}

impl SearchResult {
    pub fn new(id: NodeId, score: f32) -> Self {
        Self { id, score }
    }
}
