//! Benchmark configuration.
//!
//! A [`BenchConfig`] is built once at startup (profile defaults, then
//! environment, then command line flags) and handed to the orchestrator by
//! reference. Nothing mutates it afterwards.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adapter::QueryPlan;
use crate::dataset::DatasetTemplate;
use crate::embedding::HashEmbedder;
use crate::error::ConfigError;

/// Queries cycled through during the query phase.
pub const DEFAULT_QUERIES: [&str; 5] = [
    "What is artificial intelligence?",
    "Tell me about memory systems",
    "How do AI systems retrieve information?",
    "Explain structured memory",
    "AI performance optimization",
];

/// A benchmarked system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemKind {
    Tmc,
    /// Exact in-process flat L2 index.
    Flat,
    Qdrant,
    Elasticsearch,
    Chroma,
}

impl SystemKind {
    pub const ALL: [SystemKind; 5] = [
        Self::Tmc,
        Self::Flat,
        Self::Qdrant,
        Self::Elasticsearch,
        Self::Chroma,
    ];

    /// Display name, also the key in the results file.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tmc => "TMC",
            Self::Flat => "Flat",
            Self::Qdrant => "Qdrant",
            Self::Elasticsearch => "Elasticsearch",
            Self::Chroma => "ChromaDB",
        }
    }
}

impl std::fmt::Display for SystemKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SystemKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tmc" => Ok(Self::Tmc),
            "flat" | "faiss" => Ok(Self::Flat),
            "qdrant" => Ok(Self::Qdrant),
            "elasticsearch" | "es" => Ok(Self::Elasticsearch),
            "chroma" | "chromadb" => Ok(Self::Chroma),
            other => Err(ConfigError::Unknown {
                kind: "system",
                value: other.to_string(),
            }),
        }
    }
}

/// Preset experiment matrices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// TMC vs flat, Qdrant and Elasticsearch at 1k, 10k and 100k vectors.
    #[default]
    Comprehensive,
    /// TMC vs ChromaDB at 100k memories, 200 queries.
    Stress,
}

impl Profile {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comprehensive => "comprehensive",
            Self::Stress => "stress",
        }
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "comprehensive" => Ok(Self::Comprehensive),
            "stress" => Ok(Self::Stress),
            other => Err(ConfigError::Unknown {
                kind: "profile",
                value: other.to_string(),
            }),
        }
    }
}

/// Base URLs of the remote systems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub tmc: String,
    pub qdrant: String,
    pub elasticsearch: String,
    pub chroma: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            tmc: "http://localhost:8000".to_string(),
            qdrant: "http://localhost:6333".to_string(),
            elasticsearch: "http://localhost:9200".to_string(),
            chroma: "http://localhost:8001".to_string(),
        }
    }
}

impl Endpoints {
    /// Defaults overridden by `TMC_BASE_URL`, `QDRANT_URL`, `ES_URL`, `CHROMA_URL`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let var = |key: &str, fallback: String| std::env::var(key).unwrap_or(fallback);
        Self {
            tmc: var("TMC_BASE_URL", defaults.tmc),
            qdrant: var("QDRANT_URL", defaults.qdrant),
            elasticsearch: var("ES_URL", defaults.elasticsearch),
            chroma: var("CHROMA_URL", defaults.chroma),
        }
    }
}

/// Maximum entries per upload request, per system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSizes {
    /// TMC takes one memory per request; this only groups progress logging.
    pub tmc: usize,
    pub qdrant: usize,
    pub elasticsearch: usize,
    /// Must stay below Chroma's hard limit of 5461.
    pub chroma: usize,
}

impl Default for BatchSizes {
    fn default() -> Self {
        Self {
            tmc: 100,
            qdrant: 100,
            elasticsearch: 500,
            chroma: 5000,
        }
    }
}

/// Immutable configuration for one benchmark run.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    pub profile: Profile,
    pub endpoints: Endpoints,
    pub embedding_dim: usize,
    pub dataset_sizes: Vec<usize>,
    pub query_iterations: usize,
    /// Result set size per query.
    pub k: usize,
    pub batch_sizes: BatchSizes,
    /// Timeout applied to every measured HTTP call.
    pub request_timeout: Duration,
    /// Timeout for availability probes.
    pub probe_timeout: Duration,
    pub systems: Vec<SystemKind>,
    pub baseline: SystemKind,
    pub queries: Vec<String>,
    pub template: DatasetTemplate,
    /// Remote collection / index name used by every adapter.
    pub collection: String,
    pub output_path: PathBuf,
    /// Run even when the baseline is the only available system.
    pub allow_solo: bool,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self::for_profile(Profile::Comprehensive)
    }
}

impl BenchConfig {
    /// Defaults for a profile.
    pub fn for_profile(profile: Profile) -> Self {
        let (dataset_sizes, query_iterations, systems, template, collection, output) = match profile {
            Profile::Comprehensive => (
                vec![1_000, 10_000, 100_000],
                100,
                vec![
                    SystemKind::Tmc,
                    SystemKind::Flat,
                    SystemKind::Qdrant,
                    SystemKind::Elasticsearch,
                ],
                DatasetTemplate::Comprehensive,
                "benchmark_test",
                "benchmark_comprehensive_results.json",
            ),
            Profile::Stress => (
                vec![100_000],
                200,
                vec![SystemKind::Tmc, SystemKind::Chroma],
                DatasetTemplate::Stress,
                "stress_benchmark",
                "benchmark_results.json",
            ),
        };

        Self {
            profile,
            endpoints: Endpoints::default(),
            embedding_dim: 384,
            dataset_sizes,
            query_iterations,
            k: 5,
            batch_sizes: BatchSizes::default(),
            request_timeout: Duration::from_secs(5),
            probe_timeout: Duration::from_secs(2),
            systems,
            baseline: SystemKind::Tmc,
            queries: DEFAULT_QUERIES.iter().map(|q| q.to_string()).collect(),
            template,
            collection: collection.to_string(),
            output_path: PathBuf::from(output),
            allow_solo: false,
        }
    }

    /// Profile defaults with endpoints and dimension read from the environment.
    pub fn from_env(profile: Profile) -> Self {
        let mut config = Self::for_profile(profile);
        config.endpoints = Endpoints::from_env();
        if let Some(dim) = std::env::var("EMBEDDING_DIM").ok().and_then(|d| d.parse().ok()) {
            config.embedding_dim = dim;
        }
        config
    }

    pub fn with_sizes(mut self, sizes: Vec<usize>) -> Self {
        self.dataset_sizes = sizes;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.query_iterations = iterations;
        self
    }

    pub fn with_systems(mut self, systems: Vec<SystemKind>) -> Self {
        self.systems = systems;
        self
    }

    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Check every value the run depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let nonzero = [
            ("embedding_dim", self.embedding_dim),
            ("query_iterations", self.query_iterations),
            ("k", self.k),
            ("batch_sizes.tmc", self.batch_sizes.tmc),
            ("batch_sizes.qdrant", self.batch_sizes.qdrant),
            ("batch_sizes.elasticsearch", self.batch_sizes.elasticsearch),
            ("batch_sizes.chroma", self.batch_sizes.chroma),
        ];
        for (field, value) in nonzero {
            if value == 0 {
                return Err(ConfigError::Zero { field });
            }
        }
        if self.dataset_sizes.iter().any(|&n| n == 0) {
            return Err(ConfigError::Zero { field: "dataset_sizes" });
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::Zero { field: "request_timeout" });
        }

        let nonempty = [
            ("dataset_sizes", self.dataset_sizes.is_empty()),
            ("systems", self.systems.is_empty()),
            ("queries", self.queries.is_empty()),
            ("collection", self.collection.is_empty()),
        ];
        for (field, empty) in nonempty {
            if empty {
                return Err(ConfigError::Empty { field });
            }
        }
        Ok(())
    }

    pub fn embedder(&self) -> HashEmbedder {
        HashEmbedder::new(self.embedding_dim)
    }

    pub fn query_plan(&self) -> QueryPlan {
        QueryPlan::new(self.queries.clone(), self.query_iterations, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comprehensive_defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.profile, Profile::Comprehensive);
        assert_eq!(config.embedding_dim, 384);
        assert_eq!(config.dataset_sizes, vec![1_000, 10_000, 100_000]);
        assert_eq!(config.query_iterations, 100);
        assert_eq!(config.k, 5);
        assert_eq!(config.baseline, SystemKind::Tmc);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stress_defaults() {
        let config = BenchConfig::for_profile(Profile::Stress);
        assert_eq!(config.dataset_sizes, vec![100_000]);
        assert_eq!(config.query_iterations, 200);
        assert_eq!(config.systems, vec![SystemKind::Tmc, SystemKind::Chroma]);
        assert_eq!(config.template, DatasetTemplate::Stress);
        assert_eq!(config.output_path, PathBuf::from("benchmark_results.json"));
    }

    #[test]
    fn test_validate_rejects_zero_iterations() {
        let config = BenchConfig::default().with_iterations(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::Zero { field: "query_iterations" })
        );
    }

    #[test]
    fn test_validate_rejects_empty_systems() {
        let config = BenchConfig::default().with_systems(vec![]);
        assert_eq!(config.validate(), Err(ConfigError::Empty { field: "systems" }));

        let config = BenchConfig::default().with_sizes(vec![1000, 0]);
        assert_eq!(config.validate(), Err(ConfigError::Zero { field: "dataset_sizes" }));
    }

    #[test]
    fn test_parse_system_kind() {
        assert_eq!("TMC".parse::<SystemKind>(), Ok(SystemKind::Tmc));
        assert_eq!("faiss".parse::<SystemKind>(), Ok(SystemKind::Flat));
        assert_eq!("es".parse::<SystemKind>(), Ok(SystemKind::Elasticsearch));
        assert_eq!("chromadb".parse::<SystemKind>(), Ok(SystemKind::Chroma));
        assert!("milvus".parse::<SystemKind>().is_err());
    }

    #[test]
    fn test_parse_profile() {
        assert_eq!("Stress".parse::<Profile>(), Ok(Profile::Stress));
        assert!("soak".parse::<Profile>().is_err());
    }
}
