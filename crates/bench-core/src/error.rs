//! Error types shared by the benchmark crates.

use thiserror::Error;

/// Errors from the statistics aggregator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("cannot aggregate an empty sample set")]
    Empty,
}

/// Invalid benchmark configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}

/// Failure reported by a system adapter.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{system} is unavailable: {reason}")]
    Unavailable { system: String, reason: String },

    #[error("{system} rejected request to {endpoint}: HTTP {status}: {message}")]
    Rejected {
        system: String,
        endpoint: String,
        status: u16,
        message: String,
    },

    #[error("{system} request to {endpoint} timed out")]
    Timeout { system: String, endpoint: String },

    #[error("{system} transport error: {source}")]
    Transport {
        system: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("{system} returned an unexpected response: {message}")]
    InvalidResponse { system: String, message: String },

    #[error("{system} failed: {message}")]
    Other { system: String, message: String },
}

/// Errors that abort the whole benchmark run.
#[derive(Debug, Error)]
pub enum BenchError {
    #[error("baseline system {system} is not reachable: {source}")]
    BaselineUnavailable {
        system: String,
        #[source]
        source: AdapterError,
    },

    #[error("baseline system {0} is not among the configured systems")]
    BaselineMissing(String),

    #[error("only {0} is available; start other systems for comparison")]
    NothingToCompare(String),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to write results: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize results: {0}")]
    Serialization(#[from] serde_json::Error),
}
