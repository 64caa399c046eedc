//! Benchmark orchestration.
//!
//! For every dataset size, every available adapter goes through
//! LOAD → QUERY → RECORD, strictly one after the other. A failing adapter loses
//! its cell for that size and the matrix carries on.

use std::fmt;

use tracing::{error, info, warn};

use crate::adapter::{QueryPlan, SystemAdapter};
use crate::config::BenchConfig;
use crate::dataset::Dataset;
use crate::error::{AdapterError, BenchError};
use crate::report::format_count;
use crate::results::{RunResults, SystemResult};
use crate::stats::LatencyStats;

/// Probe every adapter and keep the available ones, in order.
///
/// The baseline must be present and reachable. Unless `allow_solo` is set, at
/// least one other system must be available too.
pub async fn select_available(
    config: &BenchConfig,
    adapters: Vec<Box<dyn SystemAdapter>>,
) -> Result<Vec<Box<dyn SystemAdapter>>, BenchError> {
    let baseline = config.baseline.name();
    if !adapters.iter().any(|a| a.name() == baseline) {
        return Err(BenchError::BaselineMissing(baseline.to_string()));
    }

    let mut available = Vec::with_capacity(adapters.len());
    for adapter in adapters {
        match adapter.probe().await {
            Ok(()) => {
                println!("✅ {} is available", adapter.name());
                info!(system = adapter.name(), "probe succeeded");
                available.push(adapter);
            }
            Err(e) if adapter.name() == baseline => {
                println!("❌ {baseline} is not running.");
                if let Some(hint) = adapter.start_hint() {
                    println!("   Start it with: {hint}");
                }
                error!(system = baseline, error = %e, "baseline probe failed");
                return Err(BenchError::BaselineUnavailable {
                    system: baseline.to_string(),
                    source: e,
                });
            }
            Err(e) => {
                println!("⚠️  {} not available: {}", adapter.name(), e);
                if let Some(hint) = adapter.start_hint() {
                    println!("   Start it with: {hint}");
                }
                warn!(system = adapter.name(), error = %e, "skipping unavailable system");
            }
        }
    }

    if available.len() == 1 && !config.allow_solo {
        return Err(BenchError::NothingToCompare(baseline.to_string()));
    }

    Ok(available)
}

/// Stage of a (size, system) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Load,
    Query,
    Record,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Load => "load",
            Self::Query => "query",
            Self::Record => "record",
        };
        write!(f, "{s}")
    }
}

/// Why a cell has no result.
#[derive(Debug)]
pub struct CellFailure {
    pub phase: Phase,
    pub error: AdapterError,
}

/// Runs the size × system matrix.
pub struct Orchestrator<'a> {
    config: &'a BenchConfig,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a BenchConfig) -> Self {
        Self { config }
    }

    /// Run every configured size against every adapter, sequentially.
    pub async fn run(&self, adapters: &mut [Box<dyn SystemAdapter>]) -> RunResults {
        let embedder = self.config.embedder();
        let plan = self.config.query_plan();
        let mut results = RunResults::new();

        for &size in &self.config.dataset_sizes {
            println!("\n{}", "=".repeat(100));
            println!("🔬 Testing with {} vectors", format_count(size));
            println!("{}", "=".repeat(100));

            let dataset = Dataset::generate(size, self.config.template, &embedder);
            results.begin_size(size);

            for adapter in adapters.iter_mut() {
                println!("\n🧪 Testing {}...", adapter.name());
                match run_cell(adapter.as_mut(), &dataset, &plan).await {
                    Ok(result) => {
                        info!(
                            system = adapter.name(),
                            size,
                            load_time = result.load_time,
                            mean_ms = result.query_stats.mean,
                            "recorded result"
                        );
                        results.record(size, adapter.name(), result);
                    }
                    Err(failure) => {
                        println!("❌ {} failed: {}", adapter.name(), failure.error);
                        error!(
                            system = adapter.name(),
                            size,
                            phase = %failure.phase,
                            error = %failure.error,
                            "adapter failed"
                        );
                    }
                }
            }
        }

        results
    }
}

/// LOAD → QUERY → RECORD for one adapter and one dataset.
pub async fn run_cell(
    adapter: &mut dyn SystemAdapter,
    dataset: &Dataset,
    plan: &QueryPlan,
) -> Result<SystemResult, CellFailure> {
    println!("\n📝 Loading {} vectors into {}...", dataset.len(), adapter.name());
    let load_time = adapter
        .setup(dataset)
        .await
        .map_err(|error| CellFailure {
            phase: Phase::Load,
            error,
        })?
        .as_secs_f64();

    let ops = if load_time > 0.0 {
        dataset.len() as f64 / load_time
    } else {
        0.0
    };
    println!("✅ Loaded in {:.2}s ({:.0} ops/s)", load_time, ops);

    let samples = adapter
        .benchmark_queries(plan)
        .await
        .map_err(|error| CellFailure {
            phase: Phase::Query,
            error,
        })?;

    let record_failure = |message: String| CellFailure {
        phase: Phase::Record,
        error: AdapterError::Other {
            system: adapter.name().to_string(),
            message,
        },
    };

    if samples.len() != plan.iterations {
        return Err(record_failure(format!(
            "returned {} latency samples, expected {}",
            samples.len(),
            plan.iterations
        )));
    }

    let query_stats =
        LatencyStats::from_samples(&samples).map_err(|e| record_failure(e.to_string()))?;

    Ok(SystemResult {
        load_time,
        query_stats,
    })
}
