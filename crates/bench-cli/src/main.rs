//! tmc-bench: TMC vs other vector search systems
//!
//! Loads the same synthetic dataset into every reachable system, times the
//! upload, then times repeated top-k queries and prints a comparison report.
//!
//! ## Environment Variables
//!
//! - `TMC_BASE_URL`, `QDRANT_URL`, `ES_URL`, `CHROMA_URL`: system endpoints
//! - `EMBEDDING_DIM`: embedding dimension (default: 384)
//! - `RUST_LOG`: tracing filter (default: `warn,tmc_bench=info,bench_core=info,bench_adapters=info`)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bench_adapters::build_adapters;
use bench_core::{report, select_available, BenchConfig, BenchError, Orchestrator, Profile, SystemKind};

/// Progress events from the binary and both libraries, warnings from everything else.
const DEFAULT_LOG_FILTER: &str = "warn,tmc_bench=info,bench_core=info,bench_adapters=info";

#[derive(Parser, Debug)]
#[command(name = "tmc-bench")]
#[command(version, about = "Benchmark TMC against FAISS-style flat search, Qdrant, Elasticsearch and ChromaDB")]
struct Cli {
    /// Experiment preset: comprehensive or stress
    #[arg(short, long, default_value = "comprehensive")]
    profile: Profile,

    /// Dataset sizes to sweep (comma separated)
    #[arg(long, value_delimiter = ',')]
    sizes: Option<Vec<usize>>,

    /// Queries issued per system and dataset size
    #[arg(short, long)]
    iterations: Option<usize>,

    /// Results requested per query
    #[arg(short)]
    k: Option<usize>,

    /// Embedding dimension
    #[arg(long)]
    dim: Option<usize>,

    /// Systems to benchmark (comma separated: tmc, flat, qdrant, elasticsearch, chroma)
    #[arg(long, value_delimiter = ',')]
    systems: Option<Vec<SystemKind>>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Where to write the JSON results
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long)]
    tmc_url: Option<String>,

    #[arg(long)]
    qdrant_url: Option<String>,

    #[arg(long)]
    es_url: Option<String>,

    #[arg(long)]
    chroma_url: Option<String>,

    /// Run even if TMC is the only available system
    #[arg(long)]
    allow_solo: bool,
}

impl Cli {
    /// Profile defaults, then environment, then flags.
    fn into_config(self) -> BenchConfig {
        let mut config = BenchConfig::from_env(self.profile);

        if let Some(sizes) = self.sizes {
            config.dataset_sizes = sizes;
        }
        if let Some(iterations) = self.iterations {
            config.query_iterations = iterations;
        }
        if let Some(k) = self.k {
            config.k = k;
        }
        if let Some(dim) = self.dim {
            config.embedding_dim = dim;
        }
        if let Some(systems) = self.systems {
            config.systems = systems;
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if let Some(url) = self.tmc_url {
            config.endpoints.tmc = url;
        }
        if let Some(url) = self.qdrant_url {
            config.endpoints.qdrant = url;
        }
        if let Some(url) = self.es_url {
            config.endpoints.elasticsearch = url;
        }
        if let Some(url) = self.chroma_url {
            config.endpoints.chroma = url;
        }
        config.allow_solo = self.allow_solo;

        config
    }
}

fn banner(config: &BenchConfig) {
    let systems: Vec<&str> = config.systems.iter().map(|s| s.name()).collect();
    println!("{}", "=".repeat(84));
    println!("  {} VECTOR DATABASE BENCHMARK", config.profile.as_str().to_uppercase());
    println!("  {}", systems.join(" vs "));
    println!("{}", "=".repeat(84));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Cli::parse().into_config();
    config.validate().context("invalid benchmark configuration")?;
    tracing::info!(profile = config.profile.as_str(), sizes = ?config.dataset_sizes, "starting benchmark");

    banner(&config);

    let adapters = build_adapters(&config).context("failed to create system clients")?;
    let mut adapters = match select_available(&config, adapters).await {
        Ok(adapters) => adapters,
        Err(BenchError::NothingToCompare(baseline)) => {
            println!("\n⚠️  Only {baseline} is available. Install/start other systems for comparison.");
            return Ok(());
        }
        Err(e) => return Err(e).context("benchmark cannot start"),
    };

    let results = Orchestrator::new(&config).run(&mut adapters).await;

    print!("{}", report::render(&results, &config));

    results
        .save(&config.output_path)
        .with_context(|| format!("failed to write {}", config.output_path.display()))?;
    println!("\n💾 Results saved to: {}", config.output_path.display());

    println!("\n✅ BENCHMARK COMPLETE!");
    Ok(())
}
