//! In-process exact L2 search, the FAISS `IndexFlatL2` counterpart.
//!
//! No network is involved, so this is the floor every remote system is
//! measured against.

use std::hint::black_box;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use bench_core::adapter::elapsed_ms;
use bench_core::{
    AdapterError, BenchConfig, Dataset, Embedding, FlatIndex, HashEmbedder, NodeId, QueryPlan,
    SystemAdapter, SystemKind,
};

pub struct FlatAdapter {
    index: FlatIndex,
    embedder: HashEmbedder,
}

impl FlatAdapter {
    pub fn new(config: &BenchConfig) -> Self {
        Self {
            index: FlatIndex::l2(config.embedding_dim),
            embedder: config.embedder(),
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn index_error(&self, e: impl std::fmt::Display) -> AdapterError {
        AdapterError::Other {
            system: self.name().to_string(),
            message: e.to_string(),
        }
    }
}

#[async_trait]
impl SystemAdapter for FlatAdapter {
    fn name(&self) -> &str {
        SystemKind::Flat.name()
    }

    async fn probe(&self) -> Result<(), AdapterError> {
        Ok(())
    }

    async fn setup(&mut self, dataset: &Dataset) -> Result<Duration, AdapterError> {
        self.index.clear();

        let start = Instant::now();
        let items: Vec<(NodeId, Embedding)> = dataset
            .iter()
            .enumerate()
            .map(|(i, entry)| (NodeId::new(i as u64), entry.embedding.clone()))
            .collect();
        self.index
            .insert_batch(items)
            .map_err(|e| self.index_error(e))?;

        Ok(start.elapsed())
    }

    async fn benchmark_queries(&mut self, plan: &QueryPlan) -> Result<Vec<f64>, AdapterError> {
        let pool = plan.embed_pool(&self.embedder);
        let mut latencies = Vec::with_capacity(plan.iterations);

        for i in 0..plan.iterations {
            let query = &pool[i % pool.len()];

            let t0 = Instant::now();
            let results = self
                .index
                .search(query, plan.k)
                .map_err(|e| self.index_error(e))?;
            black_box(results);
            latencies.push(elapsed_ms(t0));
        }
        Ok(latencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_core::DatasetTemplate;

    fn config() -> BenchConfig {
        let mut config = BenchConfig::default().with_iterations(12);
        config.embedding_dim = 32;
        config
    }

    #[tokio::test]
    async fn test_setup_loads_every_entry() {
        let config = config();
        let dataset = Dataset::generate(50, DatasetTemplate::Comprehensive, &config.embedder());

        let mut adapter = FlatAdapter::new(&config);
        adapter.probe().await.unwrap();
        adapter.setup(&dataset).await.unwrap();
        assert_eq!(adapter.len(), 50);

        // A second setup starts from an empty index
        adapter.setup(&dataset).await.unwrap();
        assert_eq!(adapter.len(), 50);
    }

    #[tokio::test]
    async fn test_benchmark_returns_one_sample_per_iteration() {
        let config = config();
        let dataset = Dataset::generate(20, DatasetTemplate::Stress, &config.embedder());

        let mut adapter = FlatAdapter::new(&config);
        adapter.setup(&dataset).await.unwrap();
        let samples = adapter.benchmark_queries(&config.query_plan()).await.unwrap();

        assert_eq!(samples.len(), 12);
        assert!(samples.iter().all(|&s| s >= 0.0));
    }
}
