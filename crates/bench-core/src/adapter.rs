//! The load/query contract every benchmarked system implements.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::dataset::Dataset;
use crate::embedding::HashEmbedder;
use crate::error::AdapterError;
use crate::Embedding;

/// What to run during the query phase.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    queries: Vec<String>,
    pub iterations: usize,
    pub k: usize,
}

impl QueryPlan {
    pub fn new(queries: Vec<String>, iterations: usize, k: usize) -> Self {
        Self {
            queries,
            iterations,
            k,
        }
    }

    /// The query text for iteration `i`, cycling through the pool.
    pub fn query(&self, i: usize) -> &str {
        &self.queries[i % self.queries.len()]
    }

    /// Query texts in iteration order, exactly `iterations` of them.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.iterations).map(move |i| self.query(i))
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    /// One embedding per pooled query, computed up front so the measured
    /// window only covers the round trip.
    pub fn embed_pool(&self, embedder: &HashEmbedder) -> Vec<Embedding> {
        self.queries.iter().map(|q| embedder.embed(q)).collect()
    }
}

/// A system under test.
///
/// The orchestrator calls `probe` once before the run, then `setup` followed by
/// `benchmark_queries` for every dataset size. Calls never overlap.
#[async_trait]
pub trait SystemAdapter: Send + Sync {
    /// Name used in reports and as the results key.
    fn name(&self) -> &str;

    /// How to start the system locally, shown when the probe fails.
    fn start_hint(&self) -> Option<String> {
        None
    }

    /// Cheap connectivity / capability check. `Ok` means the system can be benchmarked.
    async fn probe(&self) -> Result<(), AdapterError>;

    /// Reset the remote collection, upload `dataset`, and return the upload time.
    async fn setup(&mut self, dataset: &Dataset) -> Result<Duration, AdapterError>;

    /// Run `plan.iterations` queries and return one latency sample (ms) per query.
    async fn benchmark_queries(&mut self, plan: &QueryPlan) -> Result<Vec<f64>, AdapterError>;
}

/// Milliseconds elapsed since `start`.
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(iterations: usize) -> QueryPlan {
        QueryPlan::new(vec!["a".into(), "b".into(), "c".into()], iterations, 5)
    }

    #[test]
    fn test_query_cycles_through_pool() {
        let plan = plan(7);
        let queries: Vec<&str> = plan.iter().collect();
        assert_eq!(queries, vec!["a", "b", "c", "a", "b", "c", "a"]);
    }

    #[test]
    fn test_iter_yields_exactly_iterations() {
        assert_eq!(plan(0).iter().count(), 0);
        assert_eq!(plan(100).iter().count(), 100);
    }

    #[test]
    fn test_embed_pool() {
        let embedder = HashEmbedder::new(16);
        let pool = plan(1).embed_pool(&embedder);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool[1], embedder.embed("b"));
    }
}
