//! Qdrant over its REST API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use bench_core::adapter::elapsed_ms;
use bench_core::{
    AdapterError, BenchConfig, Dataset, HashEmbedder, QueryPlan, SystemAdapter, SystemKind,
};

use crate::http::HttpSession;

#[derive(Debug, Serialize)]
struct Point<'a> {
    id: u64,
    vector: &'a [f32],
    payload: Payload<'a>,
}

#[derive(Debug, Serialize)]
struct Payload<'a> {
    text: &'a str,
    importance: f32,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query: &'a [f32],
    limit: usize,
}

pub struct QdrantAdapter {
    http: HttpSession,
    collection: String,
    dim: usize,
    batch_size: usize,
    probe_timeout: Duration,
    embedder: HashEmbedder,
}

impl QdrantAdapter {
    pub fn new(config: &BenchConfig) -> Result<Self, AdapterError> {
        Ok(Self {
            http: HttpSession::new(
                SystemKind::Qdrant.name(),
                &config.endpoints.qdrant,
                config.request_timeout,
            )?,
            collection: config.collection.clone(),
            dim: config.embedding_dim,
            batch_size: config.batch_sizes.qdrant,
            probe_timeout: config.probe_timeout,
            embedder: config.embedder(),
        })
    }

    fn collection_path(&self) -> String {
        format!("/collections/{}", self.collection)
    }
}

#[async_trait]
impl SystemAdapter for QdrantAdapter {
    fn name(&self) -> &str {
        self.http.system()
    }

    fn start_hint(&self) -> Option<String> {
        Some("docker run -p 6333:6333 qdrant/qdrant".to_string())
    }

    async fn probe(&self) -> Result<(), AdapterError> {
        self.http.probe("/collections", self.probe_timeout).await
    }

    async fn setup(&mut self, dataset: &Dataset) -> Result<Duration, AdapterError> {
        let collection = self.collection_path();

        let deleted = self.http.delete(&collection).await;
        self.http.ignore_failure(deleted, "collection delete");

        let create = json!({
            "vectors": { "size": self.dim, "distance": "Cosine" }
        });
        self.http.put(&collection, &create).await?;

        let upsert = format!("{collection}/points?wait=true");
        let start = Instant::now();
        for (batch_no, batch) in dataset.entries().chunks(self.batch_size).enumerate() {
            let offset = batch_no * self.batch_size;
            let points: Vec<Point<'_>> = batch
                .iter()
                .enumerate()
                .map(|(j, entry)| Point {
                    id: (offset + j) as u64,
                    vector: entry.embedding.as_slice(),
                    payload: Payload {
                        text: &entry.text,
                        importance: entry.importance,
                    },
                })
                .collect();

            self.http.put(&upsert, &json!({ "points": points })).await?;
            debug!(system = self.name(), loaded = offset + batch.len(), "batch upserted");
        }

        Ok(start.elapsed())
    }

    async fn benchmark_queries(&mut self, plan: &QueryPlan) -> Result<Vec<f64>, AdapterError> {
        let pool = plan.embed_pool(&self.embedder);
        let endpoint = format!("{}/points/query", self.collection_path());
        let mut latencies = Vec::with_capacity(plan.iterations);

        for i in 0..plan.iterations {
            let request = QueryRequest {
                query: pool[i % pool.len()].as_slice(),
                limit: plan.k,
            };

            let t0 = Instant::now();
            self.http.post(&endpoint, &request).await?;
            latencies.push(elapsed_ms(t0));
        }
        Ok(latencies)
    }
}
