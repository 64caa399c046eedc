//! Elasticsearch dense-vector kNN over its REST API.

use std::fmt::Write;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use bench_core::adapter::elapsed_ms;
use bench_core::{
    AdapterError, BenchConfig, Dataset, DatasetEntry, HashEmbedder, QueryPlan, SystemAdapter,
    SystemKind,
};

use crate::http::HttpSession;

/// Fewest candidates considered per shard during kNN search.
const MIN_NUM_CANDIDATES: usize = 100;

#[derive(Debug, Serialize)]
struct Source<'a> {
    text: &'a str,
    embedding: &'a [f32],
    importance: f32,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    errors: bool,
}

pub struct ElasticsearchAdapter {
    http: HttpSession,
    index: String,
    dim: usize,
    batch_size: usize,
    probe_timeout: Duration,
    embedder: HashEmbedder,
}

impl ElasticsearchAdapter {
    pub fn new(config: &BenchConfig) -> Result<Self, AdapterError> {
        Ok(Self {
            http: HttpSession::new(
                SystemKind::Elasticsearch.name(),
                &config.endpoints.elasticsearch,
                config.request_timeout,
            )?,
            index: config.collection.clone(),
            dim: config.embedding_dim,
            batch_size: config.batch_sizes.elasticsearch,
            probe_timeout: config.probe_timeout,
            embedder: config.embedder(),
        })
    }

    fn mapping(&self) -> serde_json::Value {
        json!({
            "mappings": {
                "properties": {
                    "text": { "type": "text" },
                    "embedding": {
                        "type": "dense_vector",
                        "dims": self.dim,
                        "index": true,
                        "similarity": "cosine"
                    },
                    "importance": { "type": "float" }
                }
            }
        })
    }

    /// kNN search body. Elasticsearch rejects `k` above `num_candidates`.
    fn knn_query(vector: &[f32], k: usize) -> serde_json::Value {
        json!({
            "knn": {
                "field": "embedding",
                "query_vector": vector,
                "k": k,
                "num_candidates": k.max(MIN_NUM_CANDIDATES)
            }
        })
    }

    /// NDJSON `_bulk` body: one action line and one source line per entry.
    fn bulk_body(&self, offset: usize, batch: &[DatasetEntry]) -> Result<String, AdapterError> {
        let mut body = String::new();
        for (j, entry) in batch.iter().enumerate() {
            let action = json!({ "index": { "_index": self.index, "_id": (offset + j).to_string() } });
            let source = Source {
                text: &entry.text,
                embedding: entry.embedding.as_slice(),
                importance: entry.importance,
            };
            let source = serde_json::to_string(&source).map_err(|e| AdapterError::Other {
                system: self.name().to_string(),
                message: e.to_string(),
            })?;
            let _ = writeln!(body, "{action}\n{source}");
        }
        Ok(body)
    }
}

#[async_trait]
impl SystemAdapter for ElasticsearchAdapter {
    fn name(&self) -> &str {
        self.http.system()
    }

    fn start_hint(&self) -> Option<String> {
        Some("docker run -p 9200:9200 -e 'discovery.type=single-node' -e 'xpack.security.enabled=false' elasticsearch:8.11.0".to_string())
    }

    async fn probe(&self) -> Result<(), AdapterError> {
        self.http.probe("/", self.probe_timeout).await
    }

    async fn setup(&mut self, dataset: &Dataset) -> Result<Duration, AdapterError> {
        let index = format!("/{}", self.index);

        let deleted = self.http.delete(&index).await;
        self.http.ignore_failure(deleted, "index delete");

        self.http.put(&index, &self.mapping()).await?;

        let start = Instant::now();
        for (batch_no, batch) in dataset.entries().chunks(self.batch_size).enumerate() {
            let offset = batch_no * self.batch_size;
            let request = self
                .http
                .request(Method::POST, "/_bulk")
                .header("Content-Type", "application/x-ndjson")
                .body(self.bulk_body(offset, batch)?);

            let body = self.http.send(request, "/_bulk").await?;
            let response: BulkResponse = self.http.parse("/_bulk", &body)?;
            if response.errors {
                return Err(AdapterError::InvalidResponse {
                    system: self.name().to_string(),
                    message: format!("bulk batch at offset {offset} reported item errors"),
                });
            }
            debug!(system = self.name(), loaded = offset + batch.len(), "bulk batch indexed");
        }

        let refresh = format!("{index}/_refresh");
        self.http
            .send(self.http.request(Method::POST, &refresh), &refresh)
            .await?;

        Ok(start.elapsed())
    }

    async fn benchmark_queries(&mut self, plan: &QueryPlan) -> Result<Vec<f64>, AdapterError> {
        let pool = plan.embed_pool(&self.embedder);
        let endpoint = format!("/{}/_search", self.index);
        let mut latencies = Vec::with_capacity(plan.iterations);

        for i in 0..plan.iterations {
            let request = Self::knn_query(pool[i % pool.len()].as_slice(), plan.k);

            let t0 = Instant::now();
            self.http.post(&endpoint, &request).await?;
            latencies.push(elapsed_ms(t0));
        }
        Ok(latencies)
    }
}
