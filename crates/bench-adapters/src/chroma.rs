//! ChromaDB over its v2 REST API.
//!
//! Embeddings are sent explicitly so Chroma searches the same vectors as every
//! other system instead of running its own embedding function.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use bench_core::adapter::elapsed_ms;
use bench_core::{
    AdapterError, BenchConfig, Dataset, HashEmbedder, QueryPlan, SystemAdapter, SystemKind,
};

use crate::http::HttpSession;

/// Chroma rejects batches above this size.
pub const CHROMA_HARD_BATCH_LIMIT: usize = 5461;

const COLLECTIONS: &str = "/api/v2/tenants/default_tenant/databases/default_database/collections";

#[derive(Debug, Serialize)]
struct Metadata {
    importance: f32,
}

#[derive(Debug, Serialize)]
struct AddRequest<'a> {
    ids: Vec<String>,
    embeddings: Vec<&'a [f32]>,
    documents: Vec<&'a str>,
    metadatas: Vec<Metadata>,
}

#[derive(Debug, Serialize)]
struct QueryRequest<'a> {
    query_embeddings: [&'a [f32]; 1],
    n_results: usize,
}

#[derive(Debug, Deserialize)]
struct Collection {
    id: String,
}

pub struct ChromaAdapter {
    http: HttpSession,
    collection: String,
    batch_size: usize,
    probe_timeout: Duration,
    embedder: HashEmbedder,
    /// Server-assigned id of the collection created by `setup`.
    collection_id: Option<String>,
}

impl ChromaAdapter {
    pub fn new(config: &BenchConfig) -> Result<Self, AdapterError> {
        Ok(Self {
            http: HttpSession::new(
                SystemKind::Chroma.name(),
                &config.endpoints.chroma,
                config.request_timeout,
            )?,
            collection: config.collection.clone(),
            batch_size: config.batch_sizes.chroma.min(CHROMA_HARD_BATCH_LIMIT),
            probe_timeout: config.probe_timeout,
            embedder: config.embedder(),
            collection_id: None,
        })
    }

    fn collection_id(&self) -> Result<&str, AdapterError> {
        self.collection_id
            .as_deref()
            .ok_or_else(|| AdapterError::Other {
                system: self.name().to_string(),
                message: "queries issued before setup created the collection".to_string(),
            })
    }
}

#[async_trait]
impl SystemAdapter for ChromaAdapter {
    fn name(&self) -> &str {
        self.http.system()
    }

    fn start_hint(&self) -> Option<String> {
        Some("docker run -p 8001:8000 chromadb/chroma".to_string())
    }

    async fn probe(&self) -> Result<(), AdapterError> {
        self.http.probe("/api/v2/heartbeat", self.probe_timeout).await
    }

    async fn setup(&mut self, dataset: &Dataset) -> Result<Duration, AdapterError> {
        let deleted = self
            .http
            .delete(&format!("{COLLECTIONS}/{}", self.collection))
            .await;
        self.http.ignore_failure(deleted, "collection delete");

        let body = self
            .http
            .post(COLLECTIONS, &json!({ "name": self.collection, "get_or_create": true }))
            .await?;
        let collection: Collection = self.http.parse(COLLECTIONS, &body)?;
        let add = format!("{COLLECTIONS}/{}/add", collection.id);
        self.collection_id = Some(collection.id);

        let start = Instant::now();
        for (batch_no, batch) in dataset.entries().chunks(self.batch_size).enumerate() {
            let offset = batch_no * self.batch_size;
            let request = AddRequest {
                ids: (offset..offset + batch.len()).map(|i| format!("mem_{i}")).collect(),
                embeddings: batch.iter().map(|e| e.embedding.as_slice()).collect(),
                documents: batch.iter().map(|e| e.text.as_str()).collect(),
                metadatas: batch
                    .iter()
                    .map(|e| Metadata {
                        importance: e.importance,
                    })
                    .collect(),
            };

            self.http.post(&add, &request).await?;
            debug!(system = self.name(), loaded = offset + batch.len(), "batch added");
        }

        Ok(start.elapsed())
    }

    async fn benchmark_queries(&mut self, plan: &QueryPlan) -> Result<Vec<f64>, AdapterError> {
        let endpoint = format!("{COLLECTIONS}/{}/query", self.collection_id()?);
        let pool = plan.embed_pool(&self.embedder);
        let mut latencies = Vec::with_capacity(plan.iterations);

        for i in 0..plan.iterations {
            let request = QueryRequest {
                query_embeddings: [pool[i % pool.len()].as_slice()],
                n_results: plan.k,
            };

            let t0 = Instant::now();
            self.http.post(&endpoint, &request).await?;
            latencies.push(elapsed_ms(t0));
        }
        Ok(latencies)
    }
}
