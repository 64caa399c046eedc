//! TMC vector-memory service.
//!
//! TMC embeds text server-side, so only text and importance go over the wire.
//! Memories are inserted one request at a time.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use bench_core::adapter::elapsed_ms;
use bench_core::{AdapterError, BenchConfig, Dataset, QueryPlan, SystemAdapter, SystemKind};

use crate::http::HttpSession;

#[derive(Debug, Serialize)]
struct CrystallizeRequest<'a> {
    text: &'a str,
    importance: f32,
}

#[derive(Debug, Serialize)]
struct RetrieveRequest<'a> {
    query: &'a str,
    k: usize,
}

/// Adapter for the TMC HTTP API.
pub struct TmcAdapter {
    http: HttpSession,
    batch_size: usize,
    probe_timeout: Duration,
}

impl TmcAdapter {
    pub fn new(config: &BenchConfig) -> Result<Self, AdapterError> {
        let http = HttpSession::new(
            SystemKind::Tmc.name(),
            &config.endpoints.tmc,
            config.request_timeout,
        )?;
        Ok(Self {
            http,
            batch_size: config.batch_sizes.tmc,
            probe_timeout: config.probe_timeout,
        })
    }
}

#[async_trait]
impl SystemAdapter for TmcAdapter {
    fn name(&self) -> &str {
        self.http.system()
    }

    fn start_hint(&self) -> Option<String> {
        Some("cd tmc-rust/tmc-api && TMC_LICENSE_KEY='test' cargo run --release".to_string())
    }

    async fn probe(&self) -> Result<(), AdapterError> {
        self.http.probe("/health", self.probe_timeout).await
    }

    async fn setup(&mut self, dataset: &Dataset) -> Result<Duration, AdapterError> {
        let cleared = self
            .http
            .send(self.http.request(Method::POST, "/clear"), "/clear")
            .await;
        self.http.ignore_failure(cleared, "clear");

        let start = Instant::now();
        for (batch_no, batch) in dataset.entries().chunks(self.batch_size).enumerate() {
            for entry in batch {
                let request = CrystallizeRequest {
                    text: &entry.text,
                    importance: entry.importance,
                };
                self.http.post("/crystallize", &request).await?;
            }
            debug!(
                system = self.name(),
                loaded = (batch_no * self.batch_size + batch.len()),
                total = dataset.len(),
                "batch loaded"
            );
        }

        Ok(start.elapsed())
    }

    async fn benchmark_queries(&mut self, plan: &QueryPlan) -> Result<Vec<f64>, AdapterError> {
        let mut latencies = Vec::with_capacity(plan.iterations);
        for query in plan.iter() {
            let request = RetrieveRequest { query, k: plan.k };

            let t0 = Instant::now();
            self.http.post("/retrieve", &request).await?;
            latencies.push(elapsed_ms(t0));
        }
        Ok(latencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_hint_names_server_command() {
        let adapter = TmcAdapter::new(&BenchConfig::default()).unwrap();
        let hint = adapter.start_hint().unwrap();
        assert!(hint.contains("tmc-api"));
        assert!(hint.contains("cargo run --release"));
    }
}
