//! Shared HTTP plumbing for the remote adapters.
//!
//! Every call reads the full response body before returning, so a measured
//! round trip includes the transfer of the results. Any non-2xx status is an
//! error; nothing is retried.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use bench_core::AdapterError;

/// Longest response excerpt carried in a rejection error.
const MAX_ERROR_BODY: usize = 200;

/// One system's HTTP client bound to its base URL.
#[derive(Debug, Clone)]
pub struct HttpSession {
    system: &'static str,
    base_url: String,
    client: Client,
}

impl HttpSession {
    /// Build a client whose requests time out after `timeout`.
    pub fn new(system: &'static str, base_url: &str, timeout: Duration) -> Result<Self, AdapterError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AdapterError::Transport {
                system: system.to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            system,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn system(&self) -> &'static str {
        self.system
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Start a request to `path` for callers that need custom headers or bodies.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Send `builder`, require a 2xx status, and return the whole body.
    pub async fn send(&self, builder: RequestBuilder, endpoint: &str) -> Result<Vec<u8>, AdapterError> {
        let response = builder
            .send()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message: String = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(AdapterError::Rejected {
                system: self.system.to_string(),
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                message,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(endpoint, e))?;
        Ok(body.to_vec())
    }

    pub async fn get(&self, path: &str) -> Result<Vec<u8>, AdapterError> {
        self.send(self.request(Method::GET, path), path).await
    }

    /// GET with its own timeout, used for availability probes.
    pub async fn probe(&self, path: &str, timeout: Duration) -> Result<(), AdapterError> {
        self.send(self.request(Method::GET, path).timeout(timeout), path)
            .await
            .map(|_| ())
            .map_err(|e| AdapterError::Unavailable {
                system: self.system.to_string(),
                reason: e.to_string(),
            })
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<u8>, AdapterError> {
        self.send(self.request(Method::POST, path).json(body), path).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Vec<u8>, AdapterError> {
        self.send(self.request(Method::PUT, path).json(body), path).await
    }

    pub async fn delete(&self, path: &str) -> Result<Vec<u8>, AdapterError> {
        self.send(self.request(Method::DELETE, path), path).await
    }

    /// Best-effort call whose failure is logged and otherwise ignored.
    pub fn ignore_failure(&self, result: Result<Vec<u8>, AdapterError>, what: &str) {
        if let Err(e) = result {
            debug!(system = self.system, error = %e, "ignoring failed {}", what);
        }
    }

    /// Decode a JSON response body.
    pub fn parse<T: DeserializeOwned>(&self, endpoint: &str, body: &[u8]) -> Result<T, AdapterError> {
        serde_json::from_slice(body).map_err(|e| AdapterError::InvalidResponse {
            system: self.system.to_string(),
            message: format!("{endpoint}: {e}"),
        })
    }

    fn transport_error(&self, endpoint: &str, e: reqwest::Error) -> AdapterError {
        if e.is_timeout() {
            AdapterError::Timeout {
                system: self.system.to_string(),
                endpoint: endpoint.to_string(),
            }
        } else {
            AdapterError::Transport {
                system: self.system.to_string(),
                source: Box::new(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let session = HttpSession::new("TMC", "http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(session.url("/health"), "http://localhost:8000/health");
        assert_eq!(session.system(), "TMC");
    }

    #[test]
    fn test_parse_invalid_json() {
        let session = HttpSession::new("Qdrant", "http://localhost:6333", Duration::from_secs(1)).unwrap();
        let err = session.parse::<serde_json::Value>("/collections", b"not json").unwrap_err();
        assert!(matches!(err, AdapterError::InvalidResponse { .. }));
    }
}
