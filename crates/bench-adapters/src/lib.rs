//! Benchmark Adapters - the systems compared against TMC.
//!
//! This crate provides:
//! - TMC adapter for the vector-memory HTTP service (the baseline)
//! - Qdrant, Elasticsearch and ChromaDB adapters over their REST APIs
//! - An in-process exact flat index adapter
//! - A registry turning configured systems into adapters

pub mod chroma;
pub mod elasticsearch;
pub mod flat;
pub mod http;
pub mod qdrant;
pub mod registry;
pub mod tmc;

pub use chroma::ChromaAdapter;
pub use elasticsearch::ElasticsearchAdapter;
pub use flat::FlatAdapter;
pub use qdrant::QdrantAdapter;
pub use registry::{build_adapter, build_adapters};
pub use tmc::TmcAdapter;
