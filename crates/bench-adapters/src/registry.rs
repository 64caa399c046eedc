//! Maps configured systems to adapter instances.

use bench_core::{AdapterError, BenchConfig, SystemAdapter, SystemKind};

use crate::{ChromaAdapter, ElasticsearchAdapter, FlatAdapter, QdrantAdapter, TmcAdapter};

/// Build the adapter for one system.
pub fn build_adapter(kind: SystemKind, config: &BenchConfig) -> Result<Box<dyn SystemAdapter>, AdapterError> {
    Ok(match kind {
        SystemKind::Tmc => Box::new(TmcAdapter::new(config)?),
        SystemKind::Flat => Box::new(FlatAdapter::new(config)),
        SystemKind::Qdrant => Box::new(QdrantAdapter::new(config)?),
        SystemKind::Elasticsearch => Box::new(ElasticsearchAdapter::new(config)?),
        SystemKind::Chroma => Box::new(ChromaAdapter::new(config)?),
    })
}

/// Build adapters for `config.systems`, in order, skipping duplicates.
pub fn build_adapters(config: &BenchConfig) -> Result<Vec<Box<dyn SystemAdapter>>, AdapterError> {
    let mut seen = Vec::with_capacity(config.systems.len());
    let mut adapters = Vec::with_capacity(config.systems.len());
    for &kind in &config.systems {
        if seen.contains(&kind) {
            continue;
        }
        seen.push(kind);
        adapters.push(build_adapter(kind, config)?);
    }
    Ok(adapters)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_in_order_without_duplicates() {
        let config = BenchConfig::default().with_systems(vec![
            SystemKind::Tmc,
            SystemKind::Chroma,
            SystemKind::Tmc,
            SystemKind::Flat,
        ]);
        let adapters = build_adapters(&config).unwrap();
        let names: Vec<&str> = adapters.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["TMC", "ChromaDB", "Flat"]);
    }

    #[test]
    fn test_every_kind_builds() {
        let config = BenchConfig::default();
        for kind in SystemKind::ALL {
            let adapter = build_adapter(kind, &config).unwrap();
            assert_eq!(adapter.name(), kind.name());
        }
    }
}
