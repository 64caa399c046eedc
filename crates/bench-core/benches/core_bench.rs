//! Benchmarks for the client-side work that surrounds every measurement.
//!
//! Embedding, dataset generation and the flat index must stay cheap next to
//! the network round trips they accompany.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use bench_core::{
    Dataset, DatasetTemplate, Embedding, FlatIndex, HashEmbedder, LatencyStats, NodeId,
};

/// Benchmark embedding of the query pool texts.
fn bench_embed(c: &mut Criterion) {
    let embedder = HashEmbedder::new(384);
    let text = "How do AI systems retrieve information?";

    c.bench_function("embed_query", |b| b.iter(|| black_box(embedder.embed(black_box(text)))));
}

/// Benchmark dataset generation at the smaller sweep sizes.
fn bench_dataset(c: &mut Criterion) {
    let embedder = HashEmbedder::new(384);
    let mut group = c.benchmark_group("dataset");

    for n in [1_000, 10_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(Dataset::generate(n, DatasetTemplate::Comprehensive, &embedder)))
        });
    }

    group.finish();
}

/// Benchmark exact search over a generated dataset.
fn bench_flat_search(c: &mut Criterion) {
    let embedder = HashEmbedder::new(384);
    let dataset = Dataset::generate(10_000, DatasetTemplate::Comprehensive, &embedder);

    let mut index = FlatIndex::l2(384);
    let items: Vec<(NodeId, Embedding)> = dataset
        .iter()
        .enumerate()
        .map(|(i, e)| (NodeId::new(i as u64), e.embedding.clone()))
        .collect();
    index.insert_batch(items).unwrap();

    let query = embedder.embed("Explain structured memory");
    c.bench_function("flat_search_10k_k5", |b| {
        b.iter(|| black_box(index.search(black_box(&query), 5).unwrap()))
    });
}

/// Benchmark aggregation of a stress-profile sized sample set.
fn bench_stats(c: &mut Criterion) {
    let samples: Vec<f64> = (0..200).map(|i| ((i * 37) % 200) as f64 * 0.1).collect();

    c.bench_function("latency_stats_200", |b| {
        b.iter(|| black_box(LatencyStats::from_samples(black_box(&samples)).unwrap()))
    });
}

criterion_group!(benches, bench_embed, bench_dataset, bench_flat_search, bench_stats);
criterion_main!(benches);
