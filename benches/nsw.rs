//! Benchmarks for NSW construction and search.
//!
//! Synthetic clustered data; construction cost grows with the attachment
//! search, so sizes stay small enough to iterate on.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use smallworld::benchmark::create_clustered_dataset;
use smallworld::nsw::{build, knn_search, NswParams};

fn params(k_build: usize, m_build: usize) -> NswParams {
    NswParams {
        k_build,
        m_build,
        seed: Some(42),
        ..NswParams::default()
    }
}

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("nsw_construction");
    group.sample_size(10);

    for n in [250, 500, 1000].iter() {
        group.throughput(Throughput::Elements(*n as u64));
        let dataset = create_clustered_dataset(*n, 0, 64, 16, 0.05, 42);

        group.bench_with_input(BenchmarkId::from_parameter(n), n, |bench, _| {
            bench.iter(|| build(black_box(&dataset.base), params(10, 10)).unwrap());
        });
    }

    group.finish();
}

fn bench_search_restarts(c: &mut Criterion) {
    let mut group = c.benchmark_group("nsw_search_m");

    let dataset = create_clustered_dataset(2000, 100, 64, 16, 0.05, 42);
    let graph = build(&dataset.base, params(10, 10)).unwrap();

    for m in [1, 5, 10, 50].iter() {
        group.throughput(Throughput::Elements(dataset.queries.len() as u64));

        group.bench_with_input(BenchmarkId::new("m", m), m, |bench, &m| {
            let mut rng = StdRng::seed_from_u64(7);
            bench.iter(|| {
                dataset
                    .queries
                    .iter()
                    .map(|q| knn_search(&graph, black_box(q), 10, m, &mut rng).unwrap())
                    .collect::<Vec<_>>()
            });
        });
    }

    group.finish();
}

fn bench_search_k(c: &mut Criterion) {
    let mut group = c.benchmark_group("nsw_search_k");

    let dataset = create_clustered_dataset(2000, 100, 64, 16, 0.05, 42);
    let graph = build(&dataset.base, params(10, 10)).unwrap();

    for k in [1, 10, 50, 100].iter() {
        group.throughput(Throughput::Elements(dataset.queries.len() as u64));

        group.bench_with_input(BenchmarkId::new("k", k), k, |bench, &k| {
            let mut rng = StdRng::seed_from_u64(7);
            bench.iter(|| {
                dataset
                    .queries
                    .iter()
                    .map(|q| knn_search(&graph, black_box(q), k, 10, &mut rng).unwrap())
                    .collect::<Vec<_>>()
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_search_restarts,
    bench_search_k,
);
criterion_main!(benches);
