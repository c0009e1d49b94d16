//! Build and query throughput benchmarks.
//!
//! Measures the two phases of the join separately: indexing a base corpus
//! (vocabulary + signatures + banded index) and matching queries against a
//! built index.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use minjoin::{JoinConfig, SimilarityJoin};

/// Synthetic corpus: each record draws `tokens_per_record` words from a
/// shared pool, so records overlap realistically.
fn synthetic_corpus(
    records: usize,
    pool_size: usize,
    tokens_per_record: usize,
    seed: u64,
) -> Vec<Vec<String>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..records)
        .map(|_| {
            (0..tokens_per_record)
                .map(|_| format!("tok{}", rng.random_range(0..pool_size)))
                .collect()
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for &records in &[100usize, 500, 2000] {
        let base = synthetic_corpus(records, 2000, 12, 1);
        let config = JoinConfig {
            rng_seed: Some(42),
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(records), &base, |b, base| {
            b.iter(|| SimilarityJoin::build(black_box(&config), black_box(base)).unwrap());
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let base = synthetic_corpus(2000, 2000, 12, 1);
    let queries = synthetic_corpus(256, 2000, 12, 2);
    let config = JoinConfig {
        rng_seed: Some(42),
        ..Default::default()
    };
    let mut join = SimilarityJoin::build(&config, &base).unwrap();

    c.bench_function("query_256", |b| {
        b.iter(|| {
            for tokens in &queries {
                black_box(join.match_tokens(black_box(tokens)));
            }
        });
    });
}

criterion_group!(benches, bench_build, bench_query);
criterion_main!(benches);
