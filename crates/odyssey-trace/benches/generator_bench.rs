//! Benchmarks for trace generation
//!
//! Measures:
//! - Sorting generators across input sizes
//! - Graph traversals on generated graphs
//! - A full pass over the standard catalog

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use odyssey_trace::{random_graph, random_sequence, Category, Registry, Seed};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Benchmark each sort at growing input sizes
fn bench_sorting(c: &mut Criterion) {
    let registry = Registry::standard();
    let mut group = c.benchmark_group("sorting");

    for &size in &[8usize, 16, 32, 64] {
        let mut rng = StdRng::seed_from_u64(size as u64);
        let seed = Seed::from(random_sequence(&mut rng, size, 1000));
        group.throughput(Throughput::Elements(size as u64));

        for entry in registry.in_category(Category::Sorting) {
            group.bench_with_input(BenchmarkId::new(entry.id, size), &seed, |b, seed| {
                b.iter(|| entry.generate(black_box(seed)))
            });
        }
    }
    group.finish();
}

/// Benchmark graph traversals on random graphs
fn bench_graphs(c: &mut Criterion) {
    let registry = Registry::standard();
    let mut group = c.benchmark_group("graphs");
    let mut rng = StdRng::seed_from_u64(7);
    let seed = Seed::from(random_graph(&mut rng, 10));

    for entry in registry.in_category(Category::Graphs) {
        group.bench_with_input(BenchmarkId::from_parameter(entry.id), &seed, |b, seed| {
            b.iter(|| entry.generate(black_box(seed)))
        });
    }
    group.finish();
}

/// Benchmark generating every registered algorithm once
fn bench_catalog(c: &mut Criterion) {
    let registry = Registry::standard();
    let seed = Seed::from(vec![34, 7, 23, 32, 5, 62, 14, 9, 41, 18]);

    c.bench_function("catalog_pass", |b| {
        b.iter(|| {
            for id in registry.ids() {
                let _ = black_box(registry.generate(id, &seed));
            }
        })
    });
}

criterion_group!(benches, bench_sorting, bench_graphs, bench_catalog);
criterion_main!(benches);
