//! Benchmarks for record composition.
//!
//! Tests:
//! - Composing batches of records against a reference pool
//! - Deriving child seeds for a parent identifier

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use doc_factory::identity::{IdentityGenerator, ObjectId};
use doc_factory::pool::{ReferenceEntry, ReferenceKind, ReferencePool};
use doc_factory::provider::Locale;
use doc_factory::record::{ComposeOptions, DocumentFactory};
use std::hint::black_box;

fn bench_pool() -> ReferencePool {
    let kinds = [
        (ReferenceKind::Doctype, 10),
        (ReferenceKind::Author, 5),
        (ReferenceKind::Label, 40),
        (ReferenceKind::ProjectPhase, 6),
    ];
    let mut n = 0u64;
    let mut entries = Vec::new();
    for (kind, count) in kinds {
        for i in 0..count {
            n += 1;
            let id: ObjectId = format!("{:024x}", n).parse().unwrap();
            entries.push(ReferenceEntry::new(kind.clone(), id, format!("{} {}", kind, i)));
        }
    }
    ReferencePool::new(entries)
}

/// Benchmark composing record batches of varying size
fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    let pool = bench_pool();

    for count in [10, 100, 1_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("records", count),
            &count,
            |b, &count| {
                b.iter(|| {
                    let mut factory = DocumentFactory::seeded(42, Locale::En);
                    let records = factory
                        .compose_many(count, |_| {
                            ComposeOptions::with_pool(&pool).project_short_name("bench")
                        })
                        .unwrap();
                    black_box(records.len())
                })
            },
        );
    }

    group.finish();
}

/// Benchmark deterministic seed derivation
fn bench_seeds(c: &mut Criterion) {
    let identity = IdentityGenerator::new();
    let parent: ObjectId = "5f0a9c1d2e3b4a5f6c7d8e9f".parse().unwrap();

    c.bench_function("deterministic_seed", |b| {
        b.iter(|| black_box(identity.deterministic_seed(black_box(7), &parent)))
    });
}

criterion_group!(benches, bench_compose, bench_seeds);
criterion_main!(benches);
