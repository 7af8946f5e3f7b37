//! Criterion benchmarks for the deterministic analysis path.
//!
//! Benchmarks:
//! 1. Full `analyze` (normalize + rank + boundary + band + diagnostics)
//! 2. Tie-band expansion on a list where every adjacent gap is tiny

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use ranksmarter_core::{analyze, expand_tie_band, rank, RawRecord, ScoredItem};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_records(n: usize) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            let score = 100.0 + (i as f64 * 0.37).sin() * 25.0;
            RawRecord::new(format!("item-{i}"), score)
        })
        .collect()
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    for n in [100usize, 1_000, 10_000] {
        let records = make_records(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &records, |b, records| {
            b.iter(|| analyze(black_box(records), black_box(10.0), black_box(0.5)))
        });
    }
    group.finish();
}

fn bench_tie_band(c: &mut Criterion) {
    let items: Vec<ScoredItem> = (0..10_000)
        .map(|i| ScoredItem::new(format!("i{i}"), i as f64 * 0.01))
        .collect();
    let list = rank(items);
    c.bench_function("tie_band_full_expansion", |b| {
        b.iter(|| expand_tie_band(black_box(&list), black_box(0.01), black_box(5_000)))
    });
}

criterion_group!(benches, bench_analyze, bench_tie_band);
criterion_main!(benches);
