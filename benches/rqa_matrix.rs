//! Benchmarks for the recurrence engine.
//!
//! Run:
//! - cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scanpath::core::rqa::{RecurrenceMatrix, RqaParams, RqaSummary};

const SEQUENCE_LENS: [usize; 3] = [64, 256, 1024];

fn make_sequence(len: usize) -> Vec<f64> {
    // deterministic mix of short runs over the ten categories
    (0..len).map(|i| ((i / 3 + i % 7) % 10) as f64).collect()
}

fn bench_matrix(c: &mut Criterion) {
    let mut group = c.benchmark_group("recurrence_matrix");
    for len in SEQUENCE_LENS {
        let values = make_sequence(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &values, |b, values| {
            b.iter(|| RecurrenceMatrix::from_sequence(black_box(values), 0.65));
        });
    }
    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let params = RqaParams::default();
    let mut group = c.benchmark_group("rqa_summary");
    for len in SEQUENCE_LENS {
        let matrix = RecurrenceMatrix::from_sequence(&make_sequence(len), params.radius);
        group.bench_with_input(BenchmarkId::from_parameter(len), &matrix, |b, matrix| {
            b.iter(|| RqaSummary::compute(black_box(matrix), &params));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_matrix, bench_summary);
criterion_main!(benches);
