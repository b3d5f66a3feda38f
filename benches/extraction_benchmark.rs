#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for binned-series extraction and bin-wise arithmetic.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use trueno_hist::prelude::*;

fn extraction_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_1d");

    for bins in [100, 1_000, 10_000] {
        let mut hist = Hist1D::uniform("h", bins, 0.0, 1.0).unwrap();
        for i in 0..bins * 4 {
            // every third bin stays empty
            let bin = i % bins;
            if bin % 3 != 0 {
                hist.fill((bin as f64 + 0.5) / bins as f64);
            }
        }

        group.bench_with_input(BenchmarkId::from_parameter(bins), &bins, |b, _| {
            b.iter(|| BinnedSeries::extract(black_box(&hist)).unwrap().drop_zero_bins());
        });
    }

    group.finish();
}

fn arithmetic_benchmark(c: &mut Criterion) {
    let make = |scale: f64| {
        let contents: Vec<f64> = (0..5_000).map(|i| f64::from(i % 50) * scale).collect();
        let errors = contents.iter().map(|c| c.sqrt()).collect();
        let edges = (0..=5_000).map(f64::from).collect();
        BinnedSeries::from_parts(contents, errors, edges).unwrap()
    };
    let group: Vec<BinnedSeries> = (1..=5).map(|k| make(f64::from(k))).collect();

    c.bench_function("stack_cumulative_5x5000", |b| {
        b.iter(|| stack_cumulative(black_box(&group)).unwrap());
    });
    c.bench_function("ratio_5000", |b| {
        b.iter(|| black_box(&group[0]).ratio_to(&group[1]).unwrap());
    });
}

criterion_group!(benches, extraction_benchmark, arithmetic_benchmark);
criterion_main!(benches);
