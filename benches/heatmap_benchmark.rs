#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for 2-D grid extraction and heatmap rendering.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use trueno_hist::prelude::*;

fn heatmap_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("heatmap");

    for size in [10, 50, 100] {
        let buffer: Vec<f64> = (0..(size + 2) * (size + 2))
            .map(|i| {
                let x = i as f64 / size as f64;
                (x * 0.7).sin() * (x * 0.3).cos() * 100.0
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let grid = Grid2D::from_flat(black_box(&buffer), size, size, true).unwrap();
                let mut options = PlotOptions::default();
                options.margins.right = 0.15;
                let mut figure = Figure::new(options).unwrap();
                figure.draw(HeatmapLayer::new(grid).unwrap());
                figure.finalize().unwrap().to_framebuffer().unwrap()
            });
        });
    }

    group.finish();
}

fn value_extent_benchmark(c: &mut Criterion) {
    let values: Vec<f64> = (0..1_000_000).map(|i| f64::from(i % 977) - 400.0).collect();

    c.bench_function("value_extent_1m", |b| {
        b.iter(|| trueno_hist::plots::value_extent(black_box(&values)).unwrap());
    });
}

criterion_group!(benches, heatmap_benchmark, value_extent_benchmark);
criterion_main!(benches);
