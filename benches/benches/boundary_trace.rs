// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use baize_contour::trace_boundary;

fn bench_trace_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("contour/trace");

    // The trace scans for a seed pixel and then walks the perimeter, so a
    // square is dominated by the seed scan while a disc adds turn handling
    // at every step of its curved edge.
    for side in [16u32, 64, 256] {
        group.throughput(Throughput::Elements(u64::from(side) * u64::from(side)));

        group.bench_with_input(BenchmarkId::new("square", side), &side, |b, &side| {
            b.iter(|| black_box(trace_boundary(side, side, |_, _| true)));
        });

        group.bench_with_input(BenchmarkId::new("disc", side), &side, |b, &side| {
            let r = f64::from(side) / 2.0;
            b.iter(|| {
                black_box(trace_boundary(side, side, |x, y| {
                    let dx = f64::from(x) - r + 0.5;
                    let dy = f64::from(y) - r + 0.5;
                    dx * dx + dy * dy <= r * r
                }))
            });
        });

        // Worst case for the seed scan: the only opaque pixels sit in the
        // bottom-right corner.
        group.bench_with_input(BenchmarkId::new("corner", side), &side, |b, &side| {
            let edge = side as i32 - 2;
            b.iter(|| black_box(trace_boundary(side, side, |x, y| x >= edge && y >= edge)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_trace_shapes);
criterion_main!(benches);
