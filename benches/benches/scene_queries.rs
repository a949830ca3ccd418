// Copyright 2026 the Baize Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use baize_imaging::{AlphaImage, RasterImage};
use baize_scene::{LayerKey, Scene};
use kurbo::{Point, Rect, Size};

const LAYER: LayerKey = LayerKey(2);

fn scene() -> (Scene, Arc<dyn RasterImage>) {
    let scene = Scene::new(Size::new(1024.0, 1024.0));
    let image: Arc<dyn RasterImage> = Arc::new(AlphaImage::solid(64, 64));
    (scene, image)
}

/// Tokens in a loose grid, ten per row. A point query crosses at most one.
fn spread_board(tokens: u32) -> Scene {
    let (mut scene, image) = scene();
    for i in 0..tokens {
        let pos = Point::new(f64::from(i % 10) * 70.0, f64::from(i / 10) * 70.0);
        scene
            .create_token(LAYER, Arc::clone(&image), pos)
            .unwrap();
    }
    scene
}

/// Tokens piled on one spot. A point query there alpha-tests every one.
fn stacked_board(tokens: u32) -> Scene {
    let (mut scene, image) = scene();
    for _ in 0..tokens {
        scene
            .create_token(LAYER, Arc::clone(&image), Point::ZERO)
            .unwrap();
    }
    scene
}

fn bench_elements_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene/elements_at");

    for tokens in [16u32, 64, 256, 1024] {
        group.throughput(Throughput::Elements(u64::from(tokens)));

        let spread = spread_board(tokens);
        group.bench_with_input(BenchmarkId::new("spread", tokens), &spread, |b, scene| {
            b.iter(|| black_box(scene.elements_at(black_box(Point::new(32.0, 32.0)), None)));
        });

        let stacked = stacked_board(tokens);
        group.bench_with_input(BenchmarkId::new("stacked", tokens), &stacked, |b, scene| {
            b.iter(|| black_box(scene.elements_at(black_box(Point::new(32.0, 32.0)), None)));
        });
    }

    group.finish();
}

fn bench_elements_in_rect(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene/elements_in_rect");

    for tokens in [64u32, 256, 1024] {
        group.throughput(Throughput::Elements(u64::from(tokens)));

        let spread = spread_board(tokens);
        let half = Rect::new(0.0, 0.0, 350.0, f64::from(tokens / 10) * 70.0);
        group.bench_with_input(BenchmarkId::new("half_board", tokens), &spread, |b, scene| {
            b.iter(|| black_box(scene.elements_in_rect(black_box(half))));
        });
    }

    group.finish();
}

fn bench_drawing_containment(c: &mut Criterion) {
    let mut group = c.benchmark_group("scene/drawing_containment");

    // Containment closes the polyline and counts crossings, so cost scales
    // with the number of recorded points.
    for points in [8u32, 64, 512] {
        group.throughput(Throughput::Elements(u64::from(points)));

        let mut scene = Scene::new(Size::new(1024.0, 1024.0));
        let id = scene.create_drawing(LAYER, Point::ZERO).unwrap();
        for i in 1..points {
            let y = if i % 2 == 0 { 0.0 } else { 50.0 };
            scene
                .add_drawing_point(id, Point::new(f64::from(i) * 10.0, y))
                .unwrap();
        }

        group.bench_with_input(BenchmarkId::new("sawtooth", points), &scene, |b, scene| {
            b.iter(|| black_box(scene.elements_at(black_box(Point::new(15.0, 20.0)), None)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_elements_at,
    bench_elements_in_rect,
    bench_drawing_containment
);
criterion_main!(benches);
