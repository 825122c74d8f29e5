//! # Frame Step Benchmark
//!
//! Times one engine frame (fade, update, draw) of each backdrop against a
//! recording surface, plus a full-HD software raster frame of the graph.
//!
//! Run with: `cargo bench --bench frame_step`

use backdrop::prelude::*;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const VIEWPORT: UVec2 = UVec2::new(1920, 1080);

fn recording<A: Animation>(animation: A) -> Engine<A, RecordingSurface> {
    EngineBuilder::new(animation)
        .with_seed(1)
        .with_clock(ManualClock::new())
        .build(RecordingSurface::default(), VIEWPORT)
}

fn frame_benchmark(c: &mut Criterion) {
    let mut graph = recording(GraphAnimation::new(GraphConfig::default()));
    c.bench_function("graph_frame", |b| {
        b.iter(|| {
            graph.surface_mut().take();
            black_box(graph.frame());
        })
    });

    let mut rain = recording(RainAnimation::new(RainConfig::default()));
    c.bench_function("rain_frame", |b| {
        b.iter(|| {
            rain.surface_mut().take();
            black_box(rain.frame());
        })
    });

    let mut depth = recording(DepthAnimation::new(DepthConfig::default()));
    c.bench_function("depth_frame", |b| {
        b.iter(|| {
            depth.surface_mut().take();
            black_box(depth.frame());
        })
    });
}

fn raster_benchmark(c: &mut Criterion) {
    let mut graph = EngineBuilder::new(GraphAnimation::new(GraphConfig::default()))
        .with_seed(1)
        .with_clock(ManualClock::new())
        .build(RasterSurface::new(VIEWPORT), VIEWPORT);

    c.bench_function("graph_raster_frame", |b| b.iter(|| black_box(graph.frame())));
}

fn resize_benchmark(c: &mut Criterion) {
    let mut depth = recording(DepthAnimation::new(DepthConfig::default()));
    let mut flip = false;
    c.bench_function("depth_resize", |b| {
        b.iter(|| {
            flip = !flip;
            let size = if flip { UVec2::new(1280, 720) } else { VIEWPORT };
            depth.resize(black_box(size));
        })
    });
}

criterion_group!(benches, frame_benchmark, raster_benchmark, resize_benchmark);
criterion_main!(benches);
