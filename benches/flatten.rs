use criterion::{black_box, criterion_group, criterion_main, Criterion};

use plotline::geom::Point;
use plotline::{clip, curve, path};

fn adaptive_flatten(c: &mut Criterion) {
    let ctrl = [
        Point::new(0.0, 0.0),
        Point::new(40.0, 120.0),
        Point::new(80.0, -120.0),
        Point::new(120.0, 0.0),
    ];

    c.bench_function("adaptive flatten", |b| {
        b.iter(|| black_box(curve::flatten_adaptive(&ctrl, 0.01)))
    });
}

fn parse_path(c: &mut Criterion) {
    let d = "M10,10 C20,40 40,40 50,10 S80,-20 90,10 Q100,40 110,10 T130,10 \
             A15,15 0 0 1 160,10 L170,30 H190 V50 Z";

    c.bench_function("parse path", |b| {
        b.iter(|| black_box(path::parse_path(d, 0.01)))
    });
}

fn clip_polyline(c: &mut Criterion) {
    // A dense sine wave sweeping repeatedly in and out of the working area.
    let mut prim = plotline::Primitive::new(Point::new(-20.0, 50.0));
    for i in 1..=2000 {
        let x = -20.0 + i as f64 * 0.07;
        let y = 50.0 + 60.0 * (x * 0.3).sin();
        prim.push(Point::new(x, y));
    }

    c.bench_function("clip polyline", |b| {
        b.iter(|| black_box(clip::split(&prim, 100.0, 100.0)))
    });
}

criterion_group!(benches, adaptive_flatten, parse_path, clip_polyline);
criterion_main!(benches);
