//! Benchmarks for the transform chain and the event interpolator

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use satpass::earthlib::BundledEop;
use satpass::{Cartesian3, CubicSpline, Frame, FrameGraph, StateVector, Timescale};

fn bench_transform_chain(c: &mut Criterion) {
    let ts = Timescale::default();
    let time = ts.parse_utc("2020-04-12T00:00:00Z").unwrap();
    let graph = FrameGraph::standard(BundledEop::bundled());
    let state = StateVector::new(
        Frame::Teme,
        time,
        Cartesian3::new(-4_437.95, 2_662.40, 4_396.67),
    )
    .with_velocity(Cartesian3::new(-3.68, -5.62, 0.63));

    c.bench_function("teme_to_itrs", |b| {
        b.iter(|| graph.transform(black_box(&state), Frame::Itrs).unwrap())
    });
}

fn bench_spline_fit_and_roots(c: &mut Criterion) {
    let times: Vec<f64> = (0..100).map(|i| i as f64 * 0.0634).collect();
    let values: Vec<f64> = times.iter().map(|t| t.sin()).collect();

    c.bench_function("spline_fit_100", |b| {
        b.iter(|| CubicSpline::fit(black_box(&times), black_box(&values)).unwrap())
    });

    let spline = CubicSpline::fit(&times, &values).unwrap();
    c.bench_function("spline_roots_100", |b| b.iter(|| black_box(&spline).roots()));
}

criterion_group!(benches, bench_transform_chain, bench_spline_fit_and_roots);
criterion_main!(benches);
