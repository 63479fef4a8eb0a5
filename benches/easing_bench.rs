//! Per-frame cost of the pointer easing path.

use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use glam::Vec2;
use vitrine::animation::Tween;
use vitrine::input::orientation::PointerOrientationController;
use vitrine::util::easing::EasingFunction;

fn easing_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("easing");
    for (name, f) in [
        ("cubic_out", EasingFunction::CubicOut),
        ("cubic_hermite", EasingFunction::CubicHermite { c1: 0.33, c2: 1.0 }),
    ] {
        let _ = group.bench_function(name, |b| {
            b.iter(|| black_box(f.evaluate(black_box(0.5))));
        });
    }
    group.finish();
}

fn tween_benchmark(c: &mut Criterion) {
    let _ = c.bench_function("tween_retarget_and_advance", |b| {
        let mut tween = Tween::at_rest(
            Vec2::ZERO,
            Duration::from_millis(500),
            EasingFunction::CubicOut,
        );
        let mut flip = 1.0_f32;
        b.iter(|| {
            tween.retarget(Vec2::splat(0.5 * flip));
            tween.advance(1.0 / 60.0);
            flip = -flip;
            black_box(tween.value())
        });
    });
}

fn pointer_frame_benchmark(c: &mut Criterion) {
    let _ = c.bench_function("pointer_sample_then_tick", |b| {
        let mut controller = PointerOrientationController::default();
        let mut x = 0.0_f32;
        b.iter(|| {
            x = (x + 7.0) % 1280.0;
            let _ = controller.on_pointer_move(
                black_box(x),
                black_box(360.0),
                1280.0,
                720.0,
            );
            controller.tick(1.0 / 60.0);
            black_box(controller.current())
        });
    });
}

criterion_group!(
    benches,
    easing_benchmark,
    tween_benchmark,
    pointer_frame_benchmark
);
criterion_main!(benches);
