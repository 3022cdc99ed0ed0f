//! Benchmark: swipe policy and tracker throughput.
//!
//! Run with: `cargo bench -p ftoast-core --bench swipe_bench`
//!
//! Pointer-move handlers run at input rate (up to 240 Hz on some touch
//! panels), so classification has to stay in the low nanoseconds.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use ftoast_core::event::PointerType;
use ftoast_core::geometry::{Point, Vector};
use ftoast_core::swipe::{SwipeDirection, SwipeTracker, is_in_direction};

fn bench_policy(c: &mut Criterion) {
    let deltas: Vec<Vector> = (0..256i32)
        .map(|i| {
            let f = f64::from(i);
            Vector::new((f * 0.37).sin() * 80.0, (f * 0.91).cos() * 80.0)
        })
        .collect();

    c.bench_function("is_in_direction/256", |b| {
        b.iter(|| {
            let mut hits = 0u32;
            for d in &deltas {
                if is_in_direction(black_box(*d), SwipeDirection::Right, 50.0) {
                    hits += 1;
                }
            }
            black_box(hits)
        });
    });
}

fn bench_tracker(c: &mut Criterion) {
    c.bench_function("tracker/press_move64_release", |b| {
        b.iter(|| {
            let mut tracker = SwipeTracker::new();
            tracker.press(1, Point::ORIGIN);
            for step in 1..=64i32 {
                let x = f64::from(step);
                black_box(tracker.motion(
                    1,
                    Point::new(x, x * 0.1),
                    PointerType::Touch,
                    SwipeDirection::Right,
                ));
            }
            black_box(tracker.release(SwipeDirection::Right, 50.0))
        });
    });
}

criterion_group!(benches, bench_policy, bench_tracker);
criterion_main!(benches);
