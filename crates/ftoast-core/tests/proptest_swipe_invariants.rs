//! Property-based invariant tests for swipe classification.
//!
//! 1. Classification is invariant under uniform positive scaling of the delta
//!    and the threshold.
//! 2. Clamped deltas have a zero off-axis component and never point away from
//!    the closing side.
//! 3. Clamping never changes the verdict for an already-clamped delta.
//! 4. A recognized swipe is never abandoned before release.
//! 5. Release always returns the tracker to idle.
//! 6. No panics on arbitrary event sequences.

use ftoast_core::event::PointerType;
use ftoast_core::geometry::{Point, Vector};
use ftoast_core::swipe::{SwipeDirection, SwipeTracker, SwipeTransition, is_in_direction};
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn direction_strategy() -> impl Strategy<Value = SwipeDirection> {
    prop_oneof![
        Just(SwipeDirection::Up),
        Just(SwipeDirection::Down),
        Just(SwipeDirection::Left),
        Just(SwipeDirection::Right),
    ]
}

fn pointer_type_strategy() -> impl Strategy<Value = PointerType> {
    prop_oneof![
        Just(PointerType::Mouse),
        Just(PointerType::Pen),
        Just(PointerType::Touch),
    ]
}

/// Integer-valued components keep power-of-two scaling exact.
fn delta_strategy() -> impl Strategy<Value = Vector> {
    (-500i32..=500, -500i32..=500).prop_map(|(x, y)| Vector::new(f64::from(x), f64::from(y)))
}

fn scale_strategy() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.25), Just(0.5), Just(2.0), Just(4.0), Just(64.0)]
}

#[derive(Debug, Clone)]
enum Op {
    Press(u32, i32, i32),
    Move(u32, i32, i32, PointerType),
    Release(u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1u32..3, -200i32..200, -200i32..200).prop_map(|(id, x, y)| Op::Press(id, x, y)),
        (1u32..3, -200i32..200, -200i32..200, pointer_type_strategy())
            .prop_map(|(id, x, y, t)| Op::Move(id, x, y, t)),
        (1u32..3).prop_map(Op::Release),
    ]
}

// ═══════════════════════════════════════════════════════════════════════
// Policy
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn classification_is_scale_invariant(
        delta in delta_strategy(),
        dir in direction_strategy(),
        threshold in 0i32..200,
        k in scale_strategy(),
    ) {
        let t = f64::from(threshold);
        prop_assert_eq!(
            is_in_direction(delta, dir, t),
            is_in_direction(delta.scale(k), dir, t * k)
        );
    }

    #[test]
    fn clamp_zeroes_off_axis_and_wrong_sign(
        delta in delta_strategy(),
        dir in direction_strategy(),
    ) {
        let c = dir.clamp(delta);
        match dir {
            SwipeDirection::Left => prop_assert!(c.y == 0.0 && c.x <= 0.0),
            SwipeDirection::Right => prop_assert!(c.y == 0.0 && c.x >= 0.0),
            SwipeDirection::Up => prop_assert!(c.x == 0.0 && c.y <= 0.0),
            SwipeDirection::Down => prop_assert!(c.x == 0.0 && c.y >= 0.0),
        }
    }

    #[test]
    fn clamp_is_idempotent(delta in delta_strategy(), dir in direction_strategy()) {
        let once = dir.clamp(delta);
        prop_assert_eq!(once, dir.clamp(once));
    }

    #[test]
    fn larger_threshold_never_accepts_more(
        delta in delta_strategy(),
        dir in direction_strategy(),
        lo in 0i32..100,
        extra in 0i32..100,
    ) {
        let lo = f64::from(lo);
        let hi = lo + f64::from(extra);
        if is_in_direction(delta, dir, hi) {
            prop_assert!(is_in_direction(delta, dir, lo));
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Tracker
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn recognized_swipe_survives_until_release(
        ops in proptest::collection::vec(op_strategy(), 0..64),
        dir in direction_strategy(),
    ) {
        let mut tracker = SwipeTracker::new();
        for op in ops {
            let was_swiping = tracker.is_swiping();
            let released = matches!(op, Op::Release(_));
            let out = match op {
                Op::Press(id, x, y) => {
                    let out = tracker.press(id, Point::new(f64::from(x), f64::from(y)));
                    prop_assert_eq!(tracker.pointer_id(), Some(id));
                    prop_assert!(!tracker.is_swiping());
                    out
                }
                Op::Move(id, x, y, kind) => {
                    tracker.motion(id, Point::new(f64::from(x), f64::from(y)), kind, dir)
                }
                Op::Release(_) => tracker.release(dir, 50.0),
            };

            if was_swiping {
                prop_assert!(out != SwipeTransition::Abandoned);
            }
            // Any release leaves the tracker idle, whichever pointer lifted.
            if released {
                prop_assert!(!tracker.is_tracking());
                prop_assert!(!tracker.is_swiping());
                prop_assert!(tracker.pointer_id().is_none());
            }
            // Invariant: delta implies origin.
            if tracker.is_swiping() {
                prop_assert!(tracker.is_tracking());
            }
        }
    }
}
