#![forbid(unsafe_code)]

//! Pausable one-shot countdown.
//!
//! [`PausableTimer`] arms a single host callback, can be paused (capturing
//! the remaining time) and resumed, and invokes its expiry callback at most
//! once per arm.
//!
//! # State Machine
//!
//! ```text
//!            start(Some(d))                 pause()
//!   Idle ───────────────────▶ Running ─────────────────▶ Paused
//!    ▲                          │  ▲                        │
//!    │ cancel()                 │  └────── resume() ────────┘
//!    │                          │ expiry
//!    └──────────────────────── Fired
//! ```
//!
//! # Invariants
//!
//! 1. At most one host callback is pending. Re-arming cancels the previous
//!    one before scheduling.
//! 2. A callback from a superseded arm never fires: each arm bumps a
//!    generation and the callback checks it.
//! 3. `remaining` never underflows; elapsed time past the deadline floors it
//!    at zero.
//! 4. `Fired` is final until the next `start`.
//!
//! # Failure Modes
//!
//! - **Unset duration**: `start(None)` is a no-op. The timer stays in its
//!   current state and never fires.
//! - **Re-entrant expiry**: the expiry callback may re-arm or cancel the
//!   timer. No borrow is held while it runs.
//! - **Dropped timer**: a pending host callback holds only a weak reference;
//!   if the timer is gone when it runs, it does nothing.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use ftoast_core::host::{HostClock, HostScheduler, TimerHandle};

/// Observable timer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerState {
    /// Never armed, or cancelled.
    #[default]
    Idle,
    /// Counting down.
    Running {
        /// Host time when this arm started.
        started_at: Duration,
        /// Time left at `started_at`.
        remaining: Duration,
    },
    /// Suspended with `remaining` left.
    Paused {
        /// Time left when paused.
        remaining: Duration,
    },
    /// Expired.
    Fired,
}

struct TimerCore {
    state: TimerState,
    handle: Option<TimerHandle>,
    generation: u64,
    fires: u64,
}

/// Countdown that survives pause/resume and fires once per arm.
pub struct PausableTimer {
    core: Rc<RefCell<TimerCore>>,
    on_expire: Rc<dyn Fn()>,
}

impl fmt::Debug for PausableTimer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        f.debug_struct("PausableTimer")
            .field("state", &core.state)
            .field("pending", &core.handle.is_some())
            .field("fires", &core.fires)
            .finish()
    }
}

impl PausableTimer {
    /// Create an idle timer that calls `on_expire` when it runs out.
    pub fn new(on_expire: impl Fn() + 'static) -> Self {
        Self {
            core: Rc::new(RefCell::new(TimerCore {
                state: TimerState::Idle,
                handle: None,
                generation: 0,
                fires: 0,
            })),
            on_expire: Rc::new(on_expire),
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> TimerState {
        self.core.borrow().state
    }

    /// Whether a host callback is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.core.borrow().handle.is_some()
    }

    /// Number of times the timer has expired.
    #[must_use]
    pub fn fire_count(&self) -> u64 {
        self.core.borrow().fires
    }

    /// Time left, as of `clock`'s now. `None` when idle or fired.
    #[must_use]
    pub fn remaining<C: HostClock + ?Sized>(&self, clock: &C) -> Option<Duration> {
        match self.core.borrow().state {
            TimerState::Running {
                started_at,
                remaining,
            } => Some(remaining.saturating_sub(clock.now().saturating_sub(started_at))),
            TimerState::Paused { remaining } => Some(remaining),
            TimerState::Idle | TimerState::Fired => None,
        }
    }

    /// Arm for `duration`. `None` is a no-op and returns `false`.
    ///
    /// A pending callback from a previous arm is cancelled first.
    pub fn start<H: HostScheduler + ?Sized>(&self, host: &H, duration: Option<Duration>) -> bool {
        let Some(duration) = duration else {
            return false;
        };

        let (previous, generation) = {
            let mut core = self.core.borrow_mut();
            core.generation += 1;
            core.state = TimerState::Running {
                started_at: host.now(),
                remaining: duration,
            };
            (core.handle.take(), core.generation)
        };
        if let Some(handle) = previous {
            host.cancel(handle);
        }

        let weak: Weak<RefCell<TimerCore>> = Rc::downgrade(&self.core);
        let on_expire = Rc::clone(&self.on_expire);
        let handle = host.after(
            duration,
            Box::new(move || {
                let Some(core) = weak.upgrade() else {
                    return;
                };
                {
                    let mut core = core.borrow_mut();
                    if core.generation != generation
                        || !matches!(core.state, TimerState::Running { .. })
                    {
                        return;
                    }
                    core.state = TimerState::Fired;
                    core.handle = None;
                    core.fires += 1;
                }
                tracing::trace!(generation, "timer expired");
                on_expire();
            }),
        );

        let mut core = self.core.borrow_mut();
        if core.generation == generation {
            core.handle = Some(handle);
        }
        tracing::trace!(
            remaining_ms = duration.as_millis() as u64,
            generation,
            "timer armed"
        );
        true
    }

    /// Enter `Paused` with `duration` left without scheduling anything.
    ///
    /// Used when a timer should start out suspended. `None` is a no-op.
    pub fn hold<H: HostScheduler + ?Sized>(&self, host: &H, duration: Option<Duration>) -> bool {
        let Some(duration) = duration else {
            return false;
        };
        let previous = {
            let mut core = self.core.borrow_mut();
            core.generation += 1;
            core.state = TimerState::Paused {
                remaining: duration,
            };
            core.handle.take()
        };
        if let Some(handle) = previous {
            host.cancel(handle);
        }
        true
    }

    /// Suspend a running countdown. Returns the captured remaining time, or
    /// `None` when not running.
    pub fn pause<H: HostScheduler + ?Sized>(&self, host: &H) -> Option<Duration> {
        let (handle, remaining) = {
            let mut core = self.core.borrow_mut();
            let TimerState::Running {
                started_at,
                remaining,
            } = core.state
            else {
                return None;
            };
            let elapsed = host.now().saturating_sub(started_at);
            let remaining = remaining.saturating_sub(elapsed);
            core.generation += 1;
            core.state = TimerState::Paused { remaining };
            (core.handle.take(), remaining)
        };
        if let Some(handle) = handle {
            host.cancel(handle);
        }
        tracing::trace!(remaining_ms = remaining.as_millis() as u64, "timer paused");
        Some(remaining)
    }

    /// Re-arm a paused countdown with its remaining time. Returns `false`
    /// when not paused.
    ///
    /// A remaining time of zero still schedules; the host fires it on its
    /// next turn.
    pub fn resume<H: HostScheduler + ?Sized>(&self, host: &H) -> bool {
        let TimerState::Paused { remaining } = self.state() else {
            return false;
        };
        self.start(host, Some(remaining))
    }

    /// Drop any pending callback and return to `Idle`.
    pub fn cancel<H: HostScheduler + ?Sized>(&self, host: &H) {
        let handle = {
            let mut core = self.core.borrow_mut();
            core.generation += 1;
            core.state = TimerState::Idle;
            core.handle.take()
        };
        if let Some(handle) = handle {
            host.cancel(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeHost;
    use std::cell::Cell;

    fn counting_timer() -> (PausableTimer, Rc<Cell<u32>>) {
        let fired = Rc::new(Cell::new(0));
        let f = Rc::clone(&fired);
        (PausableTimer::new(move || f.set(f.get() + 1)), fired)
    }

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn fires_once_at_deadline() {
        let host = FakeHost::new();
        let (timer, fired) = counting_timer();
        assert!(timer.start(&host, Some(ms(500))));

        host.advance(ms(499));
        assert_eq!(fired.get(), 0);
        host.advance(ms(1));
        assert_eq!(fired.get(), 1);
        assert_eq!(timer.state(), TimerState::Fired);

        host.advance(ms(10_000));
        assert_eq!(fired.get(), 1);
        assert_eq!(timer.fire_count(), 1);
    }

    #[test]
    fn unset_duration_is_noop() {
        let host = FakeHost::new();
        let (timer, fired) = counting_timer();
        assert!(!timer.start(&host, None));
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(host.pending_timers(), 0);
        host.advance(Duration::from_secs(3600));
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn rearm_cancels_previous_callback() {
        let host = FakeHost::new();
        let (timer, fired) = counting_timer();
        timer.start(&host, Some(ms(100)));
        host.advance(ms(50));
        timer.start(&host, Some(ms(100)));
        assert_eq!(host.pending_timers(), 1);
        assert_eq!(host.cancelled_count(), 1);

        host.advance(ms(60));
        assert_eq!(fired.get(), 0, "old deadline must not fire");
        host.advance(ms(40));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn pause_without_elapsed_time_keeps_remaining() {
        let host = FakeHost::new();
        let (timer, _) = counting_timer();
        timer.start(&host, Some(ms(500)));
        assert_eq!(timer.pause(&host), Some(ms(500)));
        assert!(timer.resume(&host));
        assert_eq!(timer.remaining(&host), Some(ms(500)));
    }

    #[test]
    fn pause_captures_remaining_and_resume_uses_it() {
        let host = FakeHost::new();
        let (timer, fired) = counting_timer();
        timer.start(&host, Some(ms(500)));
        host.advance(ms(200));
        assert_eq!(timer.pause(&host), Some(ms(300)));
        assert_eq!(host.pending_timers(), 0);

        host.advance(ms(5_000));
        assert_eq!(fired.get(), 0, "paused timer never fires");
        assert_eq!(timer.remaining(&host), Some(ms(300)));

        timer.resume(&host);
        host.advance(ms(299));
        assert_eq!(fired.get(), 0);
        host.advance(ms(1));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn pause_and_resume_are_noops_in_wrong_state() {
        let host = FakeHost::new();
        let (timer, _) = counting_timer();
        assert_eq!(timer.pause(&host), None);
        assert!(!timer.resume(&host));
        timer.start(&host, Some(ms(10)));
        assert!(!timer.resume(&host));
        timer.pause(&host);
        assert_eq!(timer.pause(&host), None);
    }

    #[test]
    fn zero_remaining_fires_on_next_turn() {
        let host = FakeHost::new();
        let (timer, fired) = counting_timer();
        timer.start(&host, Some(ms(100)));
        host.set_now(ms(100));
        // Clock moved past the deadline without the host running callbacks.
        assert_eq!(timer.pause(&host), Some(Duration::ZERO));
        timer.resume(&host);
        assert_eq!(fired.get(), 0);
        host.advance(Duration::ZERO);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn hold_starts_suspended() {
        let host = FakeHost::new();
        let (timer, fired) = counting_timer();
        assert!(timer.hold(&host, Some(ms(250))));
        assert_eq!(timer.state(), TimerState::Paused { remaining: ms(250) });
        host.advance(ms(1_000));
        assert_eq!(fired.get(), 0);
        timer.resume(&host);
        host.advance(ms(250));
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn cancel_is_idempotent() {
        let host = FakeHost::new();
        let (timer, fired) = counting_timer();
        timer.start(&host, Some(ms(100)));
        timer.cancel(&host);
        timer.cancel(&host);
        assert_eq!(timer.state(), TimerState::Idle);
        host.advance(ms(200));
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn dropped_timer_callback_is_inert() {
        let host = FakeHost::new();
        let (timer, fired) = counting_timer();
        timer.start(&host, Some(ms(100)));
        drop(timer);
        host.advance(ms(100));
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn expiry_may_rearm() {
        let host = Rc::new(FakeHost::new());
        let slot: Rc<RefCell<Option<Rc<PausableTimer>>>> = Rc::new(RefCell::new(None));
        let fired = Rc::new(Cell::new(0));
        let (s, h, f) = (Rc::clone(&slot), Rc::clone(&host), Rc::clone(&fired));
        let timer = Rc::new(PausableTimer::new(move || {
            f.set(f.get() + 1);
            if f.get() < 3 {
                if let Some(timer) = s.borrow().as_ref() {
                    timer.start(&*h, Some(ms(10)));
                }
            }
        }));
        *slot.borrow_mut() = Some(Rc::clone(&timer));

        timer.start(&*host, Some(ms(10)));
        host.advance(ms(100));
        assert_eq!(fired.get(), 3);
        slot.borrow_mut().take();
    }
}
