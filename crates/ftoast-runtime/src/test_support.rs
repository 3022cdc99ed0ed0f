#![forbid(unsafe_code)]

//! In-crate host double for unit tests.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use ftoast_core::host::{
    ClickSuppressor, HostClock, HostScheduler, PointerCaptureHost, TimerCallback, TimerHandle,
};
use ftoast_core::timer_queue::TimerQueue;

/// Deterministic clock plus timer queue, capture set and click counter.
#[derive(Default)]
pub(crate) struct FakeHost {
    now: Cell<Duration>,
    timers: RefCell<TimerQueue>,
    cancelled: Cell<usize>,
    captures: RefCell<Vec<u32>>,
    suppressed_clicks: Cell<usize>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_now(&self, now: Duration) {
        self.now.set(now);
    }

    /// Move the clock forward, running due callbacks in deadline order with
    /// the clock set to each deadline.
    pub(crate) fn advance(&self, dt: Duration) {
        let target = self.now.get() + dt;
        loop {
            let due = self.timers.borrow_mut().pop_due(target);
            let Some((deadline, callback)) = due else {
                break;
            };
            self.now.set(deadline.max(self.now.get()));
            callback();
        }
        self.now.set(target);
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub(crate) fn cancelled_count(&self) -> usize {
        self.cancelled.get()
    }

    pub(crate) fn captured(&self) -> Vec<u32> {
        self.captures.borrow().clone()
    }

    pub(crate) fn suppressed_clicks(&self) -> usize {
        self.suppressed_clicks.get()
    }
}

impl HostClock for FakeHost {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

impl HostScheduler for FakeHost {
    fn after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        self.timers
            .borrow_mut()
            .schedule(self.now.get() + delay, callback)
    }

    fn cancel(&self, handle: TimerHandle) {
        if self.timers.borrow_mut().cancel(handle) {
            self.cancelled.set(self.cancelled.get() + 1);
        }
    }
}

impl PointerCaptureHost for FakeHost {
    fn set_pointer_capture(&self, pointer_id: u32) {
        let mut captures = self.captures.borrow_mut();
        if !captures.contains(&pointer_id) {
            captures.push(pointer_id);
        }
    }

    fn release_pointer_capture(&self, pointer_id: u32) {
        self.captures.borrow_mut().retain(|&id| id != pointer_id);
    }

    fn has_pointer_capture(&self, pointer_id: u32) -> bool {
        self.captures.borrow().contains(&pointer_id)
    }
}

impl ClickSuppressor for FakeHost {
    fn suppress_next_click(&self) {
        self.suppressed_clicks.set(self.suppressed_clicks.get() + 1);
    }
}
