#![forbid(unsafe_code)]

//! Deadline-ordered queue of one-shot callbacks.
//!
//! The bookkeeping half of a [`HostScheduler`](crate::host::HostScheduler):
//! hosts that drive time themselves keep one of these behind a `RefCell`,
//! pop due callbacks with [`TimerQueue::pop_due`], release the borrow, and
//! only then run the callback.
//!
//! # Invariants
//!
//! 1. Callbacks come out in `(deadline, scheduling order)` order.
//! 2. Handles are never reused, so cancelling a stale handle is a no-op.

use core::fmt;
use core::time::Duration;
use std::collections::BTreeMap;

use crate::host::{TimerCallback, TimerHandle};

/// Pending callbacks keyed by deadline.
#[derive(Default)]
pub struct TimerQueue {
    timers: BTreeMap<(Duration, u64), TimerCallback>,
    next_id: u64,
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("pending", &self.timers.len())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `callback` to run at `deadline`.
    pub fn schedule(&mut self, deadline: Duration, callback: TimerCallback) -> TimerHandle {
        self.next_id += 1;
        self.timers.insert((deadline, self.next_id), callback);
        TimerHandle::from_raw(self.next_id)
    }

    /// Drop a pending callback. Returns `false` if it already ran or was
    /// already cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let key = self
            .timers
            .keys()
            .find(|&&(_, id)| id == handle.raw())
            .copied();
        key.is_some_and(|key| self.timers.remove(&key).is_some())
    }

    /// Remove and return the earliest callback due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, TimerCallback)> {
        let key = *self.timers.keys().next()?;
        if key.0 > now {
            return None;
        }
        self.timers.remove(&key).map(|callback| (key.0, callback))
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(|&(deadline, _)| deadline)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn pops_in_deadline_then_scheduling_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = TimerQueue::new();
        for (deadline, tag) in [(30, "c"), (10, "a"), (20, "b"), (10, "a2")] {
            let l = Rc::clone(&log);
            queue.schedule(ms(deadline), Box::new(move || l.borrow_mut().push(tag)));
        }
        let mut deadlines = Vec::new();
        while let Some((deadline, callback)) = queue.pop_due(ms(25)) {
            deadlines.push(deadline);
            callback();
        }
        assert_eq!(*log.borrow(), vec!["a", "a2", "b"]);
        assert_eq!(deadlines, vec![ms(10), ms(10), ms(20)]);
        assert_eq!(queue.next_deadline(), Some(ms(30)));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn cancel_reports_whether_anything_was_pending() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(ms(5), Box::new(|| {}));
        assert!(queue.cancel(handle));
        assert!(!queue.cancel(handle));
        assert!(queue.is_empty());
        assert!(queue.pop_due(ms(100)).is_none());
    }
}
