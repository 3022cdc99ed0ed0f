#![forbid(unsafe_code)]

//! Deterministic host and per-element surfaces.
//!
//! [`WebHost`] owns the clock, the timer queue and the element bookkeeping a
//! browser would otherwise provide. Each toast element gets a
//! [`WebSurface`], which implements the `ftoast-core` host traits for that
//! element and shares the host state.
//!
//! # Invariants
//!
//! 1. Timers fire in `(deadline, scheduling order)` order, with the clock set
//!    to each deadline while its callback runs.
//! 2. No borrow of host state is held while a callback runs, so callbacks may
//!    schedule or cancel timers.
//! 3. A pointer is captured by at most one element.
//! 4. Each suppressed click swallows exactly one later click on its element.
//! 5. Removing a mount target detaches every group still rendering into it.

use core::time::Duration;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use ftoast_core::host::{
    ClickSuppressor, HostClock, HostScheduler, MountTarget, PointerCaptureHost, TimerCallback,
    TimerHandle,
};
use ftoast_core::timer_queue::TimerQueue;
use ftoast_runtime::{ToastGroup, WeakToastGroup};

use crate::{DeterministicClock, HostError};

/// Host-assigned element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

struct HostShared {
    clock: RefCell<DeterministicClock>,
    timers: RefCell<TimerQueue>,
    next_element: Cell<u64>,
    captures: RefCell<AHashMap<u32, ElementId>>,
    click_guards: RefCell<AHashMap<ElementId, u32>>,
    mount_targets: RefCell<AHashMap<MountTarget, Vec<WeakToastGroup>>>,
}

impl HostShared {
    fn now(&self) -> Duration {
        self.clock.borrow().now()
    }

    fn schedule(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let deadline = self.now().saturating_add(delay);
        self.timers.borrow_mut().schedule(deadline, callback)
    }

    fn unschedule(&self, handle: TimerHandle) {
        self.timers.borrow_mut().cancel(handle);
    }

    fn consume_click(&self, element: ElementId) -> bool {
        let mut guards = self.click_guards.borrow_mut();
        let Some(count) = guards.get_mut(&element) else {
            return false;
        };
        *count -= 1;
        if *count == 0 {
            guards.remove(&element);
        }
        true
    }

    fn pop_due(&self, until: Duration) -> Option<(Duration, TimerCallback)> {
        self.timers.borrow_mut().pop_due(until)
    }
}

/// Deterministic host: clock, timer queue, and element bookkeeping.
///
/// Cloning creates another handle to the same host.
#[derive(Clone)]
pub struct WebHost {
    shared: Rc<HostShared>,
}

impl Default for WebHost {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WebHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebHost")
            .field("now", &self.now())
            .field("pending_timers", &self.pending_timers())
            .field("captures", &self.shared.captures.borrow().len())
            .finish()
    }
}

impl WebHost {
    /// Create a host whose clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shared: Rc::new(HostShared {
                clock: RefCell::new(DeterministicClock::new()),
                timers: RefCell::new(TimerQueue::new()),
                next_element: Cell::new(0),
                captures: RefCell::new(AHashMap::new()),
                click_guards: RefCell::new(AHashMap::new()),
                mount_targets: RefCell::new(AHashMap::new()),
            }),
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.shared.now()
    }

    /// Advance the clock by `dt`, running every callback due on the way.
    ///
    /// Returns the number of callbacks run. `advance(Duration::ZERO)` runs
    /// callbacks already due, including zero-delay ones.
    pub fn advance(&self, dt: Duration) -> usize {
        let target = self.now().saturating_add(dt);
        self.run_until(target)
    }

    /// Move the clock forward to `now`, running due callbacks. Earlier
    /// values only run what is already due.
    pub fn advance_to(&self, now: Duration) -> usize {
        let target = self.now().max(now);
        self.run_until(target)
    }

    fn run_until(&self, target: Duration) -> usize {
        let mut fired = 0;
        while let Some((deadline, callback)) = self.shared.pop_due(target) {
            self.shared.clock.borrow_mut().set(deadline);
            callback();
            fired += 1;
        }
        self.shared.clock.borrow_mut().set(target);
        #[cfg(feature = "tracing")]
        if fired > 0 {
            tracing::debug!(
                fired,
                now_ms = target.as_millis() as u64,
                "web host ran due timers"
            );
        }
        fired
    }

    /// Number of scheduled callbacks.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.shared.timers.borrow().len()
    }

    /// Deadline of the next scheduled callback.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.shared.timers.borrow().next_deadline()
    }

    /// Create a surface for a new element.
    #[must_use]
    pub fn create_surface(&self) -> WebSurface {
        let id = self.shared.next_element.get() + 1;
        self.shared.next_element.set(id);
        WebSurface {
            element: ElementId(id),
            shared: Rc::clone(&self.shared),
        }
    }

    /// Create an element toasts can be mounted under.
    #[must_use]
    pub fn create_mount_target(&self) -> MountTarget {
        let id = self.shared.next_element.get() + 1;
        self.shared.next_element.set(id);
        let target = MountTarget::from_raw(id);
        self.shared
            .mount_targets
            .borrow_mut()
            .insert(target, Vec::new());
        target
    }

    /// Remove a mount target element.
    ///
    /// Groups still attached to it lose their mount target, so their toasts
    /// stop rendering until a new target is attached.
    pub fn remove_mount_target(&self, target: MountTarget) -> Result<(), HostError> {
        let attached = self
            .shared
            .mount_targets
            .borrow_mut()
            .remove(&target)
            .ok_or(HostError::UnknownMountTarget(target))?;
        for group in attached.iter().filter_map(WeakToastGroup::upgrade) {
            if group.mount_target() == Some(target) {
                group.set_mount_target(None);
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            mount_target = target.raw(),
            groups = attached.len(),
            "mount target removed"
        );
        Ok(())
    }

    /// Render `group`'s toasts under `target`.
    pub fn attach_group(&self, group: &ToastGroup, target: MountTarget) -> Result<(), HostError> {
        {
            let mut targets = self.shared.mount_targets.borrow_mut();
            let attached = targets
                .get_mut(&target)
                .ok_or(HostError::UnknownMountTarget(target))?;
            attached.retain(|weak| weak.upgrade().is_some_and(|g| !g.ptr_eq(group)));
            attached.push(group.downgrade());
        }
        group.set_mount_target(Some(target));
        Ok(())
    }

    /// Whether `target` is a live mount target.
    #[must_use]
    pub fn has_mount_target(&self, target: MountTarget) -> bool {
        self.shared.mount_targets.borrow().contains_key(&target)
    }

    /// Element holding capture for `pointer_id`.
    #[must_use]
    pub fn capture_owner(&self, pointer_id: u32) -> Option<ElementId> {
        self.shared.captures.borrow().get(&pointer_id).copied()
    }

    /// Deliver a click to `element`. Returns `true` if a pending suppression
    /// swallowed it.
    pub fn dispatch_click(&self, element: ElementId) -> bool {
        self.shared.consume_click(element)
    }

    /// Clicks `element` will swallow.
    #[must_use]
    pub fn pending_click_suppressions(&self, element: ElementId) -> u32 {
        self.shared
            .click_guards
            .borrow()
            .get(&element)
            .copied()
            .unwrap_or(0)
    }
}

/// One element's view of a [`WebHost`].
#[derive(Clone)]
pub struct WebSurface {
    element: ElementId,
    shared: Rc<HostShared>,
}

impl fmt::Debug for WebSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebSurface")
            .field("element", &self.element)
            .finish_non_exhaustive()
    }
}

impl WebSurface {
    /// Element this surface belongs to.
    #[must_use]
    pub const fn element(&self) -> ElementId {
        self.element
    }

    /// Deliver a click to this element. Returns `true` if it was swallowed.
    pub fn dispatch_click(&self) -> bool {
        self.shared.consume_click(self.element)
    }
}

impl HostClock for WebSurface {
    fn now(&self) -> Duration {
        self.shared.now()
    }
}

impl HostScheduler for WebSurface {
    fn after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        self.shared.schedule(delay, callback)
    }

    fn cancel(&self, handle: TimerHandle) {
        self.shared.unschedule(handle);
    }
}

impl PointerCaptureHost for WebSurface {
    fn set_pointer_capture(&self, pointer_id: u32) {
        self.shared
            .captures
            .borrow_mut()
            .insert(pointer_id, self.element);
    }

    fn release_pointer_capture(&self, pointer_id: u32) {
        let mut captures = self.shared.captures.borrow_mut();
        if captures.get(&pointer_id) == Some(&self.element) {
            captures.remove(&pointer_id);
        }
    }

    fn has_pointer_capture(&self, pointer_id: u32) -> bool {
        self.shared.captures.borrow().get(&pointer_id) == Some(&self.element)
    }
}

impl ClickSuppressor for WebSurface {
    fn suppress_next_click(&self) {
        *self
            .shared
            .click_guards
            .borrow_mut()
            .entry(self.element)
            .or_insert(0) += 1;
    }
}
