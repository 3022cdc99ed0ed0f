#![forbid(unsafe_code)]

//! Host surface contracts.
//!
//! The toast state machines never read a clock, schedule work, or touch an
//! element directly. A host (browser glue, a retained-mode UI, or the
//! deterministic `ftoast-web` adapter used in tests) implements these traits
//! and hands one handle per toast element to the runtime.
//!
//! All methods take `&self`: hosts are single-threaded and use interior
//! mutability, so a handle can be shared between a toast and the timer
//! callbacks it schedules.

use core::time::Duration;

/// Monotonic clock abstraction.
///
/// Returns elapsed time since an unspecified epoch. Must never go backwards.
pub trait HostClock {
    /// Current monotonic time.
    fn now(&self) -> Duration;
}

/// Opaque handle to a pending delayed callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wrap a host-assigned id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Host-assigned id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One-shot callback run by a [`HostScheduler`].
pub type TimerCallback = Box<dyn FnOnce()>;

/// One-shot delayed callbacks.
pub trait HostScheduler: HostClock {
    /// Run `callback` once, `delay` after now.
    fn after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancel a pending callback.
    ///
    /// Cancelling a handle that already fired or was already cancelled is a
    /// no-op.
    fn cancel(&self, handle: TimerHandle);
}

/// Pointer capture on the toast element.
pub trait PointerCaptureHost {
    /// Route further events for `pointer_id` to this element.
    fn set_pointer_capture(&self, pointer_id: u32);

    /// Stop routing `pointer_id` to this element. No-op if not captured.
    fn release_pointer_capture(&self, pointer_id: u32);

    /// Whether this element holds capture for `pointer_id`.
    fn has_pointer_capture(&self, pointer_id: u32) -> bool;
}

/// One-shot suppression of the synthetic click that follows a pointer-up.
pub trait ClickSuppressor {
    /// Swallow the next click delivered to this element.
    fn suppress_next_click(&self);
}

/// Everything a toast element needs from its host.
pub trait ToastHost: HostScheduler + PointerCaptureHost + ClickSuppressor {}

impl<T> ToastHost for T where T: HostScheduler + PointerCaptureHost + ClickSuppressor + ?Sized {}

/// Handle to an element toasts can be mounted under (the viewport region).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MountTarget(u64);

impl MountTarget {
    /// Wrap a host-assigned element id.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Host-assigned element id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Real monotonic clock backed by `web_time::Instant`.
///
/// Works natively and on `wasm32-unknown-unknown` (via `performance.now()`).
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    epoch: web_time::Instant,
}

impl MonotonicClock {
    /// Start a clock whose epoch is now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            epoch: web_time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for MonotonicClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}
