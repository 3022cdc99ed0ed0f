#![forbid(unsafe_code)]

//! Shared per-group toast state.
//!
//! A [`ToastGroup`] is created once per toast region and handed to every
//! toast in it. It owns the group configuration, the live toast count, the
//! group-wide pause flag, the mount target, and the one-shot focused-Escape
//! flag. Toasts observe pause changes through [`ToastGroup::subscribe`].
//!
//! # Invariants
//!
//! 1. `toast_count` never goes below zero; `notify_remove` saturates.
//! 2. At most one mount target is active at a time.
//! 3. Pausing is group-wide: one flag, read by every toast.
//! 4. [`GroupSignal::Paused`] / [`GroupSignal::Resumed`] fire only on an
//!    actual change of the pause flag, in subscription order.
//! 5. The focused-Escape flag is consumed by the first
//!    [`take_focused_escape`](ToastGroup::take_focused_escape) that sees it.
//!
//! # Failure Modes
//!
//! - **Re-entrant notification**: subscribers may call back into the group
//!   (including `set_paused`). Callbacks are collected before any is run, so
//!   no borrow is held across a callback. A nested change notifies
//!   subscribers again before the outer loop continues, so later subscribers
//!   may then see a stale signal; subscribers must read
//!   [`ToastGroup::is_paused`] instead of trusting the signal.
//! - **Dead subscribers**: dropped [`GroupSubscription`] guards leave dead
//!   weak entries that are pruned on the next notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use ftoast_core::host::MountTarget;
use ftoast_core::swipe::SwipeDirection;

use crate::config::ToastGroupConfig;
use crate::error::ConfigError;

/// Group-unique toast identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToastId(u64);

impl ToastId {
    /// Numeric id.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ToastId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "toast-{}", self.0)
    }
}

/// Change notification delivered to group subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupSignal {
    /// The pause flag went from false to true.
    Paused,
    /// The pause flag went from true to false.
    Resumed,
    /// The mount target was set, replaced, or cleared.
    MountTargetChanged(Option<MountTarget>),
}

type ListenerRc = Rc<dyn Fn(GroupSignal)>;
type ListenerWeak = Weak<dyn Fn(GroupSignal)>;

struct GroupInner {
    config: ToastGroupConfig,
    toast_count: usize,
    mount_target: Option<MountTarget>,
    paused: bool,
    focused_escape: bool,
    hovered: bool,
    focused: bool,
    next_toast_id: u64,
    listeners: Vec<ListenerWeak>,
}

/// Handle to the shared state of one toast group.
///
/// Cloning creates another handle to the **same** group.
#[derive(Clone)]
pub struct ToastGroup {
    inner: Rc<RefCell<GroupInner>>,
}

impl fmt::Debug for ToastGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ToastGroup")
            .field("config", &inner.config)
            .field("toast_count", &inner.toast_count)
            .field("mount_target", &inner.mount_target)
            .field("paused", &inner.paused)
            .field("focused_escape", &inner.focused_escape)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl ToastGroup {
    /// Create a group from a validated configuration.
    pub fn new(config: ToastGroupConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    /// Create a group with the default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::from_valid(ToastGroupConfig::default())
    }

    fn from_valid(config: ToastGroupConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(GroupInner {
                config,
                toast_count: 0,
                mount_target: None,
                paused: false,
                focused_escape: false,
                hovered: false,
                focused: false,
                next_toast_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Whether two handles refer to the same group.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Non-owning handle, for hosts that must not keep a group alive.
    #[must_use]
    pub fn downgrade(&self) -> WeakToastGroup {
        WeakToastGroup {
            inner: Rc::downgrade(&self.inner),
        }
    }

    // --- Configuration ----------------------------------------------------

    /// Snapshot of the configuration.
    #[must_use]
    pub fn config(&self) -> ToastGroupConfig {
        self.inner.borrow().config.clone()
    }

    /// Default auto-dismiss duration. `None` means never.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.inner.borrow().config.duration
    }

    /// Accessible label of the toast region.
    #[must_use]
    pub fn label(&self) -> String {
        self.inner.borrow().config.label.clone()
    }

    /// Configured swipe direction.
    #[must_use]
    pub fn swipe_direction(&self) -> SwipeDirection {
        self.inner.borrow().config.swipe_direction
    }

    /// Configured swipe threshold in pixels.
    #[must_use]
    pub fn swipe_threshold(&self) -> f64 {
        self.inner.borrow().config.swipe_threshold
    }

    // --- Live state -------------------------------------------------------

    /// Number of mounted toasts.
    #[must_use]
    pub fn toast_count(&self) -> usize {
        self.inner.borrow().toast_count
    }

    /// Whether timers are paused group-wide.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.inner.borrow().paused
    }

    /// Element toasts render under, if one is set.
    #[must_use]
    pub fn mount_target(&self) -> Option<MountTarget> {
        self.inner.borrow().mount_target
    }

    /// Set the pause flag. Subscribers hear about it only if it changed.
    pub fn set_paused(&self, paused: bool) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.paused == paused {
                return;
            }
            inner.paused = paused;
        }
        tracing::debug!(paused, "toast group pause changed");
        self.notify(if paused {
            GroupSignal::Paused
        } else {
            GroupSignal::Resumed
        });
    }

    /// Replace the mount target. `None` defers rendering of every toast.
    pub fn set_mount_target(&self, target: Option<MountTarget>) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.mount_target == target {
                return;
            }
            inner.mount_target = target;
        }
        tracing::debug!(
            mount_target = target.map(MountTarget::raw),
            "toast group mount target changed"
        );
        self.notify(GroupSignal::MountTargetChanged(target));
    }

    /// Register a mounted toast.
    pub fn notify_add(&self) {
        let toast_count = {
            let mut inner = self.inner.borrow_mut();
            inner.toast_count += 1;
            inner.toast_count
        };
        tracing::debug!(toast_count, "toast registered");
    }

    /// Deregister an unmounted toast. Floors at zero.
    pub fn notify_remove(&self) {
        let toast_count = {
            let mut inner = self.inner.borrow_mut();
            inner.toast_count = inner.toast_count.saturating_sub(1);
            inner.toast_count
        };
        tracing::debug!(toast_count, "toast deregistered");
    }

    // --- Focused Escape one-shot -----------------------------------------

    /// Record that a focused toast consumed an Escape press.
    pub fn mark_focused_escape(&self) {
        self.inner.borrow_mut().focused_escape = true;
    }

    /// Read and clear the focused-Escape flag.
    ///
    /// Returns `true` exactly once after each
    /// [`mark_focused_escape`](Self::mark_focused_escape).
    pub fn take_focused_escape(&self) -> bool {
        std::mem::take(&mut self.inner.borrow_mut().focused_escape)
    }

    /// Whether a focused Escape is waiting to be consumed.
    #[must_use]
    pub fn is_focused_escape_pending(&self) -> bool {
        self.inner.borrow().focused_escape
    }

    // --- Region hover / focus --------------------------------------------

    /// Pointer entered the toast region.
    pub fn pointer_enter(&self) {
        self.inner.borrow_mut().hovered = true;
        self.sync_region_pause();
    }

    /// Pointer left the toast region.
    pub fn pointer_leave(&self) {
        self.inner.borrow_mut().hovered = false;
        self.sync_region_pause();
    }

    /// Focus moved into the toast region.
    pub fn focus_in(&self) {
        self.inner.borrow_mut().focused = true;
        self.sync_region_pause();
    }

    /// Focus left the toast region.
    pub fn focus_out(&self) {
        self.inner.borrow_mut().focused = false;
        self.sync_region_pause();
    }

    fn sync_region_pause(&self) {
        let paused = {
            let inner = self.inner.borrow();
            inner.hovered || inner.focused
        };
        self.set_paused(paused);
    }

    /// State attributes of the region element.
    #[must_use]
    pub fn region_attributes(&self) -> Vec<(&'static str, String)> {
        let inner = self.inner.borrow();
        vec![
            ("role", "region".to_owned()),
            ("aria-label", inner.config.label.clone()),
            ("tabindex", "-1".to_owned()),
            (
                "data-paused",
                if inner.paused { "true" } else { "false" }.to_owned(),
            ),
        ]
    }

    // --- Subscriptions ---------------------------------------------------

    /// Listen for group changes until the returned guard is dropped.
    pub fn subscribe(&self, listener: impl Fn(GroupSignal) + 'static) -> GroupSubscription {
        let strong: ListenerRc = Rc::new(listener);
        self.inner
            .borrow_mut()
            .listeners
            .push(Rc::downgrade(&strong));
        GroupSubscription { _guard: strong }
    }

    /// Registered listeners, including dead ones not yet pruned.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    pub(crate) fn next_toast_id(&self) -> ToastId {
        let mut inner = self.inner.borrow_mut();
        inner.next_toast_id += 1;
        ToastId(inner.next_toast_id)
    }

    fn notify(&self, signal: GroupSignal) {
        let listeners: Vec<ListenerRc> = {
            let mut inner = self.inner.borrow_mut();
            inner.listeners.retain(|w| w.strong_count() > 0);
            inner.listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in &listeners {
            listener(signal);
        }
    }
}

/// Weak counterpart of [`ToastGroup`].
#[derive(Clone)]
pub struct WeakToastGroup {
    inner: Weak<RefCell<GroupInner>>,
}

impl WeakToastGroup {
    /// The group, if it is still alive.
    #[must_use]
    pub fn upgrade(&self) -> Option<ToastGroup> {
        self.inner.upgrade().map(|inner| ToastGroup { inner })
    }
}

impl fmt::Debug for WeakToastGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakToastGroup")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

/// RAII guard for a group listener. Dropping it unsubscribes.
pub struct GroupSubscription {
    _guard: ListenerRc,
}

impl fmt::Debug for GroupSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupSubscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn weak_handle_does_not_keep_group_alive() {
        let group = ToastGroup::with_defaults();
        let weak = group.downgrade();
        assert!(weak.upgrade().is_some_and(|g| g.ptr_eq(&group)));
        drop(group);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn new_group_starts_empty() {
        let group = ToastGroup::with_defaults();
        assert_eq!(group.toast_count(), 0);
        assert!(!group.is_paused());
        assert_eq!(group.mount_target(), None);
        assert!(!group.is_focused_escape_pending());
        assert_eq!(group.duration(), Some(Duration::from_millis(500)));
        assert_eq!(group.label(), "notification");
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = ToastGroup::new(ToastGroupConfig::new().swipe_threshold(-1.0));
        assert!(matches!(err, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn count_floors_at_zero() {
        let group = ToastGroup::with_defaults();
        group.notify_add();
        group.notify_add();
        group.notify_remove();
        group.notify_remove();
        group.notify_remove();
        assert_eq!(group.toast_count(), 0);
        group.notify_add();
        assert_eq!(group.toast_count(), 1);
    }

    #[test]
    fn pause_notifies_only_on_change() {
        let group = ToastGroup::with_defaults();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let _sub = group.subscribe(move |s| l.borrow_mut().push(s));

        group.set_paused(true);
        group.set_paused(true);
        group.set_paused(false);
        group.set_paused(false);
        assert_eq!(
            *log.borrow(),
            vec![GroupSignal::Paused, GroupSignal::Resumed]
        );
    }

    #[test]
    fn dropped_subscription_stops_delivery() {
        let group = ToastGroup::with_defaults();
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        let sub = group.subscribe(move |_| h.set(h.get() + 1));
        group.set_paused(true);
        drop(sub);
        group.set_paused(false);
        assert_eq!(hits.get(), 1);
        assert_eq!(group.listener_count(), 0);
    }

    #[test]
    fn listener_may_reenter_group() {
        let group = ToastGroup::with_defaults();
        let g = group.clone();
        let _sub = group.subscribe(move |s| {
            if s == GroupSignal::Paused {
                g.mark_focused_escape();
                assert!(g.is_paused());
            }
        });
        group.set_paused(true);
        assert!(group.is_focused_escape_pending());
    }

    #[test]
    fn focused_escape_is_consumed_once() {
        let group = ToastGroup::with_defaults();
        assert!(!group.take_focused_escape());
        group.mark_focused_escape();
        assert!(group.take_focused_escape());
        assert!(!group.take_focused_escape());
    }

    #[test]
    fn mount_target_replacement_notifies() {
        let group = ToastGroup::with_defaults();
        let log = Rc::new(RefCell::new(Vec::new()));
        let l = Rc::clone(&log);
        let _sub = group.subscribe(move |s| l.borrow_mut().push(s));

        let a = MountTarget::from_raw(1);
        group.set_mount_target(Some(a));
        group.set_mount_target(Some(a));
        group.set_mount_target(None);
        assert_eq!(
            *log.borrow(),
            vec![
                GroupSignal::MountTargetChanged(Some(a)),
                GroupSignal::MountTargetChanged(None),
            ]
        );
    }

    #[test]
    fn region_hover_and_focus_pause_together() {
        let group = ToastGroup::with_defaults();
        group.pointer_enter();
        assert!(group.is_paused());
        group.focus_in();
        group.pointer_leave();
        assert!(group.is_paused(), "focus keeps the group paused");
        group.focus_out();
        assert!(!group.is_paused());
    }

    #[test]
    fn toast_ids_are_unique_per_group() {
        let group = ToastGroup::with_defaults();
        let a = group.next_toast_id();
        let b = group.next_toast_id();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "toast-1");
    }

    #[test]
    fn region_attributes_carry_label() {
        let group = ToastGroup::new(ToastGroupConfig::new().label("Alerts")).expect("valid");
        let attrs = group.region_attributes();
        assert!(attrs.contains(&("aria-label", "Alerts".to_owned())));
        assert!(attrs.contains(&("data-paused", "false".to_owned())));
    }
}
