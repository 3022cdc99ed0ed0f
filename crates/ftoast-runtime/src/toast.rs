#![forbid(unsafe_code)]

//! Per-toast state machine.
//!
//! A [`Toast`] binds one toast element to its [`ToastGroup`] and host
//! surface. It owns the auto-dismiss timer, follows the group pause flag,
//! recognizes swipe-to-dismiss gestures, and handles Escape.
//!
//! # State Machine
//!
//! ```text
//!              mount()                    group paused
//! Unmounted ──────────▶ Active ◀────────────────────────▶ Paused
//!     ▲                  │  ▲            group resumed       │
//!     │ unmount()        │  │ set_open(true)                 │
//!     │                  ▼  │                                │
//!     └──────────────── Closed ◀──────── close ──────────────┘
//! ```
//!
//! A toast mounted while closed starts in `Closed`; one mounted into a
//! paused group starts in `Paused`.
//!
//! # Invariants
//!
//! 1. At most one timer callback is pending per toast.
//! 2. `on_pause` and `on_resume` alternate, starting with `on_pause`.
//! 3. Unmounting from any state cancels the timer, releases pointer capture
//!    and deregisters from the group exactly once.
//! 4. A close request is reported to the owner once until the owner answers
//!    with [`Toast::set_open`].
//! 5. A swipe belongs to the pointer that pressed; other pointers are
//!    ignored until it releases.
//!
//! # Failure Modes
//!
//! - **No mount target**: the toast stays logically open and its timer runs;
//!   [`Toast::is_rendered`] reports `false` until the group gets a target.
//! - **Re-entrant callbacks**: user callbacks may call back into the toast.
//!   No borrow is held while one runs. A callback that re-enters its own
//!   slot is skipped for the nested call.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use ftoast_core::compose::HandlerChain;
use ftoast_core::event::{DefaultPrevention, KeyEvent, PointerEvent};
use ftoast_core::geometry::Vector;
use ftoast_core::host::ToastHost;
use ftoast_core::swipe::{SwipeDirection, SwipeTracker, SwipeTransition};

use crate::error::ToastError;
use crate::group::{GroupSignal, GroupSubscription, ToastGroup, ToastId};
use crate::open_state::{OpenChange, OpenState};
use crate::timer::{PausableTimer, TimerState};

/// Urgency of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ToastKind {
    /// Result of a user action.
    #[default]
    Foreground,
    /// Background task notice.
    Background,
}

impl ToastKind {
    /// Attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Foreground => "foreground",
            Self::Background => "background",
        }
    }
}

/// Lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToastPhase {
    /// Not mounted under the group.
    Unmounted,
    /// Mounted, not open.
    Closed,
    /// Open and counting down (or persistent).
    Active,
    /// Open with the countdown suspended by the group.
    Paused,
}

/// Last swipe stage reached, exposed as an attribute for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipePhase {
    Start,
    Move,
    Cancel,
    End,
}

impl SwipePhase {
    /// Attribute value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Move => "move",
            Self::Cancel => "cancel",
            Self::End => "end",
        }
    }
}

/// Pointer event enriched with the clamped swipe delta.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeEvent {
    /// The pointer event that produced this swipe step.
    pub pointer: PointerEvent,
    /// Delta from the press position, clamped to the swipe direction.
    pub delta: Vector,
}

impl SwipeEvent {
    fn new(pointer: PointerEvent, delta: Vector) -> Self {
        Self { pointer, delta }
    }
}

impl DefaultPrevention for SwipeEvent {
    fn prevent_default(&mut self) {
        self.pointer.prevent_default();
    }

    fn is_default_prevented(&self) -> bool {
        self.pointer.is_default_prevented()
    }
}

/// State attributes for the toast element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastAttributes {
    pub role: &'static str,
    pub aria_live: &'static str,
    /// `"open"` or `"closed"`.
    pub state: &'static str,
    pub swipe_direction: SwipeDirection,
    pub swipe: Option<SwipePhase>,
    pub kind: ToastKind,
}

impl ToastAttributes {
    /// Attribute name/value pairs in DOM spelling.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, &'static str)> {
        let mut pairs = vec![
            ("role", self.role),
            ("aria-live", self.aria_live),
            ("data-state", self.state),
            ("data-swipe-direction", self.swipe_direction.as_str()),
            ("data-type", self.kind.as_str()),
        ];
        if let Some(phase) = self.swipe {
            pairs.push(("data-swipe", phase.as_str()));
        }
        pairs
    }
}

type Slot<A> = RefCell<Option<Box<dyn FnMut(A)>>>;

fn emit<A>(slot: &Slot<A>, arg: A) {
    let taken = slot.borrow_mut().take();
    if let Some(mut callback) = taken {
        callback(arg);
        let mut slot = slot.borrow_mut();
        if slot.is_none() {
            *slot = Some(callback);
        }
    }
}

/// Dispatch `event` through `chain`. Returns `true` when not prevented.
fn run_chain<E: DefaultPrevention>(chain: &RefCell<HandlerChain<E>>, event: &mut E) -> bool {
    let mut taken = std::mem::take(&mut *chain.borrow_mut());
    if taken.is_empty() {
        return !event.is_default_prevented();
    }
    let passed = taken.dispatch(event);
    *chain.borrow_mut() = taken;
    passed
}

struct ToastState {
    open: OpenState,
    close_requested: bool,
    duration: Option<Duration>,
    mounted: bool,
    phase: ToastPhase,
    swipe_phase: Option<SwipePhase>,
    subscription: Option<GroupSubscription>,
}

struct ToastShared {
    id: ToastId,
    group: ToastGroup,
    host: Rc<dyn ToastHost>,
    kind: ToastKind,
    timer: PausableTimer,
    state: RefCell<ToastState>,
    tracker: RefCell<SwipeTracker>,

    on_close: Slot<()>,
    on_open_change: Slot<bool>,
    on_pause: Slot<()>,
    on_resume: Slot<()>,

    on_key_down: RefCell<HandlerChain<KeyEvent>>,
    on_escape_key_down: RefCell<HandlerChain<KeyEvent>>,
    on_pointer_down: RefCell<HandlerChain<PointerEvent>>,
    on_pointer_move: RefCell<HandlerChain<PointerEvent>>,
    on_pointer_up: RefCell<HandlerChain<PointerEvent>>,
    on_swipe_start: RefCell<HandlerChain<SwipeEvent>>,
    on_swipe_move: RefCell<HandlerChain<SwipeEvent>>,
    on_swipe_cancel: RefCell<HandlerChain<SwipeEvent>>,
    on_swipe_end: RefCell<HandlerChain<SwipeEvent>>,
}

/// Builder for [`Toast`].
#[derive(Default)]
pub struct ToastBuilder {
    group: Option<ToastGroup>,
    host: Option<Rc<dyn ToastHost>>,
    kind: ToastKind,
    duration: Option<Duration>,
    open: OpenState,

    on_close: Option<Box<dyn FnMut(())>>,
    on_open_change: Option<Box<dyn FnMut(bool)>>,
    on_pause: Option<Box<dyn FnMut(())>>,
    on_resume: Option<Box<dyn FnMut(())>>,

    on_key_down: HandlerChain<KeyEvent>,
    on_escape_key_down: HandlerChain<KeyEvent>,
    on_pointer_down: HandlerChain<PointerEvent>,
    on_pointer_move: HandlerChain<PointerEvent>,
    on_pointer_up: HandlerChain<PointerEvent>,
    on_swipe_start: HandlerChain<SwipeEvent>,
    on_swipe_move: HandlerChain<SwipeEvent>,
    on_swipe_cancel: HandlerChain<SwipeEvent>,
    on_swipe_end: HandlerChain<SwipeEvent>,
}

impl fmt::Debug for ToastBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastBuilder")
            .field("has_group", &self.group.is_some())
            .field("has_host", &self.host.is_some())
            .field("kind", &self.kind)
            .field("duration", &self.duration)
            .field("open", &self.open)
            .finish_non_exhaustive()
    }
}

impl ToastBuilder {
    /// Group the toast belongs to. Required.
    #[must_use]
    pub fn group(mut self, group: &ToastGroup) -> Self {
        self.group = Some(group.clone());
        self
    }

    /// Host surface of the toast element. Required.
    #[must_use]
    pub fn host(mut self, host: Rc<dyn ToastHost>) -> Self {
        self.host = Some(host);
        self
    }

    #[must_use]
    pub fn kind(mut self, kind: ToastKind) -> Self {
        self.kind = kind;
        self
    }

    /// Per-toast auto-dismiss time. Zero falls back to the group duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Never auto-dismiss, whatever the group duration.
    #[must_use]
    pub fn persistent(mut self) -> Self {
        self.duration = Some(Duration::MAX);
        self
    }

    /// Uncontrolled open state with an initial value (default `true`).
    #[must_use]
    pub fn default_open(mut self, open: bool) -> Self {
        self.open = OpenState::uncontrolled(open);
        self
    }

    /// Controlled open state. Close requests go to
    /// [`on_open_change`](Self::on_open_change); answer with
    /// [`Toast::set_open`].
    #[must_use]
    pub fn open(mut self, open: bool) -> Self {
        self.open = OpenState::controlled(open);
        self
    }

    #[must_use]
    pub fn on_close(mut self, mut callback: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(move |()| callback()));
        self
    }

    #[must_use]
    pub fn on_open_change(mut self, callback: impl FnMut(bool) + 'static) -> Self {
        self.on_open_change = Some(Box::new(callback));
        self
    }

    #[must_use]
    pub fn on_pause(mut self, mut callback: impl FnMut() + 'static) -> Self {
        self.on_pause = Some(Box::new(move |()| callback()));
        self
    }

    #[must_use]
    pub fn on_resume(mut self, mut callback: impl FnMut() + 'static) -> Self {
        self.on_resume = Some(Box::new(move |()| callback()));
        self
    }

    /// Runs on Escape before the toast closes. Prevent default to keep it
    /// open.
    #[must_use]
    pub fn on_escape_key_down(mut self, handler: impl FnMut(&mut KeyEvent) + 'static) -> Self {
        self.on_escape_key_down.push(handler);
        self
    }

    /// Runs on every key press before internal handling.
    #[must_use]
    pub fn on_key_down(mut self, handler: impl FnMut(&mut KeyEvent) + 'static) -> Self {
        self.on_key_down.push(handler);
        self
    }

    #[must_use]
    pub fn on_pointer_down(mut self, handler: impl FnMut(&mut PointerEvent) + 'static) -> Self {
        self.on_pointer_down.push(handler);
        self
    }

    #[must_use]
    pub fn on_pointer_move(mut self, handler: impl FnMut(&mut PointerEvent) + 'static) -> Self {
        self.on_pointer_move.push(handler);
        self
    }

    #[must_use]
    pub fn on_pointer_up(mut self, handler: impl FnMut(&mut PointerEvent) + 'static) -> Self {
        self.on_pointer_up.push(handler);
        self
    }

    #[must_use]
    pub fn on_swipe_start(mut self, handler: impl FnMut(&mut SwipeEvent) + 'static) -> Self {
        self.on_swipe_start.push(handler);
        self
    }

    #[must_use]
    pub fn on_swipe_move(mut self, handler: impl FnMut(&mut SwipeEvent) + 'static) -> Self {
        self.on_swipe_move.push(handler);
        self
    }

    #[must_use]
    pub fn on_swipe_cancel(mut self, handler: impl FnMut(&mut SwipeEvent) + 'static) -> Self {
        self.on_swipe_cancel.push(handler);
        self
    }

    /// Runs when a swipe is released past the threshold. Prevent default to
    /// keep the toast open.
    #[must_use]
    pub fn on_swipe_end(mut self, handler: impl FnMut(&mut SwipeEvent) + 'static) -> Self {
        self.on_swipe_end.push(handler);
        self
    }

    /// Build the toast. It is not mounted yet.
    pub fn build(self) -> Result<Toast, ToastError> {
        let group = self.group.ok_or(ToastError::MissingGroup)?;
        let host = self.host.ok_or(ToastError::MissingHost)?;
        let id = group.next_toast_id();

        let shared = Rc::new_cyclic(|weak: &Weak<ToastShared>| {
            let weak = weak.clone();
            let timer = PausableTimer::new(move || {
                if let Some(shared) = weak.upgrade() {
                    shared.timer_expired();
                }
            });
            ToastShared {
                id,
                group,
                host,
                kind: self.kind,
                timer,
                state: RefCell::new(ToastState {
                    open: self.open,
                    close_requested: false,
                    duration: self.duration,
                    mounted: false,
                    phase: ToastPhase::Unmounted,
                    swipe_phase: None,
                    subscription: None,
                }),
                tracker: RefCell::new(SwipeTracker::new()),
                on_close: RefCell::new(self.on_close),
                on_open_change: RefCell::new(self.on_open_change),
                on_pause: RefCell::new(self.on_pause),
                on_resume: RefCell::new(self.on_resume),
                on_key_down: RefCell::new(self.on_key_down),
                on_escape_key_down: RefCell::new(self.on_escape_key_down),
                on_pointer_down: RefCell::new(self.on_pointer_down),
                on_pointer_move: RefCell::new(self.on_pointer_move),
                on_pointer_up: RefCell::new(self.on_pointer_up),
                on_swipe_start: RefCell::new(self.on_swipe_start),
                on_swipe_move: RefCell::new(self.on_swipe_move),
                on_swipe_cancel: RefCell::new(self.on_swipe_cancel),
                on_swipe_end: RefCell::new(self.on_swipe_end),
            }
        });
        Ok(Toast { shared })
    }
}

/// One toast element. Dropping it unmounts.
pub struct Toast {
    shared: Rc<ToastShared>,
}

impl fmt::Debug for Toast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.borrow();
        f.debug_struct("Toast")
            .field("id", &self.shared.id)
            .field("kind", &self.shared.kind)
            .field("phase", &state.phase)
            .field("open", &state.open)
            .field("timer", &self.shared.timer)
            .finish()
    }
}

impl Drop for Toast {
    fn drop(&mut self) {
        self.shared.unmount();
    }
}

impl Toast {
    /// Start building a toast.
    #[must_use]
    pub fn builder() -> ToastBuilder {
        ToastBuilder::default()
    }

    #[must_use]
    pub fn id(&self) -> ToastId {
        self.shared.id
    }

    #[must_use]
    pub fn kind(&self) -> ToastKind {
        self.shared.kind
    }

    #[must_use]
    pub fn group(&self) -> &ToastGroup {
        &self.shared.group
    }

    #[must_use]
    pub fn phase(&self) -> ToastPhase {
        self.shared.state.borrow().phase
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.shared.state.borrow().open.is_open()
    }

    #[must_use]
    pub fn is_controlled(&self) -> bool {
        self.shared.state.borrow().open.is_controlled()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.shared.state.borrow().mounted
    }

    /// Mounted, open, and the group has a mount target.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        let state = self.shared.state.borrow();
        state.mounted && state.open.is_open() && self.shared.group.mount_target().is_some()
    }

    /// Auto-dismiss time in effect. `None` means never.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        self.shared.effective_duration()
    }

    /// Countdown left, as of the host clock.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.shared.timer.remaining(&*self.shared.host)
    }

    #[must_use]
    pub fn timer_state(&self) -> TimerState {
        self.shared.timer.state()
    }

    #[must_use]
    pub fn is_swiping(&self) -> bool {
        self.shared.tracker.borrow().is_swiping()
    }

    /// Clamped delta of the swipe in progress.
    #[must_use]
    pub fn swipe_delta(&self) -> Option<Vector> {
        self.shared.tracker.borrow().delta()
    }

    #[must_use]
    pub fn swipe_phase(&self) -> Option<SwipePhase> {
        self.shared.state.borrow().swipe_phase
    }

    /// Current state attributes.
    #[must_use]
    pub fn attributes(&self) -> ToastAttributes {
        let state = self.shared.state.borrow();
        ToastAttributes {
            role: "status",
            aria_live: "off",
            state: if state.open.is_open() {
                "open"
            } else {
                "closed"
            },
            swipe_direction: self.shared.group.swipe_direction(),
            swipe: state.swipe_phase,
            kind: self.shared.kind,
        }
    }

    /// Register with the group and arm the timer if open.
    pub fn mount(&self) {
        self.shared.mount();
    }

    /// Deregister, cancel the timer, and release pointer capture.
    pub fn unmount(&self) {
        self.shared.unmount();
    }

    /// Owner-driven open state change.
    pub fn set_open(&self, open: bool) {
        self.shared.set_open(open);
    }

    /// Ask to close, as the timer, Escape, and swipes do.
    pub fn close(&self) {
        self.shared.request_close();
    }

    /// Change the per-toast duration and re-arm if open.
    pub fn set_duration(&self, duration: Option<Duration>) {
        self.shared.set_duration(duration);
    }

    /// Key press delivered to the focused toast element.
    pub fn key_down(&self, event: &mut KeyEvent) {
        self.shared.key_down(event);
    }

    /// Escape seen by the dismissable layer around the toast. Returns `true`
    /// if it closed the toast.
    pub fn layer_escape_key_down(&self, event: &mut KeyEvent) -> bool {
        self.shared.layer_escape_key_down(event)
    }

    pub fn pointer_down(&self, event: &mut PointerEvent) {
        self.shared.pointer_down(event);
    }

    pub fn pointer_move(&self, event: &mut PointerEvent) {
        self.shared.pointer_move(event);
    }

    /// Pointer released. Ends any gesture in progress, whichever pointer
    /// owned it.
    pub fn pointer_up(&self, event: &mut PointerEvent) {
        self.shared.pointer_up(event);
    }

    /// The host aborted the pointer (`pointercancel`). A recognized swipe is
    /// cancelled without dismissing and without suppressing a click.
    pub fn pointer_cancel(&self, event: &mut PointerEvent) {
        self.shared.pointer_cancel(event);
    }
}

impl ToastShared {
    fn effective_duration(&self) -> Option<Duration> {
        let own = self.state.borrow().duration.filter(|d| !d.is_zero());
        own.or_else(|| self.group.duration())
            .filter(|d| *d != Duration::MAX)
    }

    fn set_phase(&self, phase: ToastPhase) {
        self.state.borrow_mut().phase = phase;
    }

    // --- Lifecycle --------------------------------------------------------

    fn mount(self: &Rc<Self>) {
        if self.state.borrow().mounted {
            return;
        }
        let weak = Rc::downgrade(self);
        let subscription = self.group.subscribe(move |signal| {
            if let Some(shared) = weak.upgrade() {
                shared.group_signal(signal);
            }
        });
        let open = {
            let mut state = self.state.borrow_mut();
            state.mounted = true;
            state.phase = ToastPhase::Closed;
            state.subscription = Some(subscription);
            state.open.is_open()
        };
        self.group.notify_add();
        tracing::debug!(
            toast_id = self.id.get(),
            toast_count = self.group.toast_count(),
            open,
            "toast mounted"
        );
        if open {
            self.arm();
        }
    }

    fn unmount(&self) {
        let subscription = {
            let mut state = self.state.borrow_mut();
            if !state.mounted {
                return;
            }
            state.mounted = false;
            state.phase = ToastPhase::Unmounted;
            state.swipe_phase = None;
            state.subscription.take()
        };
        drop(subscription);
        self.timer.cancel(&*self.host);
        self.reset_swipe();
        self.group.notify_remove();
        tracing::debug!(
            toast_id = self.id.get(),
            toast_count = self.group.toast_count(),
            "toast unmounted"
        );
    }

    /// Start (or hold, if the group is paused) the countdown for an open,
    /// mounted toast.
    fn arm(&self) {
        let duration = self.effective_duration();
        if self.group.is_paused() {
            self.timer.hold(&*self.host, duration);
            self.set_phase(ToastPhase::Paused);
            tracing::debug!(
                toast_id = self.id.get(),
                remaining_ms = duration.map(|d| d.as_millis() as u64),
                "toast armed while group paused"
            );
            emit(&self.on_pause, ());
        } else {
            self.timer.cancel(&*self.host);
            self.timer.start(&*self.host, duration);
            self.set_phase(ToastPhase::Active);
            tracing::debug!(
                toast_id = self.id.get(),
                remaining_ms = duration.map(|d| d.as_millis() as u64),
                "toast armed"
            );
        }
    }

    fn set_open(&self, open: bool) {
        let (changed, mounted) = {
            let mut state = self.state.borrow_mut();
            state.close_requested = false;
            (state.open.set(open), state.mounted)
        };
        if !changed {
            return;
        }
        if open {
            if mounted {
                self.arm();
            }
        } else {
            self.apply_closed();
        }
    }

    fn apply_closed(&self) {
        self.timer.cancel(&*self.host);
        self.reset_swipe();
        {
            let mut state = self.state.borrow_mut();
            if state.mounted {
                state.phase = ToastPhase::Closed;
            }
        }
        tracing::debug!(toast_id = self.id.get(), "toast closed");
    }

    fn request_close(&self) {
        let change = {
            let mut state = self.state.borrow_mut();
            if state.close_requested {
                return;
            }
            let change = state.open.request(false);
            if change == OpenChange::Requested {
                state.close_requested = true;
            }
            change
        };
        match change {
            OpenChange::Unchanged => return,
            OpenChange::Applied => self.apply_closed(),
            OpenChange::Requested => {
                tracing::debug!(toast_id = self.id.get(), "toast close requested from owner");
            }
        }
        emit(&self.on_open_change, false);
        emit(&self.on_close, ());
    }

    fn set_duration(&self, duration: Option<Duration>) {
        let (mounted, open, phase) = {
            let mut state = self.state.borrow_mut();
            state.duration = duration;
            (state.mounted, state.open.is_open(), state.phase)
        };
        if !(mounted && open) {
            return;
        }
        let effective = self.effective_duration();
        if phase == ToastPhase::Paused {
            self.timer.cancel(&*self.host);
            self.timer.hold(&*self.host, effective);
        } else {
            self.timer.cancel(&*self.host);
            self.timer.start(&*self.host, effective);
        }
        tracing::debug!(
            toast_id = self.id.get(),
            remaining_ms = effective.map(|d| d.as_millis() as u64),
            "toast duration changed"
        );
    }

    fn timer_expired(&self) {
        tracing::debug!(toast_id = self.id.get(), "toast timer expired");
        if self.state.borrow().phase == ToastPhase::Active {
            self.request_close();
        }
    }

    fn group_signal(&self, signal: GroupSignal) {
        match signal {
            GroupSignal::Paused | GroupSignal::Resumed => self.sync_pause(),
            GroupSignal::MountTargetChanged(target) => {
                tracing::trace!(
                    toast_id = self.id.get(),
                    mount_target = target.map(|t| t.raw()),
                    "toast mount target changed"
                );
            }
        }
    }

    /// Bring the timer in line with the group's pause flag.
    ///
    /// Reads the flag rather than trusting the signal: a listener may flip it
    /// again while an earlier signal is still being delivered.
    fn sync_pause(&self) {
        let phase = self.state.borrow().phase;
        match (self.group.is_paused(), phase) {
            (true, ToastPhase::Active) => {
                let remaining = self.timer.pause(&*self.host);
                self.set_phase(ToastPhase::Paused);
                tracing::debug!(
                    toast_id = self.id.get(),
                    remaining_ms = remaining.map(|d| d.as_millis() as u64),
                    "toast paused"
                );
                emit(&self.on_pause, ());
            }
            (false, ToastPhase::Paused) => {
                self.set_phase(ToastPhase::Active);
                tracing::debug!(
                    toast_id = self.id.get(),
                    remaining_ms = self
                        .timer
                        .remaining(&*self.host)
                        .map(|d| d.as_millis() as u64),
                    "toast resumed"
                );
                self.timer.resume(&*self.host);
                emit(&self.on_resume, ());
            }
            _ => {}
        }
    }

    // --- Keyboard ---------------------------------------------------------

    fn key_down(&self, event: &mut KeyEvent) {
        if !run_chain(&self.on_key_down, event) || !event.is_escape() {
            return;
        }
        // A press already consumed by another toast in the group is not ours.
        if self.group.is_focused_escape_pending() {
            return;
        }
        if !run_chain(&self.on_escape_key_down, event) {
            return;
        }
        self.group.mark_focused_escape();
        tracing::debug!(toast_id = self.id.get(), "escape on focused toast");
        self.request_close();
    }

    fn layer_escape_key_down(&self, event: &mut KeyEvent) -> bool {
        if self.group.take_focused_escape() {
            return false;
        }
        if !run_chain(&self.on_escape_key_down, event) {
            return false;
        }
        let was_open = self.state.borrow().open.is_open();
        self.request_close();
        was_open
    }

    // --- Swipe ------------------------------------------------------------

    fn reset_swipe(&self) {
        let pointer_id = self.tracker.borrow_mut().reset();
        if let Some(pointer_id) = pointer_id
            && self.host.has_pointer_capture(pointer_id)
        {
            self.host.release_pointer_capture(pointer_id);
        }
    }

    fn release_capture(&self, pointer_id: u32) {
        if self.host.has_pointer_capture(pointer_id) {
            self.host.release_pointer_capture(pointer_id);
        }
    }

    /// Report a swipe dropped without a release: cancel phase and callbacks,
    /// no click suppression.
    fn swipe_aborted(&self, event: &PointerEvent, owner: u32, delta: Vector) {
        self.release_capture(owner);
        self.state.borrow_mut().swipe_phase = Some(SwipePhase::Cancel);
        tracing::debug!(
            toast_id = self.id.get(),
            pointer_id = owner,
            delta_x = delta.x,
            delta_y = delta.y,
            "swipe aborted"
        );
        let mut swipe = SwipeEvent::new(*event, delta);
        run_chain(&self.on_swipe_cancel, &mut swipe);
    }

    fn pointer_down(&self, event: &mut PointerEvent) {
        if !run_chain(&self.on_pointer_down, event) || !event.button.is_primary() {
            return;
        }
        let transition = self
            .tracker
            .borrow_mut()
            .press(event.pointer_id, event.position);
        if let SwipeTransition::Interrupted { pointer_id, delta } = transition {
            self.swipe_aborted(event, pointer_id, delta);
        }
    }

    fn pointer_cancel(&self, event: &mut PointerEvent) {
        let owner = self.tracker.borrow().pointer_id();
        self.release_capture(event.pointer_id);
        let transition = self.tracker.borrow_mut().cancel();
        match (transition, owner) {
            (SwipeTransition::Cancelled(delta), Some(owner)) => {
                self.swipe_aborted(event, owner, delta);
            }
            (_, Some(owner)) => self.release_capture(owner),
            _ => {}
        }
    }

    fn pointer_move(&self, event: &mut PointerEvent) {
        if !run_chain(&self.on_pointer_move, event) {
            return;
        }
        let direction = self.group.swipe_direction();
        let transition = self.tracker.borrow_mut().motion(
            event.pointer_id,
            event.position,
            event.pointer_type,
            direction,
        );
        match transition {
            SwipeTransition::Started(delta) => {
                self.host.set_pointer_capture(event.pointer_id);
                self.state.borrow_mut().swipe_phase = Some(SwipePhase::Start);
                tracing::debug!(
                    toast_id = self.id.get(),
                    pointer_id = event.pointer_id,
                    delta_x = delta.x,
                    delta_y = delta.y,
                    "swipe start"
                );
                let mut swipe = SwipeEvent::new(*event, delta);
                run_chain(&self.on_swipe_start, &mut swipe);
            }
            SwipeTransition::Moved(delta) => {
                self.state.borrow_mut().swipe_phase = Some(SwipePhase::Move);
                tracing::trace!(
                    toast_id = self.id.get(),
                    pointer_id = event.pointer_id,
                    delta_x = delta.x,
                    delta_y = delta.y,
                    "swipe move"
                );
                let mut swipe = SwipeEvent::new(*event, delta);
                run_chain(&self.on_swipe_move, &mut swipe);
            }
            SwipeTransition::Abandoned => {
                tracing::trace!(
                    toast_id = self.id.get(),
                    pointer_id = event.pointer_id,
                    "swipe abandoned"
                );
            }
            _ => {}
        }
    }

    fn pointer_up(&self, event: &mut PointerEvent) {
        if !run_chain(&self.on_pointer_up, event) {
            return;
        }
        self.release_capture(event.pointer_id);
        let owner = self.tracker.borrow().pointer_id();
        if let Some(owner) = owner {
            self.release_capture(owner);
        }
        let transition = self
            .tracker
            .borrow_mut()
            .release(self.group.swipe_direction(), self.group.swipe_threshold());
        match transition {
            SwipeTransition::Ended(delta) => {
                self.state.borrow_mut().swipe_phase = Some(SwipePhase::End);
                tracing::debug!(
                    toast_id = self.id.get(),
                    pointer_id = event.pointer_id,
                    delta_x = delta.x,
                    delta_y = delta.y,
                    "swipe end"
                );
                let mut swipe = SwipeEvent::new(*event, delta);
                if run_chain(&self.on_swipe_end, &mut swipe) {
                    self.request_close();
                }
                self.host.suppress_next_click();
            }
            SwipeTransition::Cancelled(delta) => {
                self.state.borrow_mut().swipe_phase = Some(SwipePhase::Cancel);
                tracing::debug!(
                    toast_id = self.id.get(),
                    pointer_id = event.pointer_id,
                    delta_x = delta.x,
                    delta_y = delta.y,
                    "swipe cancel"
                );
                let mut swipe = SwipeEvent::new(*event, delta);
                run_chain(&self.on_swipe_cancel, &mut swipe);
                self.host.suppress_next_click();
            }
            _ => {}
        }
    }
}
