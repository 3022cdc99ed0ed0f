#![forbid(unsafe_code)]

//! Swipe-to-dismiss classification.
//!
//! Two layers:
//!
//! - [`is_in_direction`] is the pure policy: does a delta point along the
//!   configured axis, and is its dominant component past a threshold?
//! - [`SwipeTracker`] is the per-element recognizer fed with pointer down,
//!   move and up. It clamps raw movement to the closing side of the configured
//!   axis, recognizes a swipe once movement clears a small start buffer, and
//!   classifies the release as an end (dismiss) or a cancel.
//!
//! # Invariants
//!
//! 1. `delta` is only ever set while `origin` is set.
//! 2. A recognized swipe (`delta` set) is never abandoned; only a release,
//!    a cancel, a new press or [`SwipeTracker::reset`] ends it.
//! 3. A clamped delta has a zero component on the off-axis and never points
//!    away from the closing side.
//! 4. Release clears all state regardless of classification or of which
//!    pointer was lifted.
//!
//! # Failure Modes
//!
//! - Movement that clears the start buffer on the wrong axis (or the wrong
//!   sign) abandons tracking until the next press. No swipe callback fires.
//! - Moves from a pointer other than the one that pressed are ignored.
//! - A lost pointer-up (touch contacts get a fresh id each time) cannot wedge
//!   the tracker: any release ends the gesture, and a press from a new
//!   pointer interrupts a stale swipe.

use core::fmt;
use core::str::FromStr;

use crate::event::PointerType;
use crate::geometry::{Point, Vector};

/// Movement (px) a touch contact must clear before a swipe is recognized.
pub const TOUCH_MOVE_START_BUFFER: f64 = 10.0;

/// Movement (px) a mouse or pen must clear before a swipe is recognized.
pub const POINTER_MOVE_START_BUFFER: f64 = 2.0;

/// Default release distance (px) that turns a swipe into a dismissal.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 50.0;

// ---------------------------------------------------------------------------
// SwipeDirection
// ---------------------------------------------------------------------------

/// Direction in which a swipe dismisses a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SwipeDirection {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl SwipeDirection {
    /// Returns true for left/right.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    /// Returns true for up/down.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Lower-case name, as used in `data-swipe-direction`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Project a raw delta onto this direction's axis, keeping only the
    /// closing side. The off-axis component is zeroed and movement the
    /// other way clamps to zero.
    #[must_use]
    pub fn clamp(self, raw: Vector) -> Vector {
        match self {
            Self::Left => Vector::new(raw.x.min(0.0), 0.0),
            Self::Right => Vector::new(raw.x.max(0.0), 0.0),
            Self::Up => Vector::new(0.0, raw.y.min(0.0)),
            Self::Down => Vector::new(0.0, raw.y.max(0.0)),
        }
    }
}

impl fmt::Display for SwipeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown swipe direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSwipeDirectionError(String);

impl fmt::Display for ParseSwipeDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown swipe direction {:?} (expected up, down, left or right)",
            self.0
        )
    }
}

impl std::error::Error for ParseSwipeDirectionError {}

impl FromStr for SwipeDirection {
    type Err = ParseSwipeDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" | "Up" => Ok(Self::Up),
            "down" | "Down" => Ok(Self::Down),
            "left" | "Left" => Ok(Self::Left),
            "right" | "Right" => Ok(Self::Right),
            other => Err(ParseSwipeDirectionError(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Policy
// ---------------------------------------------------------------------------

/// Whether `delta` counts as movement along `direction`'s axis past
/// `threshold`.
///
/// Horizontal directions need `|x| > |y|`; vertical directions need
/// `|y| >= |x|`. The dominant component must then exceed `threshold`. Only the
/// axis is checked here; the sign is handled by [`SwipeDirection::clamp`].
#[must_use]
pub fn is_in_direction(delta: Vector, direction: SwipeDirection, threshold: f64) -> bool {
    let d = delta.abs();
    let horizontal_dominant = d.x > d.y;
    if direction.is_horizontal() {
        horizontal_dominant && d.x > threshold
    } else {
        !horizontal_dominant && d.y > threshold
    }
}

/// Start buffer for a pointer type.
#[must_use]
pub const fn move_start_buffer(pointer_type: PointerType) -> f64 {
    match pointer_type {
        PointerType::Touch => TOUCH_MOVE_START_BUFFER,
        PointerType::Mouse | PointerType::Pen => POINTER_MOVE_START_BUFFER,
    }
}

// ---------------------------------------------------------------------------
// SwipeTracker
// ---------------------------------------------------------------------------

/// Result of feeding one pointer event to a [`SwipeTracker`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SwipeTransition {
    /// The event did not touch gesture state.
    Ignored,
    /// A press recorded the gesture origin.
    Pressed,
    /// Movement is still inside the start buffer.
    Pending,
    /// Movement was recognized as a swipe along the configured direction.
    Started(Vector),
    /// A recognized swipe moved.
    Moved(Vector),
    /// Movement left the start buffer off-axis; tracking stopped.
    Abandoned,
    /// Released past the threshold: dismiss.
    Ended(Vector),
    /// Released short of the threshold.
    Cancelled(Vector),
    /// Released before any swipe was recognized.
    Released,
    /// A press interrupted the swipe owned by `pointer_id`; the new press is
    /// recorded.
    Interrupted { pointer_id: u32, delta: Vector },
}

impl SwipeTransition {
    /// True for `Ended` and `Cancelled`, the transitions that consume the
    /// synthetic click following the pointer-up.
    #[must_use]
    pub const fn completes_swipe(&self) -> bool {
        matches!(self, Self::Ended(_) | Self::Cancelled(_))
    }
}

/// Stateful swipe recognizer for one element.
///
/// Feed it [`press`](SwipeTracker::press), [`motion`](SwipeTracker::motion)
/// and [`release`](SwipeTracker::release). The caller acts on the returned
/// [`SwipeTransition`] (capture the pointer on `Started`, fire callbacks, and
/// so on); the tracker itself has no side effects.
#[derive(Debug, Clone, Default)]
pub struct SwipeTracker {
    origin: Option<Point>,
    delta: Option<Vector>,
    pointer_id: Option<u32>,
}

impl SwipeTracker {
    /// Create an idle tracker.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            origin: None,
            delta: None,
            pointer_id: None,
        }
    }

    /// Where the current gesture started, if one is being tracked.
    #[inline]
    #[must_use]
    pub const fn origin(&self) -> Option<Point> {
        self.origin
    }

    /// Clamped delta of the recognized swipe, if any.
    #[inline]
    #[must_use]
    pub const fn delta(&self) -> Option<Vector> {
        self.delta
    }

    /// Pointer that owns the current gesture.
    #[inline]
    #[must_use]
    pub const fn pointer_id(&self) -> Option<u32> {
        self.pointer_id
    }

    /// Whether a gesture origin is recorded.
    #[inline]
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }

    /// Whether a swipe has been recognized.
    #[inline]
    #[must_use]
    pub const fn is_swiping(&self) -> bool {
        self.delta.is_some()
    }

    /// Record a press of the main button at `position`.
    ///
    /// A press always starts a new gesture. If a swipe was recognized, it is
    /// dropped and reported as [`SwipeTransition::Interrupted`] so the caller
    /// can release the old pointer's capture.
    pub fn press(&mut self, pointer_id: u32, position: Point) -> SwipeTransition {
        let interrupted = self.delta.take().zip(self.pointer_id);
        self.origin = Some(position);
        self.pointer_id = Some(pointer_id);
        match interrupted {
            Some((delta, owner)) => SwipeTransition::Interrupted {
                pointer_id: owner,
                delta,
            },
            None => SwipeTransition::Pressed,
        }
    }

    /// Feed pointer movement.
    pub fn motion(
        &mut self,
        pointer_id: u32,
        position: Point,
        pointer_type: PointerType,
        direction: SwipeDirection,
    ) -> SwipeTransition {
        let Some(origin) = self.origin else {
            return SwipeTransition::Ignored;
        };
        if self.pointer_id != Some(pointer_id) {
            return SwipeTransition::Ignored;
        }

        let raw = position.delta_from(origin);
        let delta = direction.clamp(raw);
        let buffer = move_start_buffer(pointer_type);

        if self.delta.is_some() {
            self.delta = Some(delta);
            SwipeTransition::Moved(delta)
        } else if is_in_direction(delta, direction, buffer) {
            self.delta = Some(delta);
            #[cfg(feature = "tracing")]
            tracing::trace!(
                pointer_id,
                delta_x = delta.x,
                delta_y = delta.y,
                direction = direction.as_str(),
                "swipe recognized"
            );
            SwipeTransition::Started(delta)
        } else if raw.max_abs() > buffer {
            self.origin = None;
            self.pointer_id = None;
            #[cfg(feature = "tracing")]
            tracing::trace!(
                pointer_id,
                raw_x = raw.x,
                raw_y = raw.y,
                direction = direction.as_str(),
                "swipe abandoned"
            );
            SwipeTransition::Abandoned
        } else {
            SwipeTransition::Pending
        }
    }

    /// Feed a pointer release and classify the gesture.
    ///
    /// All gesture state is cleared on any release, whichever pointer it
    /// came from. Read [`pointer_id`](Self::pointer_id) first to learn which
    /// pointer owned the gesture.
    pub fn release(&mut self, direction: SwipeDirection, threshold: f64) -> SwipeTransition {
        if self.origin.is_none() {
            return SwipeTransition::Ignored;
        }

        let delta = self.delta.take();
        self.origin = None;
        self.pointer_id = None;

        match delta {
            Some(delta) if is_in_direction(delta, direction, threshold) => {
                SwipeTransition::Ended(delta)
            }
            Some(delta) => SwipeTransition::Cancelled(delta),
            None => SwipeTransition::Released,
        }
    }

    /// Abort the gesture without classifying it (`pointercancel`).
    ///
    /// Returns `Cancelled` when a swipe was recognized, `Released` when only
    /// a press was recorded, and `Ignored` when idle.
    pub fn cancel(&mut self) -> SwipeTransition {
        if self.origin.is_none() {
            return SwipeTransition::Ignored;
        }
        let delta = self.delta.take();
        self.origin = None;
        self.pointer_id = None;
        delta.map_or(SwipeTransition::Released, SwipeTransition::Cancelled)
    }

    /// Drop all gesture state.
    ///
    /// Returns the owning pointer id when a swipe was recognized, so the
    /// caller can release any capture it took on `Started`.
    pub fn reset(&mut self) -> Option<u32> {
        let swiping = self.delta.take().is_some();
        self.origin = None;
        let pointer_id = self.pointer_id.take();
        if swiping { pointer_id } else { None }
    }
}
