// Forbid unsafe in production; deny in tests.
#![cfg_attr(not(test), forbid(unsafe_code))]
#![cfg_attr(test, deny(unsafe_code))]

//! Core: host-agnostic input types, swipe classification, and host contracts.
//!
//! # Role in ftoast
//! `ftoast-core` is the input layer. It owns the normalized pointer and key
//! events a host delivers, the pure swipe-direction policy, the stateful swipe
//! tracker built on it, handler composition, and the traits a host implements
//! to provide time, delayed callbacks, pointer capture, and click suppression.
//!
//! # Primary responsibilities
//! - **Events**: [`event::PointerEvent`] and [`event::KeyEvent`] with a
//!   default-prevention flag.
//! - **Swipe policy**: [`swipe::is_in_direction`] and [`swipe::SwipeTracker`].
//! - **Composition**: [`compose::HandlerChain`].
//! - **Host contracts**: [`host::HostClock`], [`host::HostScheduler`],
//!   [`host::PointerCaptureHost`], [`host::ClickSuppressor`], plus
//!   [`timer_queue::TimerQueue`] for hosts that drive time themselves.
//!
//! # How it fits in the system
//! `ftoast-runtime` consumes these types to drive group and toast state
//! machines. `ftoast-web` implements the host traits deterministically, so
//! nothing in this crate ever reads a wall clock on its own.

pub mod compose;
pub mod event;
pub mod geometry;
pub mod host;
pub mod swipe;
pub mod timer_queue;

pub use geometry::{Point, Vector};
pub use swipe::{SwipeDirection, SwipeTracker, SwipeTransition, is_in_direction};
