#![forbid(unsafe_code)]

//! Runtime: toast groups, pausable timers, and the per-toast state machine.
//!
//! # Role in ftoast
//! `ftoast-runtime` is the stateful layer. It turns the host-agnostic events
//! and swipe policy from `ftoast-core` into toast lifecycles: auto-dismiss
//! countdowns that pause group-wide, swipe-to-dismiss, and Escape handling
//! shared between a focused toast and its dismissable layer.
//!
//! # Primary responsibilities
//! - **Group**: [`ToastGroup`] holds configuration, toast count, pause flag,
//!   mount target, and the one-shot focused-Escape flag.
//! - **Timer**: [`PausableTimer`] arms one host callback and survives
//!   pause/resume.
//! - **Toast**: [`Toast`] binds it all together per element.
//! - **Config**: [`ToastGroupConfig`] with validation and, behind the
//!   `group-config` feature, TOML/JSON loading.
//!
//! # Example
//!
//! ```rust,ignore
//! let group = ToastGroup::new(ToastGroupConfig::new().swipe_direction(SwipeDirection::Up))?;
//! let toast = Toast::builder()
//!     .group(&group)
//!     .host(surface)
//!     .on_close(|| println!("dismissed"))
//!     .build()?;
//! toast.mount();
//! ```
//!
//! Everything is single-threaded (`Rc`/`RefCell`); hosts deliver events and
//! timer callbacks on one thread.

pub mod config;
pub mod error;
pub mod group;
pub mod open_state;
pub mod timer;
pub mod toast;

#[cfg(test)]
mod test_support;

pub use config::ToastGroupConfig;
pub use error::{ConfigError, ToastError};
pub use group::{GroupSignal, GroupSubscription, ToastGroup, ToastId, WeakToastGroup};
pub use open_state::{OpenChange, OpenState};
pub use timer::{PausableTimer, TimerState};
pub use toast::{
    SwipeEvent, SwipePhase, Toast, ToastAttributes, ToastBuilder, ToastKind, ToastPhase,
};
