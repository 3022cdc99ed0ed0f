#![forbid(unsafe_code)]

//! `ftoast-web` provides a host surface for ftoast toasts driven entirely by
//! the embedding environment.
//!
//! Design goals:
//! - **Host-driven time**: the embedder advances a monotonic clock
//!   explicitly; due timer callbacks run in deadline order as it moves.
//! - **Deterministic**: no wall clock, no threads, no `wasm-bindgen`. The same
//!   inputs always produce the same toast transitions, which is what the
//!   scenario tests rely on.
//! - **Element bookkeeping**: pointer capture, one-shot click suppression
//!   and mount targets are tracked per element the way a browser would.
//!
//! A JS shim forwards DOM events (optionally as JSON, see the
//! `input-parser` feature) and calls [`WebHost::advance`] from its animation
//! or timer loop.

pub mod host;
#[cfg(feature = "input-parser")]
pub mod input_parser;

use core::time::Duration;

use ftoast_core::host::{HostClock, MountTarget};

pub use host::{ElementId, WebHost, WebSurface};

/// Web host error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The mount target was never created or was already removed.
    UnknownMountTarget(MountTarget),
    /// Malformed encoded input.
    Parse(String),
}

impl core::fmt::Display for HostError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::UnknownMountTarget(target) => {
                write!(f, "unknown mount target: {}", target.raw())
            }
            Self::Parse(msg) => write!(f, "input parse error: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Earlier values are ignored so the clock
    /// never goes backwards.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl HostClock for DeterministicClock {
    fn now(&self) -> Duration {
        self.now
    }
}
