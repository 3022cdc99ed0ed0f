#![forbid(unsafe_code)]

//! Controlled / uncontrolled open flag.
//!
//! An uncontrolled toast owns its open flag: a close request flips it. A
//! controlled toast mirrors a value its owner supplies: a close request only
//! asks the owner, who answers by calling `set_open`.

/// Outcome of [`OpenState::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenChange {
    /// Already in the requested state.
    Unchanged,
    /// Internal state flipped (uncontrolled).
    Applied,
    /// Owner must decide (controlled).
    Requested,
}

/// Open flag with controlled and uncontrolled modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenState {
    open: bool,
    controlled: bool,
}

impl OpenState {
    /// Internally owned flag starting at `default_open`.
    #[must_use]
    pub const fn uncontrolled(default_open: bool) -> Self {
        Self {
            open: default_open,
            controlled: false,
        }
    }

    /// Owner-supplied flag.
    #[must_use]
    pub const fn controlled(open: bool) -> Self {
        Self {
            open,
            controlled: true,
        }
    }

    /// Current value.
    #[inline]
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Whether the owner controls the value.
    #[inline]
    #[must_use]
    pub const fn is_controlled(&self) -> bool {
        self.controlled
    }

    /// Owner-driven update. Returns `true` if the value changed.
    pub fn set(&mut self, open: bool) -> bool {
        let changed = self.open != open;
        self.open = open;
        changed
    }

    /// Component-driven request to change the value.
    pub fn request(&mut self, open: bool) -> OpenChange {
        if self.open == open {
            OpenChange::Unchanged
        } else if self.controlled {
            OpenChange::Requested
        } else {
            self.open = open;
            OpenChange::Applied
        }
    }
}

impl Default for OpenState {
    fn default() -> Self {
        Self::uncontrolled(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncontrolled_request_applies() {
        let mut state = OpenState::uncontrolled(true);
        assert_eq!(state.request(false), OpenChange::Applied);
        assert!(!state.is_open());
        assert_eq!(state.request(false), OpenChange::Unchanged);
    }

    #[test]
    fn controlled_request_defers_to_owner() {
        let mut state = OpenState::controlled(true);
        assert_eq!(state.request(false), OpenChange::Requested);
        assert!(state.is_open(), "owner has not answered yet");
        assert!(state.set(false));
        assert!(!state.is_open());
        assert!(!state.set(false));
    }

    #[test]
    fn default_is_open_and_uncontrolled() {
        let state = OpenState::default();
        assert!(state.is_open());
        assert!(!state.is_controlled());
    }
}
