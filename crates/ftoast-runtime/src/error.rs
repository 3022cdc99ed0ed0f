#![forbid(unsafe_code)]

//! Error types.
//!
//! Nothing in the toast state machine fails at runtime: ambiguous swipes,
//! a missing mount target, and zero or infinite durations are all states.
//! Errors are limited to configuration: loading or validating a group config,
//! and building a toast without the group or host it needs.

use std::fmt;

/// Errors that can occur when loading or validating a group configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "group-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "group-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "group-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "group-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "group-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "group-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

/// Errors building a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastError {
    /// The toast was built outside any group. Every toast reads its duration,
    /// swipe settings and pause flag from a group.
    MissingGroup,
    /// No host surface was supplied for the toast element.
    MissingHost,
}

impl fmt::Display for ToastError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingGroup => f.write_str("toast must be built within a toast group"),
            Self::MissingHost => f.write_str("toast requires a host surface"),
        }
    }
}

impl std::error::Error for ToastError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_joined() {
        let err = ConfigError::Validation(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "validation errors: a; b");
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn io_error_exposes_source() {
        let err = ConfigError::Io(std::io::Error::other("boom"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn toast_error_display() {
        assert_eq!(
            ToastError::MissingGroup.to_string(),
            "toast must be built within a toast group"
        );
    }
}
