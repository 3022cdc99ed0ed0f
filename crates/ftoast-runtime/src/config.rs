#![forbid(unsafe_code)]

//! Group-level toast configuration.
//!
//! [`ToastGroupConfig`] carries the settings every toast in a group shares:
//! default auto-dismiss duration, region label, swipe direction and swipe
//! threshold. It can be built in code or, with the `group-config` feature,
//! loaded from TOML or JSON.
//!
//! # Loading
//!
//! ```toml
//! # ftoast.toml
//! duration_ms = 5000      # 0 = never auto-dismiss
//! label = "Notifications"
//! swipe_direction = "up"
//! swipe_threshold = 40.0
//! ```
//!
//! ```rust,ignore
//! let config = ToastGroupConfig::from_toml_file("ftoast.toml")?;
//! let config = ToastGroupConfig::from_json_str(json)?;
//! ```

use std::time::Duration;

#[cfg(feature = "group-config")]
use std::path::Path;

#[cfg(feature = "group-config")]
use serde::{Deserialize, Serialize};

use ftoast_core::swipe::{DEFAULT_SWIPE_THRESHOLD, SwipeDirection};

use crate::error::ConfigError;

/// Default auto-dismiss duration.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(500);

/// Default accessible label for the toast region.
pub const DEFAULT_LABEL: &str = "notification";

/// Settings shared by every toast in a group.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "group-config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "group-config", serde(default))]
pub struct ToastGroupConfig {
    /// Default auto-dismiss time. `None` keeps toasts open until dismissed.
    #[cfg_attr(
        feature = "group-config",
        serde(
            rename = "duration_ms",
            serialize_with = "serialize_duration_ms",
            deserialize_with = "deserialize_duration_ms"
        )
    )]
    pub duration: Option<Duration>,

    /// Accessible label for the toast region.
    pub label: String,

    /// Direction in which a swipe dismisses a toast.
    #[cfg_attr(
        feature = "group-config",
        serde(
            serialize_with = "serialize_swipe_direction",
            deserialize_with = "deserialize_swipe_direction"
        )
    )]
    pub swipe_direction: SwipeDirection,

    /// Release distance (px) past which a swipe dismisses.
    pub swipe_threshold: f64,
}

impl Default for ToastGroupConfig {
    fn default() -> Self {
        Self {
            duration: Some(DEFAULT_DURATION),
            label: DEFAULT_LABEL.to_owned(),
            swipe_direction: SwipeDirection::default(),
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

impl ToastGroupConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default auto-dismiss duration. A zero duration disables
    /// auto-dismiss.
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = (!duration.is_zero()).then_some(duration);
        self
    }

    /// Keep toasts open until explicitly dismissed.
    pub fn persistent(mut self) -> Self {
        self.duration = None;
        self
    }

    /// Set the region label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the swipe direction.
    pub fn swipe_direction(mut self, direction: SwipeDirection) -> Self {
        self.swipe_direction = direction;
        self
    }

    /// Set the swipe threshold in pixels.
    pub fn swipe_threshold(mut self, threshold: f64) -> Self {
        self.swipe_threshold = threshold;
        self
    }

    /// Check invariants. Collects every problem rather than stopping at the
    /// first.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();
        if !self.swipe_threshold.is_finite() {
            errors.push(format!(
                "swipe_threshold must be finite, got {}",
                self.swipe_threshold
            ));
        } else if self.swipe_threshold < 0.0 {
            errors.push(format!(
                "swipe_threshold must be >= 0, got {}",
                self.swipe_threshold
            ));
        }
        if self.label.trim().is_empty() {
            errors.push("label must not be empty".to_owned());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML string.
    #[cfg(feature = "group-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "group-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "group-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    #[cfg(feature = "group-config")]
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

#[cfg(feature = "group-config")]
fn serialize_duration_ms<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let ms = duration.map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX));
    serializer.serialize_u64(ms)
}

#[cfg(feature = "group-config")]
fn deserialize_duration_ms<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let ms = u64::deserialize(deserializer)?;
    Ok((ms > 0).then(|| Duration::from_millis(ms)))
}

#[cfg(feature = "group-config")]
fn serialize_swipe_direction<S>(direction: &SwipeDirection, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(direction.as_str())
}

#[cfg(feature = "group-config")]
fn deserialize_swipe_direction<'de, D>(deserializer: D) -> Result<SwipeDirection, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse().map_err(serde::de::Error::custom)
}
