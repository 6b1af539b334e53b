//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use super::ConfigError;
use bifrost_types::Color;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure, after merging all layers.
///
/// # Example
///
/// ```
/// use bifrost_runtime::config::BifrostConfig;
///
/// let config = BifrostConfig::default();
/// assert_eq!(config.coordinator.buffer_depth, 2);
/// assert_eq!(config.engine.entrypoint, "main");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BifrostConfig {
    /// Enable debug mode (verbose logging).
    pub debug: bool,

    /// Engine start-up settings.
    pub engine: EngineConfig,

    /// Coordinator channel settings.
    pub coordinator: CoordinatorConfig,

    /// Page container defaults.
    pub page: PageConfig,
}

impl BifrostConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes to TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserializes from TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if deserialization fails.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Merges another config into this one.
    ///
    /// Values from `other` override values in `self` only if they differ
    /// from the default, so a layer only needs to mention what it changes.
    pub fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.debug != default.debug {
            self.debug = other.debug;
        }

        self.engine.merge(&other.engine);
        self.coordinator.merge(&other.coordinator);
        self.page.merge(&other.page);
    }

    /// Checks values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty entrypoint or a
    /// zero `canPop` timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.entrypoint.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "engine.entrypoint",
                "must not be empty",
            ));
        }
        if self.coordinator.can_pop_timeout_ms == 0 {
            return Err(ConfigError::invalid_value(
                "coordinator.can_pop_timeout_ms",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Engine start-up configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Entry point run when the engine starts.
    pub entrypoint: String,

    /// Key the started engine is cached under.
    pub cache_key: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            entrypoint: "main".into(),
            cache_key: "io.flutter.bifrost".into(),
        }
    }
}

impl EngineConfig {
    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.entrypoint != default.entrypoint {
            self.entrypoint = other.entrypoint.clone();
        }
        if other.cache_key != default.cache_key {
            self.cache_key = other.cache_key.clone();
        }
    }
}

/// Coordinator channel configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CoordinatorConfig {
    /// Outbound calls held until the engine installs its handler.
    ///
    /// Two covers the create/show pair that can race engine start-up.
    pub buffer_depth: usize,

    /// Upper bound on waiting for a `canPop` reply, in milliseconds.
    pub can_pop_timeout_ms: u64,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            buffer_depth: 2,
            can_pop_timeout_ms: 3_000,
        }
    }
}

impl CoordinatorConfig {
    /// `canPop` timeout as a [`Duration`].
    #[must_use]
    pub fn can_pop_timeout(&self) -> Duration {
        Duration::from_millis(self.can_pop_timeout_ms)
    }

    fn merge(&mut self, other: &Self) {
        let default = Self::default();

        if other.buffer_depth != default.buffer_depth {
            self.buffer_depth = other.buffer_depth;
        }
        if other.can_pop_timeout_ms != default.can_pop_timeout_ms {
            self.can_pop_timeout_ms = other.can_pop_timeout_ms;
        }
    }
}

/// Page container defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    /// Background used when a page does not specify one.
    pub default_background: Color,
}

impl PageConfig {
    fn merge(&mut self, other: &Self) {
        if other.default_background != Color::default() {
            self.default_background = other.default_background;
        }
    }
}
