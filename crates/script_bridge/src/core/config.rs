//! # Bridge Configuration
//!
//! All tunables of the bridge in one serializable structure. Each section
//! maps to one subsystem:
//!
//! - **time**: fixed step, time scale, fixed step cap
//! - **registry**: handle arena sizing and Transform auto-attachment
//! - **native**: limits of the in-process headless engine
//! - **logging**: default log filter
//!
//! Every field has a default, so partial files are accepted.

use serde::{Deserialize, Serialize};

pub use crate::config::{Config, ConfigError};

/// # Time Configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Simulated seconds per FixedUpdate step
    pub fixed_delta_time: f32,
    /// Multiplier applied to the engine-reported delta
    pub time_scale: f32,
    /// Upper bound on FixedUpdate passes per frame
    pub max_fixed_steps_per_frame: u32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            fixed_delta_time: 0.02,
            time_scale: 1.0,
            max_fixed_steps_per_frame: 5,
        }
    }
}

impl TimeConfig {
    /// Validate the timing values
    pub fn validate(&self) -> Result<(), String> {
        if !(self.fixed_delta_time.is_finite() && self.fixed_delta_time > 0.0) {
            return Err(format!(
                "fixed_delta_time must be positive, got {}",
                self.fixed_delta_time
            ));
        }
        if !(self.time_scale.is_finite() && self.time_scale >= 0.0) {
            return Err(format!("time_scale must be non-negative, got {}", self.time_scale));
        }
        if self.max_fixed_steps_per_frame == 0 {
            return Err("max_fixed_steps_per_frame must be at least 1".to_string());
        }
        Ok(())
    }
}

/// # Registry Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Slots reserved up front in the handle arena
    pub initial_capacity: usize,
    /// Attach a Transform to every newly created GameObject
    pub auto_attach_transform: bool,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 256,
            auto_attach_transform: false,
        }
    }
}

/// # Native Engine Configuration
///
/// Limits applied by the in-process headless engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
    /// Maximum number of live GameObjects
    pub max_game_objects: usize,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            max_game_objects: 10_000,
        }
    }
}

/// # Logging Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter handed to `env_logger` (overridable by `RUST_LOG`)
    pub log_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// # Complete Bridge Configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Frame timing
    pub time: TimeConfig,
    /// Handle registry
    pub registry: RegistryConfig,
    /// Headless engine limits
    pub native: NativeConfig,
    /// Logging
    pub logging: LoggingConfig,
}

impl BridgeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time.validate().map_err(ConfigError::Invalid)?;
        if self.native.max_game_objects == 0 {
            return Err(ConfigError::Invalid(
                "max_game_objects must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config for BridgeConfig {}
