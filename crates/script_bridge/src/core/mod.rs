//! # Core Module
//!
//! Shared configuration for every bridge subsystem.

pub mod config;

pub use config::{
    BridgeConfig,
    Config,
    ConfigError,
    LoggingConfig,
    NativeConfig,
    RegistryConfig,
    TimeConfig,
};
