//! Foundation module - value types and utilities with no engine dependency
//!
//! - Vector and quaternion math
//! - Scalar math helpers (`Mathf`)
//! - Frame timing
//! - Logging setup

pub mod math;
pub mod mathf;
pub mod time;
pub mod logging;
