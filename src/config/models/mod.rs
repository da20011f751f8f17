//! Configuration data models
//!
//! This module defines all configuration structures used by the optimizer.

#![allow(missing_docs)]

pub mod logging;
pub mod optimizer;
pub mod overrides;
pub mod retry;

// Re-export all configuration types
pub use logging::*;
pub use optimizer::*;
pub use overrides::*;
pub use retry::*;

/// Default value for boolean flags that are on unless disabled
pub fn default_true() -> bool {
    true
}

/// Default maximum attempts per collaborator call
pub fn default_max_attempts() -> u32 {
    3
}

/// Default base retry delay in milliseconds
pub fn default_base_delay_ms() -> u64 {
    100
}

/// Default maximum retry delay in milliseconds
pub fn default_max_delay_ms() -> u64 {
    5_000
}

pub fn default_backoff_multiplier() -> f64 {
    2.0
}

pub fn default_log_level() -> String {
    "info".to_string()
}
