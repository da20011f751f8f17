//! Logging utilities
//!
//! This module provides structured logging setup based on `tracing-subscriber`.

pub mod logging;

pub use logging::{build_env_filter, init_logging};
