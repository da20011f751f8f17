//! Configuration validation
//!
//! The validation is organized into several submodules:
//! - `trait_def`: Core Validate trait definition
//! - `optimizer_validators`: Validators for optimizer, retry and logging settings
//! - `tests`: Test suite for all validators

mod optimizer_validators;
mod trait_def;

pub use trait_def::Validate;
