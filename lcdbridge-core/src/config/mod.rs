//! Configuration types
//!
//! Board-agnostic runtime configuration. The firmware bakes a validated
//! `bridge.toml` into the binary; tests build configurations directly.

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::ConfigError;
