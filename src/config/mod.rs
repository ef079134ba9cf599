//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, DatabaseConfig, LoggingConfig, CarrierSeed)
//! - [`defaults`]: serde default value functions
//! - [`validation`]: startup checks reporting every problem at once

mod defaults;
mod types;
mod validation;

pub use types::{CarrierSeed, Config, ConfigError, DatabaseConfig, LoggingConfig};
pub use validation::{ValidationError, validate};
