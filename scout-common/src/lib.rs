//! Scout Common - Shared configuration and logging for Scout services.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod logging;

pub use config::{ChatConfig, Config, ModelConfig, ObservabilityConfig};
pub use logging::init_logging;
