//! Application configuration.
//!
//! Builder-style agent configuration and serde-backed training configuration
//! shared by the library entry points and the CLI.

pub mod config;

pub use config::{AgentConfig, TrainingConfig};
