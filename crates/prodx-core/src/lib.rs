//! Shared types for the prodx workspace: the extracted product record
//! schema and application configuration.

pub mod app_config;
pub mod config;
pub mod record;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use record::{ExtractedRecord, FieldGroup, Section};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
