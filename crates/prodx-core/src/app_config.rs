use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Runtime settings for the offline extraction tool.
///
/// The extraction engine itself takes no configuration; these values only
/// shape where input is accepted from and where records are written.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    /// Fallback `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Directory receiving one JSON document per extracted product.
    pub output_dir: PathBuf,
    /// HTML inputs larger than this are rejected before parsing.
    pub max_input_bytes: u64,
}
