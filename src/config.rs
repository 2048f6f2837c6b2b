//! Runtime configuration.
//!
//! Sources, lowest to highest precedence: built-in defaults, `.env`, process
//! environment, command-line flags.

use std::path::PathBuf;

use crate::cli::ModelArgs;

pub const ENV_MODEL_PATH: &str = "MPG_MODEL_PATH";
pub const ENV_LOG_FILTER: &str = "MPG_LOG";
pub const ENV_LOG_FILE: &str = "MPG_LOG_FILE";

pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Explicit artifact path; `None` means "next to the executable".
    pub model_path: Option<PathBuf>,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    pub log_file: Option<PathBuf>,
}

impl AppConfig {
    /// Read `.env` (if any) and the environment, then apply CLI overrides.
    pub fn load(args: &ModelArgs) -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(args, |key| std::env::var(key).ok())
    }

    fn from_lookup(args: &ModelArgs, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            model_path: args
                .model
                .clone()
                .or_else(|| non_empty(ENV_MODEL_PATH).map(PathBuf::from)),
            log_filter: non_empty(ENV_LOG_FILTER).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            log_file: args
                .log_file
                .clone()
                .or_else(|| non_empty(ENV_LOG_FILE).map(PathBuf::from)),
        }
    }
}
