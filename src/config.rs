use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Kneerx";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const ENV_OLLAMA_URL: &str = "KNEERX_OLLAMA_URL";
const ENV_MODEL: &str = "KNEERX_MODEL";
const ENV_TIMEOUT_SECS: &str = "KNEERX_TIMEOUT_SECS";
const ENV_TEMPERATURE: &str = "KNEERX_TEMPERATURE";
const ENV_PROMPTS_DIR: &str = "KNEERX_PROMPTS_DIR";
const ENV_DB_PATH: &str = "KNEERX_DB_PATH";
const ENV_STAGE_ATTEMPTS: &str = "KNEERX_STAGE_ATTEMPTS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "kneerx=info"
}

/// Get the application data directory.
/// Falls back to the working directory when the platform has no data dir.
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default SQLite location for the record store
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("kneerx.db")
}

/// Runtime settings for one pipeline process.
///
/// Built once at startup, then read-only. Every field can be overridden
/// through a `KNEERX_*` environment variable (see [`PipelineConfig::from_env`]).
#[derive(Debug, Clone, Serialize)]
pub struct PipelineConfig {
    /// Base URL of the Ollama instance serving structured generation.
    pub ollama_url: String,
    /// Model name passed to every generation call.
    pub model: String,
    /// HTTP timeout for one generation call.
    pub timeout_secs: u64,
    /// Sampling temperature. 0.0 keeps repeated runs as close as the model allows.
    pub temperature: f32,
    /// Directory holding externally stored prompt templates.
    /// `None` uses the built-in templates.
    pub prompts_dir: Option<PathBuf>,
    /// SQLite file with demographics, questionnaires, STS results and the catalog.
    pub database_path: PathBuf,
    /// How many times the driver may run each generation stage (1 = no retry).
    pub stage_attempts: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            ollama_url: "http://localhost:11434".into(),
            model: "medgemma".into(),
            timeout_secs: 300,
            temperature: 0.0,
            prompts_dir: None,
            database_path: default_database_path(),
            stage_attempts: 1,
        }
    }
}

impl PipelineConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup` (injectable for tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_OLLAMA_URL) {
            config.ollama_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = lookup(ENV_MODEL) {
            config.model = model;
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.timeout_secs = parse_value(ENV_TIMEOUT_SECS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_TEMPERATURE) {
            config.temperature = parse_value(ENV_TEMPERATURE, &raw)?;
        }
        if let Some(dir) = lookup(ENV_PROMPTS_DIR) {
            config.prompts_dir = Some(PathBuf::from(dir));
        }
        if let Some(path) = lookup(ENV_DB_PATH) {
            config.database_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup(ENV_STAGE_ATTEMPTS) {
            let attempts: usize = parse_value(ENV_STAGE_ATTEMPTS, &raw)?;
            if attempts == 0 {
                return Err(ConfigError::InvalidValue {
                    key: ENV_STAGE_ATTEMPTS.into(),
                    value: raw,
                });
            }
            config.stage_attempts = attempts;
        }

        Ok(config)
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.into(),
        value: raw.into(),
    })
}
