use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    /// Endpoint of the file-synchronization backend that mirrors the
    /// conversation-handle file.
    pub file_server_url: String,
    /// Local path of the conversation-handle file.
    pub identity_path: PathBuf,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let file_server_url = std::env::var("FILE_SERVER_URL")
            .map_err(|_| ConfigError::MissingVar("FILE_SERVER_URL".to_string()))?;

        let identity_path = std::env::var("IDENTITY_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./chat-id.txt"));

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            file_server_url,
            identity_path,
            log_level,
        })
    }
}
