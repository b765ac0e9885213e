use crate::processing::ReduceMode;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::OnceLock;
use thiserror::Error;

/// Default location of the serialized vectorizer + classifier artifact.
pub const DEFAULT_MODEL_PATH: &str = "models/spam_pipeline.json";
/// Default HTTP port, matching the upload client's expectations.
pub const DEFAULT_SERVER_PORT: u16 = 5000;
/// Default request body cap for uploads (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the spam detector server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON model artifact loaded once at startup.
    pub model_path: PathBuf,
    /// Address the HTTP listener binds to.
    pub server_host: IpAddr,
    /// Port the HTTP listener binds to.
    pub server_port: u16,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
    /// Token reduction applied during preprocessing.
    pub reduce_mode: ReduceMode,
    /// Optional lexicon file extending the built-in lemmatizer dictionary.
    pub lexicon_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            model_path: get("SPAM_MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH)),
            server_host: parse_or("SERVER_HOST", get("SERVER_HOST"), IpAddr::from([127, 0, 0, 1]))?,
            server_port: parse_or("SERVER_PORT", get("SERVER_PORT"), DEFAULT_SERVER_PORT)?,
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                get("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            reduce_mode: parse_or("SPAM_REDUCE_MODE", get("SPAM_REDUCE_MODE"), ReduceMode::Stem)?,
            lexicon_path: get("SPAM_LEXICON_PATH").map(PathBuf::from),
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    key: &str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        model_path = %config.model_path.display(),
        server_host = %config.server_host,
        server_port = config.server_port,
        max_upload_bytes = config.max_upload_bytes,
        reduce_mode = ?config.reduce_mode,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
