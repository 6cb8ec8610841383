// src/config.rs

use std::{env, fmt, path::PathBuf};

use dotenvy::dotenv;

/// Number of questions the model is asked to produce per quiz.
pub const QUESTIONS_PER_QUIZ: usize = 50;

/// Saved tests older than this are no longer returned by history reads.
pub const HISTORY_RETENTION_DAYS: i64 = 30;

/// Storage key of the single history blob.
pub const HISTORY_KEY: &str = "mockTestHistory";

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub request_timeout_secs: u64,
    pub port: u16,
    pub history_dir: PathBuf,
    pub log_dir: PathBuf,
    pub rust_log: String,
}

/// Raised when the process environment cannot produce a usable `Config`.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} is not defined in the environment or .env file", key),
            ConfigError::Invalid { key, value } => write!(f, "{} has an invalid value: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Loads configuration from the environment (and `.env`, if present).
    ///
    /// `GEMINI_API_KEY` is mandatory; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let gemini_api_key = env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        let gemini_model = env::var("GEMINI_MODEL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());

        let gemini_base_url = env::var("GEMINI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string());

        let request_timeout_secs = parse_var("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        let port = parse_var("PORT", DEFAULT_PORT)?;

        let history_dir = env::var("HISTORY_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let log_dir = env::var("LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("logs"));

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            gemini_api_key,
            gemini_model,
            gemini_base_url,
            request_timeout_secs,
            port,
            history_dir,
            log_dir,
            rust_log,
        })
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { key, value }),
        },
        Err(_) => Ok(default),
    }
}
