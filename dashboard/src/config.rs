//! Configuration module for the JobDeck dashboard.
//!
//! This module handles parsing configuration from environment variables.
//!
//! # Environment Variables
//!
//! | Variable | Required | Default | Description |
//! |----------|----------|---------|-------------|
//! | `JOBDECK_USER_ID` | No | hostname | User id that namespaces stored layouts and metrics |
//! | `JOBDECK_DATA_DIR` | No | `~/.jobdeck` | Directory holding stored values and the TUI log |
//! | `JOBDECK_FEATURE_FLAGS` | No | (none) | Comma-separated active feature flags |
//! | `JOBDECK_TICK_RATE_MS` | No | 60 | TUI tick interval in milliseconds (10-1000) |
//! | `NO_COLOR` | No | - | Any value disables colors in the TUI |
//!
//! # Example
//!
//! ```no_run
//! use jobdeck_dashboard::config::Config;
//!
//! let config = Config::from_env().expect("Failed to load configuration");
//! println!("User: {}", config.user_id);
//! ```

use std::env;
use std::path::PathBuf;

use directories::BaseDirs;
use thiserror::Error;

use crate::storage::is_valid_key;

/// Default data directory name relative to home.
const DEFAULT_DATA_DIR: &str = ".jobdeck";

/// Default TUI tick interval in milliseconds.
const DEFAULT_TICK_RATE_MS: u64 = 60;

/// Minimum allowed tick interval.
const MIN_TICK_RATE_MS: u64 = 10;

/// Maximum allowed tick interval.
const MAX_TICK_RATE_MS: u64 = 1000;

/// Errors that can occur during configuration parsing.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required environment variable is missing.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Environment variable has an invalid value.
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to determine home directory.
    #[error("failed to determine home directory")]
    NoHomeDirectory,
}

/// Configuration for the JobDeck dashboard.
#[derive(Debug, Clone)]
pub struct Config {
    /// User identifier used to namespace storage keys.
    pub user_id: String,

    /// Directory backing file storage.
    pub data_dir: PathBuf,

    /// Active feature flags gating optional widgets.
    pub feature_flags: Vec<String>,

    /// TUI tick interval in milliseconds.
    pub tick_rate_ms: u64,

    /// Whether colors are disabled.
    pub no_color: bool,
}

impl Config {
    /// Creates a new `Config` by parsing environment variables.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if:
    /// - `JOBDECK_USER_ID` is unset and the hostname cannot be used instead
    /// - `JOBDECK_USER_ID` starts with `.` or contains characters outside `[A-Za-z0-9_.@-]`
    /// - `JOBDECK_TICK_RATE_MS` is not an integer between 10 and 1000
    /// - The home directory cannot be determined (needed for the default data dir)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Optional: JOBDECK_USER_ID (default: hostname)
        let user_id = match env::var("JOBDECK_USER_ID") {
            Ok(val) => validate_user_id(&val)?,
            Err(_) => get_hostname()
                .filter(|host| is_valid_key(host))
                .ok_or_else(|| ConfigError::MissingEnvVar("JOBDECK_USER_ID".to_string()))?,
        };

        // Optional: JOBDECK_DATA_DIR (default: ~/.jobdeck)
        let data_dir = match env::var("JOBDECK_DATA_DIR") {
            Ok(val) => PathBuf::from(val),
            Err(_) => {
                let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
                base_dirs.home_dir().join(DEFAULT_DATA_DIR)
            }
        };

        // Optional: JOBDECK_FEATURE_FLAGS (default: none)
        let feature_flags = env::var("JOBDECK_FEATURE_FLAGS")
            .map(|val| parse_flags(&val))
            .unwrap_or_default();

        // Optional: JOBDECK_TICK_RATE_MS (default: 60, must be 10-1000)
        let tick_rate_ms = match env::var("JOBDECK_TICK_RATE_MS") {
            Ok(val) => {
                let rate = val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                    key: "JOBDECK_TICK_RATE_MS".to_string(),
                    message: format!("expected integer {MIN_TICK_RATE_MS}-{MAX_TICK_RATE_MS}, got '{val}'"),
                })?;
                if !(MIN_TICK_RATE_MS..=MAX_TICK_RATE_MS).contains(&rate) {
                    return Err(ConfigError::InvalidValue {
                        key: "JOBDECK_TICK_RATE_MS".to_string(),
                        message: format!(
                            "tick rate must be between {MIN_TICK_RATE_MS} and {MAX_TICK_RATE_MS}, got {rate}"
                        ),
                    });
                }
                rate
            }
            Err(_) => DEFAULT_TICK_RATE_MS,
        };

        let no_color = env::var_os("NO_COLOR").is_some();

        Ok(Self {
            user_id,
            data_dir,
            feature_flags,
            tick_rate_ms,
            no_color,
        })
    }

    /// Returns the path of the TUI log file.
    #[must_use]
    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("jobdeck.log")
    }
}

/// Checks that `user_id` can be embedded in a storage key.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for empty ids, ids starting with
/// `.`, or ids with characters outside `[A-Za-z0-9_.@-]`.
pub fn validate_user_id(user_id: &str) -> Result<String, ConfigError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "JOBDECK_USER_ID".to_string(),
            message: "user id cannot be empty".to_string(),
        });
    }
    if !is_valid_key(trimmed) {
        return Err(ConfigError::InvalidValue {
            key: "JOBDECK_USER_ID".to_string(),
            message: format!(
                "'{trimmed}' may only contain letters, digits, '_', '-', '.' and '@'"
            ),
        });
    }
    Ok(trimmed.to_string())
}

/// Splits a comma-separated flag list, dropping empty entries.
fn parse_flags(val: &str) -> Vec<String> {
    val.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Gets the system hostname, if it is valid UTF-8.
fn get_hostname() -> Option<String> {
    gethostname::gethostname().into_string().ok()
}
