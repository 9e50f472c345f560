//! Error types for the JobDeck dashboard.
//!
//! Each module owns a focused error enum; [`DashboardError`] rolls them up
//! for callers that drive several modules at once, such as
//! [`Session::open`](crate::session::Session::open).

use thiserror::Error;

use crate::config::ConfigError;
use crate::layout::StoreError;
use crate::registry::RegistryError;
use crate::storage::StorageError;

/// Errors that can occur during dashboard operations.
///
/// # Examples
///
/// ```
/// use jobdeck_dashboard::error::{DashboardError, Result};
/// use jobdeck_dashboard::storage::FileStorage;
///
/// fn open(dir: &str) -> Result<FileStorage> {
///     Ok(FileStorage::open(dir)?)
/// }
/// # let _ = open;
/// ```
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Configuration-related error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Key-value storage error.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Layout or metrics store error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Widget registry construction error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// TUI-related error.
    #[error("TUI error: {0}")]
    Tui(#[from] TuiError),
}

/// Errors that can occur during TUI operation.
#[derive(Error, Debug)]
pub enum TuiError {
    /// Terminal initialization failed.
    #[error("failed to initialize terminal: {0}")]
    TerminalInit(#[source] std::io::Error),

    /// Terminal rendering failed.
    #[error("render error: {0}")]
    Render(#[source] std::io::Error),

    /// Event handling error.
    #[error("event error: {0}")]
    Event(String),
}

/// A specialized `Result` type for dashboard operations.
pub type Result<T> = std::result::Result<T, DashboardError>;
