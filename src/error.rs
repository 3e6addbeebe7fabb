//! Error types for the appinit bootstrap engine.

use crate::plugin::Phase;
use thiserror::Error;

/// Surface-related errors
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Surface creation failed: {0}")]
    CreationFailed(String),

    #[error("Content load failed for {locator}: {reason}")]
    LoadFailed { locator: String, reason: String },

    #[error("Surface already created; pending surface options are frozen")]
    AlreadyCreated,

    #[error("Surface has been destroyed")]
    Destroyed,
}

/// Errors a plugin hook may return.
///
/// None of these abort the orchestrator. `Unavailable` is reported at warning
/// level, everything else at error level.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("Optional collaborator unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Failed(String),

    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PluginError {
    /// True when the failure only means an optional companion is missing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PluginError::Unavailable(_))
    }
}

/// Orchestrator and ambient errors
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Hook {plugin}.{phase} failed: {message}")]
    HookFailed {
        plugin: String,
        phase: Phase,
        message: String,
    },

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for InitError {
    fn from(err: config::ConfigError) -> Self {
        InitError::ConfigError(err.to_string())
    }
}
