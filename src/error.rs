//! Error handling module for webprovision
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Provisioning steps return these; the binary adds context with anyhow.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for provisioning operations
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// IO errors (console output, process spawning)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A file could not be read or written
    #[error("Failed to access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors (loading, parsing, validation)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A host command could not be spawned, or failed under the strict policy
    #[error("Command failed: {0}")]
    Command(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, ProvisionError>;

// Convenient error constructors
impl ProvisionError {
    /// Create a file access error for `path`
    pub fn file_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a command error
    pub fn command(msg: impl Into<String>) -> Self {
        Self::Command(msg.into())
    }
}
