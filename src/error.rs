//! Plugin-wide error types.
//!
//! Only scan-level failures and user cancellation ever reach the host;
//! per-track degradations (bad tags, unwritable artwork, failed duration
//! probes) are absorbed where they happen and logged instead.

use std::path::PathBuf;

/// Plugin-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level plugin error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured root path could not be enumerated. Fatal for the scan.
    #[error("Cannot read library root {path:?}: {message}")]
    WalkFailed { path: PathBuf, message: String },

    /// Tag parsing failed for one file. Recoverable: the builder degrades
    /// the file to a bare track.
    #[error("Metadata error for {path:?}: {message}")]
    Metadata { path: PathBuf, message: String },

    /// No library root has been configured yet.
    #[error("No library path configured")]
    NoPathConfigured,

    /// The user dismissed the directory picker without choosing a path.
    #[error("No path selected")]
    NoPathSelected,

    /// Playlist or settings store error
    #[error("Store error: {0}")]
    Store(String),

    /// A spawned task panicked or was cancelled
    #[error("Task join error: {0}")]
    TaskJoin(String),
}

impl Error {
    /// Create a fatal walk error for the given root.
    pub fn walk_failed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::WalkFailed {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a metadata error.
    pub fn metadata(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Metadata {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a store error.
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }
}
