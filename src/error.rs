//! Error handling module for archpkg
//!
//! Provides centralized error handling with proper error types using thiserror.
//! Library code returns these; the binary wraps them in `anyhow` at the top.

use thiserror::Error;

/// Main error type for archpkg
#[derive(Error, Debug)]
pub enum ArchPkgError {
    /// No catalog could be found at any of the searched locations
    #[error("Catalog not found: {0}")]
    ConfigMissing(String),

    /// The catalog was found but could not be accepted
    #[error("Configuration error: {0}")]
    Config(String),

    /// A tool required before the session can start is absent
    #[error("Missing prerequisite: {0}")]
    PrerequisiteMissing(String),

    /// The AUR helper could not be found or acquired
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// A native installer command exited unsuccessfully
    #[error("Installation failed: {0}")]
    InstallFailure(String),

    /// Nothing is selected (informational)
    #[error("No packages selected")]
    NoSelection,

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// IO errors (file operations, spawning processes, terminal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for archpkg operations
pub type Result<T> = std::result::Result<T, ArchPkgError>;

// Convenient error constructors
impl ArchPkgError {
    /// Create a catalog-missing error
    pub fn config_missing(msg: impl Into<String>) -> Self {
        Self::ConfigMissing(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a prerequisite error
    pub fn prerequisite(msg: impl Into<String>) -> Self {
        Self::PrerequisiteMissing(msg.into())
    }

    /// Create a backend-unavailable error
    pub fn backend_unavailable(msg: impl Into<String>) -> Self {
        Self::BackendUnavailable(msg.into())
    }

    /// Create an install failure
    pub fn install(msg: impl Into<String>) -> Self {
        Self::InstallFailure(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Errors that stop the program before a session exists.
    ///
    /// Everything else is reported to the user and the session resumes.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing(_) | Self::Config(_) | Self::PrerequisiteMissing(_)
        )
    }
}
