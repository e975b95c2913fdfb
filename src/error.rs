//! Error types for distkeeper operations.
//!
//! This module defines [`DistError`], the primary error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Refresh-path failures are logged and skipped; they rarely become a `DistError`
//! - Installer failures are [`InstallError`](crate::installer::InstallError) and
//!   never leave `install_package`
//! - `DistError` is reserved for things the caller has to act on

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for distkeeper operations.
#[derive(Debug, Error)]
pub enum DistError {
    /// Failed to parse a configuration layer.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// A helper process could not be launched.
    #[error("Command failed with exit code {code:?}: {command}: {message}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        message: String,
    },

    /// A required helper executable is not installed.
    #[error("Helper '{name}' could not be found")]
    HelperNotFound { name: String },

    /// The maintenance lock file could not be opened or locked.
    #[error("Failed to lock {path}: {message}")]
    LockFailed { path: PathBuf, message: String },

    /// The operation was interrupted (Ctrl-C or SIGTERM).
    #[error("The current operation has been cancelled (Ctrl-C).")]
    Cancelled,

    /// Installing a signal handler failed.
    #[error("Failed to install handler for signal {signal}: {message}")]
    SignalHandler { signal: i32, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for distkeeper operations.
pub type Result<T> = std::result::Result<T, DistError>;
