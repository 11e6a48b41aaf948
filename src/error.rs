//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ConfigError: missing or invalid configuration, fatal before any build
//! - CleanupError: output directories that could not be removed
//! - LogError: the log artifact could not be created
//!
//! A packaging tool that exits non-zero is not an error here; it is recorded
//! as a [`crate::domain::BuildStatus`] and the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// Environment variable naming the engine installation root
pub const INSTALL_ROOT_ENV: &str = "UE4_Install";

/// Process exit code for unexpected fatal errors
pub const EXIT_FATAL: u8 = 1;

/// Process exit code when at least one version failed to package
pub const EXIT_BUILD_FAILURES: u8 = 2;

/// Process exit code for configuration errors
pub const EXIT_CONFIG: u8 = 3;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Output cleanup related errors
    #[error(transparent)]
    Cleanup(#[from] CleanupError),

    /// Log artifact related errors
    #[error(transparent)]
    Log(#[from] LogError),
}

impl AppError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => EXIT_CONFIG,
            AppError::Cleanup(_) | AppError::Log(_) => EXIT_FATAL,
        }
    }
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Engine installation root missing or empty
    #[error("installation root not configured: set UE4_Install or pass --install-root")]
    InstallRootNotConfigured,

    /// Version identifier that cannot be parsed
    #[error("invalid engine version '{value}': {message}")]
    InvalidVersion { value: String, message: String },

    /// Version list is empty
    #[error("no engine versions configured")]
    NoVersions,

    /// Explicitly requested config file does not exist
    #[error("config file not found: {path}")]
    ConfigFileNotFound { path: PathBuf },

    /// Config file exists but could not be read
    #[error("failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has unknown keys
    #[error("failed to parse config file {path}: {message}")]
    ConfigFileParse { path: PathBuf, message: String },

    /// Path that cannot be used
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },
}

/// Errors related to removing output directories
#[derive(Error, Debug)]
pub enum CleanupError {
    /// Output root left over from a previous run could not be removed
    #[error("failed to remove stale output at {path}: {source}")]
    StaleOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Partial output of a failed build could not be removed
    #[error("failed to remove partial output at {path}: {source}")]
    PartialOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to the log artifact
#[derive(Error, Debug)]
pub enum LogError {
    /// Log directory could not be created
    #[error("failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Log file could not be created
    #[error("failed to create log file {path}: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Creates a new InvalidVersion error
    pub fn invalid_version(value: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidVersion {
            value: value.into(),
            message: message.into(),
        }
    }

    /// Creates a new ConfigFileParse error
    pub fn config_file_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::ConfigFileParse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new InvalidPath error
    pub fn invalid_path(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl CleanupError {
    /// Creates a new StaleOutput error
    pub fn stale_output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanupError::StaleOutput {
            path: path.into(),
            source,
        }
    }

    /// Creates a new PartialOutput error
    pub fn partial_output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanupError::PartialOutput {
            path: path.into(),
            source,
        }
    }
}
