//! Scoped log sink for a release run
//!
//! A [`LogSession`] owns the log artifact for the duration of a run. While it
//! is alive every `tracing` event on the current thread is written to the
//! file. Dropping it restores the previous dispatcher and closes the file,
//! which also happens when the run bails out early or panics.

use crate::error::LogError;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Active log artifact
pub struct LogSession {
    path: PathBuf,
    _guard: DefaultGuard,
}

impl LogSession {
    /// Create (or truncate) the log file and install it as the active sink
    ///
    /// With `echo_stderr` the same events are also written to stderr.
    pub fn open(path: &Path, echo_stderr: bool) -> Result<Self, LogError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LogError::CreateDirectory {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let file = File::create(path).map_err(|source| LogError::CreateFile {
            path: path.to_path_buf(),
            source,
        })?;

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let file_layer = fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false);

        let console_layer = echo_stderr.then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
        });

        let subscriber = tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .with(console_layer);

        let guard = tracing::subscriber::set_default(subscriber);

        Ok(Self {
            path: path.to_path_buf(),
            _guard: guard,
        })
    }

    /// Location of the log artifact
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for LogSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogSession")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
