//! Release orchestrator for packaging the plugin across engine versions
//!
//! This module provides:
//! - Workflow coordination: clean output → package each version → summarize
//! - Strictly sequential, one attempt per version, newest version first
//! - Removal of partial output left by failed versions
//! - Log artifact handling for the whole run

use crate::config::ReleaseConfig;
use crate::domain::{EngineVersion, RunSummary, VersionBuildResult};
use crate::error::{AppError, CleanupError, EXIT_BUILD_FAILURES};
use crate::logging::LogSession;
use crate::progress::{format_duration, Progress};
use crate::toolchain::{CommandOutput, CommandRunner, ToolInvocation};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Orchestrator for one release run
pub struct Orchestrator<R: CommandRunner> {
    /// Resolved configuration
    config: ReleaseConfig,
    /// Runner used to invoke the packaging tool
    runner: R,
}

impl<R: CommandRunner> Orchestrator<R> {
    /// Create a new orchestrator
    pub fn new(config: ReleaseConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Configuration this orchestrator runs with
    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Tool invocations in the order they will run
    pub fn plan(&self) -> Vec<ToolInvocation> {
        self.config
            .versions
            .iter()
            .map(|version| ToolInvocation::build_plugin(&self.config.paths, version))
            .collect()
    }

    /// Run with the log artifact installed as the active sink
    ///
    /// The sink is released on every return path, including errors.
    pub fn run_logged(
        &self,
        echo_stderr: bool,
        progress: &mut Progress,
    ) -> Result<RunSummary, AppError> {
        let session = LogSession::open(&self.config.paths.log_file, echo_stderr)?;
        info!(
            "plugin-release {} writing log to {}",
            env!("CARGO_PKG_VERSION"),
            session.path().display()
        );

        // Fatal errors go to the log before the sink is released
        self.run(progress).map_err(|e| {
            error!("{}", e);
            AppError::from(e)
        })
    }

    /// Run the release workflow
    pub fn run(&self, progress: &mut Progress) -> Result<RunSummary, CleanupError> {
        let mut summary = RunSummary::new();
        let paths = &self.config.paths;

        if let Some(config_file) = &self.config.config_file {
            info!("Using config file: {}", config_file.display());
        }
        info!("Engine installation root: {}", paths.install_root.display());
        if !paths.install_root.is_dir() {
            warn!(
                "Engine installation root does not exist: {}",
                paths.install_root.display()
            );
        }

        // Step 1: Remove output left over from a previous run
        self.prepare_output()?;

        // Step 2: Package each version, newest first
        let versions = self.config.versions.as_slice();
        let listed: Vec<&str> = versions.iter().map(|v| v.as_str()).collect();
        info!("Versions to build: {}", listed.join(", "));

        progress.start(versions.len());
        for version in versions {
            progress.begin_version(version.as_str());
            let result = self.build_version(version);
            let took = progress.finish_version(version.as_str(), result.is_success());
            info!("Version {} took {}", version, format_duration(took));
            summary.record(result);
        }
        progress.finish_and_clear();

        summary.finish();
        info!(
            "Finished building! Success: {}, Failure: {}",
            summary.success_count, summary.error_count
        );

        Ok(summary)
    }

    /// Remove the output root if a previous run left it behind
    pub fn prepare_output(&self) -> Result<(), CleanupError> {
        let output_root = &self.config.paths.output_root;
        let metadata = match fs::symlink_metadata(output_root) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(CleanupError::stale_output(output_root, e)),
        };

        info!("Cleaning output at: {}", output_root.display());
        let removed = if metadata.is_dir() {
            fs::remove_dir_all(output_root)
        } else {
            fs::remove_file(output_root)
        };
        removed.map_err(|e| CleanupError::stale_output(output_root, e))
    }

    /// Package the plugin for a single engine version
    pub fn build_version(&self, version: &EngineVersion) -> VersionBuildResult {
        let invocation = ToolInvocation::build_plugin(&self.config.paths, version);

        info!("Building version: {}", version);
        debug!("Running {}", invocation);

        let output = self.runner.run(&invocation);
        log_tool_output(version, &output);

        let result = VersionBuildResult::new(version.clone(), output.status(), &invocation.package_dir);

        if result.is_success() {
            info!("Version {} packaged into {}", version, invocation.package_dir.display());
            if !invocation.package_dir.is_dir() {
                warn!(
                    "Packaging tool reported success for {} but {} does not exist",
                    version,
                    invocation.package_dir.display()
                );
            }
            return result;
        }

        match &output.launch_error {
            Some(message) => warn!("Version {} could not be built: {}", version, message),
            None => match output.exit_code {
                Some(code) => warn!("Version {} failed with exit code {}", version, code),
                None => warn!("Version {} failed: tool terminated without exit code", version),
            },
        }

        match remove_partial_output(&invocation.package_dir) {
            Ok(true) => {
                info!("Removed partial output at {}", invocation.package_dir.display());
                result
            }
            Ok(false) => result,
            Err(e) => {
                warn!("{}", e);
                result.with_cleanup_error(e.to_string())
            }
        }
    }
}

/// Remove a package directory left by a failed build
///
/// Returns whether anything was removed.
pub fn remove_partial_output(package_dir: &Path) -> Result<bool, CleanupError> {
    if !package_dir.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(package_dir)
        .map(|_| true)
        .map_err(|e| CleanupError::partial_output(package_dir, e))
}

/// Process exit code for a finished run
///
/// Any failed version yields a non-zero status unless failures are allowed.
pub fn exit_code(summary: &RunSummary, allow_failures: bool) -> u8 {
    if summary.has_failures() && !allow_failures {
        EXIT_BUILD_FAILURES
    } else {
        0
    }
}

fn log_tool_output(version: &EngineVersion, output: &CommandOutput) {
    for line in output.stdout.lines().filter(|l| !l.trim().is_empty()) {
        info!("[{}] {}", version, line);
    }
    for line in output.stderr.lines().filter(|l| !l.trim().is_empty()) {
        warn!("[{}] {}", version, line);
    }
}
