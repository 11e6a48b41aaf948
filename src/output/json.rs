//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of the run summary
//! - Structured per-version status information
//! - The planned invocations of a dry run

use crate::domain::{BuildStatus, RunSummary, VersionBuildResult};
use crate::output::{OutputFormatter, Verbosity};
use crate::toolchain::ToolInvocation;
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Verbosity level affects detail in output
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of a finished run
#[derive(Serialize)]
struct JsonOutput {
    /// Number of versions packaged
    success_count: usize,
    /// Number of versions that failed
    error_count: usize,
    /// RFC 3339 start time
    started_at: String,
    /// Run duration in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_ms: Option<i64>,
    /// Per-version results in attempt order
    versions: Vec<JsonVersion>,
}

/// JSON representation of one version
#[derive(Serialize)]
struct JsonVersion {
    /// Engine version identifier
    version: String,
    /// succeeded, failed or launch_failed
    status: &'static str,
    /// Exit code reported by the packaging tool
    exit_code: Option<i32>,
    /// Package directory for this version
    output_dir: String,
    /// Why the tool could not be started
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    /// Partial output removal problem
    #[serde(skip_serializing_if = "Option::is_none")]
    cleanup_error: Option<String>,
}

/// JSON representation of a dry run
#[derive(Serialize)]
struct JsonPlan {
    dry_run: bool,
    invocations: Vec<JsonInvocation>,
}

/// JSON representation of a planned invocation
#[derive(Serialize)]
struct JsonInvocation {
    version: String,
    program: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    args: Vec<String>,
    output_dir: String,
}

impl JsonFormatter {
    /// Convert a version result to its JSON representation
    fn version_to_json(result: &VersionBuildResult) -> JsonVersion {
        let message = match &result.status {
            BuildStatus::LaunchFailed { message } => Some(message.clone()),
            _ => None,
        };

        JsonVersion {
            version: result.version.to_string(),
            status: result.status.label(),
            exit_code: result.status.exit_code(),
            output_dir: result.output_dir.display().to_string(),
            message,
            cleanup_error: result.cleanup_error.clone(),
        }
    }

    fn invocation_to_json(&self, invocation: &ToolInvocation) -> JsonInvocation {
        // Arguments are only listed outside quiet mode
        let args = if self.verbosity == Verbosity::Quiet {
            Vec::new()
        } else {
            invocation.args.clone()
        };

        JsonInvocation {
            version: invocation.version.to_string(),
            program: invocation.program.display().to_string(),
            args,
            output_dir: invocation.package_dir.display().to_string(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let output = JsonOutput {
            success_count: summary.success_count,
            error_count: summary.error_count,
            started_at: summary.started_at.to_rfc3339(),
            duration_ms: summary.duration().map(|d| d.num_milliseconds()),
            versions: summary.results.iter().map(Self::version_to_json).collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }

    fn format_plan(
        &self,
        plan: &[ToolInvocation],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let output = JsonPlan {
            dry_run: true,
            invocations: plan.iter().map(|i| self.invocation_to_json(i)).collect(),
        };

        serde_json::to_writer_pretty(&mut *writer, &output)?;
        writeln!(writer)
    }
}
