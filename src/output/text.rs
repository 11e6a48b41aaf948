//! Text output formatter for human-readable display
//!
//! This module provides:
//! - One line per attempted version with its outcome
//! - The final success/failure counts
//! - The planned invocations of a dry run

use crate::domain::{BuildStatus, RunSummary, VersionBuildResult};
use crate::output::{OutputFormatter, Verbosity};
use crate::toolchain::ToolInvocation;
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    /// Verbosity level
    verbosity: Verbosity,
    /// Whether to use colors
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    /// Describe why a version failed
    fn failure_detail(status: &BuildStatus) -> String {
        match status {
            BuildStatus::Succeeded => String::new(),
            BuildStatus::Failed {
                exit_code: Some(code),
            } => format!("exit code {}", code),
            BuildStatus::Failed { exit_code: None } => "terminated".to_string(),
            BuildStatus::LaunchFailed { message } => message.clone(),
        }
    }

    /// Calculate the widest version identifier for alignment
    fn max_version_length(results: &[VersionBuildResult]) -> usize {
        results
            .iter()
            .map(|r| r.version.as_str().len())
            .max()
            .unwrap_or(0)
    }

    /// Format a single version line
    fn format_version_line(
        &self,
        result: &VersionBuildResult,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let version = format!("{:width$}", result.version.as_str(), width = width);
        let detail = if result.is_success() {
            if self.verbosity == Verbosity::Verbose {
                result.output_dir.display().to_string()
            } else {
                String::new()
            }
        } else {
            Self::failure_detail(&result.status)
        };

        if self.color {
            let marker = if result.is_success() {
                "✓".green().bold()
            } else {
                "✗".red().bold()
            };
            writeln!(writer, "  {} {} {}", marker, version.bold(), detail.dimmed())?;
        } else {
            let marker = if result.is_success() { "ok" } else { "FAILED" };
            writeln!(writer, "  {:6} {} {}", marker, version, detail)?;
        }

        if self.verbosity == Verbosity::Verbose {
            if let Some(cleanup) = &result.cleanup_error {
                if self.color {
                    writeln!(writer, "      {}", cleanup.yellow())?;
                } else {
                    writeln!(writer, "      {}", cleanup)?;
                }
            }
        }

        Ok(())
    }

    /// Format the final counts line
    fn format_totals(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        let elapsed = summary
            .duration()
            .map(|d| format!(" in {:.1}s", d.num_milliseconds() as f64 / 1000.0))
            .unwrap_or_default();

        if self.color {
            let success = format!("Success: {}", summary.success_count).green();
            let failure = if summary.has_failures() {
                format!("Failure: {}", summary.error_count).red().bold()
            } else {
                format!("Failure: {}", summary.error_count).normal()
            };
            writeln!(
                writer,
                "Finished building! {}, {}{}",
                success,
                failure,
                elapsed.dimmed()
            )
        } else {
            writeln!(
                writer,
                "Finished building! Success: {}, Failure: {}{}",
                summary.success_count, summary.error_count, elapsed
            )
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, summary: &RunSummary, writer: &mut dyn Write) -> std::io::Result<()> {
        if self.verbosity != Verbosity::Quiet && !summary.results.is_empty() {
            let width = Self::max_version_length(&summary.results);
            for result in &summary.results {
                self.format_version_line(result, width, writer)?;
            }
            writeln!(writer)?;
        }

        self.format_totals(summary, writer)
    }

    fn format_plan(
        &self,
        plan: &[ToolInvocation],
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let header = format!("(dry-run) {} version(s) would be packaged:", plan.len());
        if self.color {
            writeln!(writer, "{}", header.cyan())?;
        } else {
            writeln!(writer, "{}", header)?;
        }

        for invocation in plan {
            writeln!(writer, "  {}", invocation.version)?;
            if self.verbosity != Verbosity::Quiet {
                writeln!(writer, "    {}", invocation)?;
            }
        }
        Ok(())
    }
}
