//! Per-version build outcomes and the run summary
//!
//! Provides structures for tracking results at version and overall levels.

use super::EngineVersion;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of a single packaging tool invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BuildStatus {
    /// Tool exited with code zero
    Succeeded,
    /// Tool exited with a non-zero code (None when killed by a signal)
    Failed { exit_code: Option<i32> },
    /// Tool could not be started at all
    LaunchFailed { message: String },
}

impl BuildStatus {
    /// Returns true if the version was packaged
    pub fn is_success(&self) -> bool {
        matches!(self, BuildStatus::Succeeded)
    }

    /// Short label for display
    pub fn label(&self) -> &'static str {
        match self {
            BuildStatus::Succeeded => "succeeded",
            BuildStatus::Failed { .. } => "failed",
            BuildStatus::LaunchFailed { .. } => "launch_failed",
        }
    }

    /// Exit code reported by the tool, if any
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            BuildStatus::Succeeded => Some(0),
            BuildStatus::Failed { exit_code } => *exit_code,
            BuildStatus::LaunchFailed { .. } => None,
        }
    }
}

/// Result of packaging the plugin for one engine version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionBuildResult {
    /// Engine version that was attempted
    pub version: EngineVersion,
    /// What the packaging tool reported
    pub status: BuildStatus,
    /// Requested package directory for this version
    pub output_dir: PathBuf,
    /// Set when partial output of a failed build could not be removed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cleanup_error: Option<String>,
}

impl VersionBuildResult {
    pub fn new(version: EngineVersion, status: BuildStatus, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            version,
            status,
            output_dir: output_dir.into(),
            cleanup_error: None,
        }
    }

    /// Records a failed removal of partial output
    pub fn with_cleanup_error(mut self, message: impl Into<String>) -> Self {
        self.cleanup_error = Some(message.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Overall result of one release run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of versions packaged successfully
    pub success_count: usize,
    /// Number of versions that failed
    pub error_count: usize,
    /// Results in attempt order
    pub results: Vec<VersionBuildResult>,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// When the last version finished
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    /// Creates an empty summary starting now
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(started_at: DateTime<Utc>) -> Self {
        Self {
            success_count: 0,
            error_count: 0,
            results: Vec::new(),
            started_at,
            finished_at: None,
        }
    }

    /// Adds a version result and bumps the matching counter
    pub fn record(&mut self, result: VersionBuildResult) {
        if result.is_success() {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
        self.results.push(result);
    }

    /// Marks the run as done
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Number of versions attempted
    pub fn attempted(&self) -> usize {
        self.success_count + self.error_count
    }

    /// Returns true if any version failed
    pub fn has_failures(&self) -> bool {
        self.error_count > 0
    }

    /// Results of failed versions
    pub fn failures(&self) -> impl Iterator<Item = &VersionBuildResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    /// Results of successful versions
    pub fn successes(&self) -> impl Iterator<Item = &VersionBuildResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    /// Wall-clock duration of the run, once finished
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.finished_at.map(|end| end - self.started_at)
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(version: &str, status: BuildStatus) -> VersionBuildResult {
        VersionBuildResult::new(
            EngineVersion::parse(version).unwrap(),
            status,
            format!("/out/Plugin_{}", version),
        )
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(BuildStatus::Succeeded.label(), "succeeded");
        assert_eq!(BuildStatus::Failed { exit_code: Some(1) }.label(), "failed");
        assert_eq!(
            BuildStatus::LaunchFailed {
                message: "x".to_string()
            }
            .label(),
            "launch_failed"
        );
    }

    #[test]
    fn test_status_exit_code() {
        assert_eq!(BuildStatus::Succeeded.exit_code(), Some(0));
        assert_eq!(BuildStatus::Failed { exit_code: Some(6) }.exit_code(), Some(6));
        assert_eq!(BuildStatus::Failed { exit_code: None }.exit_code(), None);
    }

    #[test]
    fn test_record_counts() {
        let mut summary = RunSummary::new();
        summary.record(result("5.0ea", BuildStatus::Succeeded));
        summary.record(result("4.26", BuildStatus::Failed { exit_code: Some(1) }));
        summary.record(result(
            "4.24",
            BuildStatus::LaunchFailed {
                message: "not found".to_string(),
            },
        ));

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.error_count, 2);
        assert_eq!(summary.attempted(), 3);
        assert!(summary.has_failures());
        assert_eq!(summary.successes().count(), 1);
        assert_eq!(summary.failures().count(), 2);
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::default();
        assert_eq!(summary.attempted(), 0);
        assert!(!summary.has_failures());
        assert!(summary.duration().is_none());
    }

    #[test]
    fn test_finish_sets_duration() {
        let mut summary = RunSummary::new();
        summary.finish();
        let duration = summary.duration().unwrap();
        assert!(duration >= chrono::Duration::zero());
    }

    #[test]
    fn test_cleanup_error() {
        let r = result("4.26", BuildStatus::Failed { exit_code: Some(1) })
            .with_cleanup_error("file in use");
        assert_eq!(r.cleanup_error.as_deref(), Some("file in use"));
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_value(BuildStatus::Failed { exit_code: Some(3) }).unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["exit_code"], 3);
    }
}
