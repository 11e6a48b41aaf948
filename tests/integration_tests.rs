//! Integration tests for plugin-release
//!
//! These tests verify:
//! - Every configured version is attempted once, newest first
//! - Output of failed versions is removed, successful output kept
//! - Stale output from previous runs is cleared before building
//! - Missing configuration stops the run before any build

use plugin_release::config::{ReleaseConfig, ReleasePaths};
use plugin_release::domain::{BuildStatus, VersionList};
use plugin_release::orchestrator::{exit_code, Orchestrator};
use plugin_release::progress::Progress;
use plugin_release::toolchain::{CommandOutput, CommandRunner, ToolInvocation};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Fake RunUAT: records every call, writes a package on exit code 0
struct FakeUat {
    exit_codes: HashMap<String, i32>,
    calls: RefCell<Vec<String>>,
    /// Whether the output root existed when each call started
    output_root_seen: RefCell<Vec<bool>>,
    output_root: std::path::PathBuf,
}

impl FakeUat {
    fn new(output_root: &Path, exit_codes: &[(&str, i32)]) -> Self {
        Self {
            exit_codes: exit_codes
                .iter()
                .map(|(v, c)| (v.to_string(), *c))
                .collect(),
            calls: RefCell::new(Vec::new()),
            output_root_seen: RefCell::new(Vec::new()),
            output_root: output_root.to_path_buf(),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for FakeUat {
    fn run(&self, invocation: &ToolInvocation) -> CommandOutput {
        let version = invocation.version.to_string();
        self.calls.borrow_mut().push(version.clone());
        self.output_root_seen
            .borrow_mut()
            .push(self.output_root.join("stale.txt").exists());

        let code = self.exit_codes.get(&version).copied().unwrap_or(0);
        // Real builds create the package directory before they fail
        fs::create_dir_all(invocation.package_dir.join("Binaries")).unwrap();
        CommandOutput::with_code(code)
    }
}

fn create_test_repo() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let plugin_dir = temp_dir.path().join("Plugins").join("AssetManagement");
    fs::create_dir_all(&plugin_dir).unwrap();
    fs::write(plugin_dir.join("AssetManagement.uplugin"), "{}").unwrap();
    temp_dir
}

fn make_config(repo: &Path, versions: &[&str]) -> ReleaseConfig {
    let paths = ReleasePaths::from_root(repo.join("Epic Games"), repo).unwrap();
    ReleaseConfig::new(paths, VersionList::parse(versions).unwrap())
}

mod ordering {
    use super::*;

    #[test]
    fn test_unsorted_list_attempted_newest_first() {
        let repo = create_test_repo();
        let config = make_config(repo.path(), &["4.20", "5.0ea", "4.24"]);
        let tool = FakeUat::new(&config.paths.output_root, &[]);

        Orchestrator::new(config, &tool)
            .run(&mut Progress::disabled())
            .unwrap();

        assert_eq!(tool.calls(), vec!["5.0ea", "4.24", "4.20"]);
    }

    #[test]
    fn test_each_version_attempted_exactly_once() {
        let repo = create_test_repo();
        let versions = ["4.18", "4.20", "4.22", "4.24", "4.26", "5.0ea"];
        let config = make_config(repo.path(), &versions);
        let tool = FakeUat::new(
            &config.paths.output_root,
            &[("4.18", 1), ("4.22", 1), ("5.0ea", 1)],
        );

        let summary = Orchestrator::new(config, &tool)
            .run(&mut Progress::disabled())
            .unwrap();

        let mut calls = tool.calls();
        assert_eq!(calls.len(), versions.len());
        calls.sort();
        calls.dedup();
        assert_eq!(calls.len(), versions.len());
        assert_eq!(summary.success_count + summary.error_count, versions.len());
    }
}

mod outputs {
    use super::*;

    #[test]
    fn test_success_and_failure_scenario() {
        let repo = create_test_repo();
        let config = make_config(repo.path(), &["5.0ea", "4.26"]);
        let ok_dir = config.paths.package_dir("5.0ea");
        let failed_dir = config.paths.package_dir("4.26");
        let tool = FakeUat::new(&config.paths.output_root, &[("4.26", 1)]);

        let summary = Orchestrator::new(config, &tool)
            .run(&mut Progress::disabled())
            .unwrap();

        assert_eq!(summary.success_count, 1);
        assert_eq!(summary.error_count, 1);
        assert!(ok_dir.is_dir(), "output for 5.0ea should exist");
        assert!(!failed_dir.exists(), "output for 4.26 should be removed");
        assert_eq!(summary.results[0].status, BuildStatus::Succeeded);
        assert_eq!(
            summary.results[1].status,
            BuildStatus::Failed { exit_code: Some(1) }
        );
        assert_eq!(exit_code(&summary, false), 2);
        assert_eq!(exit_code(&summary, true), 0);
    }

    #[test]
    fn test_all_failures_leave_no_output() {
        let repo = create_test_repo();
        let config = make_config(repo.path(), &["4.24", "4.26"]);
        let output_root = config.paths.output_root.clone();
        let tool = FakeUat::new(&output_root, &[("4.24", 3), ("4.26", 1)]);

        let summary = Orchestrator::new(config, &tool)
            .run(&mut Progress::disabled())
            .unwrap();

        assert_eq!(summary.error_count, 2);
        let leftovers = fs::read_dir(&output_root)
            .map(|entries| entries.count())
            .unwrap_or(0);
        assert_eq!(leftovers, 0);
    }

    #[test]
    fn test_stale_output_removed_before_first_build() {
        let repo = create_test_repo();
        let config = make_config(repo.path(), &["4.26", "4.24"]);
        let output_root = config.paths.output_root.clone();
        fs::create_dir_all(&output_root).unwrap();
        fs::write(output_root.join("stale.txt"), "from last week").unwrap();
        let tool = FakeUat::new(&output_root, &[]);

        Orchestrator::new(config, &tool)
            .run(&mut Progress::disabled())
            .unwrap();

        assert_eq!(*tool.output_root_seen.borrow(), vec![false, false]);
        assert!(!output_root.join("stale.txt").exists());
        assert!(output_root.join("AssetManagement_4.26").is_dir());
    }

    #[test]
    fn test_launch_failure_counts_as_version_failure() {
        struct Missing;
        impl CommandRunner for Missing {
            fn run(&self, _invocation: &ToolInvocation) -> CommandOutput {
                CommandOutput::launch_failed("packaging tool not found")
            }
        }

        let repo = create_test_repo();
        let config = make_config(repo.path(), &["5.0ea", "4.26"]);

        let summary = Orchestrator::new(config, Missing)
            .run(&mut Progress::disabled())
            .unwrap();

        assert_eq!(summary.error_count, 2);
        assert!(matches!(
            summary.results[0].status,
            BuildStatus::LaunchFailed { .. }
        ));
    }
}

mod logging {
    use super::*;

    #[test]
    fn test_log_artifact_records_run() {
        let repo = create_test_repo();
        let config = make_config(repo.path(), &["5.0ea", "4.26"]);
        let log_file = config.paths.log_file.clone();
        let tool = FakeUat::new(&config.paths.output_root, &[("4.26", 1)]);

        Orchestrator::new(config, &tool)
            .run_logged(false, &mut Progress::disabled())
            .unwrap();

        assert!(log_file.ends_with(".build/autobuild.log"));
        let log = fs::read_to_string(&log_file).unwrap();
        assert!(log.contains("Building version: 5.0ea"));
        assert!(log.contains("Version 4.26 failed with exit code 1"));
        assert!(log.contains("Finished building! Success: 1, Failure: 1"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_cleanup_error_is_logged_and_releases_log() {
        let repo = create_test_repo();
        // procfs entries cannot be unlinked, not even by root
        let paths = ReleasePaths::with_layout(
            repo.path().join("Epic Games"),
            repo.path(),
            Path::new("Plugins/AssetManagement/AssetManagement.uplugin"),
            Path::new("/proc/self"),
            Path::new(".build/autobuild.log"),
        )
        .unwrap();
        let log_file = paths.log_file.clone();
        let config = ReleaseConfig::new(paths, VersionList::parse(["4.26", "4.24"]).unwrap());
        let tool = FakeUat::new(repo.path(), &[]);

        let err = Orchestrator::new(config, &tool)
            .run_logged(false, &mut Progress::disabled())
            .unwrap_err();

        assert_eq!(err.exit_code(), 1);
        assert!(tool.calls().is_empty(), "no build may start after a cleanup error");

        tracing::info!("after the run");
        let log = fs::read_to_string(&log_file).unwrap();
        assert!(log.contains("Cleaning output at: /proc/self"));
        assert!(log.contains("failed to remove stale output at /proc/self"));
        assert!(!log.contains("after the run"));
    }
}

mod configuration {
    use super::*;
    use clap::Parser;
    use plugin_release::cli::CliArgs;
    use plugin_release::error::ConfigError;

    #[test]
    fn test_missing_install_root_is_fatal() {
        let repo = create_test_repo();
        let args = CliArgs {
            install_root: None,
            ..CliArgs::parse_from(["plugin-release", "--root", repo.path().to_str().unwrap()])
        };

        let err = ReleaseConfig::from_cli(&args).unwrap_err();
        assert!(matches!(err, ConfigError::InstallRootNotConfigured));
        assert!(!repo.path().join("BuildOutput").exists());
        assert!(!repo.path().join(".build").exists());
    }

    #[test]
    fn test_release_toml_versions_are_sorted() {
        let repo = create_test_repo();
        fs::write(
            repo.path().join("release.toml"),
            "versions = [\"4.20\", \"5.0ea\", \"4.24\"]\n",
        )
        .unwrap();
        let args = CliArgs::parse_from([
            "plugin-release",
            "--install-root",
            "/opt/epic",
            "--root",
            repo.path().to_str().unwrap(),
        ]);

        let config = ReleaseConfig::from_cli(&args).unwrap();
        let plan: Vec<String> = Orchestrator::new(config, FakeUat::new(repo.path(), &[]))
            .plan()
            .iter()
            .map(|i| i.version.to_string())
            .collect();
        assert_eq!(plan, vec!["5.0ea", "4.24", "4.20"]);
    }
}
