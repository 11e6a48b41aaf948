//! Packaging tool integration
//!
//! This module provides:
//! - Location of the engine's RunUAT script for a version
//! - The BuildPlugin invocation for one engine version
//! - Execution of the tool with captured output

use crate::config::ReleasePaths;
use crate::domain::{BuildStatus, EngineVersion};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Packaging action passed to RunUAT
pub const BUILD_PLUGIN_VERB: &str = "BuildPlugin";

/// Flag asking RunUAT for an installed-engine release build
pub const RELEASE_FLAG: &str = "-Rocket";

/// RunUAT script name for the current platform
pub fn uat_script_name() -> &'static str {
    if cfg!(windows) {
        "RunUAT.bat"
    } else {
        "RunUAT.sh"
    }
}

/// Location of RunUAT inside an engine installation
///
/// `<install_root>/UE_<version>/Engine/Build/BatchFiles/RunUAT.{bat,sh}`
pub fn uat_path(install_root: &Path, version: &EngineVersion) -> PathBuf {
    install_root
        .join(format!("UE_{}", version))
        .join("Engine")
        .join("Build")
        .join("BatchFiles")
        .join(uat_script_name())
}

/// One packaging tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Engine version being packaged
    pub version: EngineVersion,
    /// Program to execute
    pub program: PathBuf,
    /// Arguments passed to the program
    pub args: Vec<String>,
    /// Directory the tool is asked to package into
    pub package_dir: PathBuf,
}

impl ToolInvocation {
    /// BuildPlugin invocation packaging the plugin for `version`
    pub fn build_plugin(paths: &ReleasePaths, version: &EngineVersion) -> Self {
        let package_dir = paths.package_dir(version.as_str());
        let args = vec![
            BUILD_PLUGIN_VERB.to_string(),
            format!("-Plugin={}", paths.plugin_descriptor.display()),
            format!("-Package={}", package_dir.display()),
            RELEASE_FLAG.to_string(),
        ];

        Self {
            version: version.clone(),
            program: uat_path(&paths.install_root, version),
            args,
            package_dir,
        }
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.program.display())?;
        for arg in &self.args {
            match arg.split_once('=') {
                Some((flag, value)) => write!(f, " {}=\"{}\"", flag, value)?,
                None => write!(f, " {}", arg)?,
            }
        }
        Ok(())
    }
}

/// What a finished tool call reported
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None when terminated by a signal or never started)
    pub exit_code: Option<i32>,
    /// Standard output from the command
    pub stdout: String,
    /// Standard error from the command
    pub stderr: String,
    /// Set when the process could not be started
    pub launch_error: Option<String>,
}

impl CommandOutput {
    /// Create a result for a process that ran to completion
    pub fn exited(exit_code: Option<i32>, stdout: String, stderr: String) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            launch_error: None,
        }
    }

    /// Create a result for a process that exited with `code` and no output
    pub fn with_code(code: i32) -> Self {
        Self::exited(Some(code), String::new(), String::new())
    }

    /// Create a result for a process that could not be started
    pub fn launch_failed(message: impl Into<String>) -> Self {
        Self {
            launch_error: Some(message.into()),
            ..Self::default()
        }
    }

    /// Only a zero exit code counts as success
    pub fn success(&self) -> bool {
        self.launch_error.is_none() && self.exit_code == Some(0)
    }

    /// Map to the build status recorded for the version
    pub fn status(&self) -> BuildStatus {
        if let Some(message) = &self.launch_error {
            BuildStatus::LaunchFailed {
                message: message.clone(),
            }
        } else if self.success() {
            BuildStatus::Succeeded
        } else {
            BuildStatus::Failed {
                exit_code: self.exit_code,
            }
        }
    }
}

/// Trait for running packaging tool invocations
pub trait CommandRunner {
    /// Run the invocation to completion
    fn run(&self, invocation: &ToolInvocation) -> CommandOutput;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &ToolInvocation) -> CommandOutput {
        (**self).run(invocation)
    }
}

/// Default runner that executes real processes
#[derive(Debug, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    /// Create a new system command runner
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &ToolInvocation) -> CommandOutput {
        if !invocation.program.is_file() {
            return CommandOutput::launch_failed(format!(
                "packaging tool not found: {}",
                invocation.program.display()
            ));
        }

        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);
        if let Some(dir) = invocation.program.parent() {
            command.current_dir(dir);
        }

        match command.output() {
            Ok(output) => CommandOutput::exited(
                output.status.code(),
                String::from_utf8_lossy(&output.stdout).to_string(),
                String::from_utf8_lossy(&output.stderr).to_string(),
            ),
            Err(e) => CommandOutput::launch_failed(format!("failed to execute command: {}", e)),
        }
    }
}
