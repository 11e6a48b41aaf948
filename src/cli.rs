//! CLI argument parsing module for plugin-release

use crate::error::INSTALL_ROOT_ENV;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Parse a path argument, keeping empty values
///
/// An empty `UE4_Install` must reach configuration validation instead of
/// being rejected as a missing value.
fn parse_path(s: &str) -> Result<PathBuf, String> {
    Ok(PathBuf::from(s))
}

/// Package an engine plugin against every configured engine version
#[derive(Parser, Debug, Clone)]
#[command(
    name = "plugin-release",
    version,
    about = "Package an engine plugin for several engine versions"
)]
pub struct CliArgs {
    /// Engine installation root containing one UE_<version> directory per engine
    #[arg(long, env = INSTALL_ROOT_ENV, hide_env_values = true, value_parser = parse_path)]
    pub install_root: Option<PathBuf>,

    /// Repository root holding the plugin (default: current directory)
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Config file (default: <root>/release.toml when present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Engine version to package (can be specified multiple times)
    #[arg(short = 'e', long = "engine-version", action = ArgAction::Append)]
    pub engine_versions: Vec<String>,

    /// Plugin descriptor, relative to the repository root
    #[arg(long)]
    pub plugin: Option<PathBuf>,

    /// Output directory, relative to the repository root
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Log file, relative to the repository root
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    // General options
    /// Show the planned tool invocations without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Also write log output to stderr
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output the summary in JSON format
    #[arg(long)]
    pub json: bool,

    /// Exit with status 0 even if some versions failed to package
    #[arg(long)]
    pub allow_failures: bool,

    /// Wait for Enter before exiting (only when stdin is a terminal)
    #[arg(long)]
    pub pause: bool,
}

impl CliArgs {
    /// Check if engine versions were given on the command line
    pub fn has_version_override(&self) -> bool {
        !self.engine_versions.is_empty()
    }

    /// Check if progress should be drawn on the console
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}
