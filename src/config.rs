//! Release configuration
//!
//! Settings are resolved from (highest priority first):
//! - Command line flags and the `UE4_Install` environment variable
//! - A `release.toml` file in the repository root (or `--config`)
//! - Built-in defaults matching the plugin repository layout

use crate::cli::CliArgs;
use crate::domain::VersionList;
use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the repository root
pub const DEFAULT_CONFIG_FILE: &str = "release.toml";

/// Plugin descriptor, relative to the repository root
pub const DEFAULT_PLUGIN_DESCRIPTOR: &str = "Plugins/AssetManagement/AssetManagement.uplugin";

/// Output root, relative to the repository root
pub const DEFAULT_OUTPUT_DIR: &str = "BuildOutput";

/// Log artifact, relative to the repository root
pub const DEFAULT_LOG_FILE: &str = ".build/autobuild.log";

/// Contents of `release.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Engine versions to package
    pub versions: Option<Vec<String>>,
    /// Plugin descriptor path
    pub plugin: Option<PathBuf>,
    /// Output root
    pub output_dir: Option<PathBuf>,
    /// Log artifact path
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    /// Parse config file contents
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::config_file_parse(path, e.to_string()))
    }

    /// Read and parse a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ConfigError::ConfigFileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::ConfigFileRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(path, &content)
    }

    /// Locate and load the config file for a repository
    ///
    /// An explicit path must exist; the default `release.toml` is optional.
    pub fn discover(
        repo_root: &Path,
        explicit: Option<&Path>,
    ) -> Result<Option<(PathBuf, Self)>, ConfigError> {
        if let Some(path) = explicit {
            let path = repo_root.join(path);
            let config = Self::load(&path)?;
            return Ok(Some((path, config)));
        }

        let path = repo_root.join(DEFAULT_CONFIG_FILE);
        if !path.is_file() {
            return Ok(None);
        }
        let config = Self::load(&path)?;
        Ok(Some((path, config)))
    }
}

/// Filesystem locations used by a release run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePaths {
    /// Engine installation root
    pub install_root: PathBuf,
    /// Repository root
    pub repo_root: PathBuf,
    /// Directory receiving one package directory per version
    pub output_root: PathBuf,
    /// Plugin descriptor passed to the packaging tool
    pub plugin_descriptor: PathBuf,
    /// Log artifact
    pub log_file: PathBuf,
    /// Plugin name used to name package directories
    pub plugin_name: String,
}

impl ReleasePaths {
    /// Paths for the default repository layout
    pub fn from_root(
        install_root: impl Into<PathBuf>,
        repo_root: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let repo_root = repo_root.into();
        Self::with_layout(
            install_root.into(),
            &repo_root,
            Path::new(DEFAULT_PLUGIN_DESCRIPTOR),
            Path::new(DEFAULT_OUTPUT_DIR),
            Path::new(DEFAULT_LOG_FILE),
        )
    }

    /// Paths for a custom layout; relative paths are taken from the repository root
    pub fn with_layout(
        install_root: PathBuf,
        repo_root: &Path,
        plugin: &Path,
        output_dir: &Path,
        log_file: &Path,
    ) -> Result<Self, ConfigError> {
        let plugin_descriptor = repo_root.join(plugin);
        let plugin_name = plugin_descriptor
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                ConfigError::invalid_path(&plugin_descriptor, "plugin descriptor has no file name")
            })?;

        Ok(Self {
            install_root,
            repo_root: repo_root.to_path_buf(),
            output_root: repo_root.join(output_dir),
            plugin_descriptor,
            log_file: repo_root.join(log_file),
            plugin_name,
        })
    }

    /// Package directory for one engine version, e.g. `BuildOutput/AssetManagement_4.26`
    pub fn package_dir(&self, version: &str) -> PathBuf {
        self.output_root
            .join(format!("{}_{}", self.plugin_name, version))
    }
}

/// Fully resolved configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseConfig {
    /// Filesystem locations
    pub paths: ReleasePaths,
    /// Versions to package, newest first
    pub versions: VersionList,
    /// Config file that contributed settings, if any
    pub config_file: Option<PathBuf>,
}

impl ReleaseConfig {
    /// Create a configuration from already resolved parts
    pub fn new(paths: ReleasePaths, versions: VersionList) -> Self {
        Self {
            paths,
            versions,
            config_file: None,
        }
    }

    /// Resolve configuration from CLI arguments, config file and defaults
    pub fn from_cli(args: &CliArgs) -> Result<Self, ConfigError> {
        // Checked first so a missing installation is reported before anything else
        let install_root = require_install_root(args.install_root.as_deref())?;
        let repo_root = absolute(&args.root)?;
        let install_root = absolute(&install_root)?;

        let file = FileConfig::discover(&repo_root, args.config.as_deref())?;
        let (config_file, file) = match file {
            Some((path, config)) => (Some(path), config),
            None => (None, FileConfig::default()),
        };

        let versions = if args.has_version_override() {
            VersionList::parse(&args.engine_versions)?
        } else if let Some(versions) = &file.versions {
            VersionList::parse(versions)?
        } else {
            VersionList::default()
        };

        let plugin = pick(&args.plugin, &file.plugin, DEFAULT_PLUGIN_DESCRIPTOR);
        let output_dir = pick(&args.output_dir, &file.output_dir, DEFAULT_OUTPUT_DIR);
        let log_file = pick(&args.log_file, &file.log_file, DEFAULT_LOG_FILE);

        let paths =
            ReleasePaths::with_layout(install_root, &repo_root, &plugin, &output_dir, &log_file)?;

        if paths.output_root == paths.repo_root {
            return Err(ConfigError::invalid_path(
                &paths.output_root,
                "output directory must not be the repository root",
            ));
        }
        if paths.log_file.starts_with(&paths.output_root) {
            return Err(ConfigError::invalid_path(
                &paths.log_file,
                "log file must not be inside the output directory",
            ));
        }

        Ok(Self {
            paths,
            versions,
            config_file,
        })
    }
}

/// Validate the installation root value
pub fn require_install_root(value: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match value {
        Some(path) if !path.as_os_str().is_empty() => Ok(path.to_path_buf()),
        _ => Err(ConfigError::InstallRootNotConfigured),
    }
}

fn pick(cli: &Option<PathBuf>, file: &Option<PathBuf>, default: &str) -> PathBuf {
    cli.clone()
        .or_else(|| file.clone())
        .unwrap_or_else(|| PathBuf::from(default))
}

fn absolute(path: &Path) -> Result<PathBuf, ConfigError> {
    std::path::absolute(path).map_err(|e| ConfigError::invalid_path(path, e.to_string()))
}
