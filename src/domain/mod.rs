//! Core domain models for plugin-release
//!
//! This module contains the fundamental types used throughout the application:
//! - Engine version identifiers and their precedence
//! - The ordered list of versions to package
//! - Per-version build results and the run summary

mod build_result;
mod engine_version;
mod version_list;

pub use build_result::{BuildStatus, RunSummary, VersionBuildResult};
pub use engine_version::EngineVersion;
pub use version_list::{VersionList, DEFAULT_ENGINE_VERSIONS};
