//! Engine version identifiers
//!
//! Engine releases are named like `4.26`, `4.27.2` or `5.0ea`. They are not
//! valid semver, so each identifier is normalized into a [`semver::Version`]
//! for ordering while the raw string is kept for paths and display:
//! - Missing components are zero (`4.26` → `4.26.0`)
//! - A trailing alphabetic tag becomes a pre-release (`5.0ea` → `5.0.0-ea`)

use crate::error::ConfigError;
use regex::Regex;
use semver::{BuildMetadata, Prerelease, Version};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Dotted numeric part (1 to 3 components) followed by an optional tag
static ENGINE_VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:[-.]?([A-Za-z][0-9A-Za-z.-]*))?$").unwrap()
});

/// A single engine release identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EngineVersion {
    /// The identifier exactly as configured
    raw: String,
    /// Normalized form used for precedence
    precedence: Version,
}

impl EngineVersion {
    /// Parse an engine version identifier
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let raw = value.trim();
        let caps = ENGINE_VERSION_RE
            .captures(raw)
            .ok_or_else(|| ConfigError::invalid_version(raw, "expected a form like '4.26' or '5.0ea'"))?;

        let component = |index: usize| -> Result<u64, ConfigError> {
            match caps.get(index) {
                Some(m) => m
                    .as_str()
                    .parse()
                    .map_err(|_| ConfigError::invalid_version(raw, "version component out of range")),
                None => Ok(0),
            }
        };

        let pre = match caps.get(4) {
            Some(tag) => Prerelease::new(tag.as_str())
                .map_err(|e| ConfigError::invalid_version(raw, e.to_string()))?,
            None => Prerelease::EMPTY,
        };

        Ok(Self {
            raw: raw.to_string(),
            precedence: Version {
                major: component(1)?,
                minor: component(2)?,
                patch: component(3)?,
                pre,
                build: BuildMetadata::EMPTY,
            },
        })
    }

    /// The identifier as written in configuration
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The normalized version used for ordering
    pub fn precedence(&self) -> &Version {
        &self.precedence
    }

    /// Returns true for tagged builds such as early-access releases
    pub fn is_prerelease(&self) -> bool {
        !self.precedence.pre.is_empty()
    }
}

impl Ord for EngineVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.precedence
            .cmp(&other.precedence)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for EngineVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for EngineVersion {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EngineVersion {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<EngineVersion> for String {
    fn from(version: EngineVersion) -> Self {
        version.raw
    }
}
