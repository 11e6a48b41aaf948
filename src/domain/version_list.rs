//! Ordered list of engine versions to package against

use super::EngineVersion;
use crate::error::ConfigError;

/// Engine versions packaged when nothing else is configured
pub const DEFAULT_ENGINE_VERSIONS: &[&str] = &["5.0ea", "4.26", "4.24", "4.22", "4.20", "4.18"];

/// Immutable list of engine versions, newest first
///
/// Duplicates are collapsed so each identifier is attempted exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionList {
    versions: Vec<EngineVersion>,
}

impl VersionList {
    /// Creates a list sorted in descending version order
    pub fn new(mut versions: Vec<EngineVersion>) -> Result<Self, ConfigError> {
        if versions.is_empty() {
            return Err(ConfigError::NoVersions);
        }
        versions.sort_by(|a, b| b.cmp(a));
        versions.dedup();
        Ok(Self { versions })
    }

    /// Parses and sorts a list of raw identifiers
    pub fn parse<I, S>(raw: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let versions = raw
            .into_iter()
            .map(|s| EngineVersion::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(versions)
    }

    /// Returns the versions in attempt order
    pub fn iter(&self) -> impl Iterator<Item = &EngineVersion> {
        self.versions.iter()
    }

    pub fn as_slice(&self) -> &[EngineVersion] {
        &self.versions
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Always false; an empty list cannot be constructed
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl Default for VersionList {
    fn default() -> Self {
        let mut versions: Vec<EngineVersion> = DEFAULT_ENGINE_VERSIONS
            .iter()
            .filter_map(|raw| EngineVersion::parse(raw).ok())
            .collect();
        versions.sort_by(|a, b| b.cmp(a));
        Self { versions }
    }
}

impl<'a> IntoIterator for &'a VersionList {
    type Item = &'a EngineVersion;
    type IntoIter = std::slice::Iter<'a, EngineVersion>;

    fn into_iter(self) -> Self::IntoIter {
        self.versions.iter()
    }
}
