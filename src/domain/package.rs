//! Outdated package record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder shown for a version the report did not provide
const UNKNOWN_VERSION: &str = "unknown";

/// One outdated package taken from a line of the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Package name
    pub name: String,
    /// Installed version
    pub current_version: Option<String>,
    /// Newest version available
    pub latest_version: Option<String>,
}

impl PackageRecord {
    /// Creates a record with both versions known
    pub fn new(
        name: impl Into<String>,
        current_version: impl Into<String>,
        latest_version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            current_version: Some(current_version.into()),
            latest_version: Some(latest_version.into()),
        }
    }

    /// Returns the installed version, or a placeholder when unset
    pub fn current(&self) -> &str {
        self.current_version.as_deref().unwrap_or(UNKNOWN_VERSION)
    }

    /// Returns the target version, or a placeholder when unset
    pub fn latest(&self) -> &str {
        self.latest_version.as_deref().unwrap_or(UNKNOWN_VERSION)
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} -> {})", self.name, self.current(), self.latest())
    }
}
