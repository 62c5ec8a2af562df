//! Result of a single update run
//!
//! Tracks which packages were upgraded and which failed, and renders the
//! final human-readable report.

use super::PackageRecord;
use serde::{Deserialize, Serialize};

/// Header for the list of upgraded packages
pub const SUCCEEDED_HEADER: &str =
    "The following packages were updated (list does not include auto-installed dependencies):";

/// Header for the list of packages that could not be upgraded
pub const FAILED_HEADER: &str = "Updates failed for the following packages:";

/// Message used when there was nothing to upgrade
pub const NOTHING_TO_DO: &str = "Nothing to do; did not find any out-of-date packages.";

/// Packages processed during one run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Packages whose upgrade command succeeded
    pub succeeded: Vec<PackageRecord>,
    /// Packages whose upgrade command failed
    pub failed: Vec<PackageRecord>,
}

impl RunResult {
    /// Creates an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful upgrade
    pub fn record_success(&mut self, record: PackageRecord) {
        self.succeeded.push(record);
    }

    /// Records a failed upgrade
    pub fn record_failure(&mut self, record: PackageRecord) {
        self.failed.push(record);
    }

    /// Returns true if no package was processed
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty()
    }

    /// Builds the report messages, one per section
    pub fn summary_messages(&self) -> Vec<String> {
        let mut messages = Vec::new();

        if !self.succeeded.is_empty() {
            messages.push(format!(
                "{}\n{}",
                SUCCEEDED_HEADER,
                format_records(&self.succeeded)
            ));
        }

        if !self.failed.is_empty() {
            messages.push(format!(
                "{}\n{}",
                FAILED_HEADER,
                format_records(&self.failed)
            ));
        }

        if messages.is_empty() {
            messages.push(NOTHING_TO_DO.to_string());
        }

        messages
    }
}

/// Formats records as `   name (current -> latest)`, one per line
pub fn format_records(records: &[PackageRecord]) -> String {
    records
        .iter()
        .map(|record| format!("   {}", record))
        .collect::<Vec<_>>()
        .join("\n")
}
