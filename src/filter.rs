//! Prefix filter for non-package lines
//!
//! pip mixes deprecation notices, error banners, table headers and divider
//! lines into its outdated report. Lines starting with one of the configured
//! prefixes are never treated as packages.

/// Ordered set of literal line prefixes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefixSet {
    prefixes: Vec<String>,
}

impl PrefixSet {
    /// Create a prefix set from any list of strings
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if a line starts with any of the prefixes
    pub fn matches(&self, line: &str) -> bool {
        self.prefixes.iter().any(|p| line.starts_with(p.as_str()))
    }
}
