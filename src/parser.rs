//! Parser for lines of pip's outdated package report
//!
//! pip prints the report in one of two layouts:
//! - default: `name (Current: 1.0.0 Latest: 2.0.0)`
//! - `--format columns`: `name 1.0.0 2.0.0 wheel`
//!
//! The layout is detected per line from the second token.

use crate::domain::PackageRecord;
use crate::error::ParseError;

/// Marker that identifies the default report layout
const CURRENT_MARKER: &str = "(Current:";

/// Known layouts of the outdated report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLayout {
    /// `name (Current: x Latest: y)`
    Verbose,
    /// `name x y [type]`
    Columns,
}

impl ReportLayout {
    /// Detect the layout of an already tokenized line
    pub fn detect(tokens: &[&str]) -> Self {
        if tokens.get(1) == Some(&CURRENT_MARKER) {
            ReportLayout::Verbose
        } else {
            ReportLayout::Columns
        }
    }

    /// Minimum number of tokens a line of this layout must have
    pub fn min_tokens(&self) -> usize {
        match self {
            ReportLayout::Verbose => 5,
            ReportLayout::Columns => 3,
        }
    }
}

/// Parse one line of the report into a package record
///
/// Trailing whitespace and line terminators are tolerated. Lines without
/// enough tokens for their layout are reported as
/// [`ParseError::MalformedLine`] carrying the raw line.
pub fn parse_line(line: &str) -> Result<PackageRecord, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some(name) = tokens.first() else {
        return Err(ParseError::EmptyLine);
    };

    let layout = ReportLayout::detect(&tokens);
    if tokens.len() < layout.min_tokens() {
        return Err(ParseError::malformed(line));
    }

    let record = match layout {
        ReportLayout::Verbose => {
            let latest = tokens[4].strip_suffix(')').unwrap_or(tokens[4]);
            PackageRecord::new(*name, tokens[2], latest)
        }
        ReportLayout::Columns => PackageRecord::new(*name, tokens[1], tokens[2]),
    };

    Ok(record)
}
