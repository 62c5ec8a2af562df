//! Core domain models for pipupdater
//!
//! This module contains the types shared by the parser and the update driver:
//! - Package records parsed from the outdated report
//! - The per-run result with its summary formatting

mod package;
mod run_result;

pub use package::PackageRecord;
pub use run_result::{
    format_records, RunResult, FAILED_HEADER, NOTHING_TO_DO, SUCCEEDED_HEADER,
};
