//! CLI argument parsing module for pipupdater

use clap::Parser;
use std::path::PathBuf;

/// Automatically update outdated pip packages
#[derive(Parser, Debug, Clone)]
#[command(
    name = "pipupdater",
    version,
    about = "A small command-line tool for automatically updating outdated pip packages."
)]
pub struct CliArgs {
    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,

    /// File containing a list of outdated packages ('-' reads stdin); if
    /// omitted, pip is queried for this list
    #[arg(short, long, value_name = "FILE")]
    pub source: Option<PathBuf>,

    /// Save pip output to the log file without printing it to the console
    #[arg(short = 'S', long)]
    pub save_pip: bool,

    /// Write log messages to this file
    #[arg(short, long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Use this config file instead of the one in the user config directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the run result as JSON after the summary
    #[arg(long)]
    pub json: bool,
}

impl CliArgs {
    /// Resolve the log file path, if any
    ///
    /// `--save-pip` without `--log-file` falls back to `default`.
    pub fn log_path(&self, default: Option<PathBuf>) -> Option<PathBuf> {
        match &self.log_file {
            Some(path) => Some(path.clone()),
            None if self.save_pip => default,
            None => None,
        }
    }
}
