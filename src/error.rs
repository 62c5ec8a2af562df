//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ParseError: a line of the outdated report could not be parsed
//! - CommandError: a pip invocation could not be launched or failed
//! - ConfigError: the config file could not be found, created or parsed
//! - AppError: fatal errors that stop the whole run
//!
//! Config errors never stop a run; the defaults are used instead.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The outdated package list could not be retrieved
    #[error("could not get list of outdated packages: {0}")]
    ListingRetrieval(#[source] CommandError),

    /// A pre-captured source could not be read
    #[error("failed to read package source {path}: {source}")]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The log file could not be opened
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors produced while parsing a line of the outdated report
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The line contained no tokens
    #[error("empty line")]
    EmptyLine,

    /// The line did not have enough tokens for its layout
    #[error("the following line was not formatted in a way that could be parsed: {line}")]
    MalformedLine { line: String },
}

/// Errors related to running package manager commands
#[derive(Error, Debug)]
pub enum CommandError {
    /// No program was configured
    #[error("empty command")]
    EmptyCommand,

    /// The process could not be started
    #[error("failed to execute '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully
    #[error("'{command}' exited with {status}")]
    Failed {
        command: String,
        status: String,
        /// Combined stdout and stderr of the process
        output: String,
    },
}

/// Errors related to the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No user configuration directory on this platform
    #[error("could not determine the user configuration directory")]
    NoConfigDir,

    /// Failed to read the config file
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the config file or its directory
    #[error("failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML parsing error
    #[error("failed to parse TOML in {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl ParseError {
    /// Creates a new MalformedLine error
    pub fn malformed(line: impl Into<String>) -> Self {
        ParseError::MalformedLine { line: line.into() }
    }
}

impl CommandError {
    /// Creates a new Launch error
    pub fn launch(command: impl Into<String>, source: std::io::Error) -> Self {
        CommandError::Launch {
            command: command.into(),
            source,
        }
    }

    /// Creates a new Failed error
    pub fn failed(
        command: impl Into<String>,
        status: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        CommandError::Failed {
            command: command.into(),
            status: status.into(),
            output: output.into(),
        }
    }
}

impl ConfigError {
    /// Creates a new Parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}
