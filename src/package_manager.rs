//! Package manager integration for listing and upgrading packages
//!
//! This module provides:
//! - The `PackageManager` trait used by the update driver
//! - `Pip`, which runs the configured pip command on the system

use crate::error::CommandError;
use std::process::{Command, Output};

/// Captured result of a package manager invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// The command that was executed
    pub command: String,
    /// Whether the command exited successfully
    pub success: bool,
    /// Exit code, if the process exited normally
    pub code: Option<i32>,
    /// Standard output from the command
    pub stdout: String,
    /// Standard error from the command
    pub stderr: String,
}

impl CommandOutput {
    /// Create a successful output
    pub fn success(command: impl Into<String>, stdout: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    fn from_output(command: String, output: Output) -> Self {
        Self {
            command,
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    /// Stdout followed by stderr, as one text stream
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        if self.stdout.is_empty() || self.stdout.ends_with('\n') {
            format!("{}{}", self.stdout, self.stderr)
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }

    /// Describe the exit status for messages
    pub fn status_description(&self) -> String {
        match self.code {
            Some(code) => format!("exit status: {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

/// Trait for the commands the update driver needs from a package manager
pub trait PackageManager {
    /// List outdated packages
    ///
    /// Only a failure to run the command is an error; a non-zero exit is
    /// reported through [`CommandOutput::success`].
    fn list_outdated(&self) -> Result<CommandOutput, CommandError>;

    /// Upgrade a package by its exact name
    ///
    /// A non-zero exit is reported as [`CommandError::Failed`].
    fn upgrade(&self, package: &str) -> Result<CommandOutput, CommandError>;
}

/// Package manager that runs pip on the system
#[derive(Debug, Clone)]
pub struct Pip {
    /// Base command, e.g. `["pip"]` or `["python3", "-m", "pip"]`
    base: Vec<String>,
}

impl Default for Pip {
    fn default() -> Self {
        Self::new(vec!["pip".to_string()])
    }
}

impl Pip {
    /// Create a pip runner with the given base command
    pub fn new(base: Vec<String>) -> Self {
        Self { base }
    }

    /// Build the full argument list for a pip subcommand
    fn build_command(&self, args: &[&str]) -> Vec<String> {
        self.base
            .iter()
            .cloned()
            .chain(args.iter().map(|a| a.to_string()))
            .collect()
    }

    /// Run a command and capture output
    fn run_command(&self, command: &[String]) -> Result<CommandOutput, CommandError> {
        let Some((program, args)) = command.split_first() else {
            return Err(CommandError::EmptyCommand);
        };

        let command_str = command.join(" ");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| CommandError::launch(command_str.clone(), e))?;

        Ok(CommandOutput::from_output(command_str, output))
    }
}

impl PackageManager for Pip {
    fn list_outdated(&self) -> Result<CommandOutput, CommandError> {
        self.run_command(&self.build_command(&["list", "--outdated"]))
    }

    fn upgrade(&self, package: &str) -> Result<CommandOutput, CommandError> {
        let output = self.run_command(&self.build_command(&["install", "--upgrade", package]))?;
        if output.success {
            Ok(output)
        } else {
            Err(CommandError::failed(
                output.command.clone(),
                output.status_description(),
                output.combined(),
            ))
        }
    }
}
