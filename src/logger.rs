//! Leveled logging sinks
//!
//! The update driver never prints directly; it submits messages to a
//! [`Logger`]. This module provides:
//! - Console output with coloured level tags
//! - Append-only log files with timestamps
//! - A tee that forwards to several sinks
//! - An in-memory sink for tests

use crate::error::AppError;
use chrono::Local;
use colored::Colorize;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::path::Path;

/// Message severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// Skipped lines and other tracing detail
    Debug,
    /// Progress and the final summary
    Info,
    /// Unparsable lines and recoverable problems
    Warning,
    /// A single package failed to upgrade
    Error,
    /// The run cannot continue
    Fatal,
    /// Captured pip output, only kept in log files
    Output,
}

impl Level {
    /// Returns the upper-case label for this level
    pub fn label(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Output => "PIPOUTPUT",
        }
    }

    /// Get the display label with color
    pub fn colored_label(&self) -> String {
        match self {
            Level::Debug => self.label().dimmed().to_string(),
            Level::Info => self.label().green().to_string(),
            Level::Warning => self.label().yellow().to_string(),
            Level::Error => self.label().red().to_string(),
            Level::Fatal => self.label().red().bold().to_string(),
            Level::Output => self.label().cyan().to_string(),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Sink for leveled messages
pub trait Logger {
    /// Submit one message at the given level
    fn log(&mut self, level: Level, message: &str);
}

impl<L: Logger + ?Sized> Logger for Box<L> {
    fn log(&mut self, level: Level, message: &str) {
        (**self).log(level, message)
    }
}

/// Logger that prints to the terminal
///
/// INFO goes to stdout unless stdout is reserved for machine-readable
/// output; everything else goes to stderr. Captured pip output is never
/// printed. Level tags are coloured only when the stream they are written to
/// is a terminal.
#[derive(Debug, Clone)]
pub struct ConsoleLogger {
    /// Whether DEBUG messages are printed
    debug: bool,
    /// Whether to use colors
    color: bool,
    /// Send INFO to stderr as well, leaving stdout untouched
    info_to_stderr: bool,
}

impl ConsoleLogger {
    /// Create a new console logger
    pub fn new(debug: bool) -> Self {
        Self::with_color(debug, true)
    }

    /// Create a new console logger with color option
    pub fn with_color(debug: bool, color: bool) -> Self {
        Self {
            debug,
            color,
            info_to_stderr: false,
        }
    }

    /// Keep stdout free of log lines (builder pattern)
    pub fn with_info_to_stderr(mut self, info_to_stderr: bool) -> Self {
        self.info_to_stderr = info_to_stderr;
        self
    }

    /// Whether a message at this level is written to stdout
    pub fn writes_to_stdout(&self, level: Level) -> bool {
        level == Level::Info && !self.info_to_stderr
    }

    /// Whether a message at this level is printed
    pub fn accepts(&self, level: Level) -> bool {
        match level {
            Level::Debug => self.debug,
            Level::Output => false,
            _ => true,
        }
    }

    /// Format a message for display on a stream
    pub fn format_line(&self, level: Level, message: &str, terminal: bool) -> String {
        let label = if self.color && terminal {
            level.colored_label()
        } else {
            level.label().to_string()
        };
        format!("{}: {}", label, message)
    }
}

impl Logger for ConsoleLogger {
    fn log(&mut self, level: Level, message: &str) {
        if !self.accepts(level) {
            return;
        }
        if self.writes_to_stdout(level) {
            let mut stdout = io::stdout().lock();
            let line = self.format_line(level, message, stdout.is_terminal());
            let _ = writeln!(stdout, "{}", line);
        } else {
            let mut stderr = io::stderr().lock();
            let line = self.format_line(level, message, stderr.is_terminal());
            let _ = writeln!(stderr, "{}", line);
        }
    }
}

/// Logger that appends timestamped lines to a writer, usually a file
pub struct FileLogger {
    writer: Box<dyn Write>,
    /// Whether DEBUG messages are recorded
    debug: bool,
}

impl FileLogger {
    /// Open a log file for appending, creating parent directories
    pub fn open(path: &Path, debug: bool) -> Result<Self, AppError> {
        let log_file_error = |source| AppError::LogFile {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(log_file_error)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(log_file_error)?;

        Ok(Self::from_writer(file, debug))
    }

    /// Create a file logger on top of any writer
    pub fn from_writer(writer: impl Write + 'static, debug: bool) -> Self {
        Self {
            writer: Box::new(writer),
            debug,
        }
    }

    /// Whether a message at this level is recorded
    pub fn accepts(&self, level: Level) -> bool {
        level != Level::Debug || self.debug
    }
}

impl Logger for FileLogger {
    fn log(&mut self, level: Level, message: &str) {
        if !self.accepts(level) {
            return;
        }
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(self.writer, "[{}] {}: {}", timestamp, level, message);
        let _ = self.writer.flush();
    }
}

/// Logger that forwards every message to several sinks
#[derive(Default)]
pub struct TeeLogger {
    sinks: Vec<Box<dyn Logger>>,
}

impl TeeLogger {
    /// Create an empty tee
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink (builder pattern)
    pub fn with_sink(mut self, sink: impl Logger + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl Logger for TeeLogger {
    fn log(&mut self, level: Level, message: &str) {
        for sink in &mut self.sinks {
            sink.log(level, message);
        }
    }
}

/// Logger that keeps every message in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    /// Recorded messages in submission order
    pub entries: Vec<(Level, String)>,
}

impl MemoryLogger {
    /// Create an empty memory logger
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages recorded at the given level
    pub fn messages(&self, level: Level) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    /// Returns true if any message at this level contains the text
    pub fn contains(&self, level: Level, text: &str) -> bool {
        self.messages(level).iter().any(|m| m.contains(text))
    }
}

impl Logger for MemoryLogger {
    fn log(&mut self, level: Level, message: &str) {
        self.entries.push((level, message.to_string()));
    }
}
