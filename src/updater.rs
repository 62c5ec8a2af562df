//! Update driver for the whole run
//!
//! This module provides:
//! - Retrieval of the outdated list from pip or a pre-captured source
//! - Workflow coordination: filter → parse → upgrade → record
//! - The final summary report
//!
//! Packages are upgraded one at a time, in input order. A failed upgrade is
//! recorded and the loop continues.

use crate::domain::{PackageRecord, RunResult};
use crate::error::{AppError, CommandError, ParseError};
use crate::filter::PrefixSet;
use crate::logger::{Level, Logger};
use crate::package_manager::PackageManager;
use crate::parser::parse_line;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Where the outdated package lines come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineSource {
    /// Query the package manager
    PackageManager,
    /// Read a previously captured report from a file
    File(PathBuf),
    /// Read a report piped on standard input
    Stdin,
}

impl LineSource {
    /// Build a source from the `--source` argument; `-` means stdin
    pub fn from_arg(source: Option<&Path>) -> Self {
        match source {
            None => LineSource::PackageManager,
            Some(path) if path.as_os_str() == "-" => LineSource::Stdin,
            Some(path) => LineSource::File(path.to_path_buf()),
        }
    }
}

/// Update driver that owns the package manager and the line filter
pub struct Updater<P> {
    /// Package manager used to list and upgrade packages
    manager: P,
    /// Prefixes of lines that are never packages
    prefixes: PrefixSet,
    /// Whether upgrade output is sent to the logger
    save_output: bool,
}

impl<P: PackageManager> Updater<P> {
    /// Create a new updater
    pub fn new(manager: P, prefixes: PrefixSet) -> Self {
        Self {
            manager,
            prefixes,
            save_output: false,
        }
    }

    /// Send the output of each pip invocation to the logger at
    /// [`Level::Output`] (builder pattern)
    pub fn with_save_output(mut self, save_output: bool) -> Self {
        self.save_output = save_output;
        self
    }

    /// Returns the package manager
    pub fn manager(&self) -> &P {
        &self.manager
    }

    /// Run the full workflow: read lines, upgrade packages, report
    pub fn update_all(
        &self,
        source: &LineSource,
        logger: &mut dyn Logger,
    ) -> Result<RunResult, AppError> {
        logger.log(Level::Info, "Getting package list...");
        let lines = self.read_lines(source, logger)?;

        logger.log(Level::Info, "Updating packages...");
        let result = self.process_lines(&lines, logger);

        report(&result, logger);
        Ok(result)
    }

    /// Resolve a line source into lines
    ///
    /// Captured reports are decoded lossily, the same way pip output is, so
    /// a stray invalid byte only affects the line it is on.
    pub fn read_lines(
        &self,
        source: &LineSource,
        logger: &mut dyn Logger,
    ) -> Result<Vec<String>, AppError> {
        let lines = match source {
            LineSource::PackageManager => return self.fetch_outdated(logger),
            LineSource::File(path) => fs::read(path)
                .map(|bytes| decode_lines(&bytes))
                .map_err(|source| AppError::SourceRead {
                    path: path.clone(),
                    source,
                }),
            LineSource::Stdin => {
                let mut bytes = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut bytes)
                    .map(|_| decode_lines(&bytes))
                    .map_err(|source| AppError::SourceRead {
                        path: PathBuf::from("-"),
                        source,
                    })
            }
        };

        lines.inspect_err(|e| logger.log(Level::Fatal, &e.to_string()))
    }

    /// Get the outdated list from the package manager
    ///
    /// Stdout and stderr are read as one stream. Only a failure to run the
    /// command is fatal.
    pub fn fetch_outdated(&self, logger: &mut dyn Logger) -> Result<Vec<String>, AppError> {
        let output = match self.manager.list_outdated() {
            Ok(output) => output,
            Err(e) => {
                logger.log(
                    Level::Fatal,
                    &format!("Could not get list of outdated packages. Error was:\n{}", e),
                );
                return Err(AppError::ListingRetrieval(e));
            }
        };

        if !output.success {
            logger.log(
                Level::Warning,
                &format!(
                    "'{}' finished with {}",
                    output.command,
                    output.status_description()
                ),
            );
        }

        Ok(split_lines(&output.combined()))
    }

    /// Filter, parse and upgrade every line, collecting the results
    pub fn process_lines<I, S>(&self, lines: I, logger: &mut dyn Logger) -> RunResult
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut result = RunResult::new();

        for line in lines {
            let line = line.as_ref();

            if line.is_empty() || self.prefixes.matches(line) {
                logger.log(
                    Level::Debug,
                    &format!("Skipping line: \"{}\"", line.trim_end()),
                );
                continue;
            }

            match parse_line(line) {
                Ok(record) => self.update_package(record, &mut result, logger),
                Err(ParseError::EmptyLine) => {
                    logger.log(Level::Debug, "Skipping blank line");
                }
                Err(e) => logger.log(Level::Warning, &e.to_string()),
            }
        }

        result
    }

    /// Upgrade one package and record the outcome
    pub fn update_package(
        &self,
        record: PackageRecord,
        result: &mut RunResult,
        logger: &mut dyn Logger,
    ) {
        match self.manager.upgrade(&record.name) {
            Ok(output) => {
                self.save_pip_output(&output.command, &output.combined(), logger);
                result.record_success(record);
            }
            Err(e) => {
                if let CommandError::Failed {
                    command, output, ..
                } = &e
                {
                    self.save_pip_output(command, output, logger);
                }
                logger.log(
                    Level::Error,
                    &format!("Failed to update package: {} ({})", record.name, e),
                );
                result.record_failure(record);
            }
        }
    }

    /// Log a pip invocation and its output when saving is enabled
    fn save_pip_output(&self, command: &str, output: &str, logger: &mut dyn Logger) {
        if self.save_output {
            logger.log(Level::Output, &format!("{}\n{}", command, output.trim_end()));
        }
    }
}

/// Log the summary of a run at INFO level
pub fn report(result: &RunResult, logger: &mut dyn Logger) {
    for message in result.summary_messages() {
        logger.log(Level::Info, &message);
    }
}

/// Split text on line breaks, accepting `\n` and `\r\n`
fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}

/// Decode raw report bytes, replacing invalid UTF-8, and split into lines
fn decode_lines(bytes: &[u8]) -> Vec<String> {
    split_lines(&String::from_utf8_lossy(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FAILED_HEADER, NOTHING_TO_DO, SUCCEEDED_HEADER};
    use crate::logger::MemoryLogger;
    use crate::package_manager::CommandOutput;
    use std::cell::RefCell;
    use std::io::ErrorKind;

    /// Mock package manager for testing
    struct MockPackageManager {
        listing: Option<String>,
        listing_code: i32,
        failing: Vec<&'static str>,
        upgraded: RefCell<Vec<String>>,
    }

    impl MockPackageManager {
        fn new(listing: &str) -> Self {
            Self {
                listing: Some(listing.to_string()),
                listing_code: 0,
                failing: Vec::new(),
                upgraded: RefCell::new(Vec::new()),
            }
        }

        fn unlaunchable() -> Self {
            Self {
                listing: None,
                ..Self::new("")
            }
        }

        fn listing_exits_with(mut self, code: i32) -> Self {
            self.listing_code = code;
            self
        }

        fn failing(mut self, packages: &[&'static str]) -> Self {
            self.failing = packages.to_vec();
            self
        }
    }

    impl PackageManager for MockPackageManager {
        fn list_outdated(&self) -> Result<CommandOutput, CommandError> {
            match &self.listing {
                Some(listing) => Ok(CommandOutput {
                    success: self.listing_code == 0,
                    code: Some(self.listing_code),
                    ..CommandOutput::success("pip list --outdated", listing.clone())
                }),
                None => Err(CommandError::launch(
                    "pip list --outdated",
                    io::Error::new(ErrorKind::NotFound, "No such file or directory"),
                )),
            }
        }

        fn upgrade(&self, package: &str) -> Result<CommandOutput, CommandError> {
            self.upgraded.borrow_mut().push(package.to_string());
            let command = format!("pip install --upgrade {}", package);
            if self.failing.iter().any(|f| *f == package) {
                Err(CommandError::failed(command, "exit status: 1", "ERROR: boom\n"))
            } else {
                Ok(CommandOutput::success(command, "Successfully installed\n"))
            }
        }
    }

    fn pip_prefixes() -> PrefixSet {
        PrefixSet::new(["DEPRECATION: ", "ERROR: ", "WARNING: ", "Package ", "-------"])
    }

    #[test]
    fn test_line_source_from_arg() {
        assert_eq!(LineSource::from_arg(None), LineSource::PackageManager);
        assert_eq!(LineSource::from_arg(Some(Path::new("-"))), LineSource::Stdin);
        assert_eq!(
            LineSource::from_arg(Some(Path::new("outdated.txt"))),
            LineSource::File(PathBuf::from("outdated.txt"))
        );
    }

    #[test]
    fn test_process_columns_report() {
        let report = "Package    Version Latest Type\n\
                      ---------- ------- ------ -----\n\
                      requests   2.31.0  2.32.3 wheel\n\
                      six        1.15.0  1.16.0 wheel\n";
        let updater = Updater::new(MockPackageManager::new(""), pip_prefixes());
        let mut logger = MemoryLogger::new();

        let result = updater.process_lines(report.lines(), &mut logger);

        assert_eq!(
            result.succeeded,
            vec![
                PackageRecord::new("requests", "2.31.0", "2.32.3"),
                PackageRecord::new("six", "1.15.0", "1.16.0"),
            ]
        );
        assert!(result.failed.is_empty());
        assert_eq!(*updater.manager().upgraded.borrow(), vec!["requests", "six"]);
        assert_eq!(logger.messages(Level::Debug).len(), 2);
    }

    #[test]
    fn test_prefixed_lines_are_not_parsed() {
        let updater = Updater::new(MockPackageManager::new(""), PrefixSet::new(["-------"]));
        let mut logger = MemoryLogger::new();

        let result = updater.process_lines(["------- 1.0 2.0"], &mut logger);

        assert!(result.is_empty());
        assert!(updater.manager().upgraded.borrow().is_empty());
        assert_eq!(
            logger.messages(Level::Debug),
            vec!["Skipping line: \"------- 1.0 2.0\""]
        );
    }

    #[test]
    fn test_malformed_line_is_warned_and_skipped() {
        let updater = Updater::new(MockPackageManager::new(""), pip_prefixes());
        let mut logger = MemoryLogger::new();

        let result = updater.process_lines(["foo (Current: 1.0.0", "bar 1.2 1.3"], &mut logger);

        assert_eq!(result.succeeded, vec![PackageRecord::new("bar", "1.2", "1.3")]);
        assert!(logger.contains(Level::Warning, "foo (Current: 1.0.0"));
        assert_eq!(*updater.manager().upgraded.borrow(), vec!["bar"]);
    }

    #[test]
    fn test_whitespace_only_line_is_skipped_silently() {
        let updater = Updater::new(MockPackageManager::new(""), pip_prefixes());
        let mut logger = MemoryLogger::new();

        let result = updater.process_lines(["   ", ""], &mut logger);

        assert!(result.is_empty());
        assert!(logger.messages(Level::Warning).is_empty());
        assert!(logger.messages(Level::Error).is_empty());
    }

    #[test]
    fn test_failure_does_not_stop_run() {
        let manager = MockPackageManager::new("").failing(&["foo"]);
        let updater = Updater::new(manager, pip_prefixes());
        let mut logger = MemoryLogger::new();

        let result = updater.process_lines(
            ["foo (Current: 1.0.0 Latest: 2.0.0)", "bar 1.2 1.3"],
            &mut logger,
        );

        assert_eq!(result.failed, vec![PackageRecord::new("foo", "1.0.0", "2.0.0")]);
        assert_eq!(result.succeeded, vec![PackageRecord::new("bar", "1.2", "1.3")]);
        assert!(logger.contains(Level::Error, "Failed to update package: foo"));
        assert!(logger.contains(Level::Error, "exit status: 1"));
    }

    #[test]
    fn test_save_output_logs_pip_output() {
        let manager = MockPackageManager::new("").failing(&["foo"]);
        let updater = Updater::new(manager, pip_prefixes()).with_save_output(true);
        let mut logger = MemoryLogger::new();

        updater.process_lines(["foo 1.0 2.0", "bar 1.0 2.0"], &mut logger);

        let output = logger.messages(Level::Output);
        assert_eq!(output.len(), 2);
        assert_eq!(output[0], "pip install --upgrade foo\nERROR: boom");
        assert_eq!(
            output[1],
            "pip install --upgrade bar\nSuccessfully installed"
        );
    }

    #[test]
    fn test_save_output_disabled_by_default() {
        let updater = Updater::new(MockPackageManager::new(""), pip_prefixes());
        let mut logger = MemoryLogger::new();

        updater.process_lines(["bar 1.0 2.0"], &mut logger);

        assert!(logger.messages(Level::Output).is_empty());
    }

    #[test]
    fn test_fetch_outdated_splits_lines() {
        let listing = "foo (Current: 1.0 Latest: 2.0)\r\nbar (Current: 3.0 Latest: 3.1)\n";
        let updater = Updater::new(MockPackageManager::new(listing), pip_prefixes());
        let mut logger = MemoryLogger::new();

        let lines = updater.fetch_outdated(&mut logger).unwrap();

        assert_eq!(
            lines,
            vec![
                "foo (Current: 1.0 Latest: 2.0)",
                "bar (Current: 3.0 Latest: 3.1)"
            ]
        );
    }

    #[test]
    fn test_fetch_outdated_non_zero_exit_keeps_lines() {
        let listing = "WARNING: pip is being invoked by an old script\nfoo 1.0 2.0\n";
        let manager = MockPackageManager::new(listing).listing_exits_with(2);
        let updater = Updater::new(manager, pip_prefixes());
        let mut logger = MemoryLogger::new();

        let lines = updater.fetch_outdated(&mut logger).unwrap();

        assert_eq!(
            lines,
            vec!["WARNING: pip is being invoked by an old script", "foo 1.0 2.0"]
        );
        assert_eq!(
            logger.messages(Level::Warning),
            vec!["'pip list --outdated' finished with exit status: 2"]
        );
        assert!(logger.messages(Level::Fatal).is_empty());
    }

    #[test]
    fn test_fetch_outdated_launch_failure_is_fatal() {
        let updater = Updater::new(MockPackageManager::unlaunchable(), pip_prefixes());
        let mut logger = MemoryLogger::new();

        let err = updater.fetch_outdated(&mut logger).unwrap_err();

        assert!(matches!(err, AppError::ListingRetrieval(_)));
        assert!(logger.contains(Level::Fatal, "Could not get list of outdated packages"));
    }

    #[test]
    fn test_update_all_from_package_manager() {
        let listing = "DEPRECATION: something\nfoo (Current: 1.0 Latest: 2.0)\n";
        let updater = Updater::new(MockPackageManager::new(listing), pip_prefixes());
        let mut logger = MemoryLogger::new();

        let result = updater
            .update_all(&LineSource::PackageManager, &mut logger)
            .unwrap();

        assert_eq!(result.succeeded, vec![PackageRecord::new("foo", "1.0", "2.0")]);
        let info = logger.messages(Level::Info);
        assert_eq!(info[0], "Getting package list...");
        assert_eq!(info[1], "Updating packages...");
        assert_eq!(info[2], format!("{}\n   foo (1.0 -> 2.0)", SUCCEEDED_HEADER));
    }

    #[test]
    fn test_update_all_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("outdated.txt");
        fs::write(&path, "Package Version Latest Type\nbar 1.2 1.3 wheel\n").unwrap();

        let manager = MockPackageManager::new("unused 0 1").failing(&["bar"]);
        let updater = Updater::new(manager, pip_prefixes());
        let mut logger = MemoryLogger::new();

        let result = updater
            .update_all(&LineSource::File(path), &mut logger)
            .unwrap();

        assert_eq!(result.failed, vec![PackageRecord::new("bar", "1.2", "1.3")]);
        assert!(logger.contains(Level::Info, FAILED_HEADER));
        assert_eq!(*updater.manager().upgraded.borrow(), vec!["bar"]);
    }

    #[test]
    fn test_update_all_file_with_invalid_utf8() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("outdated.txt");
        fs::write(&path, b"foo 1.0 2.0\n\xff\xfe junk\nbar 1.2 1.3\n").unwrap();

        let updater = Updater::new(MockPackageManager::new(""), pip_prefixes());
        let mut logger = MemoryLogger::new();

        let result = updater
            .update_all(&LineSource::File(path), &mut logger)
            .unwrap();

        assert_eq!(
            result.succeeded,
            vec![
                PackageRecord::new("foo", "1.0", "2.0"),
                PackageRecord::new("bar", "1.2", "1.3"),
            ]
        );
        assert_eq!(*updater.manager().upgraded.borrow(), vec!["foo", "bar"]);
        assert!(logger.contains(Level::Warning, "junk"));
        assert!(logger.messages(Level::Fatal).is_empty());
    }

    #[test]
    fn test_decode_lines_replaces_invalid_bytes() {
        assert_eq!(
            decode_lines(b"six 1.15.0 1.16.0\r\n\xffbad 1 2\n"),
            vec!["six 1.15.0 1.16.0", "\u{FFFD}bad 1 2"]
        );
    }

    #[test]
    fn test_update_all_missing_file_is_fatal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.txt");
        let updater = Updater::new(MockPackageManager::new(""), pip_prefixes());
        let mut logger = MemoryLogger::new();

        let err = updater
            .update_all(&LineSource::File(path), &mut logger)
            .unwrap_err();

        assert!(matches!(err, AppError::SourceRead { .. }));
        assert!(logger.contains(Level::Fatal, "missing.txt"));
    }

    #[test]
    fn test_report_nothing_to_do() {
        let mut logger = MemoryLogger::new();
        report(&RunResult::new(), &mut logger);
        assert_eq!(logger.messages(Level::Info), vec![NOTHING_TO_DO]);
    }
}
