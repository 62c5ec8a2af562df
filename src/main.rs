//! pipupdater - update every outdated pip package
//!
//! Queries `pip list --outdated` (or reads a captured report), upgrades each
//! package in turn and prints which upgrades succeeded and which failed.

use clap::Parser;
use pipupdater::cli::CliArgs;
use pipupdater::config::{default_log_path, Config};
use pipupdater::logger::{ConsoleLogger, FileLogger, Level, Logger, TeeLogger};
use pipupdater::package_manager::Pip;
use pipupdater::updater::{LineSource, Updater};
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    // With --json, stdout carries only the JSON document
    let console = ConsoleLogger::new(args.debug).with_info_to_stderr(args.json);
    let mut logger = TeeLogger::new().with_sink(console);
    match args.log_path(default_log_path()) {
        Some(path) => logger = logger.with_sink(FileLogger::open(&path, args.debug)?),
        None if args.save_pip => logger.log(
            Level::Warning,
            "Could not determine a log file location; pip output will not be saved.",
        ),
        None => {}
    }

    let config = Config::load(args.config.as_deref(), &mut logger);
    let updater = Updater::new(Pip::new(config.pip.clone()), config.prefix_set())
        .with_save_output(args.save_pip);
    let source = LineSource::from_arg(args.source.as_deref());

    // Failures here have already been logged at FATAL
    let Ok(result) = updater.update_all(&source, &mut logger) else {
        return Ok(ExitCode::FAILURE);
    };

    if args.json {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", serde_json::to_string_pretty(&result)?)?;
        stdout.flush()?;
    }

    Ok(ExitCode::SUCCESS)
}
