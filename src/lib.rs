//! pipupdater - update every outdated pip package
//!
//! This library provides the pieces of the `pipupdater` tool:
//! - Parsing of `pip list --outdated` report lines
//! - The sequential update driver with success/failure bookkeeping
//! - Leveled logging sinks, configuration and CLI definitions

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod filter;
pub mod logger;
pub mod package_manager;
pub mod parser;
pub mod updater;
