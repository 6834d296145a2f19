//! CLI command implementations
//!
//! This module contains implementations of the commands
//! supported by the CLI application using the Command pattern.

pub mod cli;
pub mod command_traits;
pub mod inspect_command;
pub mod process_command;
pub mod stats_command;
pub mod trigger_command;

pub use cli::build_cli;
pub use command_traits::{Command, CommandFactory};
pub use inspect_command::InspectCommand;
pub use process_command::ProcessCommand;
pub use stats_command::StatsCommand;
pub use trigger_command::TriggerCommand;

use clap::ArgMatches;
use log::info;
use std::path::{Path, PathBuf};

use crate::config::PipelineConfig;
use crate::errors::{ClimateError, ClimateResult};
use crate::model::HistoricalSeries;

/// Factory for creating command instances based on CLI arguments
pub struct PrecipkitCommandFactory;

impl PrecipkitCommandFactory {
    pub fn new() -> Self {
        PrecipkitCommandFactory
    }
}

impl Default for PrecipkitCommandFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandFactory for PrecipkitCommandFactory {
    fn create_command(&self, args: &ArgMatches) -> ClimateResult<Box<dyn Command>> {
        if args.get_flag("trigger") {
            Ok(Box::new(TriggerCommand::new(args)?))
        } else if args.get_flag("process") {
            Ok(Box::new(ProcessCommand::new(args)?))
        } else if args.get_flag("stats") {
            Ok(Box::new(StatsCommand::new(args)?))
        } else {
            // Default to inspect
            Ok(Box::new(InspectCommand::new(args)?))
        }
    }
}

pub(crate) fn input_path(args: &ArgMatches) -> ClimateResult<PathBuf> {
    args.get_one::<String>("input")
        .map(PathBuf::from)
        .ok_or_else(|| ClimateError::Generic("Missing input path".to_string()))
}

pub(crate) fn path_option(args: &ArgMatches, name: &str) -> Option<PathBuf> {
    args.get_one::<String>(name).map(PathBuf::from)
}

/// The `--config` file if given, else the built-in defaults
pub(crate) fn load_config(args: &ArgMatches) -> ClimateResult<PipelineConfig> {
    match path_option(args, "config") {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            PipelineConfig::from_file(&path)
        }
        None => Ok(PipelineConfig::default()),
    }
}

pub(crate) fn load_historical(args: &ArgMatches) -> ClimateResult<Option<HistoricalSeries>> {
    match path_option(args, "historical") {
        Some(path) => {
            let series = HistoricalSeries::from_file(&path)?;
            info!("Loaded {} historical values from {}", series.len(), path.display());
            Ok(Some(series))
        }
        None => Ok(None),
    }
}

pub(crate) fn output_root(args: &ArgMatches) -> PathBuf {
    path_option(args, "output-root").unwrap_or_else(|| Path::new(".").to_path_buf())
}
