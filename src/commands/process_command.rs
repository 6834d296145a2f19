//! Local raster processing command

use clap::ArgMatches;
use log::info;
use std::fs;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::config::InputConfig;
use crate::errors::{ClimateError, ClimateResult};
use crate::pipeline::PipelineOrchestrator;

/// Runs one raster, or every raster in a directory, through the pipeline
pub struct ProcessCommand {
    input: PathBuf,
    orchestrator: PipelineOrchestrator,
    input_config: InputConfig,
}

impl ProcessCommand {
    pub fn new(args: &ArgMatches) -> ClimateResult<Self> {
        let input = super::input_path(args)?;
        let config = super::load_config(args)?;
        let input_config = config.input.clone();

        let mut orchestrator =
            PipelineOrchestrator::new(config, &super::output_root(args))?.with_progress(input.is_dir());
        if let Some(series) = super::load_historical(args)? {
            orchestrator = orchestrator.with_historical(series);
        }

        Ok(ProcessCommand {
            input,
            orchestrator,
            input_config,
        })
    }

    fn rasters(&self) -> ClimateResult<Vec<PathBuf>> {
        if !self.input.is_dir() {
            return Ok(vec![self.input.clone()]);
        }
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.input)? {
            let path = entry?.path();
            if path.is_file() && self.input_config.accepts(&path.to_string_lossy()) {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl Command for ProcessCommand {
    fn execute(&self) -> ClimateResult<()> {
        let paths = self.rasters()?;
        info!("Processing {} raster(s) from {}", paths.len(), self.input.display());

        let report = self.orchestrator.process_paths(&paths);
        print!("{}", report);

        if report.is_success() {
            Ok(())
        } else {
            Err(ClimateError::Generic(format!("{} of {} file(s) failed", report.failed(), paths.len())))
        }
    }

    fn name(&self) -> &'static str {
        "process"
    }
}
