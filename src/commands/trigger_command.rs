//! Trigger event processing command

use clap::ArgMatches;
use log::{info, warn};
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::errors::{ClimateError, ClimateResult};
use crate::pipeline::{LocalObjectStore, PipelineOrchestrator, TriggerEvent};

/// Processes every object named in a trigger JSON file
pub struct TriggerCommand {
    event: TriggerEvent,
    source: PathBuf,
    orchestrator: PipelineOrchestrator,
}

impl TriggerCommand {
    pub fn new(args: &ArgMatches) -> ClimateResult<Self> {
        let source = super::input_path(args)?;
        let event = TriggerEvent::from_file(&source)?;
        let source_root = super::path_option(args, "source-root").unwrap_or_else(|| PathBuf::from("."));

        let mut orchestrator = PipelineOrchestrator::new(super::load_config(args)?, &super::output_root(args))?
            .with_source(Box::new(LocalObjectStore::new(&source_root)))
            .with_progress(true);
        if let Some(series) = super::load_historical(args)? {
            orchestrator = orchestrator.with_historical(series);
        }

        Ok(TriggerCommand {
            event,
            source,
            orchestrator,
        })
    }
}

impl Command for TriggerCommand {
    fn execute(&self) -> ClimateResult<()> {
        info!("Processing trigger {}", self.source.display());
        let report = self.orchestrator.process_trigger(&self.event);
        print!("{}", report);

        let retryable = report.retryable();
        if !retryable.is_empty() {
            warn!("Retryable failures: {}", retryable.join(", "));
        }

        if report.is_success() {
            Ok(())
        } else {
            Err(ClimateError::Generic(format!(
                "{} of {} object(s) failed",
                report.failed(),
                report.files.len()
            )))
        }
    }

    fn name(&self) -> &'static str {
        "trigger"
    }
}
