//! Partition statistics command

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::errors::{ClimateError, ClimateResult};
use crate::metrics::MetricsEngine;
use crate::writer::{find_partitions, read_partition};

/// Reads written partitions and prints their aggregates as JSON
pub struct StatsCommand {
    input: PathBuf,
    engine: MetricsEngine,
}

impl StatsCommand {
    pub fn new(args: &ArgMatches) -> ClimateResult<Self> {
        let config = super::load_config(args)?;
        Ok(StatsCommand {
            input: super::input_path(args)?,
            engine: MetricsEngine::new(&config),
        })
    }
}

impl Command for StatsCommand {
    fn execute(&self) -> ClimateResult<()> {
        let partitions = find_partitions(&self.input)?;
        if partitions.is_empty() {
            return Err(ClimateError::Generic(format!(
                "No partitions found under {}",
                self.input.display()
            )));
        }

        let mut records = Vec::new();
        for path in &partitions {
            records.extend(read_partition(path)?);
        }
        info!("Read {} records from {} partition(s)", records.len(), partitions.len());

        let report = self.engine.report(&records);
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| ClimateError::Generic(format!("Cannot render statistics: {}", e)))?;
        println!("{}", json);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "stats"
    }
}
