//! Raster structure inspection command

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::errors::ClimateResult;
use crate::extractor::{parse_raster_name, RasterExtractor};

/// Prints the header facts of a raster and the window the region covers
pub struct InspectCommand {
    input: PathBuf,
    extractor: RasterExtractor,
}

impl InspectCommand {
    pub fn new(args: &ArgMatches) -> ClimateResult<Self> {
        let config = super::load_config(args)?;
        Ok(InspectCommand {
            input: super::input_path(args)?,
            extractor: RasterExtractor::new(&config.region),
        })
    }
}

impl Command for InspectCommand {
    fn execute(&self) -> ClimateResult<()> {
        let info = self.extractor.inspect(&self.input)?;
        print!("{}", info);

        match parse_raster_name(&self.input.to_string_lossy()) {
            Ok(key) => println!("  Partition: {}", key),
            Err(e) => println!("  Partition: none ({})", e),
        }
        info!("Inspected {}", self.input.display());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "inspect"
    }
}
