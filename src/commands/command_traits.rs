//! Command pattern interfaces
//!
//! Each CLI mode is a command object built from the parsed arguments and
//! then executed.

use crate::errors::ClimateResult;

/// Represents an executable command in the application
pub trait Command {
    /// Execute the command
    fn execute(&self) -> ClimateResult<()>;

    /// Short name used in log lines
    fn name(&self) -> &'static str;
}

/// Factory for creating commands from CLI arguments
pub trait CommandFactory {
    /// Picks the command selected by `args` and builds it
    fn create_command(&self, args: &clap::ArgMatches) -> ClimateResult<Box<dyn Command>>;
}
