use log::{debug, error};
use std::path::Path;
use std::process;

use precipkit::commands::{build_cli, CommandFactory, PrecipkitCommandFactory};
use precipkit::utils::logger::Logger;

fn main() {
    let matches = build_cli().get_matches();

    let verbosity = matches.get_count("verbose");
    match matches.get_one::<String>("log-file") {
        Some(log_file) => {
            let level = Logger::level_for_verbosity(verbosity);
            if let Err(e) = Logger::init_global_logger(Path::new(log_file), level) {
                eprintln!("Error initializing logger: {}", e);
                process::exit(1);
            }
        }
        None => {
            let default_filter = Logger::filter_for_verbosity(verbosity).to_string().to_lowercase();
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
                .init();
        }
    }

    let factory = PrecipkitCommandFactory::new();

    match factory.create_command(&matches) {
        Ok(command) => {
            debug!("Running {} command", command.name());
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
