//! Command-line definition

use clap::{Arg, ArgAction, ArgGroup, Command as ClapCommand};

/// Builds the `precipkit` argument parser
pub fn build_cli() -> ClapCommand {
    ClapCommand::new("precipkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Convert monthly precipitation GeoTIFFs into enriched Parquet climate tables")
        .arg(
            Arg::new("input")
                .help("Raster file, trigger JSON, or partition file/directory depending on mode")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("trigger")
                .short('t')
                .long("trigger")
                .help("Treat the input as a storage event trigger and process every object it names")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("process")
                .short('p')
                .long("process")
                .help("Process a local raster, or every raster in a directory")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("stats")
                .short('s')
                .long("stats")
                .help("Print regional, seasonal and summary statistics of written partitions as JSON")
                .action(ArgAction::SetTrue),
        )
        .group(ArgGroup::new("mode").args(["trigger", "process", "stats"]).multiple(false))
        .arg(
            Arg::new("source-root")
                .long("source-root")
                .help("Directory holding <bucket>/<key> objects for --trigger")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("output-root")
                .short('o')
                .long("output-root")
                .help("Root directory for written partitions")
                .value_name("DIR")
                .default_value(".")
                .required(false),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .help("TOML pipeline configuration replacing the built-in defaults")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("historical")
                .long("historical")
                .help("Historical precipitation series (JSON array or separated numbers)")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .help("Write log lines to this file as well as the console")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{CommandFactory, PrecipkitCommandFactory};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let matches = build_cli().try_get_matches_from(["precipkit", "a.tif", "-vv"]).unwrap();
        assert_eq!(matches.get_one::<String>("output-root").map(String::as_str), Some("."));
        assert_eq!(matches.get_count("verbose"), 2);
        assert!(!matches.get_flag("process"));
    }

    #[test]
    fn test_modes_are_exclusive() {
        let result = build_cli().try_get_matches_from(["precipkit", "a.tif", "--process", "--stats"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_factory_selects_command() {
        let dir = TempDir::new().unwrap();
        let trigger = dir.path().join("event.json");
        fs::write(&trigger, r#"{"Records": []}"#).unwrap();
        let trigger = trigger.to_string_lossy().to_string();
        let factory = PrecipkitCommandFactory::new();

        let cases = [
            (vec!["precipkit", "a.tif"], "inspect"),
            (vec!["precipkit", "a.tif", "--process"], "process"),
            (vec!["precipkit", "out", "--stats"], "stats"),
            (vec!["precipkit", trigger.as_str(), "--trigger"], "trigger"),
        ];
        for (argv, expected) in cases.iter() {
            let matches = build_cli().try_get_matches_from(argv.clone()).unwrap();
            let command = factory.create_command(&matches).unwrap();
            assert_eq!(command.name(), *expected);
        }
    }

    #[test]
    fn test_bad_config_fails_command_creation() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("bad.toml");
        fs::write(&config, "[region]\ncode = 1\n").unwrap();
        let config = config.to_string_lossy().to_string();

        let matches = build_cli()
            .try_get_matches_from(["precipkit", "a.tif", "--config", config.as_str()])
            .unwrap();
        assert!(PrecipkitCommandFactory::new().create_command(&matches).is_err());
    }
}
