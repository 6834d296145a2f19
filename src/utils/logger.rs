//! Logger utility for application-wide logging
//!
//! A `log::Log` implementation that writes every record to a log file and
//! echoes it to the console.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;
use log::{Log, Record, Level, Metadata, LevelFilter};

/// File and console logger
pub struct Logger {
    /// File handle for log output
    file: Mutex<Option<File>>,
    /// Most verbose level written
    level: Level,
}

impl Logger {
    /// Creates a logger writing to `log_file`, truncating it
    pub fn new(log_file: &Path, level: Level) -> io::Result<Self> {
        let file = File::create(log_file)?;
        Ok(Logger {
            file: Mutex::new(Some(file)),
            level,
        })
    }

    /// Appends one line to the log file
    pub fn write_line(&self, message: &str) -> io::Result<()> {
        let mut guard = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(file) = guard.as_mut() {
            writeln!(file, "{}", message)?;
            file.flush()?;
        }
        Ok(())
    }

    /// Installs a file logger as the global `log` backend
    pub fn init_global_logger(log_file: &Path, level: Level) -> io::Result<()> {
        let global_logger = Logger::new(log_file, level)?;

        if log::set_boxed_logger(Box::new(global_logger)).is_err() {
            eprintln!("Warning: Global logger was already initialized");
        }

        log::set_max_level(level.to_level_filter());
        Ok(())
    }

    /// Maps the CLI verbosity count to a level
    pub fn level_for_verbosity(verbosity: u8) -> Level {
        match verbosity {
            0 => Level::Info,
            1 => Level::Debug,
            _ => Level::Trace,
        }
    }

    /// Level filter for `env_logger` at the given verbosity
    pub fn filter_for_verbosity(verbosity: u8) -> LevelFilter {
        Self::level_for_verbosity(verbosity).to_level_filter()
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let message = format!("[{}] {}", record.level(), record.args());
            let _ = self.write_line(&message);

            println!("{}", message);
        }
    }

    fn flush(&self) {
        // write_line flushes every record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_line_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        let logger = Logger::new(&path, Level::Info).unwrap();

        logger.write_line("[INFO] first").unwrap();
        logger.write_line("[WARN] second").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "[INFO] first\n[WARN] second\n");
    }

    #[test]
    fn test_level_filtering() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::new(&dir.path().join("run.log"), Level::Info).unwrap();

        let debug = Metadata::builder().level(Level::Debug).build();
        let warn = Metadata::builder().level(Level::Warn).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
        assert_eq!(Logger::level_for_verbosity(1), Level::Debug);
    }
}
