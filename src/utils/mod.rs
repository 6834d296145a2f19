//! Logging and progress reporting helpers

pub mod logger;
pub mod progress;
