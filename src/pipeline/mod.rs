//! Trigger-driven batch processing

mod orchestrator;
mod source;
mod trigger;

pub use orchestrator::{BatchReport, FileOutcome, FileReport, PipelineOrchestrator, SkipReason};
pub use source::{LocalObjectStore, ObjectSource};
pub use trigger::{Notification, TriggerEvent};
