pub mod io;
pub mod tiff;
pub mod compression;
pub mod coordinate;
pub mod extractor;
pub mod metrics;
pub mod model;
pub mod config;
pub mod writer;
pub mod pipeline;
pub mod commands;
pub mod utils;
pub mod errors;
pub mod api;

pub use api::PrecipKit;
pub use config::PipelineConfig;
pub use errors::{ClimateError, ClimateResult};
pub use extractor::{Extraction, RasterExtractor, RasterFile};
pub use metrics::MetricsEngine;
pub use model::{EnrichedRecord, HistoricalSeries, PrecipitationPoint};
pub use pipeline::{BatchReport, FileOutcome, PipelineOrchestrator, TriggerEvent};
pub use writer::{PartitionKey, PartitionedWriter};
