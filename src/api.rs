use std::path::{Path, PathBuf};

use log::info;

use crate::config::PipelineConfig;
use crate::errors::ClimateResult;
use crate::extractor::{Extraction, RasterExtractor, RasterInfo};
use crate::metrics::MetricsEngine;
use crate::model::{EnrichedRecord, HistoricalSeries, StatsReport};
use crate::pipeline::{BatchReport, FileOutcome, LocalObjectStore, PipelineOrchestrator, TriggerEvent};
use crate::writer::{find_partitions, read_partition, PartitionKey, PartitionedWriter};

/// Main interface to the precipkit library
pub struct PrecipKit {
    config: PipelineConfig,
    extractor: RasterExtractor,
    engine: MetricsEngine,
    historical: Option<HistoricalSeries>,
}

impl PrecipKit {
    /// Validates `config` and binds every component to it
    pub fn new(config: PipelineConfig) -> ClimateResult<Self> {
        config.validate()?;
        Ok(PrecipKit {
            extractor: RasterExtractor::new(&config.region),
            engine: MetricsEngine::new(&config),
            config,
            historical: None,
        })
    }

    /// Uses `historical` as the reference population for anomaly and SPI
    pub fn with_historical(mut self, historical: HistoricalSeries) -> Self {
        self.historical = Some(historical);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn engine(&self) -> &MetricsEngine {
        &self.engine
    }

    pub fn inspect(&self, path: &Path) -> ClimateResult<RasterInfo> {
        self.extractor.inspect(path)
    }

    pub fn extract(&self, path: &Path) -> ClimateResult<Extraction> {
        self.extractor.extract(path)
    }

    /// Extracts and enriches a raster without writing anything
    pub fn enrich(&self, path: &Path) -> ClimateResult<(PartitionKey, Vec<EnrichedRecord>)> {
        let extraction = self.extract(path)?;
        let key = extraction.raster.partition;
        let records = self.engine.enhance(extraction.points, self.historical.as_ref());
        Ok((key, records))
    }

    /// Full pipeline for one local raster, writing under `output_root`
    pub fn process_file(&self, path: &Path, output_root: &Path) -> ClimateResult<FileOutcome> {
        let orchestrator = self.orchestrator(output_root)?;
        Ok(orchestrator.process_local(path))
    }

    /// Processes a trigger whose objects live under `source_root`
    pub fn process_trigger(
        &self,
        event: &TriggerEvent,
        source_root: &Path,
        output_root: &Path,
    ) -> ClimateResult<BatchReport> {
        let orchestrator = self
            .orchestrator(output_root)?
            .with_source(Box::new(LocalObjectStore::new(source_root)));
        Ok(orchestrator.process_trigger(event))
    }

    pub fn writer(&self, output_root: &Path) -> PartitionedWriter {
        PartitionedWriter::new(output_root, self.config.output.clone())
    }

    /// Aggregates every partition found under `path`
    pub fn stats(&self, path: &Path) -> ClimateResult<StatsReport> {
        let mut records = Vec::new();
        let partitions: Vec<PathBuf> = find_partitions(path)?;
        for partition in &partitions {
            records.extend(read_partition(partition)?);
        }
        info!("Aggregating {} records from {} partition(s)", records.len(), partitions.len());
        Ok(self.engine.report(&records))
    }

    fn orchestrator(&self, output_root: &Path) -> ClimateResult<PipelineOrchestrator> {
        let orchestrator = PipelineOrchestrator::new(self.config.clone(), output_root)?;
        Ok(match &self.historical {
            Some(series) => orchestrator.with_historical(series.clone()),
            None => orchestrator,
        })
    }
}
