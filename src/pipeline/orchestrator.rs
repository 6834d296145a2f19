//! Per-file extract, enrich and write
//!
//! Each file runs as an independent unit: its failure is recorded in the
//! batch report and the remaining files still run.

use log::{error, info, warn};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::PipelineConfig;
use crate::errors::{ClimateError, ClimateResult};
use crate::extractor::{parse_raster_name, Extraction, RasterExtractor};
use crate::metrics::MetricsEngine;
use crate::model::HistoricalSeries;
use crate::pipeline::source::ObjectSource;
use crate::pipeline::trigger::TriggerEvent;
use crate::utils::progress::ProgressTracker;
use crate::writer::PartitionedWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The object is not a raster this pipeline reads
    NotRaster,
    /// No cell of the raster lies inside the region
    EmptyRegion,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NotRaster => write!(f, "not a raster"),
            SkipReason::EmptyRegion => write!(f, "no points inside region"),
        }
    }
}

/// What happened to one file
#[derive(Debug)]
pub enum FileOutcome {
    Processed { points: usize, path: PathBuf },
    Skipped(SkipReason),
    Failed(ClimateError),
}

impl FileOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed(_))
    }

    /// Failed with an error the caller may retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, FileOutcome::Failed(e) if e.is_retryable())
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileOutcome::Processed { points, path } => {
                write!(f, "processed {} points -> {}", points, path.display())
            }
            FileOutcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            FileOutcome::Failed(e) => {
                let retry = if e.is_retryable() { ", retryable" } else { "" };
                write!(f, "failed{}: {}", retry, e)
            }
        }
    }
}

#[derive(Debug)]
pub struct FileReport {
    /// `bucket/key` for triggered objects, the path for local files
    pub source: String,
    pub outcome: FileOutcome,
}

/// Outcomes of every file in one invocation
#[derive(Debug, Default)]
pub struct BatchReport {
    pub files: Vec<FileReport>,
}

impl BatchReport {
    pub fn push(&mut self, source: String, outcome: FileOutcome) {
        self.files.push(FileReport { source, outcome });
    }

    pub fn processed(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Processed { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Skipped(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_failed()).count()
    }

    /// Sources the caller should resubmit
    pub fn retryable(&self) -> Vec<&str> {
        self.files
            .iter()
            .filter(|f| f.outcome.is_retryable())
            .map(|f| f.source.as_str())
            .collect()
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} file(s): {} processed, {} skipped, {} failed",
            self.files.len(),
            self.processed(),
            self.skipped(),
            self.failed()
        )?;
        for file in &self.files {
            writeln!(f, "  {}: {}", file.source, file.outcome)?;
        }
        Ok(())
    }
}

/// Runs rasters through extraction, enrichment and the partitioned writer
pub struct PipelineOrchestrator {
    config: PipelineConfig,
    extractor: RasterExtractor,
    engine: MetricsEngine,
    writer: PartitionedWriter,
    source: Option<Box<dyn ObjectSource>>,
    staging_root: Option<PathBuf>,
    historical: Option<HistoricalSeries>,
    show_progress: bool,
}

impl PipelineOrchestrator {
    /// Local files can be processed straight away; objects named by a
    /// trigger also need `with_source`.
    pub fn new(config: PipelineConfig, output_root: &Path) -> ClimateResult<Self> {
        config.validate()?;
        Ok(PipelineOrchestrator {
            extractor: RasterExtractor::new(&config.region),
            engine: MetricsEngine::new(&config),
            writer: PartitionedWriter::new(output_root, config.output.clone()),
            config,
            source: None,
            staging_root: None,
            historical: None,
            show_progress: false,
        })
    }

    pub fn with_source(mut self, source: Box<dyn ObjectSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Directory in which per-object staging directories are created
    pub fn with_staging_root(mut self, root: &Path) -> Self {
        self.staging_root = Some(root.to_path_buf());
        self
    }

    pub fn with_historical(mut self, historical: HistoricalSeries) -> Self {
        self.historical = Some(historical);
        self
    }

    /// Draw a progress bar while processing batches
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn writer(&self) -> &PartitionedWriter {
        &self.writer
    }

    pub fn engine(&self) -> &MetricsEngine {
        &self.engine
    }

    fn tracker(&self, total: usize, description: &str) -> ProgressTracker {
        if self.show_progress {
            ProgressTracker::new(total as u64, description)
        } else {
            ProgressTracker::hidden()
        }
    }

    /// Processes every storage object named by a trigger
    pub fn process_trigger(&self, event: &TriggerEvent) -> BatchReport {
        let notifications = event.notifications();
        info!("Trigger names {} object(s)", notifications.len());

        let progress = self.tracker(notifications.len(), "Processing objects");
        let mut report = BatchReport::default();
        for notification in notifications {
            let source = format!("{}/{}", notification.bucket, notification.key);
            progress.set_message(&notification.key);
            let outcome = self.process_object(&notification.bucket, &notification.key);
            log_outcome(&source, &outcome);
            report.push(source, outcome);
            progress.increment(1);
        }
        progress.finish();
        info!(
            "Batch complete: {} processed, {} skipped, {} failed",
            report.processed(),
            report.skipped(),
            report.failed()
        );
        report
    }

    /// Fetches one object into a private staging directory and processes it
    pub fn process_object(&self, bucket: &str, key: &str) -> FileOutcome {
        if !self.config.input.accepts(key) {
            return FileOutcome::Skipped(SkipReason::NotRaster);
        }
        into_outcome(self.fetch_and_run(bucket, key))
    }

    fn fetch_and_run(&self, bucket: &str, key: &str) -> ClimateResult<FileOutcome> {
        let partition = parse_raster_name(key)?;
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| ClimateError::Config(format!("No object source to fetch {}/{}", bucket, key)))?;

        let staging = match &self.staging_root {
            Some(root) => TempDir::new_in(root)?,
            None => TempDir::new()?,
        };
        let file_name = Path::new(key)
            .file_name()
            .ok_or_else(|| ClimateError::Trigger(format!("Object key has no file name: {}", key)))?;
        let local = staging.path().join(file_name);
        source.fetch(bucket, key, &local)?;
        info!("Fetched {}/{} via {} source", bucket, key, source.name());

        let mut reader = BufReader::new(File::open(&local)?);
        let extraction = self.extractor.extract_from(&mut reader, Path::new(key), partition)?;
        self.finish(extraction)
    }

    /// Processes a raster already on the local filesystem
    pub fn process_local(&self, path: &Path) -> FileOutcome {
        if !self.config.input.accepts(&path.to_string_lossy()) {
            return FileOutcome::Skipped(SkipReason::NotRaster);
        }
        into_outcome(self.extractor.extract(path).and_then(|e| self.finish(e)))
    }

    /// Processes several local rasters, one outcome per path
    pub fn process_paths(&self, paths: &[PathBuf]) -> BatchReport {
        let progress = self.tracker(paths.len(), "Processing rasters");
        let mut report = BatchReport::default();
        for path in paths {
            let source = path.display().to_string();
            let outcome = self.process_local(path);
            log_outcome(&source, &outcome);
            report.push(source, outcome);
            progress.increment(1);
        }
        progress.finish();
        report
    }

    fn finish(&self, extraction: Extraction) -> ClimateResult<FileOutcome> {
        if extraction.is_empty() {
            return Ok(FileOutcome::Skipped(SkipReason::EmptyRegion));
        }

        let partition = extraction.raster.partition;
        let points = extraction.points.len();
        let records = self.engine.enhance(extraction.points, self.historical.as_ref());
        let path = self.writer.write(&records, partition)?;
        Ok(FileOutcome::Processed { points, path })
    }
}

fn into_outcome(result: ClimateResult<FileOutcome>) -> FileOutcome {
    result.unwrap_or_else(FileOutcome::Failed)
}

fn log_outcome(source: &str, outcome: &FileOutcome) {
    match outcome {
        FileOutcome::Processed { .. } => info!("{}: {}", source, outcome),
        FileOutcome::Skipped(_) => warn!("{}: {}", source, outcome),
        FileOutcome::Failed(_) => error!("{}: {}", source, outcome),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::source::LocalObjectStore;
    use crate::tiff::tests::test_utils::{GeoTiffFixture, SampleKind};
    use crate::writer::read_partition;
    use std::fs;

    struct Fixture {
        objects: TempDir,
        output: TempDir,
        staging: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                objects: TempDir::new().unwrap(),
                output: TempDir::new().unwrap(),
                staging: TempDir::new().unwrap(),
            }
        }

        fn put(&self, key: &str, bytes: &[u8]) {
            let path = self.objects.path().join("raw").join(key);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, bytes).unwrap();
        }

        fn orchestrator(&self) -> PipelineOrchestrator {
            PipelineOrchestrator::new(PipelineConfig::default(), self.output.path())
                .unwrap()
                .with_source(Box::new(LocalObjectStore::new(self.objects.path())))
                .with_staging_root(self.staging.path())
        }

        fn staged_entries(&self) -> usize {
            fs::read_dir(self.staging.path()).unwrap().count()
        }
    }

    fn raster() -> Vec<u8> {
        GeoTiffFixture::new(6, 4, SampleKind::Float32)
            .with_values((0..24).map(|v| v as f64 * 10.0).collect())
            .to_bytes()
    }

    fn event(keys: &[&str]) -> TriggerEvent {
        let mut event = TriggerEvent { records: Vec::new() };
        for key in keys {
            event.records.extend(TriggerEvent::for_object("raw", key).records);
        }
        event
    }

    #[test]
    fn test_mixed_batch_reports_each_file() {
        let fixture = Fixture::new();
        fixture.put("chirps-v2.0_2024.01.tif", &raster());
        fixture.put("bad_name.tif", &raster());
        fixture.put("notes.txt", b"hello");
        fixture.put(
            "chirps-v2.0_2024.02.tif",
            &GeoTiffFixture::new(4, 4, SampleKind::Float32).with_origin(100.0, 40.0).to_bytes(),
        );

        let report = fixture.orchestrator().process_trigger(&event(&[
            "chirps-v2.0_2024.01.tif",
            "bad_name.tif",
            "notes.txt",
            "chirps-v2.0_2024.02.tif",
            "chirps-v2.0_2024.03.tif",
        ]));

        assert_eq!(report.files.len(), 5);
        assert_eq!(report.processed(), 1);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.failed(), 2);
        assert!(!report.is_success());

        assert!(matches!(report.files[0].outcome, FileOutcome::Processed { points: 24, .. }));
        assert!(matches!(report.files[1].outcome, FileOutcome::Failed(ClimateError::FilenameParse(_))));
        assert!(matches!(report.files[2].outcome, FileOutcome::Skipped(SkipReason::NotRaster)));
        assert!(matches!(report.files[3].outcome, FileOutcome::Skipped(SkipReason::EmptyRegion)));
        assert!(matches!(report.files[4].outcome, FileOutcome::Failed(ClimateError::Io(_))));
        assert_eq!(report.retryable(), vec!["raw/chirps-v2.0_2024.03.tif"]);
    }

    #[test]
    fn test_processed_file_is_readable() {
        let fixture = Fixture::new();
        fixture.put("nested/chirps-v2.0_2023.07.tif", &raster());

        let outcome = fixture.orchestrator().process_object("raw", "nested/chirps-v2.0_2023.07.tif");
        let path = match outcome {
            FileOutcome::Processed { path, .. } => path,
            other => panic!("unexpected outcome: {}", other),
        };
        assert!(path.ends_with("year=2023/month=07/chirps_enriched_2023_07.parquet"));

        let records = read_partition(&path).unwrap();
        assert_eq!(records.len(), 24);
        assert!(records.iter().all(|r| r.point.year == 2023 && r.point.month == 7));
        assert!(records.iter().all(|r| r.season == crate::model::Season::Winter));
    }

    #[test]
    fn test_corrupt_raster_fails_without_aborting() {
        let fixture = Fixture::new();
        fixture.put("chirps-v2.0_2024.05.tif", b"II*\0garbage");
        fixture.put("chirps-v2.0_2024.06.tif", &raster());

        let report = fixture
            .orchestrator()
            .process_trigger(&event(&["chirps-v2.0_2024.05.tif", "chirps-v2.0_2024.06.tif"]));
        assert!(matches!(report.files[0].outcome, FileOutcome::Failed(ClimateError::Raster(_))));
        assert!(!report.files[0].outcome.is_retryable());
        assert_eq!(report.processed(), 1);
        assert_eq!(fixture.staged_entries(), 0);
    }

    #[test]
    fn test_oversized_chunk_fails_only_that_file() {
        let fixture = Fixture::new();
        let corrupt = GeoTiffFixture::new(6, 4, SampleKind::Float32).big_tiff().with_byte_count(1 << 62);
        fixture.put("chirps-v2.0_2024.07.tif", &corrupt.to_bytes());
        fixture.put("chirps-v2.0_2024.08.tif", &raster());

        let report = fixture
            .orchestrator()
            .process_trigger(&event(&["chirps-v2.0_2024.07.tif", "chirps-v2.0_2024.08.tif"]));
        assert!(matches!(report.files[0].outcome, FileOutcome::Failed(ClimateError::Raster(_))));
        assert!(matches!(report.files[1].outcome, FileOutcome::Processed { points: 24, .. }));
        assert_eq!(fixture.staged_entries(), 0);
    }

    #[test]
    fn test_local_files_need_no_source() {
        let fixture = Fixture::new();
        let path = fixture.objects.path().join("chirps-v2.0_2024.09.tif");
        fs::write(&path, raster()).unwrap();
        let orchestrator = PipelineOrchestrator::new(PipelineConfig::default(), fixture.output.path()).unwrap();

        assert!(matches!(orchestrator.process_local(&path), FileOutcome::Processed { points: 24, .. }));
        assert!(matches!(
            orchestrator.process_object("raw", "chirps-v2.0_2024.09.tif"),
            FileOutcome::Failed(ClimateError::Config(_))
        ));
    }

    #[test]
    fn test_history_fills_indices() {
        let fixture = Fixture::new();
        let path = fixture.objects.path().join("chirps-v2.0_2024.01.tif");
        fs::write(&path, raster()).unwrap();

        let history = HistoricalSeries::new((0..40).map(|v| 50.0 + v as f64).collect());
        let orchestrator = fixture.orchestrator().with_historical(history);
        let written = match orchestrator.process_local(&path) {
            FileOutcome::Processed { path, .. } => path,
            other => panic!("unexpected outcome: {}", other),
        };
        let records = read_partition(&written).unwrap();
        assert!(records[0].spi_1_month.is_present());
        assert!(records[0].precipitation_anomaly_percent.is_present());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = PipelineConfig::default();
        config.output.compression = "brotli".to_string();
        let result = PipelineOrchestrator::new(config, Path::new("."));
        assert!(matches!(result, Err(ClimateError::Config(_))));
    }
}
