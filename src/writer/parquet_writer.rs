//! Partitioned Parquet writer

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use log::{debug, info};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;

use crate::config::OutputConfig;
use crate::errors::{ClimateError, ClimateResult};
use crate::model::EnrichedRecord;
use crate::writer::partition::PartitionKey;
use crate::writer::schema;

/// Writes one Parquet artifact per `(year, month)` under a hive-style tree
pub struct PartitionedWriter {
    root: PathBuf,
    output: OutputConfig,
}

impl PartitionedWriter {
    pub fn new(root: &Path, output: OutputConfig) -> Self {
        PartitionedWriter {
            root: root.to_path_buf(),
            output,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every partition of the dataset
    pub fn dataset_dir(&self) -> PathBuf {
        self.root.join(&self.output.prefix).join(&self.output.dataset)
    }

    /// `<root>/<prefix>/<dataset>/year=YYYY/month=MM/<dataset>_YYYY_MM.parquet`
    pub fn partition_path(&self, key: PartitionKey) -> PathBuf {
        self.dataset_dir()
            .join(key.hive_path())
            .join(format!("{}_{:04}_{:02}.parquet", self.output.dataset, key.year, key.month))
    }

    fn compression(&self) -> ClimateResult<Compression> {
        match self.output.compression.to_ascii_lowercase().as_str() {
            "snappy" => Ok(Compression::SNAPPY),
            "zstd" => Ok(Compression::ZSTD(ZstdLevel::default())),
            "gzip" => Ok(Compression::GZIP(GzipLevel::default())),
            "none" => Ok(Compression::UNCOMPRESSED),
            other => Err(ClimateError::Config(format!("Unknown output compression '{}'", other))),
        }
    }

    /// Writes `records` as the partition for `key`, replacing any previous artifact.
    ///
    /// Data goes to a staging file beside the target and is renamed into place once
    /// complete. The staging file is removed if any step fails.
    pub fn write(&self, records: &[EnrichedRecord], key: PartitionKey) -> ClimateResult<PathBuf> {
        let final_path = self.partition_path(key);
        let dir = final_path
            .parent()
            .ok_or_else(|| ClimateError::Generic(format!("No parent directory for {}", final_path.display())))?;
        fs::create_dir_all(dir)?;

        let batch = schema::to_batch(records)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression()?)
            .build();

        let mut staging = tempfile::Builder::new()
            .prefix(".staging-")
            .suffix(".parquet")
            .tempfile_in(dir)?;
        debug!("Staging partition {} at {}", key, staging.path().display());

        let mut writer = ArrowWriter::try_new(staging.as_file_mut(), batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;
        staging.as_file().sync_all()?;

        staging.persist(&final_path).map_err(|e| ClimateError::Io(e.error))?;
        info!(
            "Wrote {} records for {} to {} ({})",
            records.len(),
            key,
            final_path.display(),
            self.output.compression
        );
        Ok(final_path)
    }
}

/// Reads every record of one written artifact
pub fn read_partition(path: &Path) -> ClimateResult<Vec<EnrichedRecord>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut records = Vec::new();
    for batch in reader {
        records.extend(schema::from_batch(&batch?)?);
    }
    debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Finds every `.parquet` artifact below `path`, or `path` itself when it is a file
pub fn find_partitions(path: &Path) -> ClimateResult<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut found = Vec::new();
    let mut pending = vec![path.to_path_buf()];
    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry_path = entry?.path();
            if entry_path.is_dir() {
                pending.push(entry_path);
            } else if is_artifact(&entry_path) {
                found.push(entry_path);
            }
        }
    }
    found.sort();
    Ok(found)
}

fn is_artifact(path: &Path) -> bool {
    let staged = path
        .file_name()
        .and_then(|n| n.to_str())
        .map_or(true, |n| n.starts_with('.'));
    !staged && path.extension().and_then(|e| e.to_str()) == Some("parquet")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::metrics::MetricsEngine;
    use crate::model::PrecipitationPoint;
    use tempfile::TempDir;

    fn records(values: &[f64]) -> Vec<EnrichedRecord> {
        let config = PipelineConfig::default();
        let points = values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                PrecipitationPoint::from_cell(2024, 1, -30.0 + i as f64, 25.0, *v, &config.region.code)
            })
            .collect();
        MetricsEngine::new(&config).enhance(points, None)
    }

    fn writer(root: &Path, compression: &str) -> PartitionedWriter {
        let mut output = PipelineConfig::default().output;
        output.compression = compression.to_string();
        PartitionedWriter::new(root, output)
    }

    fn staging_files(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .file_name()
                    .to_string_lossy()
                    .starts_with(".staging-")
            })
            .count()
    }

    #[test]
    fn test_partition_path_template() {
        let writer = writer(Path::new("/data"), "snappy");
        let key = PartitionKey::new(2024, 1).unwrap();
        assert_eq!(
            writer.partition_path(key),
            PathBuf::from("/data/processed/chirps_enriched/year=2024/month=01/chirps_enriched_2024_01.parquet")
        );
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = TempDir::new().unwrap();
        let writer = writer(dir.path(), "snappy");
        let key = PartitionKey::new(2024, 1).unwrap();
        let input = records(&[10.0, 55.0, -1.0]);

        let path = writer.write(&input, key).unwrap();
        assert!(path.exists());

        let restored = read_partition(&path).unwrap();
        assert_eq!(restored.len(), 3);
        assert_eq!(restored[0].point, input[0].point);
        assert_eq!(restored[2].point.data_quality, input[2].point.data_quality);
        assert_eq!(restored[1].drought_class, input[1].drought_class);
        assert_eq!(restored[0].spi_1_month.value(), None);
    }

    #[test]
    fn test_rewrite_replaces_artifact() {
        let dir = TempDir::new().unwrap();
        let writer = writer(dir.path(), "zstd");
        let key = PartitionKey::new(2023, 12).unwrap();

        writer.write(&records(&[1.0, 2.0, 3.0]), key).unwrap();
        let path = writer.write(&records(&[80.0]), key).unwrap();

        let restored = read_partition(&path).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].precipitation_mm(), 80.0);
        assert_eq!(staging_files(path.parent().unwrap()), 0);
        assert_eq!(find_partitions(dir.path()).unwrap(), vec![path]);
    }

    #[test]
    fn test_every_codec_writes() {
        let dir = TempDir::new().unwrap();
        for (month, codec) in ["snappy", "zstd", "gzip", "none"].iter().enumerate() {
            let writer = writer(dir.path(), codec);
            let key = PartitionKey::new(2024, month as u32 + 1).unwrap();
            let path = writer.write(&records(&[12.0, 30.0]), key).unwrap();
            assert_eq!(read_partition(&path).unwrap().len(), 2);
        }
        assert_eq!(find_partitions(dir.path()).unwrap().len(), 4);
    }

    #[test]
    fn test_unknown_codec_leaves_nothing_behind() {
        let dir = TempDir::new().unwrap();
        let writer = writer(dir.path(), "lz4");
        let key = PartitionKey::new(2024, 2).unwrap();

        let err = writer.write(&records(&[5.0]), key).unwrap_err();
        assert!(matches!(err, ClimateError::Config(_)));
        assert!(!writer.partition_path(key).exists());
    }

    #[test]
    fn test_failed_commit_removes_staging_file() {
        let dir = TempDir::new().unwrap();
        let writer = writer(dir.path(), "snappy");
        let key = PartitionKey::new(2024, 4).unwrap();
        let target = writer.partition_path(key);
        // A directory in the way makes the final rename fail after staging
        fs::create_dir_all(target.join("occupied")).unwrap();

        let err = writer.write(&records(&[5.0, 40.0]), key).unwrap_err();
        assert!(matches!(err, ClimateError::Io(_)));
        assert!(target.is_dir());
        assert_eq!(staging_files(target.parent().unwrap()), 0);
        assert!(find_partitions(dir.path()).unwrap().is_empty());
    }
}
