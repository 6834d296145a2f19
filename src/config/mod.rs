//! Pipeline configuration
//!
//! Region, thresholds, latitude bands and output settings. Built-in values
//! are embedded from `climate_defaults.toml`; a file given on the command
//! line replaces them wholesale.

use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::coordinate::BoundingBox;
use crate::errors::{ClimateError, ClimateResult};

lazy_static! {
    static ref DEFAULT_CONFIG: PipelineConfig = {
        let content = include_str!("../../climate_defaults.toml");
        PipelineConfig::from_toml_str(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse built-in climate defaults: {}", e);
            PipelineConfig::southern_africa()
        })
    };
}

/// Target region and the code stamped on every point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionConfig {
    pub code: String,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl RegionConfig {
    pub fn bbox(&self) -> BoundingBox {
        BoundingBox::from_lat_lon(self.lat_min, self.lat_max, self.lon_min, self.lon_max)
    }
}

/// Lower bound (mm) of each drought class above EXTREME_DROUGHT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroughtThresholds {
    pub extreme: f64,
    pub severe: f64,
    pub moderate: f64,
    pub abnormally_dry: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtremeThresholds {
    /// `extreme_dry` when precipitation is strictly below
    pub dry_below: f64,
    /// `extreme_wet` when precipitation is strictly above
    pub wet_above: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    /// Dry month / drought point when precipitation is strictly below
    pub dry_month_below: f64,
    /// Wet point in the batch summary when precipitation is strictly above
    pub wet_point_above: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Minimum historical observations for any standardized index
    pub min_history: usize,
}

/// Named latitude band, inclusive at both ends
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatitudeBand {
    pub name: String,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl LatitudeBand {
    pub fn contains(&self, latitude: f64) -> bool {
        latitude >= self.lat_min && latitude <= self.lat_max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Raster extension without the dot
    pub extension: String,
}

impl InputConfig {
    /// Whether an object key names a raster this pipeline processes
    pub fn accepts(&self, key: &str) -> bool {
        Path::new(key)
            .extension()
            .and_then(|e| e.to_str())
            .map_or(false, |e| e.eq_ignore_ascii_case(&self.extension))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub prefix: String,
    pub dataset: String,
    /// snappy, zstd, gzip or none
    pub compression: String,
}

pub const SUPPORTED_CODECS: [&str; 4] = ["snappy", "zstd", "gzip", "none"];

/// Complete configuration of one pipeline instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub region: RegionConfig,
    pub drought: DroughtThresholds,
    pub extremes: ExtremeThresholds,
    pub aggregation: AggregationConfig,
    pub indices: IndexConfig,
    pub latitude_bands: Vec<LatitudeBand>,
    pub input: InputConfig,
    pub output: OutputConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

impl PipelineConfig {
    /// Parses and validates a TOML document
    pub fn from_toml_str(content: &str) -> ClimateResult<Self> {
        let config: PipelineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML configuration file
    pub fn from_file(path: &Path) -> ClimateResult<Self> {
        debug!("Loading configuration from {}", path.display());
        let content = fs::read_to_string(path).map_err(|e| {
            ClimateError::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Rejects inverted ranges, unordered thresholds and unknown codecs
    pub fn validate(&self) -> ClimateResult<()> {
        let r = &self.region;
        if r.lat_min > r.lat_max || r.lon_min > r.lon_max {
            return Err(ClimateError::Config(format!(
                "Region bounds are inverted: lat {}..{}, lon {}..{}",
                r.lat_min, r.lat_max, r.lon_min, r.lon_max
            )));
        }
        if r.code.trim().is_empty() {
            return Err(ClimateError::Config("Region code is empty".to_string()));
        }

        let d = &self.drought;
        if !(d.extreme <= d.severe && d.severe <= d.moderate && d.moderate <= d.abnormally_dry) {
            return Err(ClimateError::Config(
                "Drought thresholds must be ascending: extreme <= severe <= moderate <= abnormally_dry".to_string(),
            ));
        }

        for band in &self.latitude_bands {
            if band.lat_min > band.lat_max {
                return Err(ClimateError::Config(format!("Latitude band {} is inverted", band.name)));
            }
        }

        if self.indices.min_history == 0 {
            return Err(ClimateError::Config("indices.min_history must be positive".to_string()));
        }

        let codec = self.output.compression.to_lowercase();
        if !SUPPORTED_CODECS.contains(&codec.as_str()) {
            return Err(ClimateError::Config(format!(
                "Unknown output compression '{}', expected one of {:?}",
                self.output.compression, SUPPORTED_CODECS
            )));
        }

        Ok(())
    }

    /// Hard-coded copy of the built-in defaults, used only if the embedded
    /// file fails to parse
    fn southern_africa() -> Self {
        let band = |name: &str, lat_min: f64, lat_max: f64| LatitudeBand {
            name: name.to_string(),
            lat_min,
            lat_max,
        };
        PipelineConfig {
            region: RegionConfig {
                code: "SOUTHERN_AFRICA".to_string(),
                lat_min: -35.0,
                lat_max: -22.0,
                lon_min: 16.0,
                lon_max: 33.0,
            },
            drought: DroughtThresholds { extreme: 10.0, severe: 25.0, moderate: 50.0, abnormally_dry: 75.0 },
            extremes: ExtremeThresholds { dry_below: 10.0, wet_above: 200.0 },
            aggregation: AggregationConfig { dry_month_below: 25.0, wet_point_above: 100.0 },
            indices: IndexConfig { min_history: 30 },
            latitude_bands: vec![
                band("Southern", -35.0, -30.0),
                band("Central", -30.0, -25.0),
                band("Northern", -25.0, -22.0),
            ],
            input: InputConfig { extension: "tif".to_string() },
            output: OutputConfig {
                prefix: "processed".to_string(),
                dataset: "chirps_enriched".to_string(),
                compression: "snappy".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_defaults_match_builtin() {
        let parsed = PipelineConfig::from_toml_str(include_str!("../../climate_defaults.toml")).unwrap();
        assert_eq!(parsed, PipelineConfig::southern_africa());
        assert_eq!(PipelineConfig::default(), parsed);
    }

    #[test]
    fn test_default_region() {
        let config = PipelineConfig::default();
        assert_eq!(config.region.code, "SOUTHERN_AFRICA");
        let bbox = config.region.bbox();
        assert_eq!((bbox.min_x, bbox.max_x, bbox.min_y, bbox.max_y), (16.0, 33.0, -35.0, -22.0));
    }

    #[test]
    fn test_validate_rejects_unordered_thresholds() {
        let mut config = PipelineConfig::default();
        config.drought.severe = 60.0;
        assert!(matches!(config.validate(), Err(ClimateError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_unknown_codec() {
        let mut config = PipelineConfig::default();
        config.output.compression = "lz4".to_string();
        assert!(config.validate().is_err());
        config.output.compression = "ZSTD".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_section_is_config_error() {
        let result = PipelineConfig::from_toml_str("[region]\ncode = \"X\"\n");
        assert!(matches!(result, Err(ClimateError::Config(_))));
    }

    #[test]
    fn test_input_accepts_extension() {
        let input = PipelineConfig::default().input;
        assert!(input.accepts("chirps/chirps-v2.0_2024.01.tif"));
        assert!(input.accepts("CHIRPS_2024.01.TIF"));
        assert!(!input.accepts("chirps/readme.txt"));
        assert!(!input.accepts("chirps/tif"));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        let content = include_str!("../../climate_defaults.toml").replace("SOUTHERN_AFRICA", "TEST_REGION");
        std::fs::write(&path, content).unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.region.code, "TEST_REGION");
        assert!(PipelineConfig::from_file(&dir.path().join("missing.toml")).is_err());
    }
}
