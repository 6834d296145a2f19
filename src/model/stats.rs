//! Aggregates over a batch of enriched records

use serde::Serialize;
use std::collections::BTreeMap;

use super::record::{DroughtClass, Season};

/// Statistics for one latitude band
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalStats {
    pub band: String,
    pub mean_precipitation: f64,
    pub point_count: usize,
    /// Share of points below the dry threshold, 0-100
    pub drought_percentage: f64,
}

/// Statistics for one season bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalStats {
    pub season: Season,
    pub mean_precipitation: f64,
    pub total_precipitation: f64,
    pub dry_months: usize,
    pub total_months: usize,
}

/// Descriptive statistics of a whole batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionSummary {
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation; `None` below two points
    pub std: Option<f64>,
    pub min: f64,
    pub max: f64,
    pub total_points: usize,
    pub dry_points: usize,
    pub wet_points: usize,
}

/// Every aggregate of a record set, as printed by the `stats` command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub records: usize,
    /// Records per drought class; classes with no records are listed as zero
    pub drought_classes: BTreeMap<DroughtClass, usize>,
    pub regional: Vec<RegionalStats>,
    pub seasonal: Vec<SeasonalStats>,
    pub summary: Option<RegionSummary>,
}
