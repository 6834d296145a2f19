//! Regional, seasonal and whole-batch aggregates

use std::collections::BTreeMap;

use crate::config::{AggregationConfig, LatitudeBand};
use crate::model::{EnrichedRecord, RegionSummary, RegionalStats, Season, SeasonalStats};

use super::stats::{mean, median, sample_std};

/// Per latitude band statistics, in band order; empty bands are omitted
pub fn regional_stats(
    records: &[EnrichedRecord],
    bands: &[LatitudeBand],
    aggregation: &AggregationConfig,
) -> Vec<RegionalStats> {
    bands
        .iter()
        .filter_map(|band| {
            let values: Vec<f64> = records
                .iter()
                .filter(|r| band.contains(r.latitude()))
                .map(|r| r.precipitation_mm())
                .collect();
            let mean_precipitation = mean(&values)?;
            let dry = values.iter().filter(|v| **v < aggregation.dry_month_below).count();
            Some(RegionalStats {
                band: band.name.clone(),
                mean_precipitation,
                point_count: values.len(),
                drought_percentage: dry as f64 / values.len() as f64 * 100.0,
            })
        })
        .collect()
}

/// Per season statistics in season order; empty seasons are omitted
pub fn seasonal_stats(records: &[EnrichedRecord], aggregation: &AggregationConfig) -> Vec<SeasonalStats> {
    let mut buckets: BTreeMap<Season, Vec<f64>> = BTreeMap::new();
    for record in records {
        buckets.entry(record.season).or_default().push(record.precipitation_mm());
    }

    buckets
        .into_iter()
        .filter_map(|(season, values)| {
            let mean_precipitation = mean(&values)?;
            Some(SeasonalStats {
                season,
                mean_precipitation,
                total_precipitation: values.iter().sum(),
                dry_months: values.iter().filter(|v| **v < aggregation.dry_month_below).count(),
                total_months: values.len(),
            })
        })
        .collect()
}

/// Descriptive statistics of the batch; `None` when empty
pub fn summary(records: &[EnrichedRecord], aggregation: &AggregationConfig) -> Option<RegionSummary> {
    let values: Vec<f64> = records.iter().map(|r| r.precipitation_mm()).collect();
    let mean = mean(&values)?;
    let median = median(&values)?;
    Some(RegionSummary {
        mean,
        median,
        std: sample_std(&values),
        min: values.iter().copied().fold(f64::INFINITY, f64::min),
        max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        total_points: values.len(),
        dry_points: values.iter().filter(|v| **v < aggregation.dry_month_below).count(),
        wet_points: values.iter().filter(|v| **v > aggregation.wet_point_above).count(),
    })
}
