//! Metrics engine bound to one configuration

use log::{debug, info};
use std::collections::BTreeMap;

use crate::config::PipelineConfig;
use crate::model::{
    DroughtClass, DroughtIndices, EnrichedRecord, HistoricalSeries, IndexValue, PrecipitationPoint,
    RegionSummary, RegionalStats, Season, SeasonalStats, StatsReport,
};

use super::aggregate;
use super::drought;
use super::percentile::percentile_ranks;
use super::rolling::rolling_average;
use super::stats::mean;

/// Computes drought indices, rolling statistics and aggregates
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    config: PipelineConfig,
}

impl MetricsEngine {
    pub fn new(config: &PipelineConfig) -> Self {
        MetricsEngine { config: config.clone() }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn classify(&self, precipitation_mm: f64) -> DroughtClass {
        drought::classify(precipitation_mm, &self.config.drought)
    }

    pub fn anomaly(&self, current: &[f64], historical: Option<&HistoricalSeries>) -> IndexValue {
        drought::anomaly(current, historical.map(|h| h.values()))
    }

    pub fn spi(&self, current: &[f64], historical: Option<&HistoricalSeries>, timescale: usize) -> IndexValue {
        drought::spi(current, historical.map(|h| h.values()), timescale, self.config.indices.min_history)
    }

    /// Batch-wide indices of `current` against the reference series
    pub fn drought_indices(&self, current: &[f64], historical: Option<&HistoricalSeries>) -> DroughtIndices {
        let indices = DroughtIndices {
            spi_1_month: self.spi(current, historical, 1),
            spi_3_month: self.spi(current, historical, 3),
            spi_6_month: self.spi(current, historical, 6),
            precipitation_anomaly_percent: self.anomaly(current, historical),
            batch_class: mean(current).map(|m| self.classify(m)),
        };
        debug!(
            "Drought indices: SPI-1 {}, SPI-3 {}, SPI-6 {}, anomaly {}",
            indices.spi_1_month, indices.spi_3_month, indices.spi_6_month, indices.precipitation_anomaly_percent
        );
        indices
    }

    pub fn rolling_average(&self, series: &[f64], window: usize) -> Vec<f64> {
        rolling_average(series, window)
    }

    pub fn percentile_ranks(&self, values: &[f64]) -> Vec<f64> {
        percentile_ranks(values)
    }

    pub fn is_extreme_dry(&self, precipitation_mm: f64) -> bool {
        precipitation_mm < self.config.extremes.dry_below
    }

    pub fn is_extreme_wet(&self, precipitation_mm: f64) -> bool {
        precipitation_mm > self.config.extremes.wet_above
    }

    pub fn regional_stats(&self, records: &[EnrichedRecord]) -> Vec<RegionalStats> {
        aggregate::regional_stats(records, &self.config.latitude_bands, &self.config.aggregation)
    }

    pub fn seasonal_stats(&self, records: &[EnrichedRecord]) -> Vec<SeasonalStats> {
        aggregate::seasonal_stats(records, &self.config.aggregation)
    }

    pub fn summary(&self, records: &[EnrichedRecord]) -> Option<RegionSummary> {
        aggregate::summary(records, &self.config.aggregation)
    }

    /// Class counts plus regional, seasonal and summary statistics
    pub fn report(&self, records: &[EnrichedRecord]) -> StatsReport {
        let mut drought_classes: BTreeMap<DroughtClass, usize> =
            DroughtClass::ALL.iter().map(|c| (*c, 0)).collect();
        for record in records {
            *drought_classes.entry(record.drought_class).or_insert(0) += 1;
        }

        StatsReport {
            records: records.len(),
            drought_classes,
            regional: self.regional_stats(records),
            seasonal: self.seasonal_stats(records),
            summary: self.summary(records),
        }
    }

    /// Single enrichment pass over a batch in extraction order.
    ///
    /// Index columns repeat the batch-wide values on every row; the drought
    /// class is per point.
    pub fn enhance(
        &self,
        points: Vec<PrecipitationPoint>,
        historical: Option<&HistoricalSeries>,
    ) -> Vec<EnrichedRecord> {
        let values: Vec<f64> = points.iter().map(|p| p.precipitation_mm).collect();

        let indices = self.drought_indices(&values, historical);
        if let Some(class) = indices.batch_class {
            info!("Batch mean drought class: {}", class.as_str());
        }

        let rolling_30d = rolling_average(&values, 30);
        let rolling_90d = rolling_average(&values, 90);
        let rolling_6m = rolling_average(&values, 6);
        let rolling_12m = rolling_average(&values, 12);
        let percentiles = percentile_ranks(&values);

        let records: Vec<EnrichedRecord> = points
            .into_iter()
            .enumerate()
            .map(|(i, point)| {
                let precipitation = point.precipitation_mm;
                let season = Season::from_month(point.month);
                EnrichedRecord {
                    drought_class: self.classify(precipitation),
                    precipitation_anomaly_percent: indices.precipitation_anomaly_percent,
                    spi_1_month: indices.spi_1_month,
                    spi_3_month: indices.spi_3_month,
                    spi_6_month: indices.spi_6_month,
                    rolling_30d_avg: rolling_30d[i],
                    rolling_90d_avg: rolling_90d[i],
                    rolling_6m_avg: rolling_6m[i],
                    rolling_12m_avg: rolling_12m[i],
                    precipitation_percentile: percentiles[i],
                    extreme_dry: self.is_extreme_dry(precipitation),
                    extreme_wet: self.is_extreme_wet(precipitation),
                    season,
                    point,
                }
            })
            .collect();

        info!("Enhanced {} records", records.len());
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Absence;
    use approx::assert_relative_eq;

    fn point(latitude: f64, month: u32, precipitation_mm: f64) -> PrecipitationPoint {
        PrecipitationPoint::from_cell(2024, month, latitude, 25.0, precipitation_mm, "SOUTHERN_AFRICA")
    }

    fn engine() -> MetricsEngine {
        MetricsEngine::new(&PipelineConfig::default())
    }

    #[test]
    fn test_regional_aggregation() {
        let engine = engine();
        let records = engine.enhance(
            vec![point(-33.0, 1, 20.0), point(-28.0, 1, 60.0), point(-23.0, 1, 90.0)],
            None,
        );
        let stats = engine.regional_stats(&records);

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].band, "Southern");
        assert_relative_eq!(stats[0].mean_precipitation, 20.0);
        assert_eq!(stats[0].point_count, 1);
        assert_relative_eq!(stats[0].drought_percentage, 100.0);
        assert_eq!(stats[1].band, "Central");
        assert_relative_eq!(stats[1].mean_precipitation, 60.0);
        assert_relative_eq!(stats[1].drought_percentage, 0.0);
        assert_eq!(stats[2].band, "Northern");
        assert_relative_eq!(stats[2].mean_precipitation, 90.0);
        assert_relative_eq!(stats[2].drought_percentage, 0.0);
    }

    #[test]
    fn test_empty_bands_are_omitted() {
        let engine = engine();
        let records = engine.enhance(vec![point(-33.0, 1, 20.0)], None);
        let stats = engine.regional_stats(&records);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].band, "Southern");
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        let engine = engine();
        let records = engine.enhance(vec![point(-30.0, 1, 40.0)], None);
        let names: Vec<String> = engine.regional_stats(&records).into_iter().map(|s| s.band).collect();
        assert_eq!(names, vec!["Southern".to_string(), "Central".to_string()]);
    }

    #[test]
    fn test_seasonal_aggregation() {
        let engine = engine();
        let records = engine.enhance(
            vec![point(-30.0, 1, 10.0), point(-30.0, 12, 50.0), point(-30.0, 7, 5.0)],
            None,
        );
        let stats = engine.seasonal_stats(&records);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].season, Season::Summer);
        assert_relative_eq!(stats[0].mean_precipitation, 30.0);
        assert_relative_eq!(stats[0].total_precipitation, 60.0);
        assert_eq!(stats[0].dry_months, 1);
        assert_eq!(stats[0].total_months, 2);
        assert_eq!(stats[1].season, Season::Winter);
        assert_eq!(stats[1].dry_months, 1);
    }

    #[test]
    fn test_summary() {
        let engine = engine();
        let records = engine.enhance(
            vec![point(-30.0, 1, 10.0), point(-30.0, 1, 150.0), point(-30.0, 1, 50.0)],
            None,
        );
        let summary = engine.summary(&records).unwrap();
        assert_relative_eq!(summary.mean, 70.0);
        assert_relative_eq!(summary.median, 50.0);
        assert_relative_eq!(summary.std.unwrap(), 72.11102550927978, epsilon = 1e-9);
        assert_eq!((summary.min, summary.max), (10.0, 150.0));
        assert_eq!(summary.total_points, 3);
        assert_eq!(summary.dry_points, 1);
        assert_eq!(summary.wet_points, 1);

        assert!(engine.summary(&[]).is_none());
        let single = engine.enhance(vec![point(-30.0, 1, 10.0)], None);
        assert_eq!(engine.summary(&single).unwrap().std, None);
    }

    #[test]
    fn test_enhance_columns() {
        let engine = engine();
        let points = vec![point(-30.0, 3, 5.0), point(-30.0, 3, 250.0), point(-30.0, 3, 60.0)];
        let records = engine.enhance(points, None);

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].drought_class, DroughtClass::ExtremeDrought);
        assert_eq!(records[1].drought_class, DroughtClass::Normal);
        assert_eq!(records[2].drought_class, DroughtClass::AbnormallyDry);
        assert!(records[0].extreme_dry && !records[0].extreme_wet);
        assert!(records[1].extreme_wet && !records[1].extreme_dry);
        assert_relative_eq!(records[1].rolling_6m_avg, 127.5);
        assert_relative_eq!(records[2].rolling_30d_avg, 105.0);
        assert_relative_eq!(records[0].precipitation_percentile, 100.0 / 3.0);
        assert_relative_eq!(records[1].precipitation_percentile, 100.0);
        assert!(records.iter().all(|r| r.season == Season::Autumn));
        assert_eq!(records[0].spi_1_month, IndexValue::Absent(Absence::NoHistory));
        assert_eq!(records[0].precipitation_anomaly_percent, IndexValue::Absent(Absence::NoHistory));
    }

    #[test]
    fn test_enhance_with_history_repeats_batch_values() {
        let engine = engine();
        let history = HistoricalSeries::new((1..=36).map(|v| v as f64 * 2.0).collect());
        let records = engine.enhance(vec![point(-30.0, 1, 30.0), point(-30.0, 1, 50.0)], Some(&history));

        let anomaly = records[0].precipitation_anomaly_percent.value().unwrap();
        assert_relative_eq!(anomaly, (40.0 - 37.0) / 37.0 * 100.0, epsilon = 1e-12);
        assert_eq!(records[0].spi_3_month, records[1].spi_3_month);
        assert!(records[1].spi_6_month.is_present());
    }

    #[test]
    fn test_drought_indices_batch_class() {
        let engine = engine();
        let indices = engine.drought_indices(&[10.0, 20.0], None);
        assert_eq!(indices.batch_class, Some(DroughtClass::SevereDrought));
        assert_eq!(engine.drought_indices(&[], None).batch_class, None);
    }

    #[test]
    fn test_report_counts_every_class() {
        let engine = engine();
        let records = engine.enhance(
            vec![point(-33.0, 1, 5.0), point(-28.0, 1, 60.0), point(-23.0, 1, 90.0)],
            None,
        );
        let report = engine.report(&records);

        assert_eq!(report.records, 3);
        assert_eq!(report.drought_classes.len(), 5);
        assert_eq!(report.drought_classes[&DroughtClass::ExtremeDrought], 1);
        assert_eq!(report.drought_classes[&DroughtClass::SevereDrought], 0);
        assert_eq!(report.drought_classes[&DroughtClass::Normal], 1);
        assert_eq!(report.regional.len(), 3);
        assert_eq!(report.summary.as_ref().map(|s| s.total_points), Some(3));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["drought_classes"]["ABNORMALLY_DRY"], 1);
        assert_eq!(json["drought_classes"]["MODERATE_DROUGHT"], 0);
    }
}
