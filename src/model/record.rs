//! Enriched table rows

use serde::{Deserialize, Serialize};

use super::index::IndexValue;
use super::point::PrecipitationPoint;

/// Drought severity bucket, ordered from driest to normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DroughtClass {
    ExtremeDrought,
    SevereDrought,
    ModerateDrought,
    AbnormallyDry,
    Normal,
}

impl DroughtClass {
    pub const ALL: [DroughtClass; 5] = [
        DroughtClass::ExtremeDrought,
        DroughtClass::SevereDrought,
        DroughtClass::ModerateDrought,
        DroughtClass::AbnormallyDry,
        DroughtClass::Normal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DroughtClass::ExtremeDrought => "EXTREME_DROUGHT",
            DroughtClass::SevereDrought => "SEVERE_DROUGHT",
            DroughtClass::ModerateDrought => "MODERATE_DROUGHT",
            DroughtClass::AbnormallyDry => "ABNORMALLY_DRY",
            DroughtClass::Normal => "NORMAL",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

/// Southern-hemisphere season
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    Summer,
    Autumn,
    Winter,
    Spring,
}

impl Season {
    /// Dec-Feb summer, Mar-May autumn, Jun-Aug winter, otherwise spring
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Summer,
            3..=5 => Season::Autumn,
            6..=8 => Season::Winter,
            _ => Season::Spring,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Summer => "SUMMER",
            Season::Autumn => "AUTUMN",
            Season::Winter => "WINTER",
            Season::Spring => "SPRING",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUMMER" => Some(Season::Summer),
            "AUTUMN" => Some(Season::Autumn),
            "WINTER" => Some(Season::Winter),
            "SPRING" => Some(Season::Spring),
            _ => None,
        }
    }
}

/// Batch-wide indices derived from the historical reference series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroughtIndices {
    pub spi_1_month: IndexValue,
    pub spi_3_month: IndexValue,
    pub spi_6_month: IndexValue,
    pub precipitation_anomaly_percent: IndexValue,
    /// Class of the batch mean; `None` for an empty batch
    pub batch_class: Option<DroughtClass>,
}

/// A point together with every derived column
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub point: PrecipitationPoint,
    pub drought_class: DroughtClass,
    pub precipitation_anomaly_percent: IndexValue,
    pub spi_1_month: IndexValue,
    pub spi_3_month: IndexValue,
    pub spi_6_month: IndexValue,
    pub rolling_30d_avg: f64,
    pub rolling_90d_avg: f64,
    pub rolling_6m_avg: f64,
    pub rolling_12m_avg: f64,
    /// Fractional rank within the batch, 0-100
    pub precipitation_percentile: f64,
    pub extreme_dry: bool,
    pub extreme_wet: bool,
    pub season: Season,
}

impl EnrichedRecord {
    pub fn precipitation_mm(&self) -> f64 {
        self.point.precipitation_mm
    }

    pub fn latitude(&self) -> f64 {
        self.point.latitude
    }

    pub fn month(&self) -> u32 {
        self.point.month
    }
}
