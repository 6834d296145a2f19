//! Historical reference series

use std::fs;
use std::path::Path;

use crate::errors::{ClimateError, ClimateResult};

/// Ordered precipitation magnitudes used as the reference population
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HistoricalSeries(Vec<f64>);

impl HistoricalSeries {
    pub fn new(values: Vec<f64>) -> Self {
        HistoricalSeries(values)
    }

    /// Parses a JSON array, or numbers separated by commas and whitespace
    pub fn parse(content: &str) -> ClimateResult<Self> {
        let trimmed = content.trim();
        if trimmed.starts_with('[') {
            let values: Vec<f64> = serde_json::from_str(trimmed)
                .map_err(|e| ClimateError::Config(format!("Invalid historical series: {}", e)))?;
            return Ok(HistoricalSeries(values));
        }

        let values = trimmed
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token.parse::<f64>().map_err(|_| {
                    ClimateError::Config(format!("Invalid number in historical series: '{}'", token))
                })
            })
            .collect::<ClimateResult<Vec<f64>>>()?;
        Ok(HistoricalSeries(values))
    }

    pub fn from_file(path: &Path) -> ClimateResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<f64>> for HistoricalSeries {
    fn from(values: Vec<f64>) -> Self {
        HistoricalSeries(values)
    }
}
