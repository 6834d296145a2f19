//! Drought classification and standardized indices

use log::debug;

use crate::config::DroughtThresholds;
use crate::model::{Absence, DroughtClass, IndexValue};

use super::stats::{mean, population_std};

/// Timescales, in months, of the SPI-like indices
pub const SPI_TIMESCALES: [usize; 3] = [1, 3, 6];

/// Relative spread below which a reference distribution counts as constant
const VARIANCE_EPSILON: f64 = 1e-12;

/// Classifies a precipitation amount; each threshold is the inclusive
/// lower bound of the next wetter class
pub fn classify(precipitation_mm: f64, thresholds: &DroughtThresholds) -> DroughtClass {
    if precipitation_mm < thresholds.extreme {
        DroughtClass::ExtremeDrought
    } else if precipitation_mm < thresholds.severe {
        DroughtClass::SevereDrought
    } else if precipitation_mm < thresholds.moderate {
        DroughtClass::ModerateDrought
    } else if precipitation_mm < thresholds.abnormally_dry {
        DroughtClass::AbnormallyDry
    } else {
        DroughtClass::Normal
    }
}

/// Percentage departure of the current mean from the historical mean
pub fn anomaly(current: &[f64], historical: Option<&[f64]>) -> IndexValue {
    let historical = match historical {
        Some(h) if !h.is_empty() => h,
        Some(_) => {
            return IndexValue::Absent(Absence::InsufficientHistory { required: 1, available: 0 })
        }
        None => return IndexValue::Absent(Absence::NoHistory),
    };
    let current_mean = match mean(current) {
        Some(m) => m,
        None => return IndexValue::Absent(Absence::EmptySeries),
    };
    match mean(historical) {
        Some(reference) if reference > 0.0 => {
            IndexValue::Value((current_mean - reference) / reference * 100.0)
        }
        _ => IndexValue::Absent(Absence::NonPositiveReference),
    }
}

/// Z-score of the current rolling mean against historical rolling means.
///
/// Needs at least `max(min_history, timescale)` historical observations.
pub fn spi(current: &[f64], historical: Option<&[f64]>, timescale: usize, min_history: usize) -> IndexValue {
    let historical = match historical {
        Some(h) => h,
        None => return IndexValue::Absent(Absence::NoHistory),
    };
    let timescale = timescale.max(1);
    let required = min_history.max(timescale);
    if historical.len() < required {
        return IndexValue::Absent(Absence::InsufficientHistory {
            required,
            available: historical.len(),
        });
    }
    if current.is_empty() {
        return IndexValue::Absent(Absence::EmptySeries);
    }

    let rolling: Vec<f64> = historical
        .windows(timescale)
        .filter_map(mean)
        .collect();

    let tail = if current.len() >= timescale {
        &current[current.len() - timescale..]
    } else {
        current
    };

    let (current_rolling, reference_mean, reference_std) =
        match (mean(tail), mean(&rolling), population_std(&rolling)) {
            (Some(c), Some(m), Some(s)) => (c, m, s),
            _ => return IndexValue::Absent(Absence::EmptySeries),
        };

    if reference_std <= VARIANCE_EPSILON * (1.0 + reference_mean.abs()) {
        debug!("SPI-{}: reference rolling means have zero spread", timescale);
        return IndexValue::Absent(Absence::ZeroVariance);
    }

    IndexValue::Value((current_rolling - reference_mean) / reference_std)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use approx::assert_relative_eq;

    fn thresholds() -> DroughtThresholds {
        PipelineConfig::default().drought
    }

    #[test]
    fn test_classify_boundaries() {
        let t = thresholds();
        let cases = [
            (9.99, DroughtClass::ExtremeDrought),
            (10.0, DroughtClass::SevereDrought),
            (24.99, DroughtClass::SevereDrought),
            (25.0, DroughtClass::ModerateDrought),
            (49.99, DroughtClass::ModerateDrought),
            (50.0, DroughtClass::AbnormallyDry),
            (74.99, DroughtClass::AbnormallyDry),
            (75.0, DroughtClass::Normal),
            (100.0, DroughtClass::Normal),
        ];
        for (value, expected) in cases.iter() {
            assert_eq!(classify(*value, &t), *expected, "value {}", value);
        }
    }

    #[test]
    fn test_anomaly() {
        let current = [30.0, 50.0];
        assert_eq!(anomaly(&current, None), IndexValue::Absent(Absence::NoHistory));
        assert_eq!(
            anomaly(&current, Some(&[0.0, 0.0][..])),
            IndexValue::Absent(Absence::NonPositiveReference)
        );
        assert_relative_eq!(anomaly(&current, Some(&[50.0, 40.0, 60.0][..])).value().unwrap(), -20.0);
        assert!(anomaly(&current, Some(&[][..])).value().is_none());
        assert_eq!(anomaly(&[], Some(&[1.0][..])), IndexValue::Absent(Absence::EmptySeries));
    }

    #[test]
    fn test_spi_requires_history() {
        let current = [10.0, 20.0];
        let short: Vec<f64> = (0..29).map(|v| v as f64).collect();
        assert_eq!(spi(&current, None, 1, 30), IndexValue::Absent(Absence::NoHistory));
        assert_eq!(
            spi(&current, Some(short.as_slice()), 1, 30),
            IndexValue::Absent(Absence::InsufficientHistory { required: 30, available: 29 })
        );

        let thirty: Vec<f64> = (0..30).map(|v| v as f64).collect();
        assert!(spi(&current, Some(thirty.as_slice()), 6, 30).is_present());
        assert_eq!(
            spi(&current, Some(&thirty[..5]), 6, 1),
            IndexValue::Absent(Absence::InsufficientHistory { required: 6, available: 5 })
        );
    }

    #[test]
    fn test_spi_constant_history_is_null() {
        let constant = vec![0.1; 40];
        for k in SPI_TIMESCALES.iter() {
            assert_eq!(
                spi(&[5.0], Some(constant.as_slice()), *k, 30),
                IndexValue::Absent(Absence::ZeroVariance)
            );
        }
    }

    #[test]
    fn test_spi_value() {
        // History 0..39: 1-month rolling means are the values themselves
        let history: Vec<f64> = (0..40).map(|v| v as f64).collect();
        let reference_mean = 19.5;
        let reference_std = population_std(&history).unwrap();

        let got = spi(&[1.0, 2.0, 30.0], Some(history.as_slice()), 1, 30).value().unwrap();
        assert_relative_eq!(got, (30.0 - reference_mean) / reference_std, epsilon = 1e-12);

        // Current shorter than the timescale uses the whole current series
        let rolling3: Vec<f64> = history.windows(3).map(|w| w.iter().sum::<f64>() / 3.0).collect();
        let expected = (15.0 - mean(&rolling3).unwrap()) / population_std(&rolling3).unwrap();
        let got = spi(&[10.0, 20.0], Some(history.as_slice()), 3, 30).value().unwrap();
        assert_relative_eq!(got, expected, epsilon = 1e-12);
    }
}
