use serde::{Deserialize, Serialize};

/// Whether the raw cell value was a usable precipitation amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataQuality {
    Valid,
    Invalid,
}

impl DataQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataQuality::Valid => "VALID",
            DataQuality::Invalid => "INVALID",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "VALID" => Some(DataQuality::Valid),
            "INVALID" => Some(DataQuality::Invalid),
            _ => None,
        }
    }
}

/// One raster cell inside the region for one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrecipitationPoint {
    pub year: i32,
    pub month: u32,
    pub latitude: f64,
    pub longitude: f64,
    /// Never negative; 0.0 for invalid cells
    pub precipitation_mm: f64,
    pub region_code: String,
    pub data_quality: DataQuality,
}

impl PrecipitationPoint {
    /// Builds a point from a raw cell value.
    ///
    /// Negative and NaN values are flagged invalid and clamped to zero.
    pub fn from_cell(
        year: i32,
        month: u32,
        latitude: f64,
        longitude: f64,
        raw_value: f64,
        region_code: &str,
    ) -> Self {
        let (precipitation_mm, data_quality) = if raw_value >= 0.0 {
            (raw_value, DataQuality::Valid)
        } else {
            (0.0, DataQuality::Invalid)
        };
        PrecipitationPoint {
            year,
            month,
            latitude,
            longitude,
            precipitation_mm,
            region_code: region_code.to_string(),
            data_quality,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.data_quality == DataQuality::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_sentinel_is_clamped() {
        let p = PrecipitationPoint::from_cell(2024, 1, -30.0, 20.0, -9999.0, "SOUTHERN_AFRICA");
        assert_eq!(p.data_quality, DataQuality::Invalid);
        assert_eq!(p.precipitation_mm, 0.0);
    }

    #[test]
    fn test_zero_is_valid() {
        let p = PrecipitationPoint::from_cell(2024, 1, -30.0, 20.0, 0.0, "SOUTHERN_AFRICA");
        assert!(p.is_valid());
    }

    #[test]
    fn test_nan_is_invalid() {
        let p = PrecipitationPoint::from_cell(2024, 1, -30.0, 20.0, f64::NAN, "SOUTHERN_AFRICA");
        assert_eq!(p.data_quality, DataQuality::Invalid);
        assert_eq!(p.precipitation_mm, 0.0);
    }
}
