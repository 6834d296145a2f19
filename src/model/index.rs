//! Nullable index values with an explicit absence reason

use serde::{Serialize, Serializer};
use std::fmt;

/// Why an index could not be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Absence {
    /// No historical series was supplied
    NoHistory,
    /// The historical series is shorter than the index needs
    InsufficientHistory { required: usize, available: usize },
    /// The historical mean is zero or negative
    NonPositiveReference,
    /// The reference distribution has zero standard deviation
    ZeroVariance,
    /// The current series has no observations
    EmptySeries,
}

impl fmt::Display for Absence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Absence::NoHistory => write!(f, "no historical series"),
            Absence::InsufficientHistory { required, available } => {
                write!(f, "history has {} observations, {} required", available, required)
            }
            Absence::NonPositiveReference => write!(f, "historical mean is not positive"),
            Absence::ZeroVariance => write!(f, "zero standard deviation"),
            Absence::EmptySeries => write!(f, "empty current series"),
        }
    }
}

/// A derived index that is either a number or absent for a stated reason
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndexValue {
    Value(f64),
    Absent(Absence),
}

impl IndexValue {
    pub fn value(&self) -> Option<f64> {
        match self {
            IndexValue::Value(v) => Some(*v),
            IndexValue::Absent(_) => None,
        }
    }

    pub fn absence(&self) -> Option<Absence> {
        match self {
            IndexValue::Value(_) => None,
            IndexValue::Absent(reason) => Some(*reason),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, IndexValue::Value(_))
    }

    /// Rebuilds a value read back from storage, where only null survives
    pub fn from_stored(value: Option<f64>) -> Self {
        match value {
            Some(v) => IndexValue::Value(v),
            None => IndexValue::Absent(Absence::NoHistory),
        }
    }
}

impl fmt::Display for IndexValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexValue::Value(v) => write!(f, "{:.3}", v),
            IndexValue::Absent(reason) => write!(f, "null ({})", reason),
        }
    }
}

/// Serializes as the number or `null`
impl Serialize for IndexValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_accessors() {
        assert_eq!(IndexValue::Value(-1.5).value(), Some(-1.5));
        let absent = IndexValue::Absent(Absence::ZeroVariance);
        assert_eq!(absent.value(), None);
        assert_eq!(absent.absence(), Some(Absence::ZeroVariance));
    }

    #[test]
    fn test_serializes_as_nullable_number() {
        assert_eq!(serde_json::to_string(&IndexValue::Value(2.5)).unwrap(), "2.5");
        assert_eq!(serde_json::to_string(&IndexValue::Absent(Absence::NoHistory)).unwrap(), "null");
    }

    #[test]
    fn test_display_names_reason() {
        let v = IndexValue::Absent(Absence::InsufficientHistory { required: 30, available: 12 });
        assert_eq!(v.to_string(), "null (history has 12 observations, 30 required)");
    }
}
