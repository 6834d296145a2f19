//! Partition keys

use std::fmt;

use crate::errors::{ClimateError, ClimateResult};

/// The `(year, month)` pair that selects an output partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartitionKey {
    pub year: i32,
    pub month: u32,
}

impl PartitionKey {
    pub fn new(year: i32, month: u32) -> ClimateResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(ClimateError::Generic(format!("Month out of range: {}", month)));
        }
        Ok(PartitionKey { year, month })
    }

    /// `year=YYYY/month=MM`
    pub fn hive_path(&self) -> String {
        format!("year={:04}/month={:02}", self.year, self.month)
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
