//! Crate-level error type
//!
//! Decoder failures stay as [`TiffError`] inside the `tiff` module and are
//! wrapped here once they reach the pipeline.

use std::error::Error;
use std::fmt;
use std::io;

use crate::tiff::errors::TiffError;

/// Errors raised while extracting, enriching or writing a raster
#[derive(Debug)]
pub enum ClimateError {
    /// Filesystem or object store I/O
    Io(io::Error),
    /// The raster could not be decoded
    Raster(TiffError),
    /// The file name does not carry a year and month
    FilenameParse(String),
    /// Invalid or unreadable configuration
    Config(String),
    /// Malformed trigger notification
    Trigger(String),
    /// Columnar serialization or deserialization failure
    Parquet(String),
    Generic(String),
}

impl ClimateError {
    /// Whether the caller may retry the file unchanged.
    ///
    /// Storage and write failures are transient; bad input is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClimateError::Io(_) | ClimateError::Parquet(_))
    }
}

impl fmt::Display for ClimateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClimateError::Io(e) => write!(f, "I/O error: {}", e),
            ClimateError::Raster(e) => write!(f, "Raster decode error: {}", e),
            ClimateError::FilenameParse(name) => {
                write!(f, "Cannot parse year and month from file name: {}", name)
            }
            ClimateError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ClimateError::Trigger(msg) => write!(f, "Invalid trigger: {}", msg),
            ClimateError::Parquet(msg) => write!(f, "Parquet error: {}", msg),
            ClimateError::Generic(msg) => write!(f, "{}", msg),
        }
    }
}

impl Error for ClimateError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ClimateError::Io(e) => Some(e),
            ClimateError::Raster(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ClimateError {
    fn from(err: io::Error) -> Self {
        ClimateError::Io(err)
    }
}

impl From<TiffError> for ClimateError {
    fn from(err: TiffError) -> Self {
        ClimateError::Raster(err)
    }
}

impl From<parquet::errors::ParquetError> for ClimateError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        ClimateError::Parquet(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for ClimateError {
    fn from(err: arrow::error::ArrowError) -> Self {
        ClimateError::Parquet(err.to_string())
    }
}

impl From<serde_json::Error> for ClimateError {
    fn from(err: serde_json::Error) -> Self {
        ClimateError::Trigger(err.to_string())
    }
}

impl From<toml::de::Error> for ClimateError {
    fn from(err: toml::de::Error) -> Self {
        ClimateError::Config(err.to_string())
    }
}

impl From<String> for ClimateError {
    fn from(msg: String) -> Self {
        ClimateError::Generic(msg)
    }
}

/// Result type for pipeline operations
pub type ClimateResult<T> = Result<T, ClimateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let io_err = ClimateError::from(io::Error::new(io::ErrorKind::Other, "disk full"));
        assert!(io_err.is_retryable());
        assert!(ClimateError::Parquet("write failed".into()).is_retryable());
        assert!(!ClimateError::FilenameParse("bad_name.tif".into()).is_retryable());
        assert!(!ClimateError::from(TiffError::MissingGeoreference).is_retryable());
    }

    #[test]
    fn test_display() {
        let err = ClimateError::FilenameParse("bad_name.tif".into());
        assert_eq!(err.to_string(), "Cannot parse year and month from file name: bad_name.tif");
    }
}
