//! Year and month from raster file names
//!
//! Names follow `<prefix>_<year>.<month>.<ext>`, for example
//! `chirps-v2.0_2024.01.tif`.

use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

use crate::errors::{ClimateError, ClimateResult};
use crate::writer::PartitionKey;

lazy_static! {
    static ref RASTER_NAME: Regex =
        Regex::new(r"^(?P<prefix>.+)_(?P<year>\d{4})\.(?P<month>\d{1,2})\.(?P<ext>[A-Za-z0-9]+)$")
            .expect("raster name pattern is valid");
}

/// Parses the partition key from the last component of `name`
pub fn parse_raster_name(name: &str) -> ClimateResult<PartitionKey> {
    let file_name = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);

    let fail = || ClimateError::FilenameParse(file_name.to_string());
    let caps = RASTER_NAME.captures(file_name).ok_or_else(fail)?;

    let year: i32 = caps["year"].parse().map_err(|_| fail())?;
    let month: u32 = caps["month"].parse().map_err(|_| fail())?;
    PartitionKey::new(year, month).map_err(|_| fail())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_captures_every_part() {
        let caps = RASTER_NAME.captures("chirps-v2.0_2024.01.tif").unwrap();
        assert_eq!(&caps["prefix"], "chirps-v2.0");
        assert_eq!(&caps["ext"], "tif");
    }

    #[test]
    fn test_parses_chirps_name() {
        let key = parse_raster_name("chirps-v2.0_2024.01.tif").unwrap();
        assert_eq!((key.year, key.month), (2024, 1));
    }

    #[test]
    fn test_uses_last_path_component() {
        let key = parse_raster_name("raw/chirps/monthly/chirps-v2.0_1999.12.tif").unwrap();
        assert_eq!((key.year, key.month), (1999, 12));
    }

    #[test]
    fn test_single_digit_month() {
        assert_eq!(parse_raster_name("rain_2020.7.tif").unwrap().month, 7);
    }

    #[test]
    fn test_rejects_malformed_names() {
        for name in ["bad_name.tif", "chirps_2024.13.tif", "chirps_24.01.tif", "chirps-2024.01.tif", "2024.01.tif"] {
            match parse_raster_name(name) {
                Err(ClimateError::FilenameParse(n)) => assert_eq!(n, name),
                other => panic!("{} parsed as {:?}", name, other),
            }
        }
    }
}
