//! Image File Directory (IFD) structures
//!
//! An IFD is the metadata block describing one image in a TIFF file. The
//! reader resolves every entry's values eagerly, whether they were stored
//! inline in the entry or at an external offset, so the rest of the crate
//! never has to care about the TIFF storage rules.

use std::collections::HashMap;
use std::fmt;
use log::trace;

use crate::tiff::constants::{field_types, sample_format, tags};

/// Decoded values of one IFD entry
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// BYTE, SHORT, LONG, LONG8, IFD8 and UNDEFINED
    Unsigned(Vec<u64>),
    /// SBYTE, SSHORT, SLONG, SLONG8
    Signed(Vec<i64>),
    /// FLOAT, DOUBLE and (S)RATIONAL converted to their quotient
    Float(Vec<f64>),
    /// ASCII with trailing NULs removed
    Ascii(String),
}

impl TagValue {
    /// First value as an unsigned integer, if the tag is integral
    pub fn first_u64(&self) -> Option<u64> {
        match self {
            TagValue::Unsigned(v) => v.first().copied(),
            TagValue::Signed(v) => v.first().and_then(|x| u64::try_from(*x).ok()),
            _ => None,
        }
    }

    /// All values as unsigned integers, if the tag is integral
    pub fn as_u64_vec(&self) -> Option<Vec<u64>> {
        match self {
            TagValue::Unsigned(v) => Some(v.clone()),
            TagValue::Signed(v) => v.iter().map(|x| u64::try_from(*x).ok()).collect(),
            _ => None,
        }
    }

    /// All values as floats; integral tags are widened
    pub fn as_f64_vec(&self) -> Option<Vec<f64>> {
        match self {
            TagValue::Float(v) => Some(v.clone()),
            TagValue::Unsigned(v) => Some(v.iter().map(|x| *x as f64).collect()),
            TagValue::Signed(v) => Some(v.iter().map(|x| *x as f64).collect()),
            TagValue::Ascii(_) => None,
        }
    }

    pub fn as_ascii(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// One entry of an Image File Directory
#[derive(Debug, Clone)]
pub struct IFDEntry {
    /// TIFF tag identifier
    pub tag: u16,
    /// Field type code
    pub field_type: u16,
    /// Number of values
    pub count: u64,
    /// Resolved values
    pub value: TagValue,
}

impl IFDEntry {
    pub fn new(tag: u16, field_type: u16, count: u64, value: TagValue) -> Self {
        IFDEntry { tag, field_type, count, value }
    }

    /// Size in bytes of a single value of the given field type
    pub fn field_type_size(field_type: u16) -> usize {
        match field_type {
            field_types::BYTE | field_types::ASCII | field_types::SBYTE | field_types::UNDEFINED => 1,
            field_types::SHORT | field_types::SSHORT => 2,
            field_types::LONG | field_types::SLONG | field_types::FLOAT => 4,
            field_types::RATIONAL | field_types::SRATIONAL | field_types::DOUBLE => 8,
            field_types::LONG8 | field_types::SLONG8 | field_types::IFD8 => 8,
            _ => 1,
        }
    }

    /// Whether `count` values of `field_type` fit in the entry's value field
    pub fn fits_inline(field_type: u16, count: u64, is_big_tiff: bool) -> bool {
        let total = Self::field_type_size(field_type) as u64 * count;
        total <= if is_big_tiff { 8 } else { 4 }
    }
}

/// An Image File Directory
#[derive(Debug, Clone)]
pub struct IFD {
    /// Entries in file order
    pub entries: Vec<IFDEntry>,
    /// IFD number (0-based)
    pub number: usize,
    /// Offset of this IFD in the file
    pub offset: u64,
    /// Tag -> index into `entries`
    tag_map: HashMap<u16, usize>,
}

impl IFD {
    pub fn new(number: usize, offset: u64) -> Self {
        IFD {
            entries: Vec::new(),
            number,
            offset,
            tag_map: HashMap::new(),
        }
    }

    /// Adds an entry, replacing any earlier entry with the same tag
    pub fn add_entry(&mut self, entry: IFDEntry) {
        trace!("IFD #{}: adding tag {} ({} values)", self.number, entry.tag, entry.count);
        if let Some(&idx) = self.tag_map.get(&entry.tag) {
            self.entries[idx] = entry;
        } else {
            self.tag_map.insert(entry.tag, self.entries.len());
            self.entries.push(entry);
        }
    }

    pub fn has_tag(&self, tag: u16) -> bool {
        self.tag_map.contains_key(&tag)
    }

    pub fn get_entry(&self, tag: u16) -> Option<&IFDEntry> {
        self.tag_map.get(&tag).map(|&idx| &self.entries[idx])
    }

    /// First value of an integral tag
    pub fn get_tag_value(&self, tag: u16) -> Option<u64> {
        self.get_entry(tag).and_then(|e| e.value.first_u64())
    }

    pub fn get_u64_values(&self, tag: u16) -> Option<Vec<u64>> {
        self.get_entry(tag).and_then(|e| e.value.as_u64_vec())
    }

    pub fn get_f64_values(&self, tag: u16) -> Option<Vec<f64>> {
        self.get_entry(tag).and_then(|e| e.value.as_f64_vec())
    }

    pub fn get_ascii(&self, tag: u16) -> Option<&str> {
        self.get_entry(tag).and_then(|e| e.value.as_ascii())
    }

    /// Width and height of the image, if both tags are present
    pub fn get_dimensions(&self) -> Option<(u64, u64)> {
        let width = self.get_tag_value(tags::IMAGE_WIDTH)?;
        let height = self.get_tag_value(tags::IMAGE_LENGTH)?;
        Some((width, height))
    }

    pub fn samples_per_pixel(&self) -> u64 {
        self.get_tag_value(tags::SAMPLES_PER_PIXEL).unwrap_or(1)
    }

    pub fn bits_per_sample(&self) -> u64 {
        self.get_tag_value(tags::BITS_PER_SAMPLE).unwrap_or(1)
    }

    pub fn sample_format(&self) -> u64 {
        self.get_tag_value(tags::SAMPLE_FORMAT).unwrap_or(sample_format::UNSIGNED)
    }

    pub fn compression(&self) -> u64 {
        self.get_tag_value(tags::COMPRESSION).unwrap_or(1)
    }

    pub fn predictor(&self) -> u64 {
        self.get_tag_value(tags::PREDICTOR).unwrap_or(1)
    }

    pub fn is_tiled(&self) -> bool {
        self.has_tag(tags::TILE_WIDTH) && self.has_tag(tags::TILE_LENGTH)
    }

    /// Reduced-resolution overview IFDs carry bit 0 of NewSubfileType
    pub fn is_overview(&self) -> bool {
        self.get_tag_value(tags::NEW_SUBFILE_TYPE).map_or(false, |t| t & 1 == 1)
    }
}

impl fmt::Display for IFD {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "IFD #{} (offset: {})", self.number, self.offset)?;
        writeln!(f, "  Number of entries: {}", self.entries.len())?;
        if let Some((width, height)) = self.get_dimensions() {
            writeln!(f, "  Dimensions: {}x{}", width, height)?;
        }
        writeln!(f, "  Samples per pixel: {}", self.samples_per_pixel())?;
        writeln!(f, "  Bits per sample: {}", self.bits_per_sample())?;
        writeln!(f, "  Sample format: {}", self.sample_format())?;
        writeln!(f, "  Layout: {}", if self.is_tiled() { "tiled" } else { "stripped" })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_entry_replaces_duplicate_tag() {
        let mut ifd = IFD::new(0, 8);
        ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, field_types::LONG, 1, TagValue::Unsigned(vec![10])));
        ifd.add_entry(IFDEntry::new(tags::IMAGE_WIDTH, field_types::LONG, 1, TagValue::Unsigned(vec![20])));

        assert_eq!(ifd.entries.len(), 1);
        assert_eq!(ifd.get_tag_value(tags::IMAGE_WIDTH), Some(20));
    }

    #[test]
    fn test_defaults_for_missing_tags() {
        let ifd = IFD::new(0, 8);
        assert_eq!(ifd.samples_per_pixel(), 1);
        assert_eq!(ifd.compression(), 1);
        assert_eq!(ifd.predictor(), 1);
        assert_eq!(ifd.sample_format(), sample_format::UNSIGNED);
        assert!(!ifd.is_tiled());
        assert!(ifd.get_dimensions().is_none());
    }

    #[test]
    fn test_tag_value_conversions() {
        let signed = TagValue::Signed(vec![3, -1]);
        assert_eq!(signed.first_u64(), Some(3));
        assert_eq!(signed.as_u64_vec(), None);
        assert_eq!(signed.as_f64_vec(), Some(vec![3.0, -1.0]));

        let ascii = TagValue::Ascii("-9999".to_string());
        assert_eq!(ascii.as_ascii(), Some("-9999"));
        assert!(ascii.as_f64_vec().is_none());
    }

    #[test]
    fn test_fits_inline() {
        assert!(IFDEntry::fits_inline(field_types::SHORT, 2, false));
        assert!(!IFDEntry::fits_inline(field_types::DOUBLE, 1, false));
        assert!(IFDEntry::fits_inline(field_types::DOUBLE, 1, true));
        assert!(!IFDEntry::fits_inline(field_types::DOUBLE, 3, true));
    }
}
