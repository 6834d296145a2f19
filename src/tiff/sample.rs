//! Pixel sample types
//!
//! Maps the SampleFormat / BitsPerSample pair of an image to a concrete
//! sample type and converts raw sample bytes to `f64`.

use byteorder::{BigEndian, ByteOrder as RawOrder, LittleEndian};

use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::sample_format;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;

/// Numeric type of one pixel sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleType {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
    F32,
    F64,
}

impl SampleType {
    pub fn from_format(format: u64, bits: u64) -> TiffResult<Self> {
        let sample = match (format, bits) {
            (sample_format::UNSIGNED, 8) => SampleType::U8,
            (sample_format::UNSIGNED, 16) => SampleType::U16,
            (sample_format::UNSIGNED, 32) => SampleType::U32,
            (sample_format::SIGNED, 8) => SampleType::I8,
            (sample_format::SIGNED, 16) => SampleType::I16,
            (sample_format::SIGNED, 32) => SampleType::I32,
            (sample_format::IEEEFP, 32) => SampleType::F32,
            (sample_format::IEEEFP, 64) => SampleType::F64,
            _ => return Err(TiffError::UnsupportedSampleFormat { format, bits }),
        };
        Ok(sample)
    }

    pub fn from_ifd(ifd: &IFD) -> TiffResult<Self> {
        Self::from_format(ifd.sample_format(), ifd.bits_per_sample())
    }

    /// Size of one sample in bytes
    pub fn size(&self) -> usize {
        match self {
            SampleType::U8 | SampleType::I8 => 1,
            SampleType::U16 | SampleType::I16 => 2,
            SampleType::U32 | SampleType::I32 | SampleType::F32 => 4,
            SampleType::F64 => 8,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleType::F32 | SampleType::F64)
    }

    pub fn name(&self) -> &'static str {
        match self {
            SampleType::U8 => "uint8",
            SampleType::U16 => "uint16",
            SampleType::U32 => "uint32",
            SampleType::I8 => "int8",
            SampleType::I16 => "int16",
            SampleType::I32 => "int32",
            SampleType::F32 => "float32",
            SampleType::F64 => "float64",
        }
    }

    /// Converts every whole sample in `data` to `f64`
    pub fn decode(&self, data: &[u8], order: ByteOrder) -> Vec<f64> {
        match order {
            ByteOrder::LittleEndian => self.decode_with::<LittleEndian>(data),
            ByteOrder::BigEndian => self.decode_with::<BigEndian>(data),
        }
    }

    fn decode_with<B: RawOrder>(&self, data: &[u8]) -> Vec<f64> {
        let chunks = data.chunks_exact(self.size());
        match self {
            SampleType::U8 => chunks.map(|c| c[0] as f64).collect(),
            SampleType::I8 => chunks.map(|c| c[0] as i8 as f64).collect(),
            SampleType::U16 => chunks.map(|c| B::read_u16(c) as f64).collect(),
            SampleType::I16 => chunks.map(|c| B::read_i16(c) as f64).collect(),
            SampleType::U32 => chunks.map(|c| B::read_u32(c) as f64).collect(),
            SampleType::I32 => chunks.map(|c| B::read_i32(c) as f64).collect(),
            SampleType::F32 => chunks.map(|c| B::read_f32(c) as f64).collect(),
            SampleType::F64 => chunks.map(B::read_f64).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_format() {
        assert_eq!(SampleType::from_format(3, 32).unwrap(), SampleType::F32);
        assert_eq!(SampleType::from_format(2, 16).unwrap(), SampleType::I16);
        assert!(matches!(
            SampleType::from_format(3, 16),
            Err(TiffError::UnsupportedSampleFormat { format: 3, bits: 16 })
        ));
    }

    #[test]
    fn test_decode_respects_byte_order() {
        let le = [0x00, 0x00, 0x20, 0x41, 0x00, 0x00, 0x80, 0xBF];
        assert_eq!(SampleType::F32.decode(&le, ByteOrder::LittleEndian), vec![10.0, -1.0]);

        let be = [0xFF, 0xFE];
        assert_eq!(SampleType::I16.decode(&be, ByteOrder::BigEndian), vec![-2.0]);
        assert_eq!(SampleType::U16.decode(&be, ByteOrder::LittleEndian), vec![65279.0]);
    }
}
