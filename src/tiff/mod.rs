//! TIFF file format parsing module
//!
//! Reads TIFF and BigTIFF structure, resolves tag values and decodes the
//! samples of single-band rasters.

pub mod errors;
pub mod ifd;
pub(crate) mod types;
pub mod reader;
pub mod band;
pub mod sample;
pub(crate) mod predictor;
pub(crate) mod constants;
pub(crate) mod validation;
#[cfg(test)]
pub(crate) mod tests;

pub use crate::io::byte_order::{BigEndianHandler, ByteOrder, ByteOrderHandler, LittleEndianHandler};
pub use band::{BandLayout, ChunkLayout, RasterGrid};
pub use errors::{TiffError, TiffResult};
pub use ifd::{IFD, IFDEntry, TagValue};
pub use reader::TiffReader;
pub use sample::SampleType;
pub use types::TIFF;
