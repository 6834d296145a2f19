//! Strategy for reading a pixel window from one image

use std::io::SeekFrom;

use crate::coordinate::Region;
use crate::io::seekable::SeekableReader;
use crate::tiff::band::{BandLayout, ChunkLayout, RasterGrid};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::validation;

use super::strip_reader::StripReader;
use super::tile_reader::TileReader;

/// Reads the cells of a window, touching only the chunks it overlaps
pub trait WindowReader {
    fn read_window(&self, reader: &mut dyn SeekableReader, window: Region) -> TiffResult<RasterGrid>;

    fn name(&self) -> &'static str;
}

/// Picks the strip or tile strategy for an image
pub fn window_reader_for<'a>(ifd: &IFD, layout: &'a BandLayout) -> TiffResult<Box<dyn WindowReader + 'a>> {
    match layout.chunks {
        ChunkLayout::Strips { .. } => Ok(Box::new(StripReader::new(ifd, layout)?)),
        ChunkLayout::Tiles { .. } => Ok(Box::new(TileReader::new(ifd, layout)?)),
    }
}

/// Chunk offsets and byte counts, which must be present and paired
pub(crate) fn chunk_locations(ifd: &IFD, offsets_tag: u16, counts_tag: u16) -> TiffResult<(Vec<u64>, Vec<u64>)> {
    let offsets = ifd.get_u64_values(offsets_tag).ok_or(TiffError::TagNotFound(offsets_tag))?;
    let counts = ifd.get_u64_values(counts_tag).ok_or(TiffError::TagNotFound(counts_tag))?;
    if offsets.len() != counts.len() {
        return Err(TiffError::CorruptData(format!(
            "{} chunk offsets but {} byte counts",
            offsets.len(),
            counts.len()
        )));
    }
    Ok((offsets, counts))
}

/// Reads the raw bytes of one chunk, which must lie inside the stream
pub(crate) fn read_chunk(
    reader: &mut dyn SeekableReader,
    offset: u64,
    byte_count: u64,
    file_size: u64,
) -> TiffResult<Vec<u8>> {
    validation::validate_data_range(offset, byte_count, file_size, "Chunk")?;
    reader.seek(SeekFrom::Start(offset))?;
    let mut raw = vec![0u8; byte_count as usize];
    reader.read_exact(&mut raw)?;
    Ok(raw)
}
