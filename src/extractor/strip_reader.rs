//! Strip-based window reading
//!
//! Stripped TIFFs store full-width bands of `rows_per_strip` rows; only
//! the strips crossing the requested rows are read.

use log::debug;

use crate::coordinate::Region;
use crate::io::seekable::SeekableReader;
use crate::tiff::band::{BandLayout, ChunkLayout, RasterGrid};
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::validation;

use super::window_reader::{chunk_locations, read_chunk, WindowReader};

/// Reads windows from stripped images
pub struct StripReader<'a> {
    layout: &'a BandLayout,
    rows_per_strip: u32,
    offsets: Vec<u64>,
    byte_counts: Vec<u64>,
}

impl<'a> StripReader<'a> {
    pub fn new(ifd: &IFD, layout: &'a BandLayout) -> TiffResult<Self> {
        let rows_per_strip = match layout.chunks {
            ChunkLayout::Strips { rows_per_strip } => rows_per_strip,
            ChunkLayout::Tiles { .. } => {
                return Err(TiffError::UnsupportedLayout("Tiled image given to strip reader".to_string()))
            }
        };
        let (offsets, byte_counts) = chunk_locations(ifd, tags::STRIP_OFFSETS, tags::STRIP_BYTE_COUNTS)?;
        Ok(StripReader { layout, rows_per_strip, offsets, byte_counts })
    }
}

impl<'a> WindowReader for StripReader<'a> {
    fn read_window(&self, reader: &mut dyn SeekableReader, window: Region) -> TiffResult<RasterGrid> {
        let mut grid = RasterGrid::new(window);
        if window.is_empty() {
            return Ok(grid);
        }
        let file_size = validation::get_file_size(reader)?;

        let rps = self.rows_per_strip;
        let width = self.layout.width;
        let start_strip = window.y / rps;
        let end_strip = (window.end_y() + rps - 1) / rps;
        debug!("Reading strips {}..{} of {}", start_strip, end_strip, self.offsets.len());

        for strip in start_strip..end_strip {
            let idx = strip as usize;
            let (offset, byte_count) = match (self.offsets.get(idx), self.byte_counts.get(idx)) {
                (Some(o), Some(c)) => (*o, *c),
                _ => {
                    return Err(TiffError::CorruptData(format!(
                        "Strip {} missing, image has {}",
                        strip,
                        self.offsets.len()
                    )))
                }
            };
            if byte_count == 0 {
                debug!("Strip {} is sparse, leaving cells empty", strip);
                continue;
            }

            let strip_y = strip * rps;
            let rows = rps.min(self.layout.height - strip_y);
            let raw = read_chunk(reader, offset, byte_count, file_size)?;
            let values = self.layout.decode_chunk(&raw, width as usize, rows as usize)?;
            grid.copy_from_chunk(&values, &Region::new(0, strip_y, width, rows), width as usize);
        }

        Ok(grid)
    }

    fn name(&self) -> &'static str {
        "strips"
    }
}
