//! Tile-based window reading
//!
//! Tiled TIFFs store fixed-size rectangles padded at the right and bottom
//! edges; only tiles overlapping the window are read.

use log::debug;

use crate::coordinate::Region;
use crate::io::seekable::SeekableReader;
use crate::tiff::band::{BandLayout, ChunkLayout, RasterGrid};
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::validation;

use super::window_reader::{chunk_locations, read_chunk, WindowReader};

/// Reads windows from tiled images
pub struct TileReader<'a> {
    layout: &'a BandLayout,
    tile_width: u32,
    tile_height: u32,
    offsets: Vec<u64>,
    byte_counts: Vec<u64>,
}

impl<'a> TileReader<'a> {
    pub fn new(ifd: &IFD, layout: &'a BandLayout) -> TiffResult<Self> {
        let (tile_width, tile_height) = match layout.chunks {
            ChunkLayout::Tiles { tile_width, tile_height } => (tile_width, tile_height),
            ChunkLayout::Strips { .. } => {
                return Err(TiffError::UnsupportedLayout("Stripped image given to tile reader".to_string()))
            }
        };
        let (offsets, byte_counts) = chunk_locations(ifd, tags::TILE_OFFSETS, tags::TILE_BYTE_COUNTS)?;
        Ok(TileReader { layout, tile_width, tile_height, offsets, byte_counts })
    }

    fn tiles_across(&self) -> u32 {
        (self.layout.width + self.tile_width - 1) / self.tile_width
    }
}

impl<'a> WindowReader for TileReader<'a> {
    fn read_window(&self, reader: &mut dyn SeekableReader, window: Region) -> TiffResult<RasterGrid> {
        let mut grid = RasterGrid::new(window);
        if window.is_empty() {
            return Ok(grid);
        }
        let file_size = validation::get_file_size(reader)?;

        let (tw, th) = (self.tile_width, self.tile_height);
        let across = self.tiles_across();
        let first_col = window.x / tw;
        let last_col = (window.end_x() + tw - 1) / tw;
        let first_row = window.y / th;
        let last_row = (window.end_y() + th - 1) / th;
        debug!(
            "Reading tiles cols {}..{} rows {}..{} of {} tiles",
            first_col, last_col, first_row, last_row, self.offsets.len()
        );

        for tile_row in first_row..last_row {
            for tile_col in first_col..last_col {
                let idx = (tile_row * across + tile_col) as usize;
                let (offset, byte_count) = match (self.offsets.get(idx), self.byte_counts.get(idx)) {
                    (Some(o), Some(c)) => (*o, *c),
                    _ => {
                        return Err(TiffError::CorruptData(format!(
                            "Tile {} missing, image has {}",
                            idx,
                            self.offsets.len()
                        )))
                    }
                };
                if byte_count == 0 {
                    debug!("Tile {} is sparse, leaving cells empty", idx);
                    continue;
                }

                let raw = read_chunk(reader, offset, byte_count, file_size)?;
                let values = self.layout.decode_chunk(&raw, tw as usize, th as usize)?;
                let tile_region = Region::new(tile_col * tw, tile_row * th, tw, th);
                grid.copy_from_chunk(&values, &tile_region, tw as usize);
            }
        }

        Ok(grid)
    }

    fn name(&self) -> &'static str {
        "tiles"
    }
}
