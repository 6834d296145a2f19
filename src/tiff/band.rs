//! Single-band chunk decoding
//!
//! `BandLayout` gathers everything needed to turn the raw bytes of one
//! strip or tile into sample values, and `RasterGrid` holds the decoded
//! cells of a pixel window.

use log::{debug, info};

use crate::compression::{CompressionFactory, CompressionHandler};
use crate::coordinate::Region;
use crate::io::byte_order::ByteOrder;
use crate::tiff::constants::{predictor, tags};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;
use crate::tiff::predictor::{undo_floating_point, undo_horizontal};
use crate::tiff::sample::SampleType;

/// Largest decoded strip or tile accepted before any buffer is reserved
pub const MAX_CHUNK_BYTES: u64 = 1 << 30;

/// How the chunks of an image are organised on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkLayout {
    Strips { rows_per_strip: u32 },
    Tiles { tile_width: u32, tile_height: u32 },
}

/// Decoding parameters of a single-band image
pub struct BandLayout {
    pub width: u32,
    pub height: u32,
    pub sample: SampleType,
    pub predictor: u64,
    pub byte_order: ByteOrder,
    pub chunks: ChunkLayout,
    compression: Box<dyn CompressionHandler>,
}

impl BandLayout {
    /// Validates that `ifd` describes a decodable single-band image
    pub fn from_ifd(ifd: &IFD, byte_order: ByteOrder) -> TiffResult<Self> {
        let (width, height) = ifd.get_dimensions().ok_or(TiffError::MissingDimensions)?;

        let samples = ifd.samples_per_pixel();
        if samples != 1 {
            return Err(TiffError::UnsupportedLayout(format!(
                "{} samples per pixel, only single-band rasters are supported",
                samples
            )));
        }

        let sample = SampleType::from_ifd(ifd)?;
        let predictor = ifd.predictor();
        match predictor {
            predictor::NONE => {}
            predictor::HORIZONTAL_DIFFERENCING if !sample.is_float() => {}
            predictor::FLOATING_POINT if sample.is_float() => {}
            other => return Err(TiffError::UnsupportedPredictor(other)),
        }

        let compression = CompressionFactory::create_handler(ifd.compression())?;

        let chunks = if ifd.is_tiled() {
            let tile_width = ifd.get_tag_value(tags::TILE_WIDTH).unwrap_or(0) as u32;
            let tile_height = ifd.get_tag_value(tags::TILE_LENGTH).unwrap_or(0) as u32;
            if tile_width == 0 || tile_height == 0 {
                return Err(TiffError::CorruptData("Zero tile dimension".to_string()));
            }
            ChunkLayout::Tiles { tile_width, tile_height }
        } else {
            let rows_per_strip = ifd
                .get_tag_value(tags::ROWS_PER_STRIP)
                .unwrap_or(height)
                .clamp(1, height.max(1)) as u32;
            ChunkLayout::Strips { rows_per_strip }
        };
        let (chunk_width, chunk_rows) = match chunks {
            ChunkLayout::Strips { rows_per_strip } => (width, rows_per_strip as u64),
            ChunkLayout::Tiles { tile_width, tile_height } => (tile_width as u64, tile_height as u64),
        };
        chunk_size(chunk_width, chunk_rows, sample.size())?;

        info!(
            "Band layout: {}x{} {} {:?}, compression {}, predictor {}",
            width, height, sample.name(), chunks, compression.name(), predictor
        );

        Ok(BandLayout {
            width: width as u32,
            height: height as u32,
            sample,
            predictor,
            byte_order,
            chunks,
            compression,
        })
    }

    pub fn compression_name(&self) -> &'static str {
        self.compression.name()
    }

    /// Decodes one chunk of `chunk_width` x `chunk_rows` samples
    pub fn decode_chunk(&self, raw: &[u8], chunk_width: usize, chunk_rows: usize) -> TiffResult<Vec<f64>> {
        let expected = chunk_size(chunk_width as u64, chunk_rows as u64, self.sample.size())?;
        let mut data = self.compression.decompress(raw, expected)?;
        if data.len() < expected {
            return Err(TiffError::CorruptData(format!(
                "Chunk decoded to {} bytes, expected {}",
                data.len(),
                expected
            )));
        }

        let order = match self.predictor {
            predictor::HORIZONTAL_DIFFERENCING => {
                undo_horizontal(&mut data, chunk_width, self.sample.size(), self.byte_order);
                self.byte_order
            }
            predictor::FLOATING_POINT => {
                undo_floating_point(&mut data, chunk_width, self.sample.size());
                ByteOrder::BigEndian
            }
            _ => self.byte_order,
        };

        debug!("Decoded chunk of {}x{} samples", chunk_width, chunk_rows);
        Ok(self.sample.decode(&data, order))
    }
}

/// Decoded byte length of a chunk, rejecting geometries above `MAX_CHUNK_BYTES`
fn chunk_size(width: u64, rows: u64, sample_size: usize) -> TiffResult<usize> {
    width
        .checked_mul(rows)
        .and_then(|cells| cells.checked_mul(sample_size as u64))
        .filter(|bytes| *bytes <= MAX_CHUNK_BYTES)
        .map(|bytes| bytes as usize)
        .ok_or_else(|| {
            TiffError::CorruptData(format!(
                "Chunk of {}x{} samples exceeds {} bytes",
                width, rows, MAX_CHUNK_BYTES
            ))
        })
}

/// Decoded cells of one pixel window, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct RasterGrid {
    pub window: Region,
    pub values: Vec<f64>,
}

impl RasterGrid {
    /// A window filled with NaN until chunks are copied in
    pub fn new(window: Region) -> Self {
        RasterGrid { window, values: vec![f64::NAN; window.cell_count()] }
    }

    /// Value at an absolute image position, if inside the window
    pub fn get(&self, col: u32, row: u32) -> Option<f64> {
        if !self.window.contains(col, row) {
            return None;
        }
        let idx = (row - self.window.y) as usize * self.window.width as usize + (col - self.window.x) as usize;
        self.values.get(idx).copied()
    }

    /// Copies the part of a decoded chunk that overlaps the window.
    ///
    /// `chunk` covers `chunk_region` and is `chunk_stride` samples wide.
    pub fn copy_from_chunk(&mut self, chunk: &[f64], chunk_region: &Region, chunk_stride: usize) {
        let overlap = self.window.intersection(chunk_region);
        if overlap.is_empty() {
            return;
        }
        let window_width = self.window.width as usize;
        for row in overlap.y..overlap.end_y() {
            let src_start = (row - chunk_region.y) as usize * chunk_stride + (overlap.x - chunk_region.x) as usize;
            let dst_start = (row - self.window.y) as usize * window_width + (overlap.x - self.window.x) as usize;
            let len = overlap.width as usize;
            if let Some(src) = chunk.get(src_start..src_start + len) {
                self.values[dst_start..dst_start + len].copy_from_slice(src);
            }
        }
    }
}
