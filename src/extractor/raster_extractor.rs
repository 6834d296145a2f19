//! Raster to point table extraction

use log::{debug, info, warn};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::RegionConfig;
use crate::coordinate::{BoundingBox, GeoTransform, Region};
use crate::errors::ClimateResult;
use crate::io::seekable::SeekableReader;
use crate::model::PrecipitationPoint;
use crate::tiff::band::{BandLayout, ChunkLayout};
use crate::tiff::constants::tags;
use crate::tiff::errors::TiffError;
use crate::tiff::ifd::IFD;
use crate::tiff::reader::TiffReader;
use crate::tiff::types::TIFF;
use crate::writer::PartitionKey;

use super::filename::parse_raster_name;
use super::window_reader::window_reader_for;

/// Header facts of an input raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterFile {
    pub location: PathBuf,
    pub partition: PartitionKey,
    pub width: u32,
    pub height: u32,
    pub transform: GeoTransform,
    pub bounds: BoundingBox,
    pub nodata: Option<f64>,
}

/// Points of one raster inside the region
#[derive(Debug, Clone)]
pub struct Extraction {
    pub raster: RasterFile,
    pub points: Vec<PrecipitationPoint>,
}

impl Extraction {
    /// No cell centre fell inside the region
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn invalid_count(&self) -> usize {
        self.points.iter().filter(|p| !p.is_valid()).count()
    }
}

/// Structural description of a raster, for the `inspect` command
#[derive(Debug, Clone)]
pub struct RasterInfo {
    pub location: PathBuf,
    pub format: &'static str,
    pub byte_order: &'static str,
    pub ifd_count: usize,
    pub width: u32,
    pub height: u32,
    pub sample_type: &'static str,
    pub layout: ChunkLayout,
    pub compression: &'static str,
    pub predictor: u64,
    pub transform: GeoTransform,
    pub bounds: BoundingBox,
    pub nodata: Option<f64>,
    /// Pixel window covering the configured region
    pub region_window: Option<Region>,
}

impl fmt::Display for RasterInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Raster: {}", self.location.display())?;
        writeln!(f, "  Format: {} ({}), {} IFD(s)", self.format, self.byte_order, self.ifd_count)?;
        writeln!(f, "  Dimensions: {}x{}", self.width, self.height)?;
        writeln!(f, "  Sample type: {}", self.sample_type)?;
        match self.layout {
            ChunkLayout::Strips { rows_per_strip } => writeln!(f, "  Layout: strips of {} rows", rows_per_strip)?,
            ChunkLayout::Tiles { tile_width, tile_height } => {
                writeln!(f, "  Layout: {}x{} tiles", tile_width, tile_height)?
            }
        }
        writeln!(f, "  Compression: {}, predictor {}", self.compression, self.predictor)?;
        let t = &self.transform;
        writeln!(f, "  Transform: x = {} + {}*col + {}*row, y = {} + {}*col + {}*row", t.c, t.a, t.b, t.f, t.d, t.e)?;
        writeln!(
            f,
            "  Bounds: lon {}..{}, lat {}..{}",
            self.bounds.min_x, self.bounds.max_x, self.bounds.min_y, self.bounds.max_y
        )?;
        match self.nodata {
            Some(v) => writeln!(f, "  NoData: {}", v)?,
            None => writeln!(f, "  NoData: none")?,
        }
        match self.region_window {
            Some(w) if !w.is_empty() => {
                writeln!(f, "  Region window: cols {}..{}, rows {}..{}", w.x, w.end_x(), w.y, w.end_y())
            }
            _ => writeln!(f, "  Region window: none (raster does not overlap region)"),
        }
    }
}

/// Largest region window decoded in one pass
const MAX_WINDOW_CELLS: u64 = 1 << 28;

/// Decodes rasters and keeps the cells inside one region
#[derive(Debug, Clone)]
pub struct RasterExtractor {
    region: RegionConfig,
}

impl RasterExtractor {
    pub fn new(region: &RegionConfig) -> Self {
        RasterExtractor { region: region.clone() }
    }

    pub fn region(&self) -> &RegionConfig {
        &self.region
    }

    /// Extracts the points of a raster file.
    ///
    /// The name is parsed first, so a malformed name fails before any
    /// decoding happens.
    pub fn extract(&self, path: &Path) -> ClimateResult<Extraction> {
        let name = path.to_string_lossy();
        let partition = parse_raster_name(&name)?;
        info!("Extracting {} ({})", path.display(), partition);

        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.extract_from(&mut reader, path, partition)
    }

    /// Extracts from an already opened source
    pub fn extract_from(
        &self,
        reader: &mut dyn SeekableReader,
        location: &Path,
        partition: PartitionKey,
    ) -> ClimateResult<Extraction> {
        let tiff = TiffReader::new().read(reader)?;
        let ifd = main_ifd(&tiff)?;
        let layout = BandLayout::from_ifd(ifd, tiff.byte_order)?;
        let transform = GeoTransform::from_ifd(ifd)?;
        let nodata = read_nodata(ifd);

        let raster = RasterFile {
            location: location.to_path_buf(),
            partition,
            width: layout.width,
            height: layout.height,
            transform,
            bounds: transform.bounds(layout.width, layout.height),
            nodata,
        };

        let bbox = self.region.bbox();
        let window = bbox
            .to_pixel_region(&transform, layout.width, layout.height)
            .ok_or_else(|| TiffError::CorruptData("Degenerate geotransform".to_string()))?;
        debug!("Region window: {:?}", window);
        if window.cell_count() as u64 > MAX_WINDOW_CELLS {
            return Err(TiffError::CorruptData(format!(
                "Region window of {}x{} cells is larger than {}",
                window.width, window.height, MAX_WINDOW_CELLS
            ))
            .into());
        }

        let window_reader = window_reader_for(ifd, &layout)?;
        let grid = window_reader.read_window(reader, window)?;
        debug!("Read {} cells using {}", grid.values.len(), window_reader.name());

        let mut points = Vec::new();
        for row in window.y..window.end_y() {
            for col in window.x..window.end_x() {
                let centre = transform.pixel_center(col, row);
                if !bbox.contains(&centre) {
                    continue;
                }
                let value = grid.get(col, row).unwrap_or(f64::NAN);
                points.push(PrecipitationPoint::from_cell(
                    partition.year,
                    partition.month,
                    centre.latitude(),
                    centre.longitude(),
                    value,
                    &self.region.code,
                ));
            }
        }

        let extraction = Extraction { raster, points };
        if extraction.is_empty() {
            warn!("No cells of {} fall inside region {}", location.display(), self.region.code);
        } else {
            info!(
                "Extracted {} points ({} invalid) from {}",
                extraction.points.len(),
                extraction.invalid_count(),
                location.display()
            );
        }
        Ok(extraction)
    }

    /// Describes a raster without reading its pixels
    pub fn inspect(&self, path: &Path) -> ClimateResult<RasterInfo> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.inspect_from(&mut reader, path)
    }

    pub fn inspect_from(&self, reader: &mut dyn SeekableReader, location: &Path) -> ClimateResult<RasterInfo> {
        let tiff = TiffReader::new().read(reader)?;
        let ifd = main_ifd(&tiff)?;
        let layout = BandLayout::from_ifd(ifd, tiff.byte_order)?;
        let transform = GeoTransform::from_ifd(ifd)?;

        Ok(RasterInfo {
            location: location.to_path_buf(),
            format: if tiff.is_big_tiff { "BigTIFF" } else { "TIFF" },
            byte_order: tiff.byte_order.name(),
            ifd_count: tiff.ifd_count(),
            width: layout.width,
            height: layout.height,
            sample_type: layout.sample.name(),
            layout: layout.chunks,
            compression: layout.compression_name(),
            predictor: layout.predictor,
            transform,
            bounds: transform.bounds(layout.width, layout.height),
            nodata: read_nodata(ifd),
            region_window: self.region.bbox().to_pixel_region(&transform, layout.width, layout.height),
        })
    }
}

fn main_ifd(tiff: &TIFF) -> Result<&IFD, TiffError> {
    tiff.main_ifd()
        .ok_or_else(|| TiffError::GenericError("File has no image".to_string()))
}

/// GDAL_NODATA is stored as ASCII text
fn read_nodata(ifd: &IFD) -> Option<f64> {
    let text = ifd.get_ascii(tags::GDAL_NODATA)?;
    match text.trim().parse::<f64>() {
        Ok(v) => {
            debug!("GDAL NoData value: {}", v);
            Some(v)
        }
        Err(_) => {
            warn!("Ignoring unparseable GDAL_NODATA '{}'", text);
            None
        }
    }
}
