//! Raster to point extraction
//!
//! Parses the partition key from a raster's name, decodes the pixel window
//! covering the configured region and emits one point per cell whose
//! centre lies inside it.

mod filename;
mod raster_extractor;
mod strip_reader;
mod tile_reader;
mod window_reader;


pub use filename::parse_raster_name;
pub use raster_extractor::{Extraction, RasterExtractor, RasterFile, RasterInfo};
pub use strip_reader::StripReader;
pub use tile_reader::TileReader;
pub use window_reader::{window_reader_for, WindowReader};
