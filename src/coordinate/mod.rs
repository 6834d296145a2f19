//! Coordinate handling for geospatial rasters
//!
//! Geographic points and boxes, the affine pixel-to-geographic transform
//! read from GeoTIFF tags, and pixel windows.

mod bbox;
mod point;
mod region;
mod transform;

pub use self::bbox::BoundingBox;
pub use self::point::Point;
pub use self::region::Region;
pub use self::transform::GeoTransform;
