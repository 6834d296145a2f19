//! Affine pixel-to-geographic transform
//!
//! GeoTIFF stores georeferencing either as a full 4x4 model
//! transformation matrix or as a tiepoint plus pixel scale. Both reduce to
//! the six-coefficient affine used here:
//!
//! ```text
//! x = c + a * col + b * row
//! y = f + d * col + e * row
//! ```
//!
//! with `(col, row)` measured from the top-left corner of the image.

use log::debug;

use super::bbox::BoundingBox;
use super::point::Point;
use crate::tiff::constants::tags;
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::IFD;

/// Six-coefficient affine transform
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl GeoTransform {
    /// North-up transform from the top-left corner and positive cell sizes
    pub fn north_up(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        GeoTransform {
            a: pixel_width,
            b: 0.0,
            c: origin_x,
            d: 0.0,
            e: -pixel_height,
            f: origin_y,
        }
    }

    /// Reads the transform from GeoTIFF tags of an image
    pub fn from_ifd(ifd: &IFD) -> TiffResult<Self> {
        if let Some(m) = ifd.get_f64_values(tags::MODEL_TRANSFORMATION_TAG) {
            if m.len() < 16 {
                return Err(TiffError::CorruptData(format!(
                    "ModelTransformationTag has {} values, expected 16",
                    m.len()
                )));
            }
            debug!("Using ModelTransformationTag");
            return Ok(GeoTransform { a: m[0], b: m[1], c: m[3], d: m[4], e: m[5], f: m[7] });
        }

        let tiepoint = ifd.get_f64_values(tags::MODEL_TIEPOINT_TAG);
        let scale = ifd.get_f64_values(tags::MODEL_PIXEL_SCALE_TAG);
        match (tiepoint, scale) {
            (Some(tp), Some(sc)) if tp.len() >= 6 && sc.len() >= 2 => {
                // Tiepoint is (I, J, K, X, Y, Z): raster (I, J) maps to model (X, Y)
                let (i, j, x, y) = (tp[0], tp[1], tp[3], tp[4]);
                let (sx, sy) = (sc[0], sc[1]);
                debug!("Using tiepoint ({}, {}) -> ({}, {}) with scale ({}, {})", i, j, x, y, sx, sy);
                Ok(GeoTransform::north_up(x - i * sx, y + j * sy, sx, sy))
            }
            _ => Err(TiffError::MissingGeoreference),
        }
    }

    /// Geographic position of a fractional pixel coordinate
    pub fn apply(&self, col: f64, row: f64) -> Point {
        Point::new(
            self.c + self.a * col + self.b * row,
            self.f + self.d * col + self.e * row,
        )
    }

    /// Geographic position of the centre of a cell
    pub fn pixel_center(&self, col: u32, row: u32) -> Point {
        self.apply(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Fractional pixel coordinate of a geographic point; `None` for a
    /// degenerate transform
    pub fn to_pixel(&self, point: &Point) -> Option<(f64, f64)> {
        let det = self.a * self.e - self.b * self.d;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let dx = point.x - self.c;
        let dy = point.y - self.f;
        let col = (self.e * dx - self.b * dy) / det;
        let row = (self.a * dy - self.d * dx) / det;
        Some((col, row))
    }

    /// True when rows run along latitude and columns along longitude
    pub fn is_north_up(&self) -> bool {
        self.b == 0.0 && self.d == 0.0
    }

    /// Geographic extent of a `width` x `height` image
    pub fn bounds(&self, width: u32, height: u32) -> BoundingBox {
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(width as f64, 0.0),
            self.apply(0.0, height as f64),
            self.apply(width as f64, height as f64),
        ];
        let mut bbox = BoundingBox::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in corners.iter() {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        bbox
    }
}
