//! Bounding box structure for defining regions

use super::point::Point;
use super::region::Region;
use super::transform::GeoTransform;

/// A geographic bounding box, inclusive on every edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        BoundingBox { min_x, min_y, max_x, max_y }
    }

    /// Build from latitude and longitude ranges
    pub fn from_lat_lon(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        BoundingBox::new(lon_min, lat_min, lon_max, lat_max)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if this bounding box contains a point
    pub fn contains(&self, point: &Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x &&
            point.y >= self.min_y && point.y <= self.max_y
    }

    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x <= other.max_x && self.max_x >= other.min_x &&
            self.min_y <= other.max_y && self.max_y >= other.min_y
    }

    /// Pixel window holding every cell whose centre may fall in this box.
    ///
    /// The four corners are mapped back to pixel space and the window is
    /// padded by one cell before clamping to the image, so callers must
    /// still test each cell centre against the box.
    pub fn to_pixel_region(&self, transform: &GeoTransform, width: u32, height: u32) -> Option<Region> {
        let corners = [
            Point::new(self.min_x, self.min_y),
            Point::new(self.min_x, self.max_y),
            Point::new(self.max_x, self.min_y),
            Point::new(self.max_x, self.max_y),
        ];

        let mut col_min = f64::INFINITY;
        let mut col_max = f64::NEG_INFINITY;
        let mut row_min = f64::INFINITY;
        let mut row_max = f64::NEG_INFINITY;
        for corner in corners.iter() {
            let (col, row) = transform.to_pixel(corner)?;
            col_min = col_min.min(col);
            col_max = col_max.max(col);
            row_min = row_min.min(row);
            row_max = row_max.max(row);
        }

        let clamp = |v: f64, limit: u32| v.max(0.0).min(limit as f64) as u32;
        let x0 = clamp(col_min.floor() - 1.0, width);
        let x1 = clamp(col_max.ceil() + 1.0, width);
        let y0 = clamp(row_min.floor() - 1.0, height);
        let y1 = clamp(row_max.ceil() + 1.0, height);

        Some(Region::new(x0, y0, x1 - x0, y1 - y0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let bbox = BoundingBox::from_lat_lon(-35.0, -22.0, 16.0, 33.0);
        assert!(bbox.contains(&Point::new(16.0, -35.0)));
        assert!(bbox.contains(&Point::new(33.0, -22.0)));
        assert!(!bbox.contains(&Point::new(33.01, -22.0)));
        assert!(!bbox.contains(&Point::new(20.0, -21.99)));
    }

    #[test]
    fn test_to_pixel_region_is_clamped() {
        // 1 degree cells, top-left at (10, -20)
        let transform = GeoTransform::north_up(10.0, -20.0, 1.0, 1.0);
        let bbox = BoundingBox::from_lat_lon(-25.0, -22.0, 12.0, 14.0);
        let region = bbox.to_pixel_region(&transform, 100, 100).unwrap();

        assert_eq!(region, Region::new(1, 1, 4, 5));

        let outside = BoundingBox::from_lat_lon(40.0, 50.0, -80.0, -70.0);
        assert!(outside.to_pixel_region(&transform, 100, 100).unwrap().is_empty());
    }
}
