//! Point structure for representing coordinates

/// A geographic point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Longitude (X)
    pub x: f64,
    /// Latitude (Y)
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn longitude(&self) -> f64 {
        self.x
    }

    pub fn latitude(&self) -> f64 {
        self.y
    }
}
