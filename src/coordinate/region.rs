//! Pixel windows
//!
//! A `Region` is a rectangle of raster cells with (0,0) at the top-left
//! corner of the image. Decoders use it to select which strips or tiles
//! need to be read.

/// Rectangular window of raster cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Column of the left edge
    pub x: u32,
    /// Row of the top edge
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Region { x, y, width, height }
    }

    /// The whole image
    pub fn full(width: u32, height: u32) -> Self {
        Region::new(0, 0, width, height)
    }

    /// Column immediately right of the window (exclusive)
    pub fn end_x(&self) -> u32 {
        self.x + self.width
    }

    /// Row immediately below the window (exclusive)
    pub fn end_y(&self) -> u32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, col: u32, row: u32) -> bool {
        col >= self.x && col < self.end_x() && row >= self.y && row < self.end_y()
    }

    /// Overlap of two windows; empty when they are disjoint
    pub fn intersection(&self, other: &Region) -> Region {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let end_x = self.end_x().min(other.end_x());
        let end_y = self.end_y().min(other.end_y());
        Region::new(x, y, end_x.saturating_sub(x), end_y.saturating_sub(y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersection() {
        let a = Region::new(0, 0, 10, 10);
        let b = Region::new(5, 8, 10, 10);
        assert_eq!(a.intersection(&b), Region::new(5, 8, 5, 2));
        assert!(a.intersection(&Region::new(20, 20, 2, 2)).is_empty());
    }

    #[test]
    fn test_contains_is_half_open() {
        let r = Region::new(2, 3, 4, 1);
        assert!(r.contains(2, 3));
        assert!(r.contains(5, 3));
        assert!(!r.contains(6, 3));
        assert!(!r.contains(2, 4));
    }
}
