//! Core TIFF data structures

use crate::io::byte_order::ByteOrder;
use crate::tiff::ifd::IFD;
use std::fmt;

/// A parsed TIFF file: its IFD chain and header facts
#[derive(Debug)]
pub struct TIFF {
    /// Image File Directories in file order
    pub ifds: Vec<IFD>,
    /// Whether this is a BigTIFF
    pub is_big_tiff: bool,
    /// Byte order declared in the header
    pub byte_order: ByteOrder,
}

impl TIFF {
    pub fn new(is_big_tiff: bool, byte_order: ByteOrder) -> Self {
        TIFF {
            ifds: Vec::new(),
            is_big_tiff,
            byte_order,
        }
    }

    /// The full-resolution image: first IFD that is not an overview
    pub fn main_ifd(&self) -> Option<&IFD> {
        self.ifds.iter().find(|ifd| !ifd.is_overview()).or_else(|| self.ifds.first())
    }

    pub fn ifd_count(&self) -> usize {
        self.ifds.len()
    }

    /// Reduced-resolution overview IFDs (COG pyramids)
    pub fn overviews(&self) -> Vec<&IFD> {
        self.ifds.iter().filter(|ifd| ifd.is_overview()).collect()
    }
}

impl fmt::Display for TIFF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TIFF File:")?;
        writeln!(f, "  Format: {}", if self.is_big_tiff { "BigTIFF" } else { "TIFF" })?;
        writeln!(f, "  Byte order: {}", self.byte_order.name())?;
        writeln!(f, "  Number of IFDs: {} ({} overviews)", self.ifds.len(), self.overviews().len())?;
        if let Some(ifd) = self.main_ifd() {
            write!(f, "{}", ifd)?;
        }
        Ok(())
    }
}
