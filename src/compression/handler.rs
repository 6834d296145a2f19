//! Compression handler trait definition

use crate::tiff::errors::TiffResult;

/// Strategy trait for decoding one compression method
pub trait CompressionHandler: Send + Sync {
    /// Decompresses one strip or tile.
    ///
    /// `expected_len` is the decoded size implied by the chunk geometry; it
    /// is used as a capacity hint and handlers never read past it.
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>>;

    /// Get the name of this compression method
    fn name(&self) -> &'static str;

    /// Get the compression code
    fn code(&self) -> u64;
}
