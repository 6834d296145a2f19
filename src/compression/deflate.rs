//! Handler for Adobe Deflate compressed data

use std::io::Read;
use flate2::read::ZlibDecoder;
use log::warn;

use crate::tiff::errors::{TiffError, TiffResult};
use super::handler::CompressionHandler;

/// Adobe Deflate (zlib) handler, compression codes 8 and 32946
pub struct AdobeDeflateHandler {
    code: u64,
}

impl AdobeDeflateHandler {
    pub fn new(code: u64) -> Self {
        AdobeDeflateHandler { code }
    }
}

impl Default for AdobeDeflateHandler {
    fn default() -> Self {
        Self::new(8)
    }
}

impl CompressionHandler for AdobeDeflateHandler {
    fn decompress(&self, data: &[u8], expected_len: usize) -> TiffResult<Vec<u8>> {
        let mut decoder = ZlibDecoder::new(data).take(expected_len as u64);
        let mut decompressed = Vec::with_capacity(expected_len);
        decoder.read_to_end(&mut decompressed).map_err(|e| {
            warn!("Deflate decompression error: {}", e);
            TiffError::CorruptData(format!("Deflate stream: {}", e))
        })?;
        Ok(decompressed)
    }

    fn name(&self) -> &'static str {
        "Adobe Deflate"
    }

    fn code(&self) -> u64 {
        self.code
    }
}
