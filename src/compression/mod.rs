//! Decompression of raster chunks
//!
//! Each TIFF compression code maps to a handler strategy; the band
//! decoder asks the factory for one per image.

mod handler;
mod uncompressed;
mod deflate;
mod factory;
mod zstd;

pub use handler::CompressionHandler;
pub use uncompressed::UncompressedHandler;
pub use deflate::AdobeDeflateHandler;
pub use factory::CompressionFactory;
pub use zstd::ZstdHandler;
