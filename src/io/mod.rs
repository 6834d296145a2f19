//! I/O primitives shared by the raster reader
//!
//! Seekable reader abstraction and byte-order strategies.

pub mod seekable;
pub mod byte_order;
