//! Seekable reader trait
//!
//! The TIFF reader jumps between the header, IFDs and pixel chunks, so it
//! needs a source that supports both reading and seeking. Files and
//! in-memory cursors both qualify.

use std::io::{Read, Seek};

/// Reader that can both read and seek
pub trait SeekableReader: Read + Seek + Send + Sync {}

impl<T: Read + Seek + Send + Sync> SeekableReader for T {}
