//! TIFF validation utilities
//!
//! Sanity checks applied while walking a possibly malformed file, so a
//! corrupt raster fails with a decode error instead of a huge allocation
//! or an endless IFD loop.

use log::{debug, error, warn};
use std::io::SeekFrom;

use crate::io::byte_order::ByteOrderHandler;
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::header;
use crate::tiff::errors::{TiffError, TiffResult};

/// Rejects IFD offsets that point into the header or past the end of the file
pub fn validate_ifd_offset(offset: u64, file_size: u64) -> TiffResult<()> {
    if offset >= file_size || offset < 8 {
        return Err(TiffError::GenericError(format!(
            "Invalid IFD offset: {} (file size: {})",
            offset, file_size
        )));
    }
    Ok(())
}

/// Total stream length, restoring the current position afterwards
pub fn get_file_size(reader: &mut dyn SeekableReader) -> TiffResult<u64> {
    let current_position = reader.stream_position()?;
    let file_size = match reader.seek(SeekFrom::End(0)) {
        Ok(size) => size,
        Err(e) => {
            warn!("Could not determine file size: {}", e);
            u64::MAX
        }
    };
    reader.seek(SeekFrom::Start(current_position))?;
    Ok(file_size)
}

/// Checks the two BigTIFF header fields that follow the version number
pub fn validate_bigtiff_header(
    reader: &mut dyn SeekableReader,
    handler: &dyn ByteOrderHandler,
) -> TiffResult<()> {
    let offset_size = handler.read_u16(reader)?;
    let zeros = handler.read_u16(reader)?;

    debug!("BigTIFF offset size: {}, reserved: {}", offset_size, zeros);

    if offset_size != header::BIGTIFF_OFFSET_SIZE || zeros != 0 {
        error!("Invalid BigTIFF header: offset_size={}, zeros={}", offset_size, zeros);
        return Err(TiffError::InvalidBigTIFFHeader);
    }
    Ok(())
}

/// Ensures a `[offset, offset + len)` byte range lies within the file
pub fn validate_data_range(offset: u64, len: u64, file_size: u64, what: &str) -> TiffResult<()> {
    match offset.checked_add(len) {
        Some(end) if end <= file_size => Ok(()),
        _ => Err(TiffError::CorruptData(format!(
            "{} at offset {} with {} bytes exceeds file size {}",
            what, offset, len, file_size
        ))),
    }
}
