//! TIFF file reader implementation
//!
//! Walks the header and IFD chain of a TIFF or BigTIFF file and resolves
//! every tag's values. Pixel data is left on disk; see
//! [`crate::tiff::band`] for decoding it.

use byteorder::ReadBytesExt;
use log::{debug, info, warn};
use std::fs::File;
use std::io::{BufReader, Cursor, SeekFrom};
use std::path::{Path, PathBuf};

use crate::io::byte_order::{ByteOrder, ByteOrderHandler};
use crate::io::seekable::SeekableReader;
use crate::tiff::constants::{field_types, header};
use crate::tiff::errors::{TiffError, TiffResult};
use crate::tiff::ifd::{IFDEntry, TagValue, IFD};
use crate::tiff::types::TIFF;
use crate::tiff::validation;

/// Upper bound on IFDs followed in one chain
const MAX_IFDS: usize = 100;

/// Reader for TIFF and BigTIFF structure
pub struct TiffReader {
    byte_order_handler: Option<Box<dyn ByteOrderHandler>>,
    current_file: Option<PathBuf>,
    is_big_tiff: bool,
}

impl Default for TiffReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TiffReader {
    pub fn new() -> Self {
        TiffReader {
            byte_order_handler: None,
            current_file: None,
            is_big_tiff: false,
        }
    }

    fn handler(&self) -> TiffResult<&dyn ByteOrderHandler> {
        self.byte_order_handler
            .as_deref()
            .ok_or_else(|| TiffError::GenericError("Byte order not yet determined".to_string()))
    }

    /// Loads the structure of the TIFF file at `path`
    pub fn load(&mut self, path: &Path) -> TiffResult<TIFF> {
        info!("Loading TIFF file: {}", path.display());
        self.current_file = Some(path.to_path_buf());

        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(1024 * 1024, file);
        self.read(&mut reader)
    }

    /// Reads the header and the IFD chain from any seekable source
    pub fn read(&mut self, reader: &mut dyn SeekableReader) -> TiffResult<TIFF> {
        reader.seek(SeekFrom::Start(0))?;
        let byte_order = ByteOrder::detect(reader)?;
        debug!("Detected byte order: {}", byte_order.name());
        self.byte_order_handler = Some(byte_order.create_handler());

        let handler = self.handler()?;
        let version = handler.read_u16(reader)?;
        let is_big_tiff = match version {
            header::BIG_TIFF_VERSION => {
                validation::validate_bigtiff_header(reader, handler)?;
                true
            }
            header::TIFF_VERSION => false,
            _ => return Err(TiffError::UnsupportedVersion(version)),
        };
        self.is_big_tiff = is_big_tiff;

        let first_ifd_offset = self.read_offset(reader)?;
        debug!("First IFD offset: {}", first_ifd_offset);

        let file_size = validation::get_file_size(reader)?;
        validation::validate_ifd_offset(first_ifd_offset, file_size)?;

        let mut tiff = TIFF::new(is_big_tiff, byte_order);
        tiff.ifds = self.read_ifd_chain(reader, first_ifd_offset, file_size)?;

        if tiff.ifds.is_empty() {
            return Err(TiffError::GenericError("No readable IFDs in file".to_string()));
        }

        info!("Read {} IFDs from {}", tiff.ifds.len(), if is_big_tiff { "BigTIFF" } else { "TIFF" });
        Ok(tiff)
    }

    /// Reads an offset-sized unsigned value (4 bytes, or 8 for BigTIFF)
    fn read_offset(&self, reader: &mut dyn SeekableReader) -> TiffResult<u64> {
        let handler = self.handler()?;
        if self.is_big_tiff {
            Ok(handler.read_u64(reader)?)
        } else {
            Ok(handler.read_u32(reader)? as u64)
        }
    }

    fn read_ifd_chain(
        &self,
        reader: &mut dyn SeekableReader,
        first_ifd_offset: u64,
        file_size: u64,
    ) -> TiffResult<Vec<IFD>> {
        let mut ifds = Vec::new();
        let mut ifd_offset = first_ifd_offset;

        while ifd_offset != 0 && ifds.len() < MAX_IFDS {
            if ifd_offset >= file_size {
                warn!("IFD offset {} exceeds file size {}, stopping IFD chain", ifd_offset, file_size);
                break;
            }

            let ifd = match self.read_ifd(reader, ifd_offset, ifds.len(), file_size) {
                Ok(ifd) => ifd,
                Err(e) if !ifds.is_empty() => {
                    warn!("Error reading IFD {}: {}", ifds.len(), e);
                    break;
                }
                Err(e) => return Err(e),
            };

            // read_ifd leaves the stream on the next-IFD offset field
            let next_ifd_offset = match self.read_offset(reader) {
                Ok(offset) => offset,
                Err(e) => {
                    warn!("Error reading next IFD offset: {}", e);
                    ifds.push(ifd);
                    break;
                }
            };

            ifds.push(ifd);

            if next_ifd_offset != 0 && (next_ifd_offset >= file_size || next_ifd_offset < 8) {
                warn!("Invalid next IFD offset: {}, stopping IFD chain", next_ifd_offset);
                break;
            }
            ifd_offset = next_ifd_offset;
        }

        Ok(ifds)
    }

    /// Reads one IFD and resolves all of its entries
    pub fn read_ifd(
        &self,
        reader: &mut dyn SeekableReader,
        offset: u64,
        number: usize,
        file_size: u64,
    ) -> TiffResult<IFD> {
        reader.seek(SeekFrom::Start(offset))?;

        let handler = self.handler()?;
        let entry_count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u16(reader)? as u64
        };
        debug!("IFD #{} at {}: {} entries", number, offset, entry_count);

        let entry_size = if self.is_big_tiff { 20 } else { 12 };
        validation::validate_data_range(offset, entry_count * entry_size, file_size, "IFD entries")?;

        let mut ifd = IFD::new(number, offset);
        for _ in 0..entry_count {
            let entry = self.read_ifd_entry(reader, file_size)?;
            ifd.add_entry(entry);
        }

        Ok(ifd)
    }

    /// Reads one entry and leaves the stream positioned at the next one
    fn read_ifd_entry(&self, reader: &mut dyn SeekableReader, file_size: u64) -> TiffResult<IFDEntry> {
        let handler = self.handler()?;

        let tag = handler.read_u16(reader)?;
        let field_type = handler.read_u16(reader)?;
        let count = if self.is_big_tiff {
            handler.read_u64(reader)?
        } else {
            handler.read_u32(reader)? as u64
        };

        let mut raw = vec![0u8; if self.is_big_tiff { 8 } else { 4 }];
        reader.read_exact(&mut raw)?;
        let next_entry = reader.stream_position()?;

        let value = if IFDEntry::fits_inline(field_type, count, self.is_big_tiff) {
            let mut inline = Cursor::new(raw);
            read_values(&mut inline, handler, field_type, count)?
        } else {
            let mut offset_cursor = Cursor::new(raw);
            let value_offset = self.read_offset(&mut offset_cursor)?;
            let byte_len = IFDEntry::field_type_size(field_type) as u64 * count;
            validation::validate_data_range(value_offset, byte_len, file_size, &format!("Tag {} values", tag))?;

            reader.seek(SeekFrom::Start(value_offset))?;
            let value = read_values(reader, handler, field_type, count)?;
            reader.seek(SeekFrom::Start(next_entry))?;
            value
        };

        Ok(IFDEntry::new(tag, field_type, count, value))
    }

    pub fn get_file_path(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn is_big_tiff(&self) -> bool {
        self.is_big_tiff
    }
}

/// Decodes `count` values of `field_type` from the current stream position
fn read_values(
    reader: &mut dyn SeekableReader,
    handler: &dyn ByteOrderHandler,
    field_type: u16,
    count: u64,
) -> TiffResult<TagValue> {
    let n = count as usize;
    let value = match field_type {
        field_types::ASCII => {
            let mut buffer = vec![0u8; n];
            reader.read_exact(&mut buffer)?;
            while buffer.last() == Some(&0) {
                buffer.pop();
            }
            let text = String::from_utf8(buffer)
                .map_err(|e| TiffError::GenericError(format!("Invalid UTF-8 string: {}", e)))?;
            TagValue::Ascii(text)
        }
        field_types::BYTE | field_types::UNDEFINED => {
            let mut buffer = vec![0u8; n];
            reader.read_exact(&mut buffer)?;
            TagValue::Unsigned(buffer.into_iter().map(u64::from).collect())
        }
        field_types::SHORT => TagValue::Unsigned(
            (0..n).map(|_| handler.read_u16(reader).map(u64::from)).collect::<Result<_, _>>()?,
        ),
        field_types::LONG => TagValue::Unsigned(
            (0..n).map(|_| handler.read_u32(reader).map(u64::from)).collect::<Result<_, _>>()?,
        ),
        field_types::LONG8 | field_types::IFD8 => {
            TagValue::Unsigned((0..n).map(|_| handler.read_u64(reader)).collect::<Result<_, _>>()?)
        }
        field_types::SBYTE => {
            TagValue::Signed((0..n).map(|_| reader.read_i8().map(i64::from)).collect::<Result<_, _>>()?)
        }
        field_types::SSHORT => TagValue::Signed(
            (0..n).map(|_| handler.read_i16(reader).map(i64::from)).collect::<Result<_, _>>()?,
        ),
        field_types::SLONG => TagValue::Signed(
            (0..n).map(|_| handler.read_i32(reader).map(i64::from)).collect::<Result<_, _>>()?,
        ),
        field_types::SLONG8 => {
            TagValue::Signed((0..n).map(|_| handler.read_i64(reader)).collect::<Result<_, _>>()?)
        }
        field_types::FLOAT => TagValue::Float(
            (0..n).map(|_| handler.read_f32(reader).map(f64::from)).collect::<Result<_, _>>()?,
        ),
        field_types::DOUBLE => {
            TagValue::Float((0..n).map(|_| handler.read_f64(reader)).collect::<Result<_, _>>()?)
        }
        field_types::RATIONAL => {
            let mut values = Vec::with_capacity(n);
            for _ in 0..n {
                let num = handler.read_u32(reader)? as f64;
                let den = handler.read_u32(reader)? as f64;
                values.push(if den == 0.0 { 0.0 } else { num / den });
            }
            TagValue::Float(values)
        }
        field_types::SRATIONAL => {
            let mut values = Vec::with_capacity(n);
            for _ in 0..n {
                let num = handler.read_i32(reader)? as f64;
                let den = handler.read_i32(reader)? as f64;
                values.push(if den == 0.0 { 0.0 } else { num / den });
            }
            TagValue::Float(values)
        }
        other => return Err(TiffError::UnsupportedFieldType(other)),
    };
    Ok(value)
}
