//! Reversal of TIFF predictors
//!
//! Both functions work in place on one decompressed chunk laid out as
//! `rows` rows of `row_samples` samples each.

use byteorder::{BigEndian, ByteOrder as RawOrder, LittleEndian};

use crate::io::byte_order::ByteOrder;

/// Undoes horizontal differencing (predictor 2) for integer samples of
/// `sample_size` bytes stored in `order`
pub fn undo_horizontal(data: &mut [u8], row_samples: usize, sample_size: usize, order: ByteOrder) {
    match order {
        ByteOrder::LittleEndian => undo_horizontal_with::<LittleEndian>(data, row_samples, sample_size),
        ByteOrder::BigEndian => undo_horizontal_with::<BigEndian>(data, row_samples, sample_size),
    }
}

fn undo_horizontal_with<B: RawOrder>(data: &mut [u8], row_samples: usize, sample_size: usize) {
    let row_bytes = row_samples * sample_size;
    if row_bytes == 0 {
        return;
    }
    let mask = if sample_size >= 8 { u64::MAX } else { (1u64 << (8 * sample_size)) - 1 };

    for row in data.chunks_exact_mut(row_bytes) {
        let mut prev = B::read_uint(&row[..sample_size], sample_size);
        for i in 1..row_samples {
            let slot = &mut row[i * sample_size..(i + 1) * sample_size];
            let value = B::read_uint(slot, sample_size).wrapping_add(prev) & mask;
            B::write_uint(slot, value, sample_size);
            prev = value;
        }
    }
}

/// Undoes the floating point predictor (predictor 3).
///
/// Each row is stored as byte planes, most significant byte first, with
/// byte-wise differencing across the whole row. After this call every
/// sample is in big-endian order regardless of the file's byte order.
pub fn undo_floating_point(data: &mut [u8], row_samples: usize, sample_size: usize) {
    let row_bytes = row_samples * sample_size;
    if row_bytes == 0 {
        return;
    }
    let mut planes = vec![0u8; row_bytes];

    for row in data.chunks_exact_mut(row_bytes) {
        for i in 1..row_bytes {
            row[i] = row[i].wrapping_add(row[i - 1]);
        }
        planes.copy_from_slice(row);
        for i in 0..row_samples {
            for b in 0..sample_size {
                row[i * sample_size + b] = planes[b * row_samples + i];
            }
        }
    }
}
