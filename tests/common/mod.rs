//! Shared helpers for integration tests: a minimal float32 GeoTIFF writer

#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use std::fs;
use std::path::{Path, PathBuf};

const SHORT: u16 = 3;
const LONG: u16 = 4;
const DOUBLE: u16 = 12;

/// Little-endian, single-strip, uncompressed float32 raster with a
/// north-up tiepoint/scale georeference and 1 degree pixels
pub fn float32_geotiff(width: u32, height: u32, origin_lon: f64, origin_lat: f64, values: &[f32]) -> Vec<u8> {
    assert_eq!(values.len(), (width * height) as usize);

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"II");
    out.write_u16::<LittleEndian>(42).unwrap();
    out.write_u32::<LittleEndian>(0).unwrap();

    let strip_offset = out.len() as u32;
    for v in values {
        out.write_f32::<LittleEndian>(*v).unwrap();
    }
    let strip_bytes = out.len() as u32 - strip_offset;

    let scale_offset = out.len() as u32;
    for v in [1.0, 1.0, 0.0] {
        out.write_f64::<LittleEndian>(v).unwrap();
    }
    let tiepoint_offset = out.len() as u32;
    for v in [0.0, 0.0, 0.0, origin_lon, origin_lat, 0.0] {
        out.write_f64::<LittleEndian>(v).unwrap();
    }

    // (tag, type, count, value or offset)
    let entries: [(u16, u16, u32, u32); 11] = [
        (256, LONG, 1, width),
        (257, LONG, 1, height),
        (258, SHORT, 1, 32),
        (259, SHORT, 1, 1),
        (273, LONG, 1, strip_offset),
        (277, SHORT, 1, 1),
        (278, LONG, 1, height),
        (279, LONG, 1, strip_bytes),
        (339, SHORT, 1, 3),
        (33550, DOUBLE, 3, scale_offset),
        (33922, DOUBLE, 6, tiepoint_offset),
    ];

    let ifd_offset = out.len() as u32;
    out.write_u16::<LittleEndian>(entries.len() as u16).unwrap();
    for (tag, field_type, count, value) in entries.iter() {
        out.write_u16::<LittleEndian>(*tag).unwrap();
        out.write_u16::<LittleEndian>(*field_type).unwrap();
        out.write_u32::<LittleEndian>(*count).unwrap();
        if *field_type == SHORT {
            out.write_u16::<LittleEndian>(*value as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
        } else {
            out.write_u32::<LittleEndian>(*value).unwrap();
        }
    }
    out.write_u32::<LittleEndian>(0).unwrap();

    out[4..8].copy_from_slice(&ifd_offset.to_le_bytes());
    out
}

/// A raster covering the southern Africa region from its north-west corner
pub fn regional_raster(width: u32, height: u32, values: &[f32]) -> Vec<u8> {
    float32_geotiff(width, height, 16.0, -22.0, values)
}

pub fn write_file(dir: &Path, relative: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}
