#![allow(dead_code)]

//! Byte-level builders for minimal but well-formed image headers.

use std::fs;
use std::path::{Path, PathBuf};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

pub fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, bytes).unwrap();
    path
}

pub fn approx(actual: Option<f64>, expected: f64) -> bool {
    actual.is_some_and(|v| (v - expected).abs() < 1e-6)
}

// PNG

pub fn png_chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut chunk = Vec::new();
    chunk.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    chunk.extend_from_slice(chunk_type);
    chunk.extend_from_slice(payload);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(payload);
    chunk.extend_from_slice(&hasher.finalize().to_be_bytes());
    chunk
}

pub fn png_ihdr(width: u32, height: u32, bit_depth: u8, color_type: u8) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&[bit_depth, color_type, 0, 0, 0]);
    png_chunk(b"IHDR", &payload)
}

pub fn png_phys(x_ppm: u32, y_ppm: u32, unit: u8) -> Vec<u8> {
    let mut payload = Vec::new();
    payload.extend_from_slice(&x_ppm.to_be_bytes());
    payload.extend_from_slice(&y_ppm.to_be_bytes());
    payload.push(unit);
    png_chunk(b"pHYs", &payload)
}

/// Signature, IHDR, the given ancillary chunks, a tiny IDAT and IEND.
pub fn png(width: u32, height: u32, bit_depth: u8, color_type: u8, extra: &[Vec<u8>]) -> Vec<u8> {
    let mut data = PNG_SIGNATURE.to_vec();
    data.extend(png_ihdr(width, height, bit_depth, color_type));
    for chunk in extra {
        data.extend_from_slice(chunk);
    }
    data.extend(png_chunk(b"IDAT", &[0x78, 0x9C, 0x03, 0x00]));
    data.extend(png_chunk(b"IEND", &[]));
    data
}

pub fn png_rgb(width: u32, height: u32) -> Vec<u8> {
    png(width, height, 8, 2, &[])
}

// JPEG

pub fn jpeg_segment(marker: u8, payload: &[u8]) -> Vec<u8> {
    let mut seg = vec![0xFF, marker];
    seg.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    seg.extend_from_slice(payload);
    seg
}

pub fn jfif_app0(unit: u8, x_density: u16, y_density: u16) -> Vec<u8> {
    let mut payload = b"JFIF\x00".to_vec();
    payload.extend_from_slice(&[1, 1, unit]);
    payload.extend_from_slice(&x_density.to_be_bytes());
    payload.extend_from_slice(&y_density.to_be_bytes());
    payload.extend_from_slice(&[0, 0]);
    jpeg_segment(0xE0, &payload)
}

pub fn exif_app1(tiff_block: &[u8]) -> Vec<u8> {
    let mut payload = b"Exif\x00\x00".to_vec();
    payload.extend_from_slice(tiff_block);
    jpeg_segment(0xE1, &payload)
}

pub fn sof(marker: u8, precision: u8, width: u16, height: u16, components: u8) -> Vec<u8> {
    let mut payload = vec![precision];
    payload.extend_from_slice(&height.to_be_bytes());
    payload.extend_from_slice(&width.to_be_bytes());
    payload.push(components);
    for id in 1..=components {
        payload.extend_from_slice(&[id, 0x11, 0]);
    }
    jpeg_segment(marker, &payload)
}

/// SOI, the given segments, a baseline frame, SOS and EOI.
pub fn jpeg(width: u16, height: u16, components: u8, segments: &[Vec<u8>]) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8];
    for seg in segments {
        data.extend_from_slice(seg);
    }
    data.extend(sof(0xC0, 8, width, height, components));
    data.extend(jpeg_segment(0xDA, &[1, 1, 0, 0, 63, 0]));
    data.extend_from_slice(&[0x12, 0x34, 0xFF, 0xD9]);
    data
}

// TIFF

pub const TAG_WIDTH: u16 = 256;
pub const TAG_LENGTH: u16 = 257;
pub const TAG_BITS: u16 = 258;
pub const TAG_COMPRESSION: u16 = 259;
pub const TAG_PHOTOMETRIC: u16 = 262;
pub const TAG_SAMPLES: u16 = 277;
pub const TAG_X_RES: u16 = 282;
pub const TAG_Y_RES: u16 = 283;
pub const TAG_RES_UNIT: u16 = 296;
pub const TAG_EXTRA_SAMPLES: u16 = 338;

#[derive(Debug, Clone)]
pub enum TiffValue {
    Short(u16),
    Shorts(Vec<u16>),
    Long(u32),
    Rational(u32, u32),
}

/// A single-IFD TIFF; entries must be given in ascending tag order.
pub fn tiff(big_endian: bool, entries: &[(u16, TiffValue)]) -> Vec<u8> {
    let u16b = |v: u16| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
    let u32b = |v: u32| if big_endian { v.to_be_bytes() } else { v.to_le_bytes() };

    let mut data = if big_endian {
        b"MM\x00*".to_vec()
    } else {
        b"II*\x00".to_vec()
    };
    data.extend_from_slice(&u32b(8));

    let ifd_len = 2 + entries.len() * 12 + 4;
    let mut extra: Vec<u8> = Vec::new();
    let extra_base = (8 + ifd_len) as u32;

    data.extend_from_slice(&u16b(entries.len() as u16));
    for (tag, value) in entries {
        data.extend_from_slice(&u16b(*tag));
        let mut field = [0u8; 4];
        let (field_type, count) = match value {
            TiffValue::Short(v) => {
                field[..2].copy_from_slice(&u16b(*v));
                (3u16, 1u32)
            }
            TiffValue::Shorts(vs) if vs.len() <= 2 => {
                for (i, v) in vs.iter().enumerate() {
                    field[i * 2..i * 2 + 2].copy_from_slice(&u16b(*v));
                }
                (3, vs.len() as u32)
            }
            TiffValue::Shorts(vs) => {
                field.copy_from_slice(&u32b(extra_base + extra.len() as u32));
                for v in vs {
                    extra.extend_from_slice(&u16b(*v));
                }
                (3, vs.len() as u32)
            }
            TiffValue::Long(v) => {
                field.copy_from_slice(&u32b(*v));
                (4, 1)
            }
            TiffValue::Rational(num, den) => {
                field.copy_from_slice(&u32b(extra_base + extra.len() as u32));
                extra.extend_from_slice(&u32b(*num));
                extra.extend_from_slice(&u32b(*den));
                (5, 1)
            }
        };
        data.extend_from_slice(&u16b(field_type));
        data.extend_from_slice(&u32b(count));
        data.extend_from_slice(&field);
    }
    data.extend_from_slice(&u32b(0));
    data.extend(extra);
    data
}

pub fn tiff_rgb(width: u32, height: u32, dpi: u32) -> Vec<u8> {
    tiff(
        false,
        &[
            (TAG_WIDTH, TiffValue::Long(width)),
            (TAG_LENGTH, TiffValue::Long(height)),
            (TAG_BITS, TiffValue::Shorts(vec![8, 8, 8])),
            (TAG_COMPRESSION, TiffValue::Short(5)),
            (TAG_PHOTOMETRIC, TiffValue::Short(2)),
            (TAG_SAMPLES, TiffValue::Short(3)),
            (TAG_X_RES, TiffValue::Rational(dpi, 1)),
            (TAG_Y_RES, TiffValue::Rational(dpi, 1)),
            (TAG_RES_UNIT, TiffValue::Short(2)),
        ],
    )
}

/// A minimal EXIF TIFF block carrying only XResolution and its unit.
pub fn exif_block(x_resolution: u32, unit: u16) -> Vec<u8> {
    tiff(
        false,
        &[
            (TAG_X_RES, TiffValue::Rational(x_resolution, 1)),
            (TAG_RES_UNIT, TiffValue::Short(unit)),
        ],
    )
}

// BMP

pub struct BmpSpec {
    pub dib_len: u32,
    pub width: i32,
    pub height: i32,
    pub bits: u16,
    pub compression: u32,
    pub x_ppm: i32,
    pub y_ppm: i32,
    pub alpha_mask: u32,
}

impl Default for BmpSpec {
    fn default() -> Self {
        Self {
            dib_len: 40,
            width: 4,
            height: 4,
            bits: 24,
            compression: 0,
            x_ppm: 0,
            y_ppm: 0,
            alpha_mask: 0,
        }
    }
}

pub fn bmp(spec: &BmpSpec) -> Vec<u8> {
    let mut dib = vec![0u8; spec.dib_len as usize];
    dib[0..4].copy_from_slice(&spec.dib_len.to_le_bytes());
    if spec.dib_len == 12 {
        dib[4..6].copy_from_slice(&(spec.width as u16).to_le_bytes());
        dib[6..8].copy_from_slice(&(spec.height as u16).to_le_bytes());
        dib[8..10].copy_from_slice(&1u16.to_le_bytes());
        dib[10..12].copy_from_slice(&spec.bits.to_le_bytes());
    } else {
        dib[4..8].copy_from_slice(&spec.width.to_le_bytes());
        dib[8..12].copy_from_slice(&spec.height.to_le_bytes());
        dib[12..14].copy_from_slice(&1u16.to_le_bytes());
        dib[14..16].copy_from_slice(&spec.bits.to_le_bytes());
        dib[16..20].copy_from_slice(&spec.compression.to_le_bytes());
        dib[24..28].copy_from_slice(&spec.x_ppm.to_le_bytes());
        dib[28..32].copy_from_slice(&spec.y_ppm.to_le_bytes());
        if spec.dib_len >= 56 {
            dib[52..56].copy_from_slice(&spec.alpha_mask.to_le_bytes());
        }
    }

    let pixel_offset = 14 + spec.dib_len;
    let pixels = vec![0u8; 64];
    let mut data = b"BM".to_vec();
    data.extend_from_slice(&(pixel_offset + pixels.len() as u32).to_le_bytes());
    data.extend_from_slice(&[0, 0, 0, 0]);
    data.extend_from_slice(&pixel_offset.to_le_bytes());
    data.extend(dib);
    data.extend(pixels);
    data
}

pub fn bmp_rgb(width: i32, height: i32) -> Vec<u8> {
    bmp(&BmpSpec {
        width,
        height,
        ..BmpSpec::default()
    })
}

// GIF

pub fn gif(width: u16, height: u16) -> Vec<u8> {
    let mut data = b"GIF89a".to_vec();
    data.extend_from_slice(&width.to_le_bytes());
    data.extend_from_slice(&height.to_le_bytes());
    data.extend_from_slice(&[0xF7, 0, 0]);
    data.push(0x3B);
    data
}

// PCX

pub fn pcx(width: u16, height: u16, bits: u8, planes: u8, dpi: (u16, u16)) -> Vec<u8> {
    let mut header = vec![0u8; 128];
    header[0] = 0x0A;
    header[1] = 5;
    header[2] = 1;
    header[3] = bits;
    header[8..10].copy_from_slice(&(width - 1).to_le_bytes());
    header[10..12].copy_from_slice(&(height - 1).to_le_bytes());
    header[12..14].copy_from_slice(&dpi.0.to_le_bytes());
    header[14..16].copy_from_slice(&dpi.1.to_le_bytes());
    header[65] = planes;
    header[66..68].copy_from_slice(&width.to_le_bytes());
    header[68] = 1;
    header.extend_from_slice(&[0xC1, 0x00]);
    header
}

/// Appends a 256-entry VGA palette; `grey` writes the identity ramp.
pub fn with_vga_palette(mut data: Vec<u8>, grey: bool) -> Vec<u8> {
    data.push(0x0C);
    for i in 0..=255u8 {
        if grey {
            data.extend_from_slice(&[i, i, i]);
        } else {
            data.extend_from_slice(&[i, 255 - i, i / 2]);
        }
    }
    data
}
