use super::{FormatParser, HeaderInfo, be_u32};
use crate::error::SkipReason;
use crate::io::ByteSource;
use crate::resolution::{Density, ResolutionTag};
use crate::types::{BitDepth, ImageFormat, PixelMode};

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const PNG_MAGIC: &[u8] = &PNG_SIGNATURE;

/// Signature, IHDR length/type, 13-byte payload and CRC.
const IHDR_BLOCK_LEN: usize = 33;
const IHDR_PAYLOAD_LEN: u32 = 13;
const CHUNK_HEADER_LEN: u64 = 8;
const CHUNK_CRC_LEN: u64 = 4;
const PHYS_PAYLOAD_LEN: u32 = 9;
const PHYS_UNIT_METRE: u8 = 1;
const INCHES_PER_METRE: f64 = 0.0254;
const MAX_CHUNKS: usize = 1024;

/// Maps IHDR (bit depth, colour type) to a pixel mode.
pub fn pixel_mode(bit_depth: u8, color_type: u8) -> Option<PixelMode> {
    let mode = match (bit_depth, color_type) {
        (1, 0) => PixelMode::Bilevel,
        (2 | 4 | 8, 0) => PixelMode::Grey,
        (16, 0) => PixelMode::Int16,
        (8 | 16, 2) => PixelMode::Rgb,
        (1 | 2 | 4 | 8, 3) => PixelMode::Palette,
        (8 | 16, 4) => PixelMode::GreyAlpha,
        (8 | 16, 6) => PixelMode::Rgba,
        _ => return None,
    };
    Some(mode)
}

pub struct PngParser;

impl FormatParser for PngParser {
    fn format(&self) -> ImageFormat {
        ImageFormat::Png
    }

    fn signatures(&self) -> &'static [&'static [u8]] {
        &[PNG_MAGIC]
    }

    fn parse(&self, source: &mut dyn ByteSource) -> Result<HeaderInfo, SkipReason> {
        let mut data = [0u8; IHDR_BLOCK_LEN];
        source.read_exact_at(0, &mut data)?;

        if data[..8] != PNG_SIGNATURE {
            return Err(SkipReason::invalid("bad PNG signature"));
        }
        if &data[12..16] != b"IHDR" || be_u32(&data, 8) != IHDR_PAYLOAD_LEN {
            return Err(SkipReason::invalid("first chunk is not IHDR"));
        }

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&data[12..29]);
        if hasher.finalize() != be_u32(&data, 29) {
            return Err(SkipReason::invalid("IHDR checksum mismatch"));
        }

        let width = be_u32(&data, 16);
        let height = be_u32(&data, 20);
        let bit_depth = data[24];
        let color_type = data[25];
        let mode = pixel_mode(bit_depth, color_type).ok_or_else(|| {
            SkipReason::layout(format!("bit depth {bit_depth}, colour type {color_type}"))
        })?;

        let mut info = HeaderInfo::new(
            width,
            height,
            mode,
            BitDepth::PerChannel(u16::from(bit_depth)),
        );

        let mut pos = IHDR_BLOCK_LEN as u64;
        for _ in 0..MAX_CHUNKS {
            let mut head = [0u8; CHUNK_HEADER_LEN as usize];
            if source.read_up_to(pos, &mut head)? < head.len() {
                break;
            }
            let length = be_u32(&head, 0);
            let chunk_type = &head[4..8];

            if chunk_type == b"IDAT" || chunk_type == b"IEND" {
                break;
            }
            if chunk_type == b"pHYs" && length == PHYS_PAYLOAD_LEN {
                let payload = source.read_vec_at(pos + CHUNK_HEADER_LEN, PHYS_PAYLOAD_LEN as usize)?;
                if payload[8] == PHYS_UNIT_METRE {
                    let x = f64::from(be_u32(&payload, 0)) * INCHES_PER_METRE;
                    let y = f64::from(be_u32(&payload, 4)) * INCHES_PER_METRE;
                    info.resolution.push(ResolutionTag::Dpi(Density::Pair(x, y)));
                }
            }

            pos += CHUNK_HEADER_LEN + u64::from(length) + CHUNK_CRC_LEN;
        }

        Ok(info)
    }
}
