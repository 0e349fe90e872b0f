use super::{FormatParser, HeaderInfo, le_u16};
use crate::error::SkipReason;
use crate::io::ByteSource;
use crate::resolution::{Density, ResolutionTag};
use crate::types::{BitDepth, ImageFormat, PixelMode};

const PCX_MANUFACTURER: u8 = 0x0A;
const PCX_MAGIC: &[u8] = &[PCX_MANUFACTURER];
const KNOWN_VERSIONS: [u8; 5] = [0, 2, 3, 4, 5];
const ENCODING_RLE: u8 = 1;

const HEADER_LEN: usize = 128;
/// Marker byte plus 256 RGB triples at the end of the file.
const VGA_PALETTE_LEN: u64 = 769;
const VGA_PALETTE_MARKER: u8 = 0x0C;

pub struct PcxParser;

impl PcxParser {
    /// An 8-bit single-plane image is greyscale unless a trailing VGA
    /// palette says otherwise.
    fn single_plane_mode(source: &mut dyn ByteSource) -> Result<PixelMode, SkipReason> {
        let size = source.size();
        if size < HEADER_LEN as u64 + VGA_PALETTE_LEN {
            return Ok(PixelMode::Grey);
        }

        let palette = source.read_vec_at(size - VGA_PALETTE_LEN, VGA_PALETTE_LEN as usize)?;
        if palette[0] != VGA_PALETTE_MARKER {
            return Ok(PixelMode::Grey);
        }

        let is_grey_ramp = palette[1..]
            .chunks_exact(3)
            .enumerate()
            .all(|(i, rgb)| rgb.iter().all(|&c| usize::from(c) == i));
        Ok(if is_grey_ramp {
            PixelMode::Grey
        } else {
            PixelMode::Palette
        })
    }
}

impl FormatParser for PcxParser {
    fn format(&self) -> ImageFormat {
        ImageFormat::Pcx
    }

    fn signatures(&self) -> &'static [&'static [u8]] {
        &[PCX_MAGIC]
    }

    /// A single manufacturer byte is weak evidence, so version and
    /// encoding must look right too.
    fn detect(&self, header: &[u8]) -> bool {
        header.len() >= 3
            && header[0] == PCX_MANUFACTURER
            && KNOWN_VERSIONS.contains(&header[1])
            && header[2] == ENCODING_RLE
    }

    fn parse(&self, source: &mut dyn ByteSource) -> Result<HeaderInfo, SkipReason> {
        let mut header = [0u8; HEADER_LEN];
        source.read_exact_at(0, &mut header)?;
        if header[0] != PCX_MANUFACTURER {
            return Err(SkipReason::invalid("bad PCX manufacturer byte"));
        }

        let bits = header[3];
        let (x_min, y_min) = (le_u16(&header, 4), le_u16(&header, 6));
        let (x_max, y_max) = (le_u16(&header, 8), le_u16(&header, 10));
        if x_max < x_min || y_max < y_min {
            return Err(SkipReason::invalid(format!(
                "window ({x_min},{y_min})-({x_max},{y_max})"
            )));
        }
        let width = u32::from(x_max - x_min) + 1;
        let height = u32::from(y_max - y_min) + 1;
        let planes = header[65];

        let (mode, depth) = match (bits, planes) {
            (1, 1) => (PixelMode::Bilevel, BitDepth::PerChannel(1)),
            (1, 2..=4) => (PixelMode::Palette, BitDepth::PerPixel(u16::from(planes))),
            (2 | 4, 1) => (PixelMode::Palette, BitDepth::PerPixel(u16::from(bits))),
            (8, 1) => (Self::single_plane_mode(source)?, BitDepth::PerChannel(8)),
            (8, 3) => (PixelMode::Rgb, BitDepth::PerChannel(8)),
            (8, 4) => (PixelMode::Rgba, BitDepth::PerChannel(8)),
            _ => {
                return Err(SkipReason::layout(format!(
                    "{bits} bits x {planes} planes"
                )));
            }
        };

        let mut info = HeaderInfo::new(width, height, mode, depth);
        // Always stated, even when the writer left it at zero.
        let (h_dpi, v_dpi) = (le_u16(&header, 12), le_u16(&header, 14));
        info.resolution.push(ResolutionTag::Dpi(Density::Pair(
            f64::from(h_dpi),
            f64::from(v_dpi),
        )));
        info.compression = match header[2] {
            ENCODING_RLE => Some("RLE".to_string()),
            0 => Some("None".to_string()),
            _ => None,
        };
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_requires_version_and_encoding() {
        assert!(PcxParser.detect(&[0x0A, 5, 1, 8]));
        assert!(PcxParser.detect(&[0x0A, 0, 1]));
        assert!(!PcxParser.detect(&[0x0A, 1, 1]));
        assert!(!PcxParser.detect(&[0x0A, 5, 2]));
        assert!(!PcxParser.detect(&[0x0A, 5]));
    }
}
