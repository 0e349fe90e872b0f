use super::{FormatParser, HeaderInfo, le_i32, le_u16, le_u32};
use crate::error::SkipReason;
use crate::io::ByteSource;
use crate::resolution::{Density, ResolutionTag};
use crate::types::{BitDepth, ImageFormat, PixelMode};

const BMP_MAGIC: &[u8] = b"BM";

const FILE_HEADER_LEN: usize = 14;
/// Longest DIB header (BITMAPV5HEADER).
const MAX_DIB_LEN: usize = 124;
/// Bitfield masks that may follow a 40-byte header.
const TRAILING_MASKS_LEN: usize = 16;

const CORE_HEADER: u32 = 12;
const OS2_SHORT_HEADER: u32 = 16;
const OS2_HEADER: u32 = 64;
const INFO_HEADERS: [u32; 5] = [40, 52, 56, 108, 124];

const BI_ALPHABITFIELDS: u32 = 6;

/// Offset of the alpha mask relative to the start of the DIB header.
const ALPHA_MASK_AT: usize = 52;
const PPM_PER_DPI: f64 = 39.3701;

fn compression_name(code: u32, os2: bool) -> String {
    let name = match (code, os2) {
        (0, _) => "None",
        (1, _) => "RLE8",
        (2, _) => "RLE4",
        (3, true) => "Huffman 1D",
        (4, true) => "RLE24",
        (3, false) => "Bitfields",
        (4, false) => "JPEG",
        (5, false) => "PNG",
        (6, false) => "Alpha bitfields",
        (11, false) => "CMYK",
        (12, false) => "CMYK RLE8",
        (13, false) => "CMYK RLE4",
        (other, _) => return format!("Type {other}"),
    };
    name.to_string()
}

fn pixel_mode(bits: u16, has_alpha: bool) -> Result<PixelMode, SkipReason> {
    match bits {
        1 | 2 | 4 | 8 => Ok(PixelMode::Palette),
        16 | 24 => Ok(PixelMode::Rgb),
        32 if has_alpha => Ok(PixelMode::Rgba),
        32 => Ok(PixelMode::Rgb),
        other => Err(SkipReason::layout(format!("{other} bits per pixel"))),
    }
}

pub struct BmpParser;

impl FormatParser for BmpParser {
    fn format(&self) -> ImageFormat {
        ImageFormat::Bmp
    }

    fn signatures(&self) -> &'static [&'static [u8]] {
        &[BMP_MAGIC]
    }

    fn parse(&self, source: &mut dyn ByteSource) -> Result<HeaderInfo, SkipReason> {
        let mut file_header = [0u8; FILE_HEADER_LEN + 4];
        source.read_exact_at(0, &mut file_header)?;
        if !file_header.starts_with(BMP_MAGIC) {
            return Err(SkipReason::invalid("bad BMP signature"));
        }

        let dib_len = le_u32(&file_header, FILE_HEADER_LEN);
        let is_info = INFO_HEADERS.contains(&dib_len);
        if !(is_info || matches!(dib_len, CORE_HEADER | OS2_SHORT_HEADER | OS2_HEADER)) {
            return Err(SkipReason::layout(format!("DIB header of {dib_len} bytes")));
        }

        let dib_len = dib_len as usize;
        let mut dib = [0u8; MAX_DIB_LEN + TRAILING_MASKS_LEN];
        let read =
            source.read_up_to(FILE_HEADER_LEN as u64, &mut dib[..dib_len + TRAILING_MASKS_LEN])?;
        if read < dib_len {
            return Err(SkipReason::Truncated {
                offset: FILE_HEADER_LEN as u64,
                needed: dib_len,
                available: read,
            });
        }

        if dib_len == CORE_HEADER as usize {
            let width = u32::from(le_u16(&dib, 4));
            let height = u32::from(le_u16(&dib, 6));
            let bits = le_u16(&dib, 10);
            let mode = pixel_mode(bits, false)?;
            return Ok(HeaderInfo::new(width, height, mode, BitDepth::PerPixel(bits)));
        }

        let width = le_i32(&dib, 4);
        if width < 0 {
            return Err(SkipReason::invalid(format!("negative width {width}")));
        }
        // Negative height marks a top-down bitmap.
        let height = le_i32(&dib, 8).unsigned_abs();
        let bits = le_u16(&dib, 14);

        if dib_len == OS2_SHORT_HEADER as usize {
            let mode = pixel_mode(bits, false)?;
            return Ok(HeaderInfo::new(
                width as u32,
                height,
                mode,
                BitDepth::PerPixel(bits),
            ));
        }

        let compression = le_u32(&dib, 16);
        let os2 = dib_len == OS2_HEADER as usize;
        let alpha_mask_present = !os2
            && (dib_len > ALPHA_MASK_AT || compression == BI_ALPHABITFIELDS)
            && read >= ALPHA_MASK_AT + 4;
        let has_alpha = alpha_mask_present && le_u32(&dib, ALPHA_MASK_AT) != 0;
        let mode = pixel_mode(bits, has_alpha)?;

        let mut info = HeaderInfo::new(width as u32, height, mode, BitDepth::PerPixel(bits));

        let x_ppm = le_i32(&dib, 24);
        let y_ppm = le_i32(&dib, 28);
        info.resolution.push(ResolutionTag::Dpi(Density::Pair(
            f64::from(x_ppm) / PPM_PER_DPI,
            f64::from(y_ppm) / PPM_PER_DPI,
        )));
        info.compression = Some(compression_name(compression, os2));
        Ok(info)
    }
}
