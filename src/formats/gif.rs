use super::{FormatParser, HeaderInfo, le_u16};
use crate::error::SkipReason;
use crate::io::ByteSource;
use crate::types::{BitDepth, ImageFormat, PixelMode};

const GIF87A: &[u8] = b"GIF87a";
const GIF89A: &[u8] = b"GIF89a";

/// Signature plus the logical screen descriptor.
const HEADER_LEN: usize = 13;

pub struct GifParser;

impl FormatParser for GifParser {
    fn format(&self) -> ImageFormat {
        ImageFormat::Gif
    }

    fn signatures(&self) -> &'static [&'static [u8]] {
        &[GIF87A, GIF89A]
    }

    fn parse(&self, source: &mut dyn ByteSource) -> Result<HeaderInfo, SkipReason> {
        let mut header = [0u8; HEADER_LEN];
        source.read_exact_at(0, &mut header)?;
        if !self.detect(&header) {
            return Err(SkipReason::invalid("bad GIF signature"));
        }

        let width = u32::from(le_u16(&header, 6));
        let height = u32::from(le_u16(&header, 8));

        // Indexed colour, one band; the stored bit counts describe the palette only.
        Ok(HeaderInfo::new(
            width,
            height,
            PixelMode::Palette,
            BitDepth::ModeDefault,
        ))
    }
}
