//! Human-readable color depth and compression labels.

use crate::types::{BitDepth, ImageFormat, PixelMode};

/// Label used when neither a compression tag nor a format hint exists.
pub const NOT_AVAILABLE: &str = "н/д";

const FALLBACK_BITS_PER_CHANNEL: u32 = 8;

static MODE_DEFAULT_BITS: &[(PixelMode, u32)] = &[
    (PixelMode::Bilevel, 1),
    (PixelMode::Grey, 8),
    (PixelMode::Palette, 8),
    (PixelMode::Rgb, 8),
    (PixelMode::Rgba, 8),
    (PixelMode::Cmyk, 8),
    (PixelMode::YCbCr, 8),
    (PixelMode::Lab, 8),
    (PixelMode::Hsv, 8),
    (PixelMode::Int32, 16),
    (PixelMode::Int16, 16),
    (PixelMode::Float32, 32),
];

static COMPRESSION_HINTS: &[(ImageFormat, &str)] = &[
    (ImageFormat::Jpeg, "JPEG (lossy)"),
    (ImageFormat::Png, "Deflate"),
    (ImageFormat::Gif, "LZW"),
    (ImageFormat::Bmp, "None/RLE"),
    (ImageFormat::Tiff, "Depends on tag"),
    (ImageFormat::Pcx, "RLE"),
];

pub fn default_bits(mode: PixelMode) -> u32 {
    MODE_DEFAULT_BITS
        .iter()
        .find(|(known, _)| *known == mode)
        .map_or(FALLBACK_BITS_PER_CHANNEL, |(_, bits)| *bits)
}

pub fn total_bits(mode: PixelMode, depth: BitDepth) -> u32 {
    match depth {
        BitDepth::PerChannel(bits) => u32::from(bits) * mode.bands(),
        BitDepth::PerPixel(bits) => u32::from(bits),
        BitDepth::ModeDefault => default_bits(mode) * mode.bands(),
    }
}

/// Formats `<total_bits> бит (<mode>)`.
pub fn color_depth_label(mode: PixelMode, depth: BitDepth) -> String {
    format!("{} бит ({})", total_bits(mode, depth), mode.name())
}

pub fn compression_hint(format: ImageFormat) -> Option<&'static str> {
    COMPRESSION_HINTS
        .iter()
        .find(|(known, _)| *known == format)
        .map(|(_, hint)| *hint)
}

/// Each level of the compression fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionSource<'a> {
    Tag(&'a str),
    Hint(&'static str),
    NotAvailable,
}

impl<'a> CompressionSource<'a> {
    pub fn select(tag: Option<&'a str>, format: Option<ImageFormat>) -> Self {
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            return CompressionSource::Tag(tag);
        }
        match format.and_then(compression_hint) {
            Some(hint) => CompressionSource::Hint(hint),
            None => CompressionSource::NotAvailable,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CompressionSource::Tag(tag) => tag,
            CompressionSource::Hint(hint) => hint,
            CompressionSource::NotAvailable => NOT_AVAILABLE,
        }
    }
}

pub fn compression_label(tag: Option<&str>, format: Option<ImageFormat>) -> String {
    CompressionSource::select(tag, format).label().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PixelMode::Rgb, BitDepth::PerChannel(8), "24 бит (RGB)")]
    #[case(PixelMode::Rgb, BitDepth::ModeDefault, "24 бит (RGB)")]
    #[case(PixelMode::Rgba, BitDepth::PerChannel(16), "64 бит (RGBA)")]
    #[case(PixelMode::Bilevel, BitDepth::ModeDefault, "1 бит (1)")]
    #[case(PixelMode::Palette, BitDepth::ModeDefault, "8 бит (P)")]
    #[case(PixelMode::Palette, BitDepth::PerPixel(4), "4 бит (P)")]
    #[case(PixelMode::Int16, BitDepth::ModeDefault, "16 бит (I;16)")]
    #[case(PixelMode::Float32, BitDepth::ModeDefault, "32 бит (F)")]
    #[case(PixelMode::GreyAlpha, BitDepth::ModeDefault, "16 бит (LA)")]
    #[case(PixelMode::Cmyk, BitDepth::ModeDefault, "32 бит (CMYK)")]
    #[case(PixelMode::Rgb, BitDepth::PerPixel(16), "16 бит (RGB)")]
    fn test_color_depth_label(
        #[case] mode: PixelMode,
        #[case] depth: BitDepth,
        #[case] expected: &str,
    ) {
        assert_eq!(color_depth_label(mode, depth), expected);
    }

    #[test]
    fn test_unlisted_mode_defaults_to_eight_bits() {
        assert_eq!(default_bits(PixelMode::GreyAlpha), 8);
    }

    #[test]
    fn test_compression_tag_wins() {
        assert_eq!(compression_label(Some("LZW"), Some(ImageFormat::Tiff)), "LZW");
    }

    #[test]
    fn test_compression_hint_fallback() {
        assert_eq!(compression_label(None, Some(ImageFormat::Png)), "Deflate");
        assert_eq!(compression_label(None, Some(ImageFormat::Jpeg)), "JPEG (lossy)");
        assert_eq!(compression_label(Some(""), Some(ImageFormat::Gif)), "LZW");
    }

    #[test]
    fn test_compression_not_available() {
        assert_eq!(compression_label(None, None), NOT_AVAILABLE);
        assert_eq!(
            CompressionSource::select(None, None),
            CompressionSource::NotAvailable
        );
    }

    #[test]
    fn test_every_format_has_a_hint() {
        for (_, format) in crate::types::SUPPORTED_EXTENSIONS {
            assert!(compression_hint(format).is_some(), "{format} has no hint");
        }
    }
}
