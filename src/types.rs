use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Hard cap on records produced by a single scan, whatever the caller asks for.
pub const MAX_FILES: usize = 100_000;

/// Dot-prefixed, lower-case extensions accepted by the walker.
pub const SUPPORTED_EXTENSIONS: [(&str, ImageFormat); 8] = [
    (".jpg", ImageFormat::Jpeg),
    (".jpeg", ImageFormat::Jpeg),
    (".png", ImageFormat::Png),
    (".bmp", ImageFormat::Bmp),
    (".gif", ImageFormat::Gif),
    (".tif", ImageFormat::Tiff),
    (".tiff", ImageFormat::Tiff),
    (".pcx", ImageFormat::Pcx),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageFormat {
    #[serde(rename = "JPEG")]
    Jpeg,
    #[serde(rename = "PNG")]
    Png,
    #[serde(rename = "BMP")]
    Bmp,
    #[serde(rename = "GIF")]
    Gif,
    #[serde(rename = "TIFF")]
    Tiff,
    #[serde(rename = "PCX")]
    Pcx,
}

impl ImageFormat {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Bmp => "BMP",
            Self::Gif => "GIF",
            Self::Tiff => "TIFF",
            Self::Pcx => "PCX",
        }
    }

    /// Maps an extension, with or without the leading dot, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext).to_ascii_lowercase();
        SUPPORTED_EXTENSIONS
            .iter()
            .find(|(known, _)| known[1..] == ext)
            .map(|(_, format)| *format)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Channel layout of the pixels a decoder would produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelMode {
    Bilevel,
    Grey,
    GreyAlpha,
    Palette,
    Rgb,
    Rgba,
    Cmyk,
    YCbCr,
    Lab,
    Hsv,
    Int32,
    Int16,
    Float32,
}

impl PixelMode {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Bilevel => "1",
            Self::Grey => "L",
            Self::GreyAlpha => "LA",
            Self::Palette => "P",
            Self::Rgb => "RGB",
            Self::Rgba => "RGBA",
            Self::Cmyk => "CMYK",
            Self::YCbCr => "YCbCr",
            Self::Lab => "LAB",
            Self::Hsv => "HSV",
            Self::Int32 => "I",
            Self::Int16 => "I;16",
            Self::Float32 => "F",
        }
    }

    /// Number of bands a decoded pixel has in this mode.
    #[must_use]
    pub const fn bands(&self) -> u32 {
        match self {
            Self::Bilevel | Self::Grey | Self::Palette => 1,
            Self::Int32 | Self::Int16 | Self::Float32 => 1,
            Self::GreyAlpha => 2,
            Self::Rgb | Self::YCbCr | Self::Lab | Self::Hsv => 3,
            Self::Rgba | Self::Cmyk => 4,
        }
    }
}

impl fmt::Display for PixelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where the bit count of a pixel comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// Header states bits per channel; multiplied by the band count.
    PerChannel(u16),
    /// Header states bits per pixel directly.
    PerPixel(u16),
    /// Header is silent; use the per-mode default table.
    ModeDefault,
}

/// One successfully parsed image file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
    #[serde(serialize_with = "serialize_path")]
    pub path: PathBuf,
    pub name: String,
    pub format: ImageFormat,
    pub width_px: u32,
    pub height_px: u32,
    pub dpi_x: Option<f64>,
    pub dpi_y: Option<f64>,
    pub color_depth: String,
    pub compression: String,
}

impl ImageRecord {
    pub fn has_dpi(&self) -> bool {
        self.dpi_x.is_some() && self.dpi_y.is_some()
    }
}

fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}
