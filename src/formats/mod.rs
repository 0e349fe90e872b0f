//! Per-format header parsers and the signature registry that picks one.

pub mod bmp;
pub mod gif;
pub mod jpeg;
pub mod pcx;
pub mod png;
pub mod tiff;

use crate::error::SkipReason;
use crate::io::ByteSource;
use crate::resolution::ResolutionTag;
use crate::types::{BitDepth, ImageFormat, PixelMode};
use aho_corasick::AhoCorasick;
use std::sync::LazyLock;

pub use bmp::BmpParser;
pub use gif::GifParser;
pub use jpeg::JpegParser;
pub use pcx::PcxParser;
pub use png::PngParser;
pub use tiff::TiffParser;

/// Leading bytes inspected to identify a container.
pub const SNIFF_LEN: usize = 16;

/// Everything a parser pulls out of a header.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderInfo {
    pub width: u32,
    pub height: u32,
    pub mode: PixelMode,
    pub depth: BitDepth,
    /// Every resolution-like field found, in file order.
    pub resolution: Vec<ResolutionTag>,
    /// Compression named by the header itself, if it names one.
    pub compression: Option<String>,
}

impl HeaderInfo {
    pub fn new(width: u32, height: u32, mode: PixelMode, depth: BitDepth) -> Self {
        Self {
            width,
            height,
            mode,
            depth,
            resolution: Vec::new(),
            compression: None,
        }
    }
}

/// A container format the extractor can read headers of.
///
/// Implementations must be `Send + Sync` so a single static table can be
/// shared by parallel extraction.
pub trait FormatParser: Send + Sync {
    fn format(&self) -> ImageFormat;

    /// Magic byte prefixes; used to build the registry's matcher.
    fn signatures(&self) -> &'static [&'static [u8]];

    /// Whether `header` (the first [`SNIFF_LEN`] bytes or fewer) belongs to this format.
    fn detect(&self, header: &[u8]) -> bool {
        self.signatures().iter().any(|sig| header.starts_with(sig))
    }

    /// Reads dimensions and tags. Never reads pixel data.
    fn parse(&self, source: &mut dyn ByteSource) -> Result<HeaderInfo, SkipReason>;
}

/// Registration order doubles as detection precedence.
pub static PARSERS: [&dyn FormatParser; 6] = [
    &JpegParser,
    &PngParser,
    &GifParser,
    &TiffParser,
    &BmpParser,
    &PcxParser,
];

pub fn parser_for(format: ImageFormat) -> Option<&'static dyn FormatParser> {
    PARSERS.iter().copied().find(|p| p.format() == format)
}

pub fn registry() -> &'static FormatRegistry {
    static REGISTRY: LazyLock<FormatRegistry> = LazyLock::new(FormatRegistry::new);
    &REGISTRY
}

/// Matches all registered signatures against a sniff window in one pass.
pub struct FormatRegistry {
    pattern_matcher: Option<AhoCorasick>,
    /// Pattern index to index into [`PARSERS`].
    pattern_map: Vec<usize>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        let mut patterns: Vec<&'static [u8]> = Vec::new();
        let mut pattern_map = Vec::new();

        for (idx, parser) in PARSERS.iter().enumerate() {
            for &sig in parser.signatures() {
                patterns.push(sig);
                pattern_map.push(idx);
            }
        }

        Self {
            pattern_matcher: AhoCorasick::new(&patterns).ok(),
            pattern_map,
        }
    }

    /// Returns the first registered parser whose signature starts `header`
    /// and whose own check accepts it.
    pub fn detect(&self, header: &[u8]) -> Option<&'static dyn FormatParser> {
        let matcher = match &self.pattern_matcher {
            Some(m) => m,
            None => return self.detect_linear(header),
        };

        let mut best: Option<usize> = None;
        for mat in matcher.find_overlapping_iter(header) {
            if mat.start() != 0 {
                continue;
            }
            let idx = self.pattern_map[mat.pattern().as_usize()];
            if best.is_some_and(|b| b <= idx) {
                continue;
            }
            if PARSERS[idx].detect(header) {
                best = Some(idx);
            }
        }

        best.map(|idx| PARSERS[idx])
    }

    fn detect_linear(&self, header: &[u8]) -> Option<&'static dyn FormatParser> {
        PARSERS.iter().copied().find(|p| p.detect(header))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
pub(crate) fn be_u16(data: &[u8], at: usize) -> u16 {
    u16::from_be_bytes([data[at], data[at + 1]])
}

#[inline]
pub(crate) fn be_u32(data: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

#[inline]
pub(crate) fn le_u16(data: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([data[at], data[at + 1]])
}

#[inline]
pub(crate) fn le_u32(data: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}

#[inline]
pub(crate) fn le_i32(data: &[u8], at: usize) -> i32 {
    i32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
