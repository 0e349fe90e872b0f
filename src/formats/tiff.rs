//! TIFF header parsing: image file header plus the first IFD.
//!
//! The IFD reader is shared with the JPEG parser, which finds a TIFF
//! structure inside the EXIF APP1 segment.

use super::{FormatParser, HeaderInfo, be_u16, be_u32, le_u16, le_u32};
use crate::error::SkipReason;
use crate::io::{ByteSource, SliceSource};
use crate::resolution::{CM_PER_INCH, Density, ResolutionTag};
use crate::types::{BitDepth, ImageFormat, PixelMode};

pub const TIFF_LE_MAGIC: &[u8] = b"II*\x00";
pub const TIFF_BE_MAGIC: &[u8] = b"MM\x00*";

const HEADER_LEN: usize = 8;
const ENTRY_LEN: usize = 12;
const MAX_IFD_ENTRIES: u16 = 1024;

const TAG_IMAGE_WIDTH: u16 = 256;
const TAG_IMAGE_LENGTH: u16 = 257;
const TAG_BITS_PER_SAMPLE: u16 = 258;
const TAG_COMPRESSION: u16 = 259;
const TAG_PHOTOMETRIC: u16 = 262;
const TAG_SAMPLES_PER_PIXEL: u16 = 277;
const TAG_X_RESOLUTION: u16 = 282;
const TAG_Y_RESOLUTION: u16 = 283;
const TAG_RESOLUTION_UNIT: u16 = 296;
const TAG_EXTRA_SAMPLES: u16 = 338;
const TAG_SAMPLE_FORMAT: u16 = 339;

const TYPE_BYTE: u16 = 1;
const TYPE_SHORT: u16 = 3;
const TYPE_LONG: u16 = 4;
const TYPE_RATIONAL: u16 = 5;

const RESUNIT_NONE: u32 = 1;
const RESUNIT_INCH: u32 = 2;
const RESUNIT_CM: u32 = 3;

const SAMPLE_FORMAT_FLOAT: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ByteOrder {
    Little,
    Big,
}

impl ByteOrder {
    fn from_magic(header: &[u8]) -> Option<Self> {
        if header.starts_with(TIFF_LE_MAGIC) {
            Some(Self::Little)
        } else if header.starts_with(TIFF_BE_MAGIC) {
            Some(Self::Big)
        } else {
            None
        }
    }

    fn u16(self, data: &[u8], at: usize) -> u16 {
        match self {
            Self::Little => le_u16(data, at),
            Self::Big => be_u16(data, at),
        }
    }

    fn u32(self, data: &[u8], at: usize) -> u32 {
        match self {
            Self::Little => le_u32(data, at),
            Self::Big => be_u32(data, at),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct IfdEntry {
    tag: u16,
    field_type: u16,
    count: u32,
    /// Inline value, or the offset of the value when it does not fit.
    value: [u8; 4],
}

/// One image file directory, entries kept raw until asked for.
pub(crate) struct Ifd {
    order: ByteOrder,
    entries: Vec<IfdEntry>,
}

impl Ifd {
    pub(crate) fn read(
        source: &mut dyn ByteSource,
        order: ByteOrder,
        offset: u64,
    ) -> Result<Self, SkipReason> {
        let mut count_buf = [0u8; 2];
        source.read_exact_at(offset, &mut count_buf)?;
        let count = order.u16(&count_buf, 0);
        if count == 0 || count > MAX_IFD_ENTRIES {
            return Err(SkipReason::invalid(format!("IFD with {count} entries")));
        }

        let raw = source.read_vec_at(offset + 2, usize::from(count) * ENTRY_LEN)?;
        let entries = raw
            .chunks_exact(ENTRY_LEN)
            .map(|e| IfdEntry {
                tag: order.u16(e, 0),
                field_type: order.u16(e, 2),
                count: order.u32(e, 4),
                value: [e[8], e[9], e[10], e[11]],
            })
            .collect();

        Ok(Self { order, entries })
    }

    fn entry(&self, tag: u16) -> Option<&IfdEntry> {
        self.entries.iter().find(|e| e.tag == tag)
    }

    fn has(&self, tag: u16) -> bool {
        self.entry(tag).is_some()
    }

    /// First value of an integer field.
    pub(crate) fn unsigned(
        &self,
        source: &mut dyn ByteSource,
        tag: u16,
    ) -> Result<Option<u32>, SkipReason> {
        let Some(entry) = self.entry(tag) else {
            return Ok(None);
        };
        if entry.count == 0 {
            return Ok(None);
        }
        let order = self.order;
        let value = match entry.field_type {
            TYPE_BYTE => u32::from(entry.value[0]),
            TYPE_SHORT if entry.count <= 2 => u32::from(order.u16(&entry.value, 0)),
            TYPE_SHORT => {
                let offset = u64::from(order.u32(&entry.value, 0));
                u32::from(order.u16(&source.read_vec_at(offset, 2)?, 0))
            }
            TYPE_LONG if entry.count == 1 => order.u32(&entry.value, 0),
            TYPE_LONG => {
                let offset = u64::from(order.u32(&entry.value, 0));
                order.u32(&source.read_vec_at(offset, 4)?, 0)
            }
            _ => return Ok(None),
        };
        Ok(Some(value))
    }

    /// A RATIONAL field as a float; integer fields are accepted too.
    pub(crate) fn rational(
        &self,
        source: &mut dyn ByteSource,
        tag: u16,
    ) -> Result<Option<f64>, SkipReason> {
        let Some(entry) = self.entry(tag) else {
            return Ok(None);
        };
        match entry.field_type {
            TYPE_RATIONAL if entry.count > 0 => {
                let offset = u64::from(self.order.u32(&entry.value, 0));
                let raw = source.read_vec_at(offset, 8)?;
                let numerator = self.order.u32(&raw, 0);
                let denominator = self.order.u32(&raw, 4);
                if denominator == 0 {
                    return Ok(None);
                }
                Ok(Some(f64::from(numerator) / f64::from(denominator)))
            }
            TYPE_SHORT | TYPE_LONG => Ok(self.unsigned(source, tag)?.map(f64::from)),
            _ => Ok(None),
        }
    }
}

/// Reads the 8-byte image file header; returns byte order and first IFD offset.
pub(crate) fn read_header(source: &mut dyn ByteSource) -> Result<(ByteOrder, u64), SkipReason> {
    let mut header = [0u8; HEADER_LEN];
    source.read_exact_at(0, &mut header)?;
    let order =
        ByteOrder::from_magic(&header).ok_or_else(|| SkipReason::invalid("bad TIFF byte order"))?;
    Ok((order, u64::from(order.u32(&header, 4))))
}

/// XResolution of an EXIF block, broadcast to both axes. Units other than
/// inch and cm give a unitless `Resolution` tag.
///
/// EXIF is best effort: anything malformed simply yields no tag.
pub(crate) fn exif_resolution(tiff_block: &[u8]) -> Option<ResolutionTag> {
    let mut source = SliceSource::new(tiff_block);
    let (order, offset) = read_header(&mut source).ok()?;
    let ifd = Ifd::read(&mut source, order, offset).ok()?;
    let x = ifd.rational(&mut source, TAG_X_RESOLUTION).ok()??;
    let unit = ifd
        .unsigned(&mut source, TAG_RESOLUTION_UNIT)
        .ok()
        .flatten()
        .unwrap_or(RESUNIT_INCH);

    Some(match unit {
        RESUNIT_INCH => ResolutionTag::Dpi(Density::Scalar(x)),
        RESUNIT_CM => ResolutionTag::Dpi(Density::Scalar(x * CM_PER_INCH)),
        _ => ResolutionTag::Resolution(Density::Scalar(x)),
    })
}

fn resolution_tags(
    ifd: &Ifd,
    source: &mut dyn ByteSource,
) -> Result<Vec<ResolutionTag>, SkipReason> {
    let x = ifd.rational(source, TAG_X_RESOLUTION)?;
    let y = ifd.rational(source, TAG_Y_RESOLUTION)?;
    let (Some(x), Some(y)) = (x, y) else {
        return Ok(Vec::new());
    };

    let unit = ifd.unsigned(source, TAG_RESOLUTION_UNIT)?;
    let tag = match unit {
        None | Some(RESUNIT_INCH) => ResolutionTag::Dpi(Density::Pair(x, y)),
        Some(RESUNIT_CM) => ResolutionTag::Dpi(Density::Pair(x * CM_PER_INCH, y * CM_PER_INCH)),
        Some(RESUNIT_NONE) | Some(_) => ResolutionTag::Resolution(Density::Pair(x, y)),
    };
    Ok(vec![tag])
}

fn pixel_mode(
    photometric: Option<u32>,
    samples: u32,
    bits: u32,
    sample_format: Option<u32>,
    has_extra_samples: bool,
) -> Result<PixelMode, SkipReason> {
    let photometric = match photometric {
        Some(p) => p,
        None if samples >= 3 => 2,
        None => 1,
    };

    let mode = match photometric {
        0 | 1 => match (samples, bits) {
            (1, 1) => PixelMode::Bilevel,
            (2, _) => PixelMode::GreyAlpha,
            (1, 32) if sample_format == Some(SAMPLE_FORMAT_FLOAT) => PixelMode::Float32,
            (1, 32) => PixelMode::Int32,
            (1, 16) => PixelMode::Int16,
            (1, _) => PixelMode::Grey,
            _ => {
                return Err(SkipReason::layout(format!(
                    "greyscale with {samples} samples"
                )));
            }
        },
        2 if samples >= 4 && has_extra_samples => PixelMode::Rgba,
        2 if samples >= 3 => PixelMode::Rgb,
        3 => PixelMode::Palette,
        4 => PixelMode::Bilevel,
        5 if samples >= 4 => PixelMode::Cmyk,
        6 => PixelMode::YCbCr,
        8 => PixelMode::Lab,
        other => {
            return Err(SkipReason::layout(format!(
                "photometric {other} with {samples} samples"
            )));
        }
    };
    Ok(mode)
}

fn compression_name(code: u32) -> String {
    let name = match code {
        1 => "None",
        2 => "CCITT RLE",
        3 => "CCITT Group 3",
        4 => "CCITT Group 4",
        5 => "LZW",
        6 => "JPEG (old-style)",
        7 => "JPEG",
        8 | 32946 => "Deflate",
        32773 => "PackBits",
        34712 => "JPEG 2000",
        34925 => "LZMA",
        50000 => "Zstandard",
        50001 => "WebP",
        other => return format!("Tag {other}"),
    };
    name.to_string()
}

pub struct TiffParser;

impl FormatParser for TiffParser {
    fn format(&self) -> ImageFormat {
        ImageFormat::Tiff
    }

    fn signatures(&self) -> &'static [&'static [u8]] {
        &[TIFF_LE_MAGIC, TIFF_BE_MAGIC]
    }

    fn parse(&self, source: &mut dyn ByteSource) -> Result<HeaderInfo, SkipReason> {
        let (order, ifd_offset) = read_header(source)?;
        let ifd = Ifd::read(source, order, ifd_offset)?;

        let width = ifd
            .unsigned(source, TAG_IMAGE_WIDTH)?
            .ok_or_else(|| SkipReason::invalid("missing ImageWidth"))?;
        let height = ifd
            .unsigned(source, TAG_IMAGE_LENGTH)?
            .ok_or_else(|| SkipReason::invalid("missing ImageLength"))?;

        let bits = ifd.unsigned(source, TAG_BITS_PER_SAMPLE)?.unwrap_or(1);
        let samples = ifd.unsigned(source, TAG_SAMPLES_PER_PIXEL)?.unwrap_or(1);
        let photometric = ifd.unsigned(source, TAG_PHOTOMETRIC)?;
        let sample_format = ifd.unsigned(source, TAG_SAMPLE_FORMAT)?;
        let mode = pixel_mode(
            photometric,
            samples,
            bits,
            sample_format,
            ifd.has(TAG_EXTRA_SAMPLES),
        )?;

        let bits = u16::try_from(bits)
            .map_err(|_| SkipReason::invalid(format!("{bits} bits per sample")))?;

        let mut info = HeaderInfo::new(width, height, mode, BitDepth::PerChannel(bits));
        info.resolution = resolution_tags(&ifd, source)?;
        info.compression = ifd.unsigned(source, TAG_COMPRESSION)?.map(compression_name);
        Ok(info)
    }
}
