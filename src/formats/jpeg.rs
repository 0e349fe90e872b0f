use super::{FormatParser, HeaderInfo, be_u16, tiff};
use crate::error::SkipReason;
use crate::io::ByteSource;
use crate::resolution::{Density, ResolutionTag, UNIT_PER_INCH};
use crate::types::{BitDepth, ImageFormat, PixelMode};

pub const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

const MARKER_EOI: u8 = 0xD9;
const MARKER_SOS: u8 = 0xDA;
const MARKER_APP0: u8 = 0xE0;
const MARKER_APP1: u8 = 0xE1;

const JFIF_ID: &[u8] = b"JFIF\x00";
const EXIF_ID: &[u8] = b"Exif\x00\x00";
/// Identifier, version, unit and both densities.
const JFIF_MIN_LEN: usize = 12;
const FRAME_HEADER_LEN: usize = 6;
const MAX_SEGMENTS: usize = 1024;

/// Start-of-frame markers; C4, C8 and CC share the range but are not frames.
#[inline]
pub fn is_frame_marker(marker: u8) -> bool {
    matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Markers without a length field.
#[inline]
pub fn is_standalone_marker(marker: u8) -> bool {
    matches!(marker, 0x01 | 0xD0..=0xD8)
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    precision: u8,
    height: u16,
    width: u16,
    components: u8,
}

#[derive(Debug, Clone, Copy)]
struct Jfif {
    unit: u8,
    x_density: u16,
    y_density: u16,
}

pub struct JpegParser;

impl FormatParser for JpegParser {
    fn format(&self) -> ImageFormat {
        ImageFormat::Jpeg
    }

    fn signatures(&self) -> &'static [&'static [u8]] {
        &[JPEG_SIGNATURE]
    }

    fn parse(&self, source: &mut dyn ByteSource) -> Result<HeaderInfo, SkipReason> {
        let mut soi = [0u8; 2];
        source.read_exact_at(0, &mut soi)?;
        if soi != JPEG_SOI {
            return Err(SkipReason::invalid("missing SOI marker"));
        }

        let mut pos = 2u64;
        let mut frame: Option<Frame> = None;
        let mut jfif: Option<Jfif> = None;
        let mut exif: Option<ResolutionTag> = None;

        for _ in 0..MAX_SEGMENTS {
            let mut head = [0u8; 4];
            let n = source.read_up_to(pos, &mut head)?;
            if n < 2 {
                break;
            }
            if head[0] != 0xFF {
                return Err(SkipReason::invalid(format!(
                    "expected marker at offset {pos}"
                )));
            }

            let marker = head[1];
            if marker == 0xFF {
                pos += 1;
                continue;
            }
            if is_standalone_marker(marker) {
                pos += 2;
                continue;
            }
            if marker == MARKER_SOS || marker == MARKER_EOI {
                break;
            }
            if n < 4 {
                return Err(SkipReason::Truncated {
                    offset: pos,
                    needed: 4,
                    available: n,
                });
            }

            let seg_len = usize::from(be_u16(&head, 2));
            if seg_len < 2 {
                return Err(SkipReason::invalid(format!(
                    "segment length {seg_len} at offset {pos}"
                )));
            }
            let payload_at = pos + 4;
            let payload_len = seg_len - 2;

            match marker {
                m if is_frame_marker(m) && frame.is_none() => {
                    let p = source.read_vec_at(payload_at, FRAME_HEADER_LEN)?;
                    frame = Some(Frame {
                        precision: p[0],
                        height: be_u16(&p, 1),
                        width: be_u16(&p, 3),
                        components: p[5],
                    });
                }
                MARKER_APP0 if payload_len >= JFIF_MIN_LEN && jfif.is_none() => {
                    let p = source.read_vec_at(payload_at, JFIF_MIN_LEN)?;
                    if p.starts_with(JFIF_ID) {
                        jfif = Some(Jfif {
                            unit: p[7],
                            x_density: be_u16(&p, 8),
                            y_density: be_u16(&p, 10),
                        });
                    }
                }
                MARKER_APP1 if payload_len > EXIF_ID.len() && exif.is_none() => {
                    let p = source.read_vec_at(payload_at, payload_len)?;
                    if p.starts_with(EXIF_ID) {
                        exif = tiff::exif_resolution(&p[EXIF_ID.len()..]);
                    }
                }
                _ => {}
            }

            pos = payload_at + payload_len as u64;
        }

        let frame = frame.ok_or_else(|| SkipReason::invalid("no frame header before scan data"))?;
        let mode = match frame.components {
            1 => PixelMode::Grey,
            3 => PixelMode::Rgb,
            4 => PixelMode::Cmyk,
            n => return Err(SkipReason::layout(format!("{n} JPEG components"))),
        };

        let mut info = HeaderInfo::new(
            u32::from(frame.width),
            u32::from(frame.height),
            mode,
            BitDepth::PerChannel(u16::from(frame.precision)),
        );

        if let Some(jfif) = jfif {
            let density = Density::Pair(f64::from(jfif.x_density), f64::from(jfif.y_density));
            if jfif.unit == UNIT_PER_INCH {
                info.resolution.push(ResolutionTag::Dpi(density));
            }
        }
        if let Some(tag) = exif {
            info.resolution.push(tag);
        }
        if let Some(jfif) = jfif {
            info.resolution.push(ResolutionTag::UnitDensity {
                density: Density::Pair(f64::from(jfif.x_density), f64::from(jfif.y_density)),
                unit: jfif.unit,
            });
        }

        Ok(info)
    }
}
