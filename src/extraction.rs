//! Turns one candidate file into an [`ImageRecord`] or a [`SkipReason`].

use crate::describe::{color_depth_label, compression_label};
use crate::error::SkipReason;
use crate::formats::{self, FormatParser, SNIFF_LEN};
use crate::io::{ByteSource, FileSource};
use crate::resolution::resolve_dpi;
use crate::types::{ImageFormat, ImageRecord};
use std::path::Path;

/// Opens, reads and closes `path` within this call.
pub fn extract(path: &Path) -> Result<ImageRecord, SkipReason> {
    let mut source = FileSource::open(path)?;
    extract_from(&mut source, path, ImageFormat::from_path(path))
}

/// Signature sniffing first; the extension-mapped parser only when no
/// signature matches.
pub fn select_parser(
    header: &[u8],
    hint: Option<ImageFormat>,
) -> Option<&'static dyn FormatParser> {
    formats::registry()
        .detect(header)
        .or_else(|| hint.and_then(formats::parser_for))
}

pub fn extract_from(
    source: &mut dyn ByteSource,
    path: &Path,
    hint: Option<ImageFormat>,
) -> Result<ImageRecord, SkipReason> {
    let mut sniff = [0u8; SNIFF_LEN];
    let n = source.read_up_to(0, &mut sniff)?;
    let parser = select_parser(&sniff[..n], hint).ok_or(SkipReason::UnrecognizedFormat)?;

    let header = parser.parse(source)?;
    if header.width == 0 || header.height == 0 {
        return Err(SkipReason::InvalidDimensions {
            width: header.width,
            height: header.height,
        });
    }

    let format = parser.format();
    let dpi = resolve_dpi(&header.resolution);

    Ok(ImageRecord {
        path: path.to_path_buf(),
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        format,
        width_px: header.width,
        height_px: header.height,
        dpi_x: dpi.map(|d| d.x),
        dpi_y: dpi.map(|d| d.y),
        color_depth: color_depth_label(header.mode, header.depth),
        compression: compression_label(header.compression.as_deref(), Some(format)),
    })
}
