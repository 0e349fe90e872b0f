#![no_main]

use libfuzzer_sys::fuzz_target;
use rasterscan::extraction::extract_from;
use rasterscan::io::SliceSource;
use rasterscan::types::ImageFormat;
use std::path::Path;

const HINTS: [Option<ImageFormat>; 7] = [
    None,
    Some(ImageFormat::Jpeg),
    Some(ImageFormat::Png),
    Some(ImageFormat::Bmp),
    Some(ImageFormat::Gif),
    Some(ImageFormat::Tiff),
    Some(ImageFormat::Pcx),
];

fuzz_target!(|data: &[u8]| {
    let Some((&selector, body)) = data.split_first() else {
        return;
    };
    let hint = HINTS[usize::from(selector) % HINTS.len()];
    let mut source = SliceSource::new(body);
    if let Ok(record) = extract_from(&mut source, Path::new("fuzz.img"), hint) {
        assert!(record.width_px > 0 && record.height_px > 0);
    }
});
