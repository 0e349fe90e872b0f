#![no_main]

use libfuzzer_sys::fuzz_target;
use rasterscan::extraction::extract_from;
use rasterscan::io::SliceSource;
use rasterscan::types::ImageFormat;
use std::path::Path;

// Wraps the input as an APP1 EXIF payload ahead of a valid frame header.
fuzz_target!(|data: &[u8]| {
    let Ok(seg_len) = u16::try_from(data.len() + 8) else {
        return;
    };
    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&seg_len.to_be_bytes());
    jpeg.extend_from_slice(b"Exif\x00\x00");
    jpeg.extend_from_slice(data);
    jpeg.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x0B, 8, 0, 1, 0, 1, 1, 1, 0x11, 0]);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);

    let mut source = SliceSource::new(&jpeg);
    let record = extract_from(&mut source, Path::new("fuzz.jpg"), Some(ImageFormat::Jpeg))
        .expect("frame header after EXIF must parse");
    if let (Some(x), Some(y)) = (record.dpi_x, record.dpi_y) {
        assert!(x.is_finite() && x == y);
    }
});
