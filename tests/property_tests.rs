mod common;

use common::*;
use proptest::prelude::*;
use rasterscan::extraction::extract_from;
use rasterscan::io::SliceSource;
use rasterscan::resolution::{Density, ResolutionTag, resolve_dpi};
use rasterscan::{ImageFormat, MAX_FILES, ScanOptions};
use std::path::Path;

fn any_hint() -> impl Strategy<Value = Option<ImageFormat>> {
    prop_oneof![
        Just(None),
        Just(Some(ImageFormat::Jpeg)),
        Just(Some(ImageFormat::Png)),
        Just(Some(ImageFormat::Bmp)),
        Just(Some(ImageFormat::Gif)),
        Just(Some(ImageFormat::Tiff)),
        Just(Some(ImageFormat::Pcx)),
    ]
}

fn any_tag() -> impl Strategy<Value = ResolutionTag> {
    let density = (-10.0f64..1000.0, -10.0f64..1000.0).prop_map(|(x, y)| Density::Pair(x, y));
    prop_oneof![
        density.clone().prop_map(ResolutionTag::Dpi),
        (density.clone(), 0u8..4)
            .prop_map(|(density, unit)| ResolutionTag::UnitDensity { density, unit }),
        density.prop_map(ResolutionTag::Resolution),
    ]
}

proptest! {
    #[test]
    fn prop_extraction_never_panics(data in prop::collection::vec(any::<u8>(), 0..512), hint in any_hint()) {
        let mut source = SliceSource::new(&data);
        if let Ok(record) = extract_from(&mut source, Path::new("fuzz.bin"), hint) {
            prop_assert!(record.width_px > 0);
            prop_assert!(record.height_px > 0);
            prop_assert_eq!(record.dpi_x.is_some(), record.dpi_y.is_some());
        }
    }

    #[test]
    fn prop_signature_prefix_survives_garbage_tail(
        width in 1u32..100_000,
        height in 1u32..100_000,
        tail in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let mut data = png_rgb(width, height);
        data.truncate(33);
        data.extend(tail);
        let mut source = SliceSource::new(&data);
        // The chunk walk may stop anywhere in the tail, but IHDR alone decides the size.
        if let Ok(record) = extract_from(&mut source, Path::new("x.bin"), None) {
            prop_assert_eq!(record.format, ImageFormat::Png);
            prop_assert_eq!((record.width_px, record.height_px), (width, height));
        }
    }

    #[test]
    fn prop_resolved_dpi_is_finite(tags in prop::collection::vec(any_tag(), 0..6)) {
        if let Some(dpi) = resolve_dpi(&tags) {
            prop_assert!(dpi.x.is_finite());
            prop_assert!(dpi.y.is_finite());
        }
    }

    #[test]
    fn prop_explicit_dpi_wins(x in 1.0f64..1000.0, y in 1.0f64..1000.0, mut others in prop::collection::vec(any_tag(), 0..4)) {
        others.retain(|t| !matches!(t, ResolutionTag::Dpi(_)));
        let position = others.len() / 2;
        others.insert(position, ResolutionTag::Dpi(Density::Pair(x, y)));
        let dpi = resolve_dpi(&others).unwrap();
        prop_assert_eq!((dpi.x, dpi.y), (x, y));
    }

    #[test]
    fn prop_effective_limit_is_bounded(limit in any::<usize>()) {
        let effective = ScanOptions::default().with_limit(limit).effective_limit();
        prop_assert!(effective >= 1 && effective <= MAX_FILES);
    }
}
