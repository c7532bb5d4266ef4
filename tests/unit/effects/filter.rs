use super::*;

fn px(rgba: [u8; 4]) -> Vec<u8> {
    rgba.to_vec()
}

#[test]
fn parses_panel_output_in_order() {
    let chain: FilterChain = "blur(4px) hue-rotate(90deg) url(#flashback) grayscale(50%)"
        .parse()
        .unwrap();
    assert_eq!(
        chain.ops(),
        &[
            FilterOp::Blur { radius_px: 4.0 },
            FilterOp::HueRotate { degrees: 90.0 },
            FilterOp::Flashback,
            FilterOp::Grayscale(0.5),
        ]
    );
}

#[test]
fn parses_drop_shadow_with_nested_color() {
    let chain: FilterChain = "drop-shadow(2px -3px 4px rgba(0, 0, 0, 0.5))".parse().unwrap();
    assert_eq!(
        chain.ops(),
        &[FilterOp::DropShadow {
            offset_x: 2.0,
            offset_y: -3.0,
            blur_px: 4.0,
            color: Rgba8::rgba(0, 0, 0, 128),
        }]
    );

    let chain: FilterChain = "drop-shadow(#fff 1px 1px)".parse().unwrap();
    assert!(matches!(
        chain.ops()[0],
        FilterOp::DropShadow { color: Rgba8::WHITE, blur_px, .. } if blur_px == 0.0
    ));
}

#[test]
fn none_and_empty_are_identity() {
    assert!("".parse::<FilterChain>().unwrap().is_empty());
    assert!("none".parse::<FilterChain>().unwrap().is_empty());
    assert_eq!(FilterChain::parse_lenient("  "), None);
}

#[test]
fn malformed_filters_are_rejected_and_ignored_leniently() {
    for bad in [
        "blur(4)",
        "sepia(-1)",
        "wobble(2)",
        "blur(4px",
        "url(#elsewhere)",
        "hue-rotate(90)",
        "drop-shadow(1px)",
    ] {
        assert!(bad.parse::<FilterChain>().is_err(), "{bad} should not parse");
        assert_eq!(FilterChain::parse_lenient(bad), None);
    }
}

#[test]
fn display_roundtrips() {
    let chain: FilterChain = "sepia(1) contrast(120%) drop-shadow(1px 2px 3px #102030)"
        .parse()
        .unwrap();
    let again: FilterChain = chain.to_string().parse().unwrap();
    assert_eq!(again, chain);
}

#[test]
fn grayscale_full_equalizes_channels() {
    let mut data = px([200, 40, 10, 255]);
    FilterChain::new(vec![FilterOp::Grayscale(1.0)])
        .apply_premul(&mut data, 1, 1)
        .unwrap();
    assert_eq!(data[0], data[1]);
    assert_eq!(data[1], data[2]);
    assert_eq!(data[3], 255);
}

#[test]
fn invert_and_brightness() {
    let mut data = px([255, 0, 100, 255]);
    FilterChain::new(vec![FilterOp::Invert(1.0)])
        .apply_premul(&mut data, 1, 1)
        .unwrap();
    assert_eq!(data, vec![0, 255, 155, 255]);

    let mut data = px([100, 100, 100, 255]);
    FilterChain::new(vec![FilterOp::Brightness(0.5)])
        .apply_premul(&mut data, 1, 1)
        .unwrap();
    assert_eq!(data, vec![50, 50, 50, 255]);
}

#[test]
fn hue_rotate_zero_and_saturate_one_are_near_identity() {
    for op in [FilterOp::HueRotate { degrees: 0.0 }, FilterOp::Saturate(1.0)] {
        let mut data = px([180, 60, 20, 255]);
        FilterChain::new(vec![op]).apply_premul(&mut data, 1, 1).unwrap();
        for (got, want) in data.iter().zip([180u8, 60, 20, 255]) {
            assert!((i16::from(*got) - i16::from(want)).abs() <= 1);
        }
    }
}

#[test]
fn flashback_tints_white_to_preset() {
    let mut data = px([255, 255, 255, 255]);
    FilterChain::new(vec![FilterOp::Flashback])
        .apply_premul(&mut data, 1, 1)
        .unwrap();
    assert_eq!(data, vec![237, 193, 172, 255]);
}

#[test]
fn opacity_scales_premultiplied_channels() {
    let mut data = px([200, 100, 0, 200]);
    FilterChain::new(vec![FilterOp::Opacity(0.5)])
        .apply_premul(&mut data, 1, 1)
        .unwrap();
    assert_eq!(data, vec![100, 50, 0, 100]);
}

#[test]
fn drop_shadow_paints_offset_alpha_under_content() {
    let (w, h) = (4u32, 1u32);
    let mut data = vec![0u8; 16];
    data[..4].copy_from_slice(&[255, 255, 255, 255]);
    FilterChain::new(vec![FilterOp::DropShadow {
        offset_x: 2.0,
        offset_y: 0.0,
        blur_px: 0.0,
        color: Rgba8::BLACK,
    }])
    .apply_premul(&mut data, w, h)
    .unwrap();
    assert_eq!(&data[..4], &[255, 255, 255, 255]);
    assert_eq!(&data[4..8], &[0, 0, 0, 0]);
    assert_eq!(&data[8..12], &[0, 0, 0, 255]);
}

#[test]
fn serde_uses_css_string() {
    let chain: FilterChain = serde_json::from_str("\"saturate(2)\"").unwrap();
    assert_eq!(chain.ops(), &[FilterOp::Saturate(2.0)]);
    assert_eq!(serde_json::to_string(&chain).unwrap(), "\"saturate(2)\"");
    assert!(serde_json::from_str::<FilterChain>("\"saturate(x)\"").is_err());
}
