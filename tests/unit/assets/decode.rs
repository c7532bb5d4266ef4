use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: Vec<u8>) -> Vec<u8> {
    let img = image::RgbaImage::from_raw(w, h, rgba).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let buf = png_bytes(1, 1, vec![100, 50, 200, 128]);

    let prepared = decode_image(&buf, "layer.png").unwrap();
    assert_eq!((prepared.width, prepared.height), (1, 1));
    assert_eq!(&*prepared.source, "layer.png");
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_rejects_garbage() {
    let err = decode_image(b"not a png", "bar").unwrap_err();
    assert!(err.to_string().contains("bar"));
}

#[test]
fn unpremultiply_inverts_opaque_and_clear_pixels() {
    let mut px = vec![10, 20, 30, 255, 0, 0, 0, 0, 64, 32, 0, 128];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[..8], &[10, 20, 30, 255, 0, 0, 0, 0]);
    assert_eq!(&px[8..], &[128, 64, 0, 128]);
}

#[test]
fn from_premul_checks_length() {
    assert!(PreparedImage::from_premul(2, 2, vec![0; 16], "ok").is_ok());
    assert!(PreparedImage::from_premul(2, 2, vec![0; 15], "short").is_err());
}
