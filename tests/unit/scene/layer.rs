use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 20, 30, 255]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn encoded_image_decodes_once_and_is_shared_by_clones() {
    let image = LayerImage::encoded(png_bytes(3, 2), "portrait.png");
    assert!(!image.is_decoded());
    let copy = image.clone();

    let a = image.resolve().unwrap();
    assert!(copy.is_decoded());
    let b = copy.resolve().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!((a.width, a.height), (3, 2));
    assert_eq!(image.source(), "portrait.png");
}

#[test]
fn decode_failure_is_an_asset_error_and_sticks() {
    let image = LayerImage::encoded(vec![0, 1, 2], "broken.png");
    assert!(matches!(image.resolve(), Err(ScreenError::Asset(_))));
    assert!(image.is_decoded());
    let msg = image.resolve().unwrap_err().to_string();
    assert!(msg.contains("broken.png"), "{msg}");
}

#[test]
fn missing_file_reports_the_path() {
    let image = LayerImage::file("/definitely/not/here.png");
    let msg = image.resolve().unwrap_err().to_string();
    assert!(msg.contains("/definitely/not/here.png"), "{msg}");
}

#[test]
fn concurrent_resolvers_share_one_decode() {
    let image = LayerImage::encoded(png_bytes(4, 4), "bg.png");
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let image = image.clone();
            std::thread::spawn(move || image.resolve().unwrap())
        })
        .collect();
    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn new_layer_has_identity_defaults() {
    let img = PreparedImage::from_premul(1, 1, vec![0, 0, 0, 255], "px").unwrap();
    let layer = Layer::new(7, img).with_offset(5.0, -3.0);
    assert_eq!(layer.id, 7);
    assert_eq!((layer.offset_x, layer.offset_y), (5.0, -3.0));
    assert_eq!((layer.rotation, layer.scale, layer.opacity), (0.0, 1.0, 1.0));
    assert!(!layer.flip_x && layer.filter.is_none());
    assert!(layer.image.is_decoded());
}
