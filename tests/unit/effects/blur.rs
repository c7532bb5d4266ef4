use super::*;

#[test]
fn zero_sigma_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = gaussian_blur_premul(&src, 1, 2, 0.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn constant_image_is_unchanged() {
    let (w, h) = (4u32, 3u32);
    let src = [10u8, 20, 30, 40].repeat((w * h) as usize);
    let out = gaussian_blur_premul(&src, w, h, 1.5).unwrap();
    assert_eq!(out, src);
}

#[test]
fn single_pixel_spreads_and_keeps_energy() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = gaussian_blur_premul(&src, w, h, 1.0).unwrap();
    assert!(out.chunks_exact(4).filter(|px| px[3] != 0).count() > 1);
    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 30);
}

#[test]
fn radius_tracks_three_sigma_with_cap() {
    assert_eq!(radius_for_sigma(0.0), 0);
    assert_eq!(radius_for_sigma(f32::NAN), 0);
    assert_eq!(radius_for_sigma(2.0), 6);
    assert_eq!(radius_for_sigma(1000.0), MAX_BLUR_RADIUS);
}

#[test]
fn mismatched_buffer_is_rejected() {
    assert!(gaussian_blur_premul(&[0u8; 7], 1, 2, 1.0).is_err());
}
