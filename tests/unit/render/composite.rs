use super::*;

#[test]
fn zero_opacity_or_clear_source_keeps_dst() {
    assert_eq!(over([1, 2, 3, 4], [200, 200, 200, 200], 0.0), [1, 2, 3, 4]);
    assert_eq!(over([1, 2, 3, 4], [200, 200, 200, 200], f32::NAN), [1, 2, 3, 4]);
    assert_eq!(over([10, 20, 30, 40], [255, 255, 255, 0], 1.0), [10, 20, 30, 40]);
}

#[test]
fn opaque_source_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255], 1.0), [255, 0, 0, 255]);
}

#[test]
fn translucent_source_over_transparent_is_source() {
    assert_eq!(over([0, 0, 0, 0], [100, 110, 120, 200], 1.0), [100, 110, 120, 200]);
}

#[test]
fn half_opacity_blends_toward_source() {
    let out = over([0, 0, 255, 255], [255, 0, 0, 255], 0.5);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
    assert_eq!(out[2], 127);
}

#[test]
fn buffer_lengths_must_match() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    over_in_place(&mut dst, &[9, 9, 9, 255, 0, 0, 0, 0], 1.0).unwrap();
    assert_eq!(dst, vec![9, 9, 9, 255, 0, 0, 0, 0]);
}
