use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_scaled_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn straight_source_is_premultiplied_before_blending() {
    let mut dst = vec![0u8; 8];
    let src = [255u8, 0, 0, 127, 0, 0, 255, 0];
    straight_over_in_place(&mut dst, &src).unwrap();
    assert_eq!(&dst[0..4], &[127, 0, 0, 127]);
    assert_eq!(&dst[4..8], &[0, 0, 0, 0]);
}

#[test]
fn later_layers_cover_earlier_ones() {
    let mut dst = vec![0u8; 4];
    straight_over_in_place(&mut dst, &[255, 0, 0, 255]).unwrap();
    straight_over_in_place(&mut dst, &[0, 0, 255, 255]).unwrap();
    assert_eq!(dst, vec![0, 0, 255, 255]);
}

#[test]
fn mismatched_buffers_are_rejected() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    assert!(straight_over_in_place(&mut dst, &[0u8; 7]).is_err());
}
