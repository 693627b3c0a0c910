use super::*;

fn mask(h: u32, w: u32, counts: &str) -> SegmentationMask {
    SegmentationMask {
        size: [h, w],
        counts: counts.to_string(),
    }
}

#[test]
fn zero_count_yields_all_background() {
    let bm = decode(&mask(3, 4, "0"));
    assert_eq!(bm.as_slice().len(), 12);
    assert!(bm.as_slice().iter().all(|&b| b == 0));
}

#[test]
fn single_full_background_run_yields_all_background() {
    let bm = decode(&mask(3, 4, "12"));
    assert_eq!(bm.as_slice(), &[0u8; 12][..]);
}

#[test]
fn alternating_runs_start_with_background() {
    let bm = decode(&mask(2, 3, "1 2 3"));
    assert_eq!(bm.as_slice(), &[0, 1, 1, 0, 0, 0]);
    assert_eq!(bm.width(), 3);
    assert_eq!(bm.height(), 2);
    assert_eq!(bm.get(1, 0), 1);
    assert_eq!(bm.get(2, 1), 0);
    assert_eq!(bm.get(9, 9), 0);
}

#[test]
fn leading_zero_run_starts_with_foreground() {
    let bm = decode(&mask(1, 4, "0 2 2"));
    assert_eq!(bm.as_slice(), &[1, 1, 0, 0]);
}

#[test]
fn any_non_digit_separates_runs() {
    let a = decode(&mask(1, 6, "1,2;x1  2"));
    let b = decode(&mask(1, 6, "1 2 1 2"));
    assert_eq!(a, b);
    assert_eq!(a.as_slice(), &[0, 1, 1, 0, 1, 1]);
}

#[test]
fn overflowing_runs_are_clamped() {
    let bm = decode(&mask(1, 4, "1 100 7 7"));
    assert_eq!(bm.as_slice(), &[0, 1, 1, 1]);

    let huge = decode(&mask(1, 3, "1 99999999999999999999999999"));
    assert_eq!(huge.as_slice(), &[0, 1, 1]);
}

#[test]
fn truncated_runs_leave_background() {
    let bm = decode(&mask(1, 5, "1 2"));
    assert_eq!(bm.as_slice(), &[0, 1, 1, 0, 0]);
}

#[test]
fn garbage_counts_degrade_to_background() {
    let m = mask(2, 2, "abc");
    assert_eq!(decode(&m).as_slice(), &[0, 0, 0, 0]);
    assert!(try_decode(&m).is_err());
    assert!(try_decode(&mask(2, 2, "4")).is_ok());
}

#[test]
fn empty_grid_decodes_to_empty_bitmap() {
    let bm = decode(&mask(0, 5, "3 4"));
    assert!(bm.as_slice().is_empty());
}

#[test]
fn encode_then_decode_reproduces_bitmap() {
    let bits = vec![
        0, 0, 1, 1, 0, //
        1, 1, 1, 0, 0, //
        0, 0, 0, 0, 1, //
    ];
    let bm = Bitmap::from_bits(5, 3, bits.clone()).unwrap();
    let rle = encode(&bm);
    assert_eq!(rle.size, [3, 5]);
    assert_eq!(rle.counts, "2 2 1 3 6 1");
    assert_eq!(decode(&rle).into_bits(), bits);
}

#[test]
fn encode_of_foreground_first_emits_leading_zero() {
    let bm = Bitmap::from_bits(3, 1, vec![1, 1, 0]).unwrap();
    assert_eq!(encode(&bm).counts, "0 2 1");
}

#[test]
fn from_bits_checks_length_and_normalizes() {
    assert!(Bitmap::from_bits(2, 2, vec![0, 1, 0]).is_err());
    let bm = Bitmap::from_bits(2, 1, vec![0, 255]).unwrap();
    assert_eq!(bm.as_slice(), &[0, 1]);
    assert_eq!(bm.area(), 1);
}

#[test]
fn scale_mask_nearest_neighbour() {
    let bm = Bitmap::from_bits(2, 2, vec![1, 0, 0, 1]).unwrap();
    let up = scale_mask(&bm, 4, 4);
    assert_eq!(
        up.as_slice(),
        &[
            1, 1, 0, 0, //
            1, 1, 0, 0, //
            0, 0, 1, 1, //
            0, 0, 1, 1, //
        ]
    );
    assert_eq!(scale_mask(&up, 2, 2), bm);
    assert_eq!(scale_mask(&bm, 2, 2), bm);
}

#[test]
fn scale_mask_from_empty_source_is_background() {
    let out = scale_mask(&Bitmap::empty(0, 0), 3, 2);
    assert_eq!(out.as_slice(), &[0u8; 6][..]);
}
