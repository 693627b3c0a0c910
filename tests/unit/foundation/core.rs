use super::*;

#[test]
fn player_id_wire_values() {
    assert_eq!(serde_json::to_string(&PlayerId::One).unwrap(), "1");
    assert_eq!(serde_json::to_string(&PlayerId::Two).unwrap(), "2");
    let p: PlayerId = serde_json::from_str("2").unwrap();
    assert_eq!(p, PlayerId::Two);
    assert!(serde_json::from_str::<PlayerId>("3").is_err());
    assert!(PlayerId::from_u8(0).is_err());
}

#[test]
fn polarity_labels_and_names() {
    assert_eq!(Polarity::Positive.label(), 1);
    assert_eq!(Polarity::Negative.label(), 0);
    assert_eq!(
        serde_json::to_string(&Polarity::Negative).unwrap(),
        "\"negative\""
    );
}

#[test]
fn frame_index_is_a_plain_number_on_the_wire() {
    assert_eq!(serde_json::to_string(&FrameIndex(105)).unwrap(), "105");
    let f: FrameIndex = serde_json::from_str("4615").unwrap();
    assert_eq!(f, FrameIndex(4615));
}

#[test]
fn viewport_rejects_empty_and_oversized() {
    assert!(Viewport::new(0, 10).is_err());
    assert!(Viewport::new(10, 0).is_err());
    assert!(Viewport::new(70_000, 10).is_err());
    assert_eq!(Viewport::new(4, 2).unwrap().rgba_len(), 32);
}

#[test]
fn rgba_alpha_and_premultiply() {
    let c = Rgba::new(255, 0, 0, 0.5);
    assert_eq!(c.to_rgba8(), [255, 0, 0, 127]);
    assert_eq!(c.to_premul().to_array(), [127, 0, 0, 127]);
}
