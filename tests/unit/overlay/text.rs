use super::*;

const DEJAVU_BOLD: &[u8] = include_bytes!("../../data/fonts/DejaVuSans-Bold.ttf");

fn dejavu() -> LabelFont {
    LabelFont::from_bytes(DEJAVU_BOLD).unwrap()
}

fn white() -> TextBrushRgba8 {
    TextBrushRgba8::from_rgba8([255, 255, 255, 255])
}

#[test]
fn empty_font_bytes_are_rejected() {
    assert!(LabelFont::from_bytes(Vec::new()).is_err());
}

#[test]
fn missing_font_file_is_a_render_error() {
    let err = LabelFont::from_path("/definitely/not/here.ttf").unwrap_err();
    assert!(err.to_string().starts_with("render error:"));
}

#[test]
fn non_font_bytes_fail_to_register() {
    let font = LabelFont::from_bytes(b"not a font at all".to_vec()).unwrap();
    let mut engine = TextLayoutEngine::new();
    assert!(engine.shape(&font, "+1", 12.0, white()).is_err());
}

#[test]
fn invalid_size_is_rejected_before_registration() {
    let font = LabelFont::from_bytes(b"x".to_vec()).unwrap();
    let mut engine = TextLayoutEngine::new();
    assert!(engine.shape(&font, "+1", 0.0, white()).is_err());
    assert!(engine.shape(&font, "+1", f32::NAN, white()).is_err());
}

#[test]
fn font_files_load_from_disk() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/fonts/DejaVuSans-Bold.ttf");
    let font = LabelFont::from_path(path).unwrap();
    assert_eq!(font.bytes(), DEJAVU_BOLD);
}

#[test]
fn labels_are_shaped_once_per_font() {
    let font = dejavu();
    let mut engine = TextLayoutEngine::new();
    let a = engine.shape(&font, "+1", 12.0, white()).unwrap();
    assert!(a.width() > 0.0);
    assert!(a.height() > 0.0);
    engine.shape(&font, "+1", 12.0, white()).unwrap();
    engine.shape(&font, "-2", 12.0, white()).unwrap();
    assert_eq!(engine.cached_labels(), 2);
    assert_eq!(engine.registered_fonts(), 1);
}

#[test]
fn fresh_handles_with_identical_bytes_reuse_the_registration() {
    let mut engine = TextLayoutEngine::new();
    for _ in 0..8 {
        let font = dejavu();
        engine.shape(&font, "+1", 12.0, white()).unwrap();
        engine.shape(&font, "-2", 12.0, white()).unwrap();
    }
    assert_eq!(engine.registered_fonts(), 1);
    assert_eq!(engine.cached_labels(), 2);
}

#[test]
fn shaped_label_grows_with_font_size() {
    let font = dejavu();
    let mut engine = TextLayoutEngine::new();
    let small = engine.shape(&font, "+1", 12.0, white()).unwrap();
    let large = engine.shape(&font, "+1", 24.0, white()).unwrap();
    assert!(large.width() > small.width());
    assert_eq!(engine.cached_labels(), 2);
}
