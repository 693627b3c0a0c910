use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use xxhash_rust::xxh3::xxh3_64;

use crate::foundation::error::{SegmarkError, SegmarkResult};

/// Font bytes used for marker labels. Cloning shares the underlying buffer.
#[derive(Clone)]
pub struct LabelFont {
    bytes: Arc<Vec<u8>>,
}

impl std::fmt::Debug for LabelFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelFont")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl LabelFont {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> SegmarkResult<Self> {
        let bytes = bytes.into();
        if bytes.is_empty() {
            return Err(SegmarkError::validation("label font bytes are empty"));
        }
        Ok(Self {
            bytes: Arc::new(bytes),
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> SegmarkResult<Self> {
        let p = path.as_ref();
        let bytes = std::fs::read(p).map_err(|e| {
            SegmarkError::render(format!("failed to read font '{}': {e}", p.display()))
        })?;
        Self::from_bytes(bytes)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn same_as(&self, other: &LabelFont) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl TextBrushRgba8 {
    pub(crate) fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// A shaped label ready for glyph drawing.
#[derive(Clone)]
pub(crate) struct ShapedLabel {
    pub(crate) layout: Arc<parley::Layout<TextBrushRgba8>>,
    pub(crate) font: vello_cpu::peniko::FontData,
}

impl ShapedLabel {
    pub(crate) fn width(&self) -> f64 {
        f64::from(self.layout.width())
    }

    pub(crate) fn height(&self) -> f64 {
        f64::from(self.layout.height())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LabelKey {
    font: u64,
    text: String,
    size_bits: u32,
    brush: [u8; 4],
}

struct RegisteredFont {
    bytes: Arc<Vec<u8>>,
    family_name: String,
    data: vello_cpu::peniko::FontData,
}

/// Parley contexts plus a cache of shaped labels.
///
/// Fonts are registered once per distinct byte content, keyed by an xxh3 digest, so switching
/// between `LabelFont` handles that carry the same file never grows the font collection. Marker
/// labels come from a tiny alphabet (`+1`, `-2`, ...) so every distinct label is shaped once per
/// font and reused across redraws.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    fonts: HashMap<u64, RegisteredFont>,
    // Last font handle seen and its registry key.
    current: Option<(LabelFont, u64)>,
    cache: HashMap<LabelKey, ShapedLabel>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
            current: None,
            cache: HashMap::new(),
        }
    }

    /// Registers `font` unless identical bytes are already known; returns its registry key.
    fn ensure_font(&mut self, font: &LabelFont) -> SegmarkResult<u64> {
        if let Some((seen, key)) = &self.current
            && seen.same_as(font)
        {
            return Ok(*key);
        }

        let key = xxh3_64(font.bytes());
        let known = self
            .fonts
            .get(&key)
            .is_some_and(|reg| reg.bytes.as_slice() == font.bytes());
        if !known {
            self.register(key, font)?;
        }
        self.current = Some((font.clone(), key));
        Ok(key)
    }

    fn register(&mut self, key: u64, font: &LabelFont) -> SegmarkResult<()> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes().to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| SegmarkError::render("no font families registered from label font"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| SegmarkError::render("registered font family has no name"))?
            .to_string();

        tracing::debug!(family = %family_name, key, "registered label font");
        // A digest collision replaces the old entry; its shaped labels must go with it.
        self.cache.retain(|k, _| k.font != key);
        self.fonts.insert(
            key,
            RegisteredFont {
                bytes: Arc::clone(&font.bytes),
                family_name,
                data: vello_cpu::peniko::FontData::new(
                    vello_cpu::peniko::Blob::from(font.bytes().to_vec()),
                    0,
                ),
            },
        );
        Ok(())
    }

    /// Shape `text` on a single line.
    pub(crate) fn shape(
        &mut self,
        font: &LabelFont,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> SegmarkResult<ShapedLabel> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(SegmarkError::validation(
                "label size_px must be finite and > 0",
            ));
        }
        let font_key = self.ensure_font(font)?;

        let key = LabelKey {
            font: font_key,
            text: text.to_string(),
            size_bits: size_px.to_bits(),
            brush: [brush.r, brush.g, brush.b, brush.a],
        };
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit.clone());
        }

        let reg = self
            .fonts
            .get(&font_key)
            .ok_or_else(|| SegmarkError::render("label font not registered"))?;
        let family_name = reg.family_name.clone();
        let data = reg.data.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let shaped = ShapedLabel {
            layout: Arc::new(layout),
            font: data,
        };
        self.cache.insert(key, shaped.clone());
        Ok(shaped)
    }

    #[cfg(test)]
    fn cached_labels(&self) -> usize {
        self.cache.len()
    }

    #[cfg(test)]
    fn registered_fonts(&self) -> usize {
        self.fonts.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/text.rs"]
mod tests;
