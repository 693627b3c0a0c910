use vello_cpu::kurbo::Shape as _;

use crate::annotation::frame::{FrameAnnotation, MarkerRef};
use crate::annotation::store::AnnotationStore;
use crate::foundation::core::{PlayerId, Point, Polarity, Rgba, Viewport};
use crate::foundation::error::{SegmarkError, SegmarkResult};
use crate::mask::raster::rasterize;
use crate::mask::rle::{SegmentationMask, decode, scale_mask};
use crate::overlay::composite::{over_in_place, straight_over_in_place};
use crate::overlay::frame::FrameRGBA;
use crate::overlay::style::{
    MaskScaling, NOT_IN_VIEW_NOTICE, NOTICE_LABEL_SIZE, OverlayStyle, marker_label,
};
use crate::overlay::text::{ShapedLabel, TextBrushRgba8, TextLayoutEngine};

/// Masks to draw under the markers of one frame. Either player may be absent.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaskLayers<'a> {
    /// Drawn first, tinted with the player 1 mask color.
    pub player1: Option<&'a SegmentationMask>,
    /// Drawn over player 1.
    pub player2: Option<&'a SegmentationMask>,
}

impl<'a> MaskLayers<'a> {
    /// Layers for both players; pass `None` for a player without a mask.
    pub fn new(
        player1: Option<&'a SegmentationMask>,
        player2: Option<&'a SegmentationMask>,
    ) -> Self {
        Self { player1, player2 }
    }

    /// No masks; only markers are drawn.
    pub fn none() -> Self {
        Self::default()
    }

    /// Mask of `player`, if any.
    pub fn get(&self, player: PlayerId) -> Option<&'a SegmentationMask> {
        match player {
            PlayerId::One => self.player1,
            PlayerId::Two => self.player2,
        }
    }
}

/// Result of [`OverlayCompositor::handle_click`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClickOutcome {
    /// Playback is running, the frame is outside the main view, or the click was not a finite
    /// point; nothing changed.
    Ignored,
    /// The nearest marker within the hit radius was removed.
    Removed(MarkerRef),
    /// A new point was appended under the store's selection.
    Added {
        /// Active player of the store when the click landed.
        player: PlayerId,
        /// Active polarity of the store when the click landed.
        polarity: Polarity,
        /// Where the point was stored, in viewport pixels.
        point: Point,
    },
}

/// Find the marker nearest to `click` whose distance is `<= threshold`.
///
/// Ties keep the first marker in [`FrameAnnotation::markers`] order. A NaN distance (from a
/// NaN click, marker or threshold) never counts as a hit.
pub fn hit_test(annotation: &FrameAnnotation, click: Point, threshold: f64) -> Option<MarkerRef> {
    let mut best: Option<(f64, MarkerRef)> = None;
    for marker in annotation.markers() {
        let d = marker.point.distance(click);
        if d.is_nan() || d > threshold {
            continue;
        }
        match best {
            Some((bd, _)) if bd <= d => {}
            _ => best = Some((d, marker)),
        }
    }
    best.map(|(_, m)| m)
}

/// Draws masks and marker glyphs for a frame and routes clicks to an [`AnnotationStore`].
///
/// The compositor keeps its raster context and shaped labels between calls, so redrawing on every
/// change is cheap as long as the viewport size stays the same.
pub struct OverlayCompositor {
    style: OverlayStyle,
    playing: bool,
    in_main_view: bool,
    ctx: Option<vello_cpu::RenderContext>,
    text: TextLayoutEngine,
}

impl std::fmt::Debug for OverlayCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayCompositor")
            .field("style", &self.style)
            .field("playing", &self.playing)
            .field("in_main_view", &self.in_main_view)
            .finish_non_exhaustive()
    }
}

impl Default for OverlayCompositor {
    fn default() -> Self {
        Self::new(OverlayStyle::default())
    }
}

impl OverlayCompositor {
    /// Compositor in the paused, in-main-view state.
    pub fn new(style: OverlayStyle) -> Self {
        Self {
            style,
            playing: false,
            in_main_view: true,
            ctx: None,
            text: TextLayoutEngine::new(),
        }
    }

    /// Style used by [`render`](Self::render) and [`handle_click`](Self::handle_click).
    pub fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Replace the style; shaped labels of the previous font stay cached.
    pub fn set_style(&mut self, style: OverlayStyle) {
        self.style = style;
    }

    /// Whether video playback is running.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// While playing, clicks are ignored and the not-in-view shade is suppressed.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    /// Whether the current frame lies inside a chunk.
    pub fn is_in_main_view(&self) -> bool {
        self.in_main_view
    }

    /// Outside the main view clicks are ignored and, unless playing, the shade is drawn.
    pub fn set_in_main_view(&mut self, in_main_view: bool) {
        self.in_main_view = in_main_view;
    }

    /// Apply a click at `click` (viewport pixels) to the store's current frame.
    ///
    /// Clicks with a non-finite coordinate are ignored.
    pub fn handle_click(&self, store: &mut AnnotationStore, click: Point) -> ClickOutcome {
        if self.playing || !self.in_main_view {
            tracing::trace!(
                playing = self.playing,
                in_main_view = self.in_main_view,
                "click ignored"
            );
            return ClickOutcome::Ignored;
        }
        if !click.x.is_finite() || !click.y.is_finite() {
            tracing::debug!(x = click.x, y = click.y, "non-finite click ignored");
            return ClickOutcome::Ignored;
        }

        let hit = store
            .current_frame_annotation()
            .and_then(|ann| hit_test(ann, click, self.style.hit_radius));
        match hit {
            Some(marker) => {
                store.remove_point(marker.player, marker.polarity, marker.index);
                ClickOutcome::Removed(marker)
            }
            None => {
                let sel = store.selection();
                store.add_point(click);
                ClickOutcome::Added {
                    player: sel.player,
                    polarity: sel.polarity,
                    point: click,
                }
            }
        }
    }

    /// Render the overlay of one frame with the compositor's style.
    pub fn render(
        &mut self,
        annotation: Option<&FrameAnnotation>,
        masks: MaskLayers<'_>,
        viewport: Viewport,
    ) -> SegmarkResult<FrameRGBA> {
        let style = self.style.clone();
        self.render_with(annotation, masks, viewport, &style)
    }

    /// Render the overlay of one frame with an explicit style.
    ///
    /// Layers from bottom to top: player 1 mask, player 2 mask, marker glyphs, then the
    /// not-in-view shade when applicable.
    #[tracing::instrument(skip_all, fields(width = viewport.width, height = viewport.height))]
    pub fn render_with(
        &mut self,
        annotation: Option<&FrameAnnotation>,
        masks: MaskLayers<'_>,
        viewport: Viewport,
        style: &OverlayStyle,
    ) -> SegmarkResult<FrameRGBA> {
        let width: u16 = viewport
            .width
            .try_into()
            .map_err(|_| SegmarkError::render("viewport width exceeds u16"))?;
        let height: u16 = viewport
            .height
            .try_into()
            .map_err(|_| SegmarkError::render("viewport height exceeds u16"))?;
        if width == 0 || height == 0 {
            return Err(SegmarkError::render("viewport must be non-empty"));
        }

        let mut out = FrameRGBA::transparent(viewport);

        for player in PlayerId::ALL {
            if let Some(mask) = masks.get(player) {
                let layer = mask_layer(mask, style.mask_color(player), style.mask_scaling, viewport)?;
                straight_over_in_place(&mut out.data, layer.as_raw())?;
            }
        }

        let shade = !self.in_main_view && !self.playing;
        let markers: Vec<MarkerRef> = annotation
            .map(|a| a.markers().collect())
            .unwrap_or_default();
        if markers.is_empty() && !shade {
            return Ok(out);
        }

        let mut labels = Vec::with_capacity(markers.len());
        let mut notice = None;
        if let Some(font) = &style.label_font {
            let brush = TextBrushRgba8::from_rgba8(style.label_color.to_rgba8());
            for m in &markers {
                let text = marker_label(m.player, m.polarity);
                labels.push(Some(self.text.shape(font, &text, style.label_size, brush)?));
            }
            if shade {
                notice = Some(
                    self.text
                        .shape(font, NOT_IN_VIEW_NOTICE, NOTICE_LABEL_SIZE, brush)?,
                );
            }
        } else {
            labels.resize(markers.len(), None);
        }

        self.with_ctx_mut(width, height, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            for (m, label) in markers.iter().zip(&labels) {
                let center = vello_cpu::kurbo::Point::new(m.point.x, m.point.y);
                let circle =
                    vello_cpu::kurbo::Circle::new(center, style.marker_radius).to_path(0.1);

                ctx.set_paint(paint(style.marker_color(m.player, m.polarity)));
                ctx.fill_path(&circle);

                ctx.set_stroke(vello_cpu::kurbo::Stroke::new(style.border_width));
                ctx.set_paint(paint(style.border_color));
                ctx.stroke_path(&circle);

                if let Some(label) = label {
                    draw_label_centered(ctx, label, m.point.x, m.point.y);
                }
            }

            if shade {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(paint(style.not_in_view_shade));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(width),
                    f64::from(height),
                ));
                if let Some(label) = &notice {
                    draw_label_centered(
                        ctx,
                        label,
                        f64::from(width) / 2.0,
                        f64::from(height) / 2.0,
                    );
                }
            }

            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(width, height);
            ctx.render_to_pixmap(&mut pixmap);
            over_in_place(&mut out.data, pixmap.data_as_u8_slice(), 1.0)
        })?;

        tracing::debug!(markers = markers.len(), shade, "overlay rendered");
        Ok(out)
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> SegmarkResult<R>,
    ) -> SegmarkResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }
}

fn mask_layer(
    mask: &SegmentationMask,
    color: Rgba,
    scaling: MaskScaling,
    viewport: Viewport,
) -> SegmarkResult<image::RgbaImage> {
    let bitmap = decode(mask);
    match scaling {
        MaskScaling::Nearest => rasterize(
            &scale_mask(&bitmap, viewport.width, viewport.height),
            color,
        ),
        MaskScaling::Bilinear => {
            if bitmap.width() == 0 || bitmap.height() == 0 {
                return rasterize(
                    &scale_mask(&bitmap, viewport.width, viewport.height),
                    color,
                );
            }
            let native = rasterize(&bitmap, color)?;
            let mut resized = image::imageops::resize(
                &native,
                viewport.width,
                viewport.height,
                image::imageops::FilterType::Triangle,
            );
            // Edge pixels blend toward transparent black; restore the tint so only alpha fades.
            for px in resized.pixels_mut() {
                if px.0[3] > 0 {
                    px.0[0] = color.r;
                    px.0[1] = color.g;
                    px.0[2] = color.b;
                }
            }
            Ok(resized)
        }
    }
}

fn paint(c: Rgba) -> vello_cpu::peniko::Color {
    let [r, g, b, a] = c.to_rgba8();
    vello_cpu::peniko::Color::from_rgba8(r, g, b, a)
}

fn draw_label_centered(ctx: &mut vello_cpu::RenderContext, label: &ShapedLabel, cx: f64, cy: f64) {
    let x0 = cx - label.width() / 2.0;
    let y0 = cy - label.height() / 2.0;
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x0, y0)));
    for line in label.layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(&label.font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/compositor.rs"]
mod tests;
