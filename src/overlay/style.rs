use crate::foundation::core::{PlayerId, Polarity, Rgba};
use crate::overlay::text::LabelFont;

/// Click distance (px) within which an existing marker is removed instead of adding a new one.
pub const DEFAULT_HIT_RADIUS: f64 = 10.0;
/// Radius of a marker glyph (px).
pub const MARKER_RADIUS: f64 = 8.0;
/// Width of the white marker outline (px).
pub const MARKER_BORDER_WIDTH: f64 = 1.5;
/// Font size of the `+1` / `-2` style marker labels (px).
pub const MARKER_LABEL_SIZE: f32 = 12.0;
/// Font size of the "not in main view" notice (px).
pub const NOTICE_LABEL_SIZE: f32 = 16.0;

/// Player 1 positive marker fill.
pub const POSITIVE_MARKER_COLOR: Rgba = Rgba::new(0, 200, 0, 0.8);
/// Player 1 negative marker fill.
pub const NEGATIVE_MARKER_COLOR: Rgba = Rgba::new(200, 0, 0, 0.8);
/// Player 2 positive marker fill.
pub const PLAYER2_POSITIVE_MARKER_COLOR: Rgba = Rgba::new(0, 160, 255, 0.8);
/// Player 2 negative marker fill.
pub const PLAYER2_NEGATIVE_MARKER_COLOR: Rgba = Rgba::new(255, 140, 0, 0.8);
pub const MARKER_BORDER_COLOR: Rgba = Rgba::new(255, 255, 255, 1.0);
pub const LABEL_COLOR: Rgba = Rgba::new(255, 255, 255, 1.0);

pub const PLAYER1_MASK_COLOR: Rgba = Rgba::new(255, 0, 0, 0.5);
pub const PLAYER2_MASK_COLOR: Rgba = Rgba::new(0, 0, 255, 0.5);

/// Shade laid over the whole viewport while the current frame is outside every chunk.
pub const NOT_IN_VIEW_SHADE: Rgba = Rgba::new(0, 0, 0, 0.2);
/// Text centered on the shade when a label font is configured.
pub const NOT_IN_VIEW_NOTICE: &str = "Cannot add markers: Not in main view";

/// How decoded masks are resampled from their native size to the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaskScaling {
    /// Nearest neighbour on the bitmap; hard edges.
    #[default]
    Nearest,
    /// Bilinear on the colored image; soft edges.
    Bilinear,
}

/// Drawing and hit-test parameters of the overlay.
///
/// `OverlayStyle::default()` reproduces the stock viewer look, with a separate fill color for
/// each player and polarity so markers stay distinguishable without a label font. Every field is
/// public so a caller can override any of them per render call.
#[derive(Clone, Debug)]
pub struct OverlayStyle {
    /// Clicks closer than this (px, inclusive) to a marker remove it.
    pub hit_radius: f64,
    /// Radius of the marker circle (px).
    pub marker_radius: f64,
    /// Stroke width of the marker outline (px).
    pub border_width: f64,
    /// Fill colors indexed by `[player][polarity]`, positive first.
    pub marker_colors: [[Rgba; 2]; 2],
    /// Color of the marker outline.
    pub border_color: Rgba,
    /// Color of the marker labels and the not-in-view notice.
    pub label_color: Rgba,
    /// Marker label font size (px).
    pub label_size: f32,
    /// Mask tint for player 1 and player 2.
    pub mask_colors: [Rgba; 2],
    /// Resampling used when a mask's native size differs from the viewport.
    pub mask_scaling: MaskScaling,
    /// Fill laid over the viewport outside the main view.
    pub not_in_view_shade: Rgba,
    /// Labels and the not-in-view notice are only drawn when a font is configured.
    pub label_font: Option<LabelFont>,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            hit_radius: DEFAULT_HIT_RADIUS,
            marker_radius: MARKER_RADIUS,
            border_width: MARKER_BORDER_WIDTH,
            marker_colors: [
                [POSITIVE_MARKER_COLOR, NEGATIVE_MARKER_COLOR],
                [PLAYER2_POSITIVE_MARKER_COLOR, PLAYER2_NEGATIVE_MARKER_COLOR],
            ],
            border_color: MARKER_BORDER_COLOR,
            label_color: LABEL_COLOR,
            label_size: MARKER_LABEL_SIZE,
            mask_colors: [PLAYER1_MASK_COLOR, PLAYER2_MASK_COLOR],
            mask_scaling: MaskScaling::default(),
            not_in_view_shade: NOT_IN_VIEW_SHADE,
            label_font: None,
        }
    }
}

impl OverlayStyle {
    /// Override the click removal radius.
    pub fn with_hit_radius(mut self, radius: f64) -> Self {
        self.hit_radius = radius;
        self
    }

    /// Override both mask tints.
    pub fn with_mask_colors(mut self, player1: Rgba, player2: Rgba) -> Self {
        self.mask_colors = [player1, player2];
        self
    }

    /// Override the fill of one player/polarity combination.
    pub fn with_marker_color(mut self, player: PlayerId, polarity: Polarity, color: Rgba) -> Self {
        self.marker_colors[player.slot()][polarity_slot(polarity)] = color;
        self
    }

    /// Choose how masks are resampled to the viewport.
    pub fn with_mask_scaling(mut self, scaling: MaskScaling) -> Self {
        self.mask_scaling = scaling;
        self
    }

    /// Enable marker labels and the not-in-view notice.
    pub fn with_label_font(mut self, font: LabelFont) -> Self {
        self.label_font = Some(font);
        self
    }

    /// Fill color of a marker glyph.
    pub fn marker_color(&self, player: PlayerId, polarity: Polarity) -> Rgba {
        self.marker_colors[player.slot()][polarity_slot(polarity)]
    }

    /// Tint of a player's mask.
    pub fn mask_color(&self, player: PlayerId) -> Rgba {
        self.mask_colors[player.slot()]
    }
}

/// Short glyph label, e.g. `+1` for a player 1 positive marker.
pub fn marker_label(player: PlayerId, polarity: Polarity) -> String {
    format!("{}{}", polarity.sign(), player.as_u8())
}

fn polarity_slot(p: Polarity) -> usize {
    match p {
        Polarity::Positive => 0,
        Polarity::Negative => 1,
    }
}
