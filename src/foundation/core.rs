use crate::foundation::error::{SegmarkError, SegmarkResult};
use crate::foundation::math::unit_alpha_to_u8;

pub use kurbo::Point;

/// Absolute 0-based frame index in source video space.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct FrameIndex(pub u64);

impl std::fmt::Display for FrameIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One of the two tracked players. Serialized as `1` or `2`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlayerId {
    /// Player 1.
    #[default]
    One,
    /// Player 2.
    Two,
}

impl PlayerId {
    /// Both players in wire order.
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Wire value (`1` or `2`).
    pub fn as_u8(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// Parse a wire value.
    pub fn from_u8(v: u8) -> SegmarkResult<Self> {
        match v {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(SegmarkError::validation(format!(
                "player id must be 1 or 2, got {other}"
            ))),
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }
}

impl serde::Serialize for PlayerId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> serde::Deserialize<'de> for PlayerId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let v = <u8 as serde::Deserialize>::deserialize(deserializer)?;
        Self::from_u8(v).map_err(serde::de::Error::custom)
    }
}

/// Whether a marker asks the service to include (positive) or exclude (negative) a region.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    /// Include the region around the point.
    #[default]
    Positive,
    /// Exclude the region around the point.
    Negative,
}

impl Polarity {
    /// Both polarities in payload order (positives first).
    pub const ALL: [Polarity; 2] = [Polarity::Positive, Polarity::Negative];

    /// Label value sent to the segmentation service.
    pub fn label(self) -> u8 {
        match self {
            Self::Positive => 1,
            Self::Negative => 0,
        }
    }

    /// Sign character used in marker glyph labels.
    pub fn sign(self) -> char {
        match self {
            Self::Positive => '+',
            Self::Negative => '-',
        }
    }
}

/// Display surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a validated, non-empty viewport.
    pub fn new(width: u32, height: u32) -> SegmarkResult<Self> {
        if width == 0 || height == 0 {
            return Err(SegmarkError::validation("viewport must be non-empty"));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(SegmarkError::validation("viewport exceeds 65535 px"));
        }
        Ok(Self { width, height })
    }

    /// Number of bytes of a tightly packed RGBA8 buffer covering the viewport.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Straight-alpha color: 8-bit RGB with a unit-interval alpha.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f32,
}

impl Rgba {
    /// Construct a color.
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Straight RGBA8 with the alpha truncated to the 0..=255 range.
    pub fn to_rgba8(self) -> [u8; 4] {
        [self.r, self.g, self.b, unit_alpha_to_u8(self.a)]
    }

    /// Premultiplied RGBA8 for compositing.
    pub fn to_premul(self) -> Rgba8Premul {
        let [r, g, b, a] = self.to_rgba8();
        Rgba8Premul::from_straight_rgba(r, g, b, a)
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channels as an array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
