//! Overlay compositing: decoded masks under marker glyphs, plus click hit-testing.

/// Premultiplied RGBA8 `over` helpers.
pub mod composite;
/// Marker/mask drawing and click routing.
pub mod compositor;
/// Rendered overlay frames.
pub mod frame;
/// Colors, radii and other drawing constants.
pub mod style;
/// Label font handling and shaping.
pub mod text;
