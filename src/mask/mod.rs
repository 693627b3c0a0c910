//! Mask codec: RLE <-> bitmap, resampling, and colored rasterization.

/// Bitmap -> colored RGBA image.
pub mod raster;
/// RLE parsing, decoding, encoding and resampling.
pub mod rle;
