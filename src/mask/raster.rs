use crate::foundation::core::Rgba;
use crate::foundation::error::{SegmarkError, SegmarkResult};
use crate::mask::rle::Bitmap;

/// Paint a bitmap into a straight-alpha RGBA image of the same size.
///
/// Foreground pixels take `color` with its alpha truncated to 8 bits; background pixels are
/// fully transparent black.
pub fn rasterize(bitmap: &Bitmap, color: Rgba) -> SegmarkResult<image::RgbaImage> {
    rasterize_bits(bitmap.as_slice(), bitmap.width(), bitmap.height(), color)
}

/// [`rasterize`] over raw row-major bits.
pub fn rasterize_bits(
    bits: &[u8],
    width: u32,
    height: u32,
    color: Rgba,
) -> SegmarkResult<image::RgbaImage> {
    let expected = (width as usize).saturating_mul(height as usize);
    if bits.len() != expected {
        return Err(SegmarkError::codec(format!(
            "rasterize expects {expected} bits for {width}x{height}, got {}",
            bits.len()
        )));
    }

    let fg = color.to_rgba8();
    let mut data = vec![0u8; expected.saturating_mul(4)];
    for (px, &bit) in data.chunks_exact_mut(4).zip(bits) {
        if bit == 1 {
            px.copy_from_slice(&fg);
        }
    }

    image::RgbaImage::from_raw(width, height, data)
        .ok_or_else(|| SegmarkError::codec("rasterized buffer does not match dimensions"))
}
