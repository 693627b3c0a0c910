use crate::foundation::error::{SegmarkError, SegmarkResult};
use serde::{Deserialize, Serialize};

/// Run-length encoded binary mask as returned by the segmentation service.
///
/// `counts` alternates background and foreground run lengths, background first, over the
/// row-major `height * width` pixel grid. Runs are digit sequences separated by any non-digit
/// characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationMask {
    /// `[height, width]`.
    pub size: [u32; 2],
    /// Run lengths.
    pub counts: String,
}

impl SegmentationMask {
    /// Mask height in pixels.
    pub fn height(&self) -> u32 {
        self.size[0]
    }

    /// Mask width in pixels.
    pub fn width(&self) -> u32 {
        self.size[1]
    }

    /// `height * width`.
    pub fn pixel_count(&self) -> usize {
        (self.height() as usize).saturating_mul(self.width() as usize)
    }
}

/// Dense row-major binary mask (one byte per pixel, `0` or `1`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    bits: Vec<u8>,
}

impl Bitmap {
    /// All-background bitmap.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![0; (width as usize).saturating_mul(height as usize)],
        }
    }

    /// Wrap `bits`; any non-zero byte is treated as foreground.
    pub fn from_bits(width: u32, height: u32, bits: Vec<u8>) -> SegmarkResult<Self> {
        let expected = (width as usize).saturating_mul(height as usize);
        if bits.len() != expected {
            return Err(SegmarkError::codec(format!(
                "bitmap of {width}x{height} needs {expected} bits, got {}",
                bits.len()
            )));
        }
        let bits = bits.into_iter().map(|b| u8::from(b != 0)).collect();
        Ok(Self {
            width,
            height,
            bits,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major bits.
    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Consume into the row-major bits.
    pub fn into_bits(self) -> Vec<u8> {
        self.bits
    }

    /// Bit at `(x, y)`; out-of-bounds reads are background.
    pub fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.bits[(y as usize) * (self.width as usize) + (x as usize)]
    }

    /// Number of foreground pixels.
    pub fn area(&self) -> usize {
        self.bits.iter().filter(|&&b| b == 1).count()
    }
}

/// Numeric run lengths of `counts`, ignoring every non-digit character.
///
/// Runs too large for `usize` saturate, which fills the rest of the mask.
pub fn parse_counts(counts: &str) -> impl Iterator<Item = usize> + '_ {
    counts
        .split(|c: char| !c.is_ascii_digit())
        .filter(|tok| !tok.is_empty())
        .map(|tok| tok.parse::<usize>().unwrap_or(usize::MAX))
}

/// Decode `mask` into a dense bitmap.
///
/// Never fails: fills are clamped to the pixel grid, and pixels past the last parseable run stay
/// background.
pub fn decode(mask: &SegmentationMask) -> Bitmap {
    let total = mask.pixel_count();
    let mut bits = vec![0u8; total];
    let mut index = 0usize;
    let mut value = 0u8;

    for count in parse_counts(&mask.counts) {
        let end = index.saturating_add(count).min(total);
        if value == 1 {
            bits[index..end].fill(1);
        }
        value ^= 1;
        index = index.saturating_add(count);
        if index >= total {
            break;
        }
    }

    if index > total {
        tracing::warn!(
            covered = index,
            pixels = total,
            "rle runs overflow the mask; trailing runs clamped"
        );
    } else if index < total {
        tracing::debug!(
            covered = index,
            pixels = total,
            "rle runs end early; remainder left as background"
        );
    }

    Bitmap {
        width: mask.width(),
        height: mask.height(),
        bits,
    }
}

/// Like [`decode`], but rejects `counts` that contain no run length at all.
pub fn try_decode(mask: &SegmentationMask) -> SegmarkResult<Bitmap> {
    if parse_counts(&mask.counts).next().is_none() {
        return Err(SegmarkError::codec(format!(
            "rle counts contain no run lengths: {:?}",
            mask.counts
        )));
    }
    Ok(decode(mask))
}

/// Encode row-major bits into the alternating background-first run format.
pub fn encode(bitmap: &Bitmap) -> SegmentationMask {
    let mut counts: Vec<usize> = Vec::new();
    let mut prev = 0u8;
    let mut run = 0usize;
    for &b in bitmap.as_slice() {
        if b != prev {
            counts.push(run);
            run = 0;
            prev = b;
        }
        run += 1;
    }
    counts.push(run);

    let counts = counts
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    SegmentationMask {
        size: [bitmap.height(), bitmap.width()],
        counts,
    }
}

/// Nearest-neighbour resample of `src` to `dst_width x dst_height`.
pub fn scale_mask(src: &Bitmap, dst_width: u32, dst_height: u32) -> Bitmap {
    if src.width == dst_width && src.height == dst_height {
        return src.clone();
    }
    let mut out = Bitmap::empty(dst_width, dst_height);
    if src.width == 0 || src.height == 0 {
        return out;
    }

    let sw = u64::from(src.width);
    let sh = u64::from(src.height);
    let dw = u64::from(dst_width);
    let dh = u64::from(dst_height);
    for y in 0..dst_height {
        let sy = (u64::from(y) * sh / dh) as u32;
        let row = (y as usize) * (dst_width as usize);
        for x in 0..dst_width {
            let sx = (u64::from(x) * sw / dw) as u32;
            out.bits[row + x as usize] = src.get(sx, sy);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/mask/rle.rs"]
mod tests;
