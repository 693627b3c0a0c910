pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Map a unit-interval alpha to the 8-bit range, truncating like canvas `ImageData` writers do.
pub(crate) fn unit_alpha_to_u8(a: f32) -> u8 {
    if !a.is_finite() {
        return 0;
    }
    (a.clamp(0.0, 1.0) * 255.0).floor() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
