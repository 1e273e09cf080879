//! RGBA8 color helpers.

/// Zeroth-order spherical harmonic basis constant, `sqrt(1 / 4π)`.
pub const SH_C0: f32 = 0.282_094_8;

/// Clamp to `[0, 255]` and truncate toward zero. NaN maps to 0.
#[inline]
pub fn clamp255(x: f32) -> u8 {
    if x >= 255.0 {
        255
    } else if x > 0.0 {
        x as u8
    } else {
        0
    }
}

/// Convert a DC spherical harmonic coefficient to a color byte.
#[inline]
pub fn sh_dc_to_byte(f_dc: f32) -> u8 {
    clamp255((0.5 + SH_C0 * f_dc) * 255.0)
}

/// Pack bytes as `r | g << 8 | b << 16 | a << 24`.
#[inline]
pub fn pack_rgba(rgba: [u8; 4]) -> u32 {
    u32::from_le_bytes(rgba)
}

/// Inverse of [`pack_rgba`].
#[inline]
pub fn unpack_rgba(word: u32) -> [u8; 4] {
    word.to_le_bytes()
}
