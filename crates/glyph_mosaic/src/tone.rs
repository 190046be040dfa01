//! Brightness and sizing functions.
//!
//! Raw pixel brightness (mean of the RGB channels, `0..=255`) is normalized, gamma corrected and
//! scaled by the region's brightness factor. The result drives both the glyph's gray level and
//! its size: darker cells get larger glyphs, important regions get larger glyphs.

/// Gamma applied to normalized brightness before it is used for color or size.
pub const DEFAULT_GAMMA: f32 = 0.75;

/// Lower bound of a glyph's size as a percentage of the region's base font size.
pub const SIZE_FLOOR_PERCENT: u32 = 85;

/// Gamma-correct a normalized brightness value.
///
/// Returns `0.0` for inputs `<= 0` (and for NaN), otherwise `norm.powf(gamma)` with `norm`
/// capped at `1.0`.
#[inline]
pub fn gamma_correct(norm: f32, gamma: f32) -> f32 {
    if norm.is_nan() || norm <= 0.0 {
        return 0.0;
    }
    norm.min(1.0).powf(gamma)
}

/// Integer-pixel variant of [`gamma_correct`]: clamps `raw` to `0..=255` first, then truncates the
/// corrected value back to a byte.
pub fn gamma_correct_u8(raw: f32, gamma: f32) -> u8 {
    let raw = if raw.is_finite() { raw.clamp(0.0, 255.0) } else { 0.0 };
    let corrected = gamma_correct(raw / 255.0, gamma) * 255.0;
    corrected.clamp(0.0, 255.0) as u8
}

/// Size multiplier for a glyph: `(0.9 + 0.5 * (1 - norm)) * importance`.
#[inline]
pub fn size_factor(norm: f32, importance: f32) -> f32 {
    (0.9 + 0.5 * (1.0 - norm)) * importance
}

/// Smallest size a glyph with the given base size may take: `ceil(base * 0.85)`.
#[inline]
pub fn size_floor(base_font_size: u32) -> u32 {
    let scaled = base_font_size as u64 * SIZE_FLOOR_PERCENT as u64;
    scaled.div_ceil(100) as u32
}

/// Final glyph size in pixels: `max(ceil(base * 0.85), round(base * size_factor))`, never `0`.
pub fn final_size(base_font_size: u32, norm: f32, importance: f32) -> u32 {
    let floor = size_floor(base_font_size);
    let scaled = (base_font_size as f32 * size_factor(norm, importance)).round();
    let scaled = if scaled.is_finite() && scaled > 0.0 {
        scaled.min(u32::MAX as f32) as u32
    } else {
        0
    };
    floor.max(scaled).max(1)
}

/// Brightness of one sampled cell after gamma correction and the region's brightness factor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    /// Raw mean channel value in `0..=255`.
    pub raw: f32,
    /// Adjusted brightness in `[0, 1]`.
    pub norm: f32,
}

impl Tone {
    pub fn from_raw(raw: f32, gamma: f32, brightness_factor: f32) -> Self {
        let raw = if raw.is_finite() { raw.clamp(0.0, 255.0) } else { 0.0 };
        let factor = brightness_factor.clamp(0.0, 1.0);
        Self {
            raw,
            norm: gamma_correct(raw / 255.0, gamma) * factor,
        }
    }

    /// Adjusted brightness as a byte, truncated.
    pub fn level(&self) -> u8 {
        (self.norm * 255.0).clamp(0.0, 255.0) as u8
    }

    /// Glyph size for a region with the given base size and importance.
    pub fn glyph_size(&self, base_font_size: u32, importance: f32) -> u32 {
        final_size(base_font_size, self.norm, importance)
    }
}
