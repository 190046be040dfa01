//! Glyph faces produce 8-bit coverage bitmaps for single symbols.
use fontdue::{Font, FontSettings};

use crate::error::{Error, Result};

/// Ink coverage of one glyph, cropped to its tight bounding box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coverage {
    pub width: u32,
    pub height: u32,
    /// Row-major coverage values, `width * height` long.
    pub data: Vec<u8>,
}

impl Coverage {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Coverage of a glyph without ink.
    pub fn empty() -> Self {
        Self::new(0, 0, Vec::new())
    }

    /// `true` if the glyph has a zero-width or zero-height box.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Crop blank border rows and columns. A bitmap without ink becomes empty.
    pub fn trimmed(self) -> Self {
        if self.is_empty() {
            return Self::empty();
        }
        let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
        let (mut max_x, mut max_y) = (0u32, 0u32);
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) > 0 {
                    min_x = min_x.min(x);
                    max_x = max_x.max(x);
                    min_y = min_y.min(y);
                    max_y = max_y.max(y);
                }
            }
        }
        if min_x == u32::MAX {
            return Self::empty();
        }
        if (min_x, min_y, max_x + 1, max_y + 1) == (0, 0, self.width, self.height) {
            return self;
        }
        let width = max_x - min_x + 1;
        let height = max_y - min_y + 1;
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in min_y..=max_y {
            let row = y as usize * self.width as usize;
            data.extend_from_slice(&self.data[row + min_x as usize..=row + max_x as usize]);
        }
        Self::new(width, height, data)
    }
}

/// A source of glyph coverage bitmaps.
pub trait GlyphFace: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Coverage of `symbol` rendered at `px` pixels, cropped to its ink.
    fn coverage(&self, symbol: char, px: f32) -> Coverage;
}

/// TrueType/OpenType face rasterized with `fontdue`.
pub struct FontdueFace {
    name: String,
    font: Font,
}

impl FontdueFace {
    pub fn from_bytes(name: impl Into<String>, data: &[u8]) -> Result<Self> {
        let name = name.into();
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|e| Error::Configuration(format!("cannot parse font '{name}': {e}")))?;
        Ok(Self { name, font })
    }

    /// `true` if the font maps `symbol` to a real glyph rather than `.notdef`.
    pub fn has_glyph(&self, symbol: char) -> bool {
        self.font.lookup_glyph_index(symbol) != 0
    }
}

impl GlyphFace for FontdueFace {
    fn name(&self) -> &str {
        &self.name
    }

    fn coverage(&self, symbol: char, px: f32) -> Coverage {
        let (metrics, bitmap) = self.font.rasterize(symbol, px);
        Coverage::new(metrics.width as u32, metrics.height as u32, bitmap).trimmed()
    }
}

/// DejaVu Sans, embedded so rendering never depends on installed fonts.
pub const BUILTIN_FONT_DATA: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Name the embedded face reports in logs.
pub const BUILTIN_FACE_NAME: &str = "built-in DejaVu Sans";

/// The embedded font. Symbols it has no glyph for render through [`DotFace`].
pub struct BuiltinFace {
    font: FontdueFace,
}

impl BuiltinFace {
    pub fn new() -> Result<Self> {
        Ok(Self {
            font: FontdueFace::from_bytes(BUILTIN_FACE_NAME, BUILTIN_FONT_DATA)?,
        })
    }
}

impl GlyphFace for BuiltinFace {
    fn name(&self) -> &str {
        self.font.name()
    }

    fn coverage(&self, symbol: char, px: f32) -> Coverage {
        if self.font.has_glyph(symbol) {
            self.font.coverage(symbol, px)
        } else {
            DotFace.coverage(symbol, px)
        }
    }
}

/// Diameter of a [`DotFace`] glyph relative to the requested size.
pub const DOT_SCALE: f32 = 0.3;

/// Face that needs no font data: every visible symbol renders as a filled dot.
///
/// Whitespace renders empty. The dot diameter is `round(px * 0.3)`, at least one pixel.
#[derive(Clone, Copy, Debug, Default)]
pub struct DotFace;

impl DotFace {
    pub fn diameter(px: f32) -> u32 {
        let d = (px * DOT_SCALE).round();
        if d.is_finite() && d >= 1.0 {
            d as u32
        } else {
            1
        }
    }
}

impl GlyphFace for DotFace {
    fn name(&self) -> &str {
        "built-in dot"
    }

    fn coverage(&self, symbol: char, px: f32) -> Coverage {
        if symbol.is_whitespace() || symbol.is_control() {
            return Coverage::empty();
        }
        let d = Self::diameter(px);
        let r = d as f32 / 2.0;
        let mut data = Vec::with_capacity(d as usize * d as usize);
        for y in 0..d {
            for x in 0..d {
                let dx = x as f32 + 0.5 - r;
                let dy = y as f32 + 0.5 - r;
                let inside = dx * dx + dy * dy <= r * r;
                data.push(if inside { 255 } else { 0 });
            }
        }
        Coverage::new(d, d, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimmed_crops_blank_border() {
        #[rustfmt::skip]
        let cov = Coverage::new(4, 3, vec![
            0, 0,   0, 0,
            0, 10, 20, 0,
            0, 0,  30, 0,
        ]);
        let t = cov.trimmed();
        assert_eq!((t.width, t.height), (2, 2));
        assert_eq!(t.data, vec![10, 20, 0, 30]);
    }

    #[test]
    fn trimmed_without_ink_is_empty() {
        let cov = Coverage::new(3, 3, vec![0; 9]).trimmed();
        assert!(cov.is_empty());
        assert_eq!(cov, Coverage::empty());
    }

    #[test]
    fn dot_face_scales_with_size() {
        let face = DotFace;
        let small = face.coverage('∂', 10.0);
        assert_eq!((small.width, small.height), (3, 3));
        assert!(small.data.iter().all(|&c| c == 255));
        let large = face.coverage('∂', 20.0);
        assert_eq!((large.width, large.height), (6, 6));
        assert_eq!(face.coverage('x', 0.5).width, 1);
    }

    #[test]
    fn dot_face_whitespace_is_empty() {
        assert!(DotFace.coverage(' ', 12.0).is_empty());
        assert!(DotFace.coverage('\u{3000}', 12.0).is_empty());
    }

    #[test]
    fn builtin_face_draws_distinct_symbols() {
        let face = BuiltinFace::new().unwrap();
        let partial = face.coverage('∂', 32.0);
        let infinity = face.coverage('∞', 32.0);
        assert!(!partial.is_empty());
        assert!(!infinity.is_empty());
        assert_ne!(partial, infinity);
        assert_ne!(partial, DotFace.coverage('∂', 32.0));
        assert!(face.coverage(' ', 32.0).is_empty());
    }

    #[test]
    fn builtin_face_uses_dots_for_missing_glyphs() {
        let face = BuiltinFace::new().unwrap();
        assert!(face.font.has_glyph('∂'));
        assert!(!face.font.has_glyph('⧉'));
        assert_eq!(face.coverage('⧉', 20.0), DotFace.coverage('⧉', 20.0));
    }

    #[test]
    fn fontdue_face_rejects_garbage() {
        let err = FontdueFace::from_bytes("junk", b"definitely not a font")
            .err()
            .expect("garbage should not parse");
        assert!(err.is_configuration());
    }
}
