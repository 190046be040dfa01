use glam::UVec2;
use image::{Rgba, RgbaImage};

use crate::glyph::face::GlyphFace;
use crate::glyph::rotate::{rotate_expand, rotated_extent};

/// Largest tile edge the rasterizer produces, in pixels.
pub const MAX_TILE_EDGE_PX: u32 = 4096;

/// Failure to produce a glyph tile. The planner skips the sample and keeps going.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GlyphError {
    #[error("glyph size must be at least 1 px, got {0}")]
    InvalidSize(u32),
    #[error("glyph size {px} px exceeds the {max} px limit")]
    SizeTooLarge { px: u32, max: u32 },
    #[error("rotation angle must be finite, got {0}")]
    InvalidAngle(f32),
    #[error("glyph tile {width}x{height} exceeds the {max} px limit")]
    TileTooLarge { width: u32, height: u32, max: u32 },
}

/// A colored, rotated glyph ready to be composited.
///
/// The tile is the tight box around the rotated glyph; its center is the anchor point.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphTile {
    image: RgbaImage,
}

impl GlyphTile {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.image.width(), self.image.height())
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Turns symbols into [`GlyphTile`]s using a [`GlyphFace`].
pub struct GlyphRasterizer {
    face: Box<dyn GlyphFace>,
}

impl GlyphRasterizer {
    pub fn new(face: Box<dyn GlyphFace>) -> Self {
        Self { face }
    }

    pub fn from_face<F: GlyphFace + 'static>(face: F) -> Self {
        Self::new(Box::new(face))
    }

    pub fn face_name(&self) -> &str {
        self.face.name()
    }

    /// Render `symbol` at `px` pixels in `color`, rotated by `angle_deg` (counter-clockwise).
    ///
    /// Tile alpha is the color alpha scaled by glyph coverage. Returns `Ok(None)` when the
    /// symbol has no ink at this size. Sizes above [`MAX_TILE_EDGE_PX`] are rejected before
    /// the face draws anything.
    pub fn rasterize(
        &self,
        symbol: char,
        px: u32,
        color: Rgba<u8>,
        angle_deg: f32,
    ) -> Result<Option<GlyphTile>, GlyphError> {
        if px == 0 {
            return Err(GlyphError::InvalidSize(px));
        }
        if px > MAX_TILE_EDGE_PX {
            return Err(GlyphError::SizeTooLarge {
                px,
                max: MAX_TILE_EDGE_PX,
            });
        }
        if !angle_deg.is_finite() {
            return Err(GlyphError::InvalidAngle(angle_deg));
        }

        let coverage = self.face.coverage(symbol, px as f32);
        if coverage.is_empty() {
            return Ok(None);
        }
        let (width, height) = rotated_extent(coverage.width, coverage.height, angle_deg);
        if width > MAX_TILE_EDGE_PX || height > MAX_TILE_EDGE_PX {
            return Err(GlyphError::TileTooLarge {
                width,
                height,
                max: MAX_TILE_EDGE_PX,
            });
        }

        let [r, g, b, a] = color.0;
        let upright = RgbaImage::from_fn(coverage.width, coverage.height, |x, y| {
            let alpha = (a as u32 * coverage.get(x, y) as u32 + 127) / 255;
            Rgba([r, g, b, alpha as u8])
        });
        let image = rotate_expand(&upright, angle_deg);
        Ok(Some(GlyphTile { image }))
    }
}

impl std::fmt::Debug for GlyphRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlyphRasterizer")
            .field("face", &self.face.name())
            .finish()
    }
}
