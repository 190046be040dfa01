//! RGBA compositing target for one render call.
use glam::{IVec2, UVec2};
use image::{Rgba, RgbaImage};

use crate::error::{Error, Result};
use crate::glyph::GlyphTile;

/// Initial fill of a [`Canvas`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Background {
    #[default]
    OpaqueBlack,
    Transparent,
    Color([u8; 4]),
}

impl Background {
    pub fn rgba(self) -> Rgba<u8> {
        match self {
            Background::OpaqueBlack => Rgba([0, 0, 0, 255]),
            Background::Transparent => Rgba([0, 0, 0, 0]),
            Background::Color(c) => Rgba(c),
        }
    }
}

/// Output raster that glyph tiles are blended into, in compositing order.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32, background: Background) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InputShape(format!(
                "canvas must be at least 1x1, got {width}x{height}"
            )));
        }
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, background.rgba()),
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.image.width(), self.image.height())
    }

    /// `true` if a `size` box at `top_left` lies fully inside the canvas.
    pub fn contains_box(&self, top_left: IVec2, size: UVec2) -> bool {
        let (left, top) = (top_left.x as i64, top_left.y as i64);
        left >= 0
            && top >= 0
            && left + size.x as i64 <= self.image.width() as i64
            && top + size.y as i64 <= self.image.height() as i64
    }

    /// Blend `tile` over the canvas with its top-left corner at `top_left`.
    ///
    /// Tile pixels falling outside the canvas are clipped.
    pub fn composite(&mut self, tile: &GlyphTile, top_left: IVec2) {
        let src = tile.as_image();
        let (cw, ch) = (self.image.width() as i64, self.image.height() as i64);
        for (tx, ty, pixel) in src.enumerate_pixels() {
            if pixel[3] == 0 {
                continue;
            }
            let x = top_left.x as i64 + tx as i64;
            let y = top_left.y as i64 + ty as i64;
            if x < 0 || y < 0 || x >= cw || y >= ch {
                continue;
            }
            let dst = self.image.get_pixel_mut(x as u32, y as u32);
            *dst = blend_over(*pixel, *dst);
        }
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Straight-alpha source-over: `out_a = sa + da * (1 - sa)`.
pub fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    if sa >= 1.0 {
        return src;
    }
    let da = dst[3] as f32 / 255.0;
    let oa = sa + da * (1.0 - sa);
    if oa <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let mix = |s: u8, d: u8| {
        let c = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / oa;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        (oa * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::{DotFace, GlyphRasterizer};

    fn white_dot(px: u32, alpha: u8) -> GlyphTile {
        GlyphRasterizer::from_face(DotFace)
            .rasterize('x', px, Rgba([255, 255, 255, alpha]), 0.0)
            .unwrap()
            .unwrap()
    }

    #[test]
    fn zero_sized_canvas_is_rejected() {
        assert!(Canvas::new(0, 4, Background::default())
            .unwrap_err()
            .is_input_shape());
    }

    #[test]
    fn backgrounds_fill_the_canvas() {
        let black = Canvas::new(2, 2, Background::OpaqueBlack).unwrap();
        assert!(black.as_image().pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
        let clear = Canvas::new(2, 2, Background::Transparent).unwrap();
        assert!(clear.as_image().pixels().all(|p| p[3] == 0));
        let red = Canvas::new(1, 1, Background::Color([255, 0, 0, 128])).unwrap();
        assert_eq!(*red.as_image().get_pixel(0, 0), Rgba([255, 0, 0, 128]));
    }

    #[test]
    fn contains_box_checks_all_edges() {
        let canvas = Canvas::new(10, 10, Background::default()).unwrap();
        let size = UVec2::new(3, 3);
        assert!(canvas.contains_box(IVec2::new(0, 0), size));
        assert!(canvas.contains_box(IVec2::new(7, 7), size));
        assert!(!canvas.contains_box(IVec2::new(8, 7), size));
        assert!(!canvas.contains_box(IVec2::new(-1, 0), size));
        assert!(!canvas.contains_box(IVec2::new(0, 8), size));
    }

    #[test]
    fn half_transparent_white_over_black_is_mid_gray() {
        let mut canvas = Canvas::new(4, 4, Background::OpaqueBlack).unwrap();
        canvas.composite(&white_dot(10, 128), IVec2::new(1, 1));
        let p = canvas.as_image().get_pixel(2, 2);
        assert_eq!(*p, Rgba([128, 128, 128, 255]));
        assert_eq!(*canvas.as_image().get_pixel(0, 0), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn over_transparent_keeps_source_color() {
        let mut canvas = Canvas::new(3, 3, Background::Transparent).unwrap();
        canvas.composite(&white_dot(10, 100), IVec2::ZERO);
        assert_eq!(*canvas.as_image().get_pixel(1, 1), Rgba([255, 255, 255, 100]));
    }

    #[test]
    fn later_tiles_blend_over_earlier_ones() {
        let mut canvas = Canvas::new(3, 3, Background::Transparent).unwrap();
        canvas.composite(&white_dot(10, 255), IVec2::ZERO);
        let dark = GlyphRasterizer::from_face(DotFace)
            .rasterize('x', 10, Rgba([0, 0, 0, 255]), 0.0)
            .unwrap()
            .unwrap();
        canvas.composite(&dark, IVec2::ZERO);
        assert_eq!(*canvas.as_image().get_pixel(1, 1), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn out_of_bounds_pixels_are_clipped() {
        let mut canvas = Canvas::new(2, 2, Background::Transparent).unwrap();
        canvas.composite(&white_dot(10, 255), IVec2::new(-2, -2));
        assert_eq!(canvas.as_image().get_pixel(0, 0)[3], 255);
        assert_eq!(canvas.as_image().get_pixel(1, 1)[3], 0);
    }
}
