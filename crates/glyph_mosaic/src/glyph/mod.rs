//! Glyph rendering: faces, the font fallback chain, tile rasterization and rotation.
//!
//! - Implement [`GlyphFace`] to plug in a custom glyph source.
//! - Build a [`FontChain`] to pick the first loadable face from an ordered list of sources.
//! - Use [`GlyphRasterizer`] to turn a symbol into a colored, rotated [`GlyphTile`].
pub mod face;
pub mod fonts;
pub mod rasterizer;
pub mod rotate;

pub use face::{BuiltinFace, Coverage, DotFace, FontdueFace, GlyphFace};
pub use fonts::{FontChain, FontSource};
pub use rasterizer::{GlyphError, GlyphRasterizer, GlyphTile, MAX_TILE_EDGE_PX};
