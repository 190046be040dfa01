#![forbid(unsafe_code)]
//! glyph_mosaic: region-aware symbolic mosaic rendering of portraits.
//!
//! Modules:
//! - style: region style registry, the face-parsing catalogue, and per-region render settings
//! - tone: gamma correction and brightness-driven glyph sizing
//! - label_map: per-pixel region labels with nearest-neighbour resampling
//! - glyph: glyph faces, font fallback chain, tile rasterization and rotation
//! - canvas: the RGBA compositing target
//! - mosaic: placement resolution, region planner, runner, events, placement log
//! - output: render results and their encodings
pub mod canvas;
pub mod error;
pub mod glyph;
pub mod label_map;
pub mod mosaic;
pub mod output;
pub mod style;
pub mod tone;

/// Convenient re-exports for common types. Import with `use glyph_mosaic::prelude::*;`.
pub mod prelude {
    pub use crate::canvas::{Background, Canvas};
    pub use crate::error::{Error, Result};
    pub use crate::glyph::{
        BuiltinFace, Coverage, DotFace, FontChain, FontSource, FontdueFace, GlyphError, GlyphFace,
        GlyphRasterizer, GlyphTile,
    };
    pub use crate::label_map::{RegionLabelMap, BACKGROUND_REGION};
    pub use crate::mosaic::events::{
        EventSink, FnSink, MosaicEvent, MosaicEventKind, MultiSink, SkipReason, VecSink,
    };
    pub use crate::mosaic::log::{PlacementLog, PlacementRecord};
    pub use crate::mosaic::placement::{
        Attempt, PlacementBounds, PlacementResolver, Resolution, JITTER_CAP_PX,
    };
    pub use crate::mosaic::planner::{render_region, RegionContext, RegionSummary};
    pub use crate::mosaic::runner::{
        render_mosaic, render_mosaic_with_events, AlphaPolicy, MosaicRunner, RenderConfig,
    };
    pub use crate::mosaic::sampling::BrightnessSampling;
    pub use crate::output::MosaicOutput;
    pub use crate::style::catalogue::{region_id_for_key, region_key};
    pub use crate::style::settings::{RenderSettings, SettingsTable};
    pub use crate::style::{RegionId, RegionStyle, RegionStyleRegistry, StyleTable};
    pub use crate::tone::{final_size, gamma_correct, gamma_correct_u8, size_factor, DEFAULT_GAMMA};
}
