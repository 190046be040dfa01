//! Per-region placement planning.
//!
//! A region is scanned in row-major order at its stride. Every grid cell labelled with the region
//! yields at most one glyph, sized and shaded from the source brightness at the cell.
use glam::{IVec2, UVec2};
use image::{Rgba, RgbImage};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, warn};

use crate::canvas::Canvas;
use crate::glyph::GlyphRasterizer;
use crate::label_map::RegionLabelMap;
use crate::mosaic::events::{EventSink, MosaicEvent, MosaicEventKind, SkipReason};
use crate::mosaic::log::{PlacementLog, PlacementRecord};
use crate::mosaic::placement::{
    Attempt, PlacementBounds, PlacementResolver, Resolution, JITTER_CAP_PX,
};
use crate::mosaic::runner::RenderConfig;
use crate::mosaic::{uniform_inclusive, uniform_index};
use crate::style::settings::RenderSettings;
use crate::style::{RegionId, RegionStyle};
use crate::tone::Tone;

/// Diagnostics for one rendered region.
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegionSummary {
    pub region: RegionId,
    /// Scan stride in pixels.
    pub step: u32,
    /// Grid points visited by the scan.
    pub cells_visited: usize,
    /// Grid points labelled with this region.
    pub cells_in_region: usize,
    /// Glyphs composited.
    pub placed: usize,
    /// Glyphs accepted at their jittered position.
    pub placed_jittered: usize,
    /// Glyphs accepted at their unjittered grid point.
    pub placed_fallback: usize,
    /// Glyphs whose both candidates were rejected.
    pub dropped: usize,
    /// Cells skipped by the black cutoff.
    pub below_cutoff: usize,
    /// Symbols without ink at their size.
    pub empty_glyphs: usize,
    /// Samples skipped because rasterization failed.
    pub glyph_errors: usize,
}

impl RegionSummary {
    pub fn new(region: RegionId, step: u32) -> Self {
        Self {
            region,
            step,
            ..Default::default()
        }
    }
}

/// Shared, read-only inputs of every region pass in a run.
#[derive(Debug, Clone, Copy)]
pub struct RegionContext<'a> {
    pub image: &'a RgbImage,
    /// Label map at the image size.
    pub labels: &'a RegionLabelMap,
    pub rasterizer: &'a GlyphRasterizer,
    pub config: &'a RenderConfig,
}

/// Render every glyph of `region` into `canvas`, appending to `log` in compositing order.
///
/// `style` must already carry any symbol override for the region. Per-sample problems are
/// counted in the returned summary and never abort the pass.
#[allow(clippy::too_many_arguments)]
pub fn render_region(
    region: RegionId,
    style: &RegionStyle,
    settings: &RenderSettings,
    ctx: &RegionContext<'_>,
    canvas: &mut Canvas,
    log: &mut PlacementLog,
    rng: &mut dyn Rng,
    sink: &mut dyn EventSink,
) -> RegionSummary {
    let step = settings.step_for(style.step_base);
    let mut summary = RegionSummary::new(region, step);
    if style.symbols.is_empty() {
        warn!("Region {} has no symbols; skipping.", region);
        return summary;
    }

    let resolver = PlacementResolver::new(PlacementBounds::new(canvas.size(), ctx.labels, region));
    let rotation_range = settings.rotation_range_degrees().min(i32::MAX as u32) as i32;
    let alpha = ctx.config.alpha_policy.alpha(style.opacity, settings);
    let (width, height) = ctx.labels.dimensions();

    for y in (0..height).step_by(step as usize) {
        for x in (0..width).step_by(step as usize) {
            summary.cells_visited += 1;
            let cell = IVec2::new(x as i32, y as i32);
            if !ctx.labels.is(cell.x, cell.y, region) {
                continue;
            }
            summary.cells_in_region += 1;

            let raw = ctx.config.sampling.sample(ctx.image, x, y);
            if let Some(cutoff) = ctx.config.black_cutoff {
                if raw <= cutoff as f32 {
                    summary.below_cutoff += 1;
                    skipped(sink, region, cell, SkipReason::BelowBlackCutoff);
                    continue;
                }
            }

            let tone = Tone::from_raw(raw, ctx.config.gamma, settings.brightness_factor());
            let level = tone.level();
            let font_size = tone.glyph_size(style.base_font_size, style.importance);
            let color = Rgba([level, level, level, alpha]);

            let symbol = style.symbols[uniform_index(rng, style.symbols.len())];
            let rotation = uniform_inclusive(rng, -rotation_range, rotation_range);

            let tile = match ctx
                .rasterizer
                .rasterize(symbol, font_size, color, rotation as f32)
            {
                Ok(Some(tile)) => tile,
                Ok(None) => {
                    summary.empty_glyphs += 1;
                    skipped(sink, region, cell, SkipReason::EmptyGlyph);
                    continue;
                }
                Err(e) => {
                    warn!(
                        "Region {} cell ({}, {}): cannot rasterize '{}': {}.",
                        region, x, y, symbol, e
                    );
                    summary.glyph_errors += 1;
                    if sink.wants(MosaicEventKind::Warning) {
                        sink.send(MosaicEvent::Warning {
                            context: format!("region:{region} cell:{x},{y}"),
                            message: format!("Cannot rasterize '{symbol}': {e}"),
                        });
                    }
                    skipped(sink, region, cell, SkipReason::GlyphFailed(e.to_string()));
                    continue;
                }
            };

            let jitter = IVec2::new(
                uniform_inclusive(rng, -JITTER_CAP_PX, JITTER_CAP_PX),
                uniform_inclusive(rng, -JITTER_CAP_PX, JITTER_CAP_PX),
            );
            let tile_size: UVec2 = tile.size();
            match resolver.resolve(cell, jitter, tile_size) {
                Resolution::Placed {
                    attempt,
                    center,
                    top_left,
                } => {
                    canvas.composite(&tile, top_left);
                    let mut record = PlacementRecord {
                        symbol,
                        font_size,
                        center,
                        top_left,
                        rotation,
                        color: color.0,
                        region_id: region,
                        order: 0,
                        tile_size,
                        brightness: level,
                        alpha,
                    };
                    record.order = log.push(record.clone());
                    summary.placed += 1;
                    match attempt {
                        Attempt::Jittered => summary.placed_jittered += 1,
                        Attempt::Fallback => summary.placed_fallback += 1,
                    }
                    if sink.wants(MosaicEventKind::GlyphPlaced) {
                        sink.send(MosaicEvent::GlyphPlaced { record, attempt });
                    }
                }
                Resolution::Dropped => {
                    summary.dropped += 1;
                    skipped(sink, region, cell, SkipReason::Dropped);
                }
            }
        }
    }

    debug!(
        "Region {}: step {} | in region: {} | placed: {} (fallback {}) | dropped: {} | empty: {} | errors: {}.",
        region,
        step,
        summary.cells_in_region,
        summary.placed,
        summary.placed_fallback,
        summary.dropped,
        summary.empty_glyphs,
        summary.glyph_errors,
    );
    summary
}

fn skipped(sink: &mut dyn EventSink, region: RegionId, cell: IVec2, reason: SkipReason) {
    if sink.wants(MosaicEventKind::SampleSkipped) {
        sink.send(MosaicEvent::SampleSkipped {
            region,
            cell,
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use image::Rgb;

    use super::*;
    use crate::canvas::Background;
    use crate::glyph::{Coverage, DotFace, GlyphFace, MAX_TILE_EDGE_PX};
    use crate::mosaic::events::VecSink;
    use crate::mosaic::test_support::FixedRng;

    struct HugeFace;

    impl GlyphFace for HugeFace {
        fn name(&self) -> &str {
            "huge"
        }

        fn coverage(&self, _symbol: char, _px: f32) -> Coverage {
            let edge = MAX_TILE_EDGE_PX + 1;
            Coverage::new(edge, 1, vec![255; edge as usize])
        }
    }

    struct Fixture {
        image: RgbImage,
        labels: RegionLabelMap,
        rasterizer: GlyphRasterizer,
        config: RenderConfig,
    }

    impl Fixture {
        fn new(gray: u8) -> Self {
            Self {
                image: RgbImage::from_pixel(10, 10, Rgb([gray, gray, gray])),
                labels: RegionLabelMap::filled(10, 10, 1).unwrap(),
                rasterizer: GlyphRasterizer::from_face(DotFace),
                config: RenderConfig::new(),
            }
        }

        fn run(
            &self,
            style: &RegionStyle,
            settings: &RenderSettings,
        ) -> (RegionSummary, PlacementLog, VecSink) {
            let ctx = RegionContext {
                image: &self.image,
                labels: &self.labels,
                rasterizer: &self.rasterizer,
                config: &self.config,
            };
            let mut canvas = Canvas::new(10, 10, Background::Transparent).unwrap();
            let mut log = PlacementLog::new();
            let mut sink = VecSink::new();
            let summary = render_region(
                1,
                style,
                settings,
                &ctx,
                &mut canvas,
                &mut log,
                &mut FixedRng::middle(),
                &mut sink,
            );
            (summary, log, sink)
        }
    }

    fn dense() -> RenderSettings {
        RenderSettings::new(100.0, 0.0, 100.0, 100.0).unwrap()
    }

    #[test]
    fn stride_follows_density() {
        let fixture = Fixture::new(128);
        let sparse = RenderSettings::new(0.0, 0.0, 100.0, 100.0).unwrap();
        // fallback step base 6, density 0: stride 7, grid points at 0 and 7
        let (summary, _, _) = fixture.run(&RegionStyle::fallback(), &sparse);
        assert_eq!(summary.step, 7);
        assert_eq!(summary.cells_visited, 4);
        assert_eq!(summary.cells_in_region, 4);
    }

    #[test]
    fn every_in_region_cell_is_accounted_for() {
        let fixture = Fixture::new(128);
        let (summary, log, sink) = fixture.run(&RegionStyle::fallback(), &dense());
        assert_eq!(summary.cells_in_region, 100);
        assert_eq!(summary.placed, 64);
        assert_eq!(summary.placed_jittered, 64);
        assert_eq!(summary.dropped, 36);
        assert_eq!(log.len(), 64);
        assert_eq!(sink.count(MosaicEventKind::GlyphPlaced), 64);
        assert_eq!(sink.count(MosaicEventKind::SampleSkipped), 36);
    }

    #[test]
    fn records_carry_tone_and_style() {
        let fixture = Fixture::new(128);
        let (_, log, _) = fixture.run(&RegionStyle::fallback(), &dense());
        let first = &log.as_slice()[0];
        assert_eq!(first.symbol, '·');
        assert_eq!(first.font_size, 10);
        assert_eq!(first.center, IVec2::new(1, 1));
        assert_eq!(first.top_left, IVec2::ZERO);
        assert_eq!(first.tile_size, UVec2::new(3, 3));
        assert_eq!(first.rotation, 0);
        assert_eq!(first.brightness, 152);
        assert_eq!(first.color, [152, 152, 152, 255]);
        assert_eq!(first.order, 1);
    }

    #[test]
    fn black_cutoff_skips_dark_cells() {
        let mut fixture = Fixture::new(8);
        fixture.config = RenderConfig::new().with_black_cutoff(10);
        let (summary, log, sink) = fixture.run(&RegionStyle::fallback(), &dense());
        assert_eq!(summary.below_cutoff, 100);
        assert!(log.is_empty());
        assert!(sink.as_slice().iter().all(|e| matches!(
            e,
            MosaicEvent::SampleSkipped {
                reason: SkipReason::BelowBlackCutoff,
                ..
            }
        )));
    }

    #[test]
    fn blank_symbols_count_as_empty_glyphs() {
        let fixture = Fixture::new(128);
        let blank = RegionStyle::fallback().with_symbols([' ']).unwrap();
        let (summary, log, _) = fixture.run(&blank, &dense());
        assert_eq!(summary.empty_glyphs, 100);
        assert_eq!(summary.placed, 0);
        assert!(log.is_empty());
    }

    #[test]
    fn glyph_errors_are_counted_not_fatal() {
        let mut fixture = Fixture::new(128);
        fixture.rasterizer = GlyphRasterizer::from_face(HugeFace);
        let sparse = RenderSettings::new(0.0, 0.0, 100.0, 100.0).unwrap();
        let (summary, log, sink) = fixture.run(&RegionStyle::fallback(), &sparse);
        assert_eq!(summary.glyph_errors, 4);
        assert!(log.is_empty());
        assert_eq!(sink.count(MosaicEventKind::Warning), 4);
    }

    #[test]
    fn unlabelled_cells_are_ignored() {
        let mut fixture = Fixture::new(128);
        fixture.labels = RegionLabelMap::filled(10, 10, 2).unwrap();
        let (summary, log, _) = fixture.run(&RegionStyle::fallback(), &dense());
        assert_eq!(summary.cells_visited, 100);
        assert_eq!(summary.cells_in_region, 0);
        assert!(log.is_empty());
    }
}
