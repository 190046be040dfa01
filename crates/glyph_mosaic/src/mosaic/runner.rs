//! High-level runner for rendering a mosaic across all regions of a label map.
use std::collections::BTreeSet;

use glam::UVec2;
use image::RgbImage;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::canvas::{Background, Canvas};
use crate::error::{Error, Result};
use crate::glyph::{FontChain, GlyphRasterizer};
use crate::label_map::{RegionLabelMap, BACKGROUND_REGION};
use crate::mosaic::events::{EventSink, MosaicEvent, MosaicEventKind};
use crate::mosaic::log::PlacementLog;
use crate::mosaic::planner::{render_region, RegionContext, RegionSummary};
use crate::mosaic::sampling::BrightnessSampling;
use crate::output::MosaicOutput;
use crate::style::settings::{RenderSettings, SettingsTable};
use crate::style::{RegionId, RegionStyleRegistry};
use crate::tone::DEFAULT_GAMMA;

/// Where the glyph alpha of a region comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlphaPolicy {
    /// The region style's fixed opacity.
    #[default]
    RegionOpacity,
    /// The user opacity setting, scaled to `0..=255`.
    SettingsOpacity,
    /// Region opacity scaled by the user opacity setting.
    Product,
}

impl AlphaPolicy {
    pub fn alpha(&self, region_opacity: u8, settings: &RenderSettings) -> u8 {
        let factor = settings.opacity_factor();
        let value = match self {
            AlphaPolicy::RegionOpacity => return region_opacity,
            AlphaPolicy::SettingsOpacity => 255.0 * factor,
            AlphaPolicy::Product => region_opacity as f32 * factor,
        };
        value.round().clamp(0.0, 255.0) as u8
    }
}

/// Configuration for a render call.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Exponent applied to normalized brightness.
    pub gamma: f32,
    /// How brightness is read at each grid cell.
    pub sampling: BrightnessSampling,
    pub alpha_policy: AlphaPolicy,
    /// Canvas size; the source image size when `None`.
    pub canvas_size: Option<UVec2>,
    pub background: Background,
    /// Cells whose raw brightness is at or below this value produce no glyph.
    pub black_cutoff: Option<u8>,
    /// Regions to render, in order; every labelled region ascending when `None`.
    pub region_order: Option<Vec<RegionId>>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            gamma: DEFAULT_GAMMA,
            sampling: BrightnessSampling::Pixel,
            alpha_policy: AlphaPolicy::RegionOpacity,
            canvas_size: None,
            background: Background::OpaqueBlack,
            black_cutoff: None,
            region_order: None,
        }
    }
}

impl RenderConfig {
    /// Creates a new [`RenderConfig`] with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gamma exponent.
    pub fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Sets the brightness sampling policy.
    pub fn with_sampling(mut self, sampling: BrightnessSampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Sets the alpha policy.
    pub fn with_alpha_policy(mut self, alpha_policy: AlphaPolicy) -> Self {
        self.alpha_policy = alpha_policy;
        self
    }

    /// Sets an explicit canvas size.
    pub fn with_canvas_size(mut self, width: u32, height: u32) -> Self {
        self.canvas_size = Some(UVec2::new(width, height));
        self
    }

    /// Sets the canvas background.
    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// Enables the black cutoff.
    pub fn with_black_cutoff(mut self, cutoff: u8) -> Self {
        self.black_cutoff = Some(cutoff);
        self
    }

    /// Sets an explicit region processing order.
    pub fn with_region_order(mut self, order: impl IntoIterator<Item = RegionId>) -> Self {
        self.region_order = Some(order.into_iter().collect());
        self
    }

    /// Validates the configuration, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        if !(self.gamma.is_finite() && self.gamma > 0.0) {
            return Err(Error::Configuration(format!(
                "gamma must be a positive number, got {}",
                self.gamma
            )));
        }
        if let Some(size) = self.canvas_size {
            if size.x == 0 || size.y == 0 {
                return Err(Error::Configuration(format!(
                    "canvas size must be > 0 in both components, got {}x{}",
                    size.x, size.y
                )));
            }
        }
        if let Some(order) = &self.region_order {
            let mut seen = BTreeSet::new();
            for &id in order {
                if id == BACKGROUND_REGION {
                    return Err(Error::Configuration(
                        "region order must not contain the background region 0".into(),
                    ));
                }
                if !seen.insert(id) {
                    return Err(Error::Configuration(format!(
                        "region {id} appears more than once in the region order"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Renders mosaics with a fixed configuration, style registry and glyph face.
pub struct MosaicRunner<'a> {
    /// Render configuration applied to every run.
    pub config: RenderConfig,
    /// Style registry consulted for every region.
    pub registry: &'a dyn RegionStyleRegistry,
    rasterizer: GlyphRasterizer,
}

impl<'a> MosaicRunner<'a> {
    /// Validate `config` and resolve `fonts` once.
    pub fn try_new(
        config: RenderConfig,
        registry: &'a dyn RegionStyleRegistry,
        fonts: &FontChain,
    ) -> Result<Self> {
        config.validate()?;
        let rasterizer = GlyphRasterizer::new(fonts.resolve()?);
        Ok(Self {
            config,
            registry,
            rasterizer,
        })
    }

    /// Like [`MosaicRunner::try_new`] with an already constructed rasterizer.
    pub fn try_with_rasterizer(
        config: RenderConfig,
        registry: &'a dyn RegionStyleRegistry,
        rasterizer: GlyphRasterizer,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            registry,
            rasterizer,
        })
    }

    pub fn rasterizer(&self) -> &GlyphRasterizer {
        &self.rasterizer
    }

    /// Renders `image` guided by `labels`, returning the composite and its placement log.
    pub fn run(
        &self,
        image: &RgbImage,
        labels: &RegionLabelMap,
        settings: &SettingsTable,
        rng: &mut impl Rng,
    ) -> Result<MosaicOutput> {
        render_mosaic(
            image,
            labels,
            self.registry,
            settings,
            &self.config,
            &self.rasterizer,
            rng,
            None,
        )
    }

    pub fn run_with_events(
        &self,
        image: &RgbImage,
        labels: &RegionLabelMap,
        settings: &SettingsTable,
        rng: &mut impl Rng,
        sink: &mut dyn EventSink,
    ) -> Result<MosaicOutput> {
        render_mosaic(
            image,
            labels,
            self.registry,
            settings,
            &self.config,
            &self.rasterizer,
            rng,
            Some(sink),
        )
    }
}

#[allow(clippy::too_many_arguments)]
pub fn render_mosaic<R: Rng>(
    image: &RgbImage,
    labels: &RegionLabelMap,
    registry: &dyn RegionStyleRegistry,
    settings: &SettingsTable,
    config: &RenderConfig,
    rasterizer: &GlyphRasterizer,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<MosaicOutput> {
    if let Some(s) = sink {
        render_mosaic_with_events(image, labels, registry, settings, config, rasterizer, rng, s)
    } else {
        render_mosaic_with_events(
            image,
            labels,
            registry,
            settings,
            config,
            rasterizer,
            rng,
            &mut (),
        )
    }
}

#[allow(clippy::too_many_arguments)]
pub fn render_mosaic_with_events<R: Rng>(
    image: &RgbImage,
    labels: &RegionLabelMap,
    registry: &dyn RegionStyleRegistry,
    settings: &SettingsTable,
    config: &RenderConfig,
    rasterizer: &GlyphRasterizer,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<MosaicOutput> {
    config.validate()?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(Error::InputShape(format!(
            "source image must be at least 1x1, got {width}x{height}"
        )));
    }
    if labels.dimensions() != (width, height) {
        debug!(
            "Resampling label map from {}x{} to {}x{}.",
            labels.width(),
            labels.height(),
            width,
            height
        );
    }
    let labels = labels.fit_to(width, height)?;

    let canvas_size = config
        .canvas_size
        .unwrap_or_else(|| UVec2::new(width, height));
    let mut canvas = Canvas::new(canvas_size.x, canvas_size.y, config.background)?;

    let regions = match &config.region_order {
        Some(order) => order.clone(),
        None => labels.present_regions(),
    };

    if sink.wants(MosaicEventKind::RunStarted) {
        sink.send(MosaicEvent::RunStarted {
            config: config.clone(),
            regions: regions.clone(),
            canvas_size,
        });
    }

    if regions.is_empty() {
        warn!("Label map has no labelled regions; the canvas stays empty.");
        if sink.wants(MosaicEventKind::Warning) {
            sink.send(MosaicEvent::Warning {
                context: "labels".into(),
                message: "Label map has no labelled regions".into(),
            });
        }
    }

    let ctx = RegionContext {
        image,
        labels: &*labels,
        rasterizer,
        config,
    };
    let mut log = PlacementLog::new();
    let mut summaries: Vec<RegionSummary> = Vec::with_capacity(regions.len());

    for region in regions {
        let mut style = registry.resolve(region)?;
        if !registry.has_style(region) {
            if let Some(symbols) = settings.symbols_for(region) {
                style = style.with_symbols(symbols.iter().copied())?;
            }
        }
        let region_settings = settings.for_region(region);
        let step = region_settings.step_for(style.step_base);
        let name = registry.name(region).map(str::to_owned);

        info!(
            "Region {} ({}): step {} | symbols: {} | opacity: {}.",
            region,
            name.as_deref().unwrap_or("unnamed"),
            step,
            style.symbols.len(),
            style.opacity,
        );
        if sink.wants(MosaicEventKind::RegionStarted) {
            sink.send(MosaicEvent::RegionStarted {
                region,
                name,
                step,
                settings: region_settings,
            });
        }

        let summary = render_region(
            region,
            &style,
            &region_settings,
            &ctx,
            &mut canvas,
            &mut log,
            rng,
            sink,
        );

        if sink.wants(MosaicEventKind::RegionFinished) {
            sink.send(MosaicEvent::RegionFinished {
                summary: summary.clone(),
            });
        }
        summaries.push(summary);
    }

    info!(
        "Rendered {} glyphs across {} regions on a {}x{} canvas.",
        log.len(),
        summaries.len(),
        canvas_size.x,
        canvas_size.y
    );
    if sink.wants(MosaicEventKind::RunFinished) {
        sink.send(MosaicEvent::RunFinished {
            placed: log.len(),
            regions: summaries.clone(),
        });
    }

    Ok(MosaicOutput::new(canvas.into_image(), log, summaries))
}
