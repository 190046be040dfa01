use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glyph_mosaic::prelude::*;
use glyph_mosaic_examples::{init_tracing, load_label_map, load_source_image, write_outputs};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

/// Render a portrait as a symbolic mosaic guided by a segmentation label map.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Source portrait (PNG or JPEG)
    #[arg(long)]
    image: PathBuf,

    /// Single-channel label map, one region id per pixel
    #[arg(long)]
    labels: PathBuf,

    /// JSON settings keyed by region name or id
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Font file tried before the system defaults; repeatable
    #[arg(long = "font")]
    fonts: Vec<PathBuf>,

    /// Seed for the random source
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Average brightness over a (2r+1)^2 window instead of a single pixel
    #[arg(long)]
    patch_radius: Option<u32>,

    /// Skip cells at or below this raw brightness
    #[arg(long)]
    black_cutoff: Option<u8>,

    /// Where glyph alpha comes from
    #[arg(long, value_enum, default_value_t = AlphaArg::Region)]
    alpha: AlphaArg,

    /// Render onto a transparent canvas instead of black
    #[arg(long)]
    transparent: bool,

    /// Output PNG path
    #[arg(long, default_value = "mosaic.png")]
    out: PathBuf,

    /// Placement log JSON path
    #[arg(long)]
    log: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum AlphaArg {
    Region,
    Settings,
    Product,
}

impl From<AlphaArg> for AlphaPolicy {
    fn from(value: AlphaArg) -> Self {
        match value {
            AlphaArg::Region => AlphaPolicy::RegionOpacity,
            AlphaArg::Settings => AlphaPolicy::SettingsOpacity,
            AlphaArg::Product => AlphaPolicy::Product,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let image = load_source_image(&args.image)?;
    let labels = load_label_map(&args.labels)?;
    let settings = match &args.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("read settings {}", path.display()))?;
            SettingsTable::from_json_str(&json)?
        }
        None => SettingsTable::new(),
    };

    let fonts = args
        .fonts
        .iter()
        .fold(FontChain::new(), |chain, path| chain.with_file(path))
        .then(FontChain::default());

    let mut config = RenderConfig::new().with_alpha_policy(args.alpha.into());
    if let Some(radius) = args.patch_radius {
        config = config.with_sampling(BrightnessSampling::PatchMean { radius });
    }
    if let Some(cutoff) = args.black_cutoff {
        config = config.with_black_cutoff(cutoff);
    }
    if args.transparent {
        config = config.with_background(Background::Transparent);
    }

    let registry = StyleTable::face_catalogue();
    let runner = MosaicRunner::try_new(config, &registry, &fonts)?;
    let mut rng = StdRng::seed_from_u64(args.seed);
    let output = runner.run(&image, &labels, &settings, &mut rng)?;

    for summary in &output.regions {
        info!(
            "Region {:>2} {:<8} placed {:>6} | dropped {:>5} | fallback {:>5}",
            summary.region,
            region_key(summary.region).unwrap_or("-"),
            summary.placed,
            summary.dropped,
            summary.placed_fallback,
        );
    }

    write_outputs(&output, &args.out, args.log.as_deref())
}
