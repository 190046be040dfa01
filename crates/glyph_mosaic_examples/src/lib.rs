#![forbid(unsafe_code)]

mod synthetic;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use glyph_mosaic::prelude::{MosaicOutput, RegionLabelMap};
use image::{DynamicImage, RgbImage};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use synthetic::synthetic_face;

/// Install a formatting subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Load a portrait as 8-bit RGB.
pub fn load_source_image(path: impl AsRef<Path>) -> Result<RgbImage> {
    let path = path.as_ref();
    let image = image::open(path).with_context(|| format!("open image {}", path.display()))?;
    Ok(image.to_rgb8())
}

/// Load a label map from a single-channel PNG. 16-bit maps keep their full id range.
pub fn load_label_map(path: impl AsRef<Path>) -> Result<RegionLabelMap> {
    let path = path.as_ref();
    let image =
        image::open(path).with_context(|| format!("open label map {}", path.display()))?;
    let labels = match image {
        DynamicImage::ImageLuma16(buf) => RegionLabelMap::from_luma16(&buf)?,
        other => RegionLabelMap::from_luma8(&other.to_luma8())?,
    };
    Ok(labels)
}

/// Write the composite PNG and, if requested, the placement log JSON.
pub fn write_outputs(
    output: &MosaicOutput,
    png_path: impl AsRef<Path>,
    log_path: Option<&Path>,
) -> Result<()> {
    let png_path = png_path.as_ref();
    fs::write(png_path, output.encode_png()?)
        .with_context(|| format!("write {}", png_path.display()))?;
    info!("Wrote {}.", png_path.display());
    if let Some(log_path) = log_path {
        fs::write(log_path, output.log.to_json_pretty()?)
            .with_context(|| format!("write {}", log_path.display()))?;
        info!(
            "Wrote {} placement records to {}.",
            output.log.len(),
            log_path.display()
        );
    }
    Ok(())
}
