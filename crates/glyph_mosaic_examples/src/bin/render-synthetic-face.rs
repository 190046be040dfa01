use std::path::Path;

use anyhow::{Context, Result};
use glyph_mosaic::prelude::*;
use glyph_mosaic_examples::{init_tracing, synthetic_face, write_outputs};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<()> {
    init_tracing();
    let (image, labels) = synthetic_face(384, 480)?;
    let region =
        |key: &str| region_id_for_key(key).with_context(|| format!("unknown region {key}"));

    let settings = SettingsTable::new()
        .with_default(RenderSettings::new(40.0, 8.0, 100.0, 100.0)?)
        .with_region(
            region("hair")?,
            RenderSettings::new(20.0, 25.0, 90.0, 100.0)?,
        )
        .with_region(
            region("l_eye")?,
            RenderSettings::new(80.0, 0.0, 100.0, 100.0)?,
        )
        .with_region(
            region("r_eye")?,
            RenderSettings::new(80.0, 0.0, 100.0, 100.0)?,
        );

    let registry = StyleTable::face_catalogue();
    let config = RenderConfig::new().with_black_cutoff(10);
    let runner = MosaicRunner::try_new(config, &registry, &FontChain::default())?;

    let mut sink = VecSink::only([MosaicEventKind::RegionFinished]);
    let mut rng = StdRng::seed_from_u64(42);
    let output = runner.run_with_events(&image, &labels, &settings, &mut rng, &mut sink)?;
    println!(
        "{} glyphs in {} regions",
        output.total_placed(),
        sink.count(MosaicEventKind::RegionFinished)
    );
    println!("{}", output.summaries_json()?);

    write_outputs(
        &output,
        "render-synthetic-face.png",
        Some(Path::new("render-synthetic-face.json")),
    )
}
