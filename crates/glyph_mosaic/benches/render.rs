use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use glyph_mosaic::prelude::{
    render_mosaic, BuiltinFace, DotFace, GlyphRasterizer, RegionLabelMap, RenderConfig,
    RenderSettings, SettingsTable, StyleTable,
};
use image::{Rgb, RgbImage, Rgba};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Synthetic portrait: hair band on top, skin oval with two eyes, background elsewhere.
fn synthetic_portrait(size: u32) -> (RgbImage, RegionLabelMap) {
    let image = RgbImage::from_fn(size, size, |x, y| {
        let v = ((x * 7 + y * 3) % 256) as u8;
        Rgb([v, v, v.wrapping_add(40)])
    });
    let s = size as f32;
    let labels = RegionLabelMap::from_fn(size, size, |x, y| {
        let (fx, fy) = (x as f32 / s, y as f32 / s);
        let skin = ((fx - 0.5) / 0.3).powi(2) + ((fy - 0.55) / 0.38).powi(2) <= 1.0;
        let eye = |cx: f32| ((fx - cx) / 0.06).powi(2) + ((fy - 0.45) / 0.03).powi(2) <= 1.0;
        if fy < 0.2 {
            17
        } else if eye(0.38) {
            4
        } else if eye(0.62) {
            5
        } else if skin {
            1
        } else {
            0
        }
    })
    .expect("non-empty map");
    (image, labels)
}

fn mosaic_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(15)
        .warm_up_time(Duration::from_millis(500))
        .measurement_time(Duration::from_secs(4))
}

fn bench_render(c: &mut Criterion, size: u32, density: f64) {
    let (image, labels) = synthetic_portrait(size);
    let registry = StyleTable::face_catalogue();
    let settings = SettingsTable::new()
        .with_default(RenderSettings::new(density, 8.0, 100.0, 100.0).expect("valid settings"));
    let config = RenderConfig::new();
    let rasterizer = GlyphRasterizer::from_face(DotFace);

    let mut group = c.benchmark_group(format!("render/{size}/density_{density}"));
    group.throughput(Throughput::Elements(size as u64 * size as u64));

    group.bench_function("render_mosaic", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(12345),
            |mut rng| {
                let out = render_mosaic(
                    &image,
                    &labels,
                    &registry,
                    &settings,
                    &config,
                    &rasterizer,
                    &mut rng,
                    None,
                )
                .expect("render");
                black_box(out.total_placed());
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

fn bench_rasterize(c: &mut Criterion) {
    let embedded = BuiltinFace::new().expect("embedded font parses");
    let faces = [
        ("dot", GlyphRasterizer::from_face(DotFace)),
        ("embedded", GlyphRasterizer::from_face(embedded)),
    ];
    let mut group = c.benchmark_group("glyph/rasterize");
    for (face, rasterizer) in &faces {
        for angle in [0.0f32, 7.0, 90.0] {
            group.bench_function(format!("{face}/px_32/angle_{angle}"), |b| {
                b.iter(|| {
                    let tile = rasterizer
                        .rasterize(black_box('∂'), 32, Rgba([200, 200, 200, 153]), angle)
                        .expect("valid glyph");
                    black_box(tile.map(|t| t.size()));
                });
            });
        }
    }
    group.finish();
}

pub fn render_benches(c: &mut Criterion) {
    bench_render(c, 256, 0.0);
    bench_render(c, 256, 60.0);
    bench_render(c, 512, 60.0);
    bench_rasterize(c);
}

criterion_group! {
    name = benches;
    config = mosaic_criterion();
    targets = render_benches
}
criterion_main!(benches);
