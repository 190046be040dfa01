//! Brightness sampling policies applied to the source image.
use image::RgbImage;

/// How the raw brightness of a grid cell is read from the source image.
///
/// One policy applies to every region of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrightnessSampling {
    /// Mean of the RGB channels of the cell pixel.
    #[default]
    Pixel,
    /// Mean brightness over the `(2r+1)^2` window around the cell, clipped to the image.
    PatchMean { radius: u32 },
}

impl BrightnessSampling {
    /// Raw brightness in `0.0..=255.0` at `(x, y)`. Coordinates must lie inside `image`.
    pub fn sample(&self, image: &RgbImage, x: u32, y: u32) -> f32 {
        match *self {
            BrightnessSampling::Pixel | BrightnessSampling::PatchMean { radius: 0 } => {
                pixel_mean(image, x, y)
            }
            BrightnessSampling::PatchMean { radius } => {
                let x0 = x.saturating_sub(radius);
                let y0 = y.saturating_sub(radius);
                let x1 = x.saturating_add(radius).min(image.width() - 1);
                let y1 = y.saturating_add(radius).min(image.height() - 1);
                let mut sum = 0.0f64;
                let mut count = 0u64;
                for py in y0..=y1 {
                    for px in x0..=x1 {
                        sum += pixel_mean(image, px, py) as f64;
                        count += 1;
                    }
                }
                (sum / count as f64) as f32
            }
        }
    }
}

#[inline]
fn pixel_mean(image: &RgbImage, x: u32, y: u32) -> f32 {
    let p = image.get_pixel(x, y);
    (p[0] as f32 + p[1] as f32 + p[2] as f32) / 3.0
}
