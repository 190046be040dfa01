use anyhow::Result;
use glam::Vec2;
use glyph_mosaic::prelude::{region_id_for_key, RegionId, RegionLabelMap};
use image::{Rgb, RgbImage};

struct Ellipse {
    center: Vec2,
    radii: Vec2,
}

impl Ellipse {
    const fn new(cx: f32, cy: f32, rx: f32, ry: f32) -> Self {
        Self {
            center: Vec2::new(cx, cy),
            radii: Vec2::new(rx, ry),
        }
    }

    fn contains(&self, p: Vec2) -> bool {
        ((p - self.center) / self.radii).length_squared() <= 1.0
    }
}

// Layout in unit coordinates, later entries win.
const FEATURES: &[(&str, Ellipse)] = &[
    ("cloth", Ellipse::new(0.5, 1.15, 0.5, 0.3)),
    ("neck", Ellipse::new(0.5, 0.85, 0.12, 0.16)),
    ("hair", Ellipse::new(0.5, 0.36, 0.34, 0.3)),
    ("skin", Ellipse::new(0.5, 0.5, 0.26, 0.33)),
    ("l_brow", Ellipse::new(0.4, 0.39, 0.07, 0.012)),
    ("r_brow", Ellipse::new(0.6, 0.39, 0.07, 0.012)),
    ("l_eye", Ellipse::new(0.4, 0.44, 0.05, 0.022)),
    ("r_eye", Ellipse::new(0.6, 0.44, 0.05, 0.022)),
    ("nose", Ellipse::new(0.5, 0.53, 0.025, 0.06)),
    ("u_lip", Ellipse::new(0.5, 0.64, 0.08, 0.015)),
    ("l_lip", Ellipse::new(0.5, 0.67, 0.08, 0.018)),
];

/// In-memory portrait and matching label map: a lit oval face with hair, eyes, brows, nose,
/// lips, neck and clothing on a dark background.
pub fn synthetic_face(width: u32, height: u32) -> Result<(RgbImage, RegionLabelMap)> {
    let size = Vec2::new(width as f32, height as f32);
    let light = Vec2::new(0.35, 0.3);

    let region_at = |x: u32, y: u32| -> RegionId {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / size;
        FEATURES
            .iter()
            .rev()
            .find(|(_, shape)| shape.contains(p))
            .and_then(|(key, _)| region_id_for_key(key))
            .unwrap_or(0)
    };

    let image = RgbImage::from_fn(width, height, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5) / size;
        let shade = (1.0 - p.distance(light) * 1.4).clamp(0.05, 1.0);
        let base = match region_at(x, y) {
            0 => [12.0, 12.0, 16.0],
            1 | 10 => [236.0, 196.0, 170.0],
            2 | 3 | 17 => [70.0, 50.0, 40.0],
            4 | 5 => [40.0, 60.0, 90.0],
            12 | 13 => [190.0, 90.0, 90.0],
            14 => [220.0, 180.0, 155.0],
            _ => [60.0, 90.0, 150.0],
        };
        Rgb(base.map(|c: f32| (c * shade).round().clamp(0.0, 255.0) as u8))
    });

    let labels = RegionLabelMap::from_fn(width, height, region_at)?;
    Ok((image, labels))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_face_has_the_main_regions() {
        let (image, labels) = synthetic_face(128, 160).unwrap();
        assert_eq!(image.dimensions(), labels.dimensions());
        let present = labels.present_regions();
        for key in ["skin", "l_eye", "r_eye", "hair", "u_lip", "l_lip", "neck", "cloth"] {
            let id = region_id_for_key(key).unwrap();
            assert!(present.contains(&id), "missing {key}");
        }
    }
}
