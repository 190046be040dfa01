//! Rotation of RGBA tiles about their center with expanded bounds.
//!
//! Positive angles rotate counter-clockwise on screen. Quarter turns are exact pixel moves; other
//! angles resample bilinearly on premultiplied color so transparent texels do not bleed dark
//! fringes into the glyph edge.
use image::{imageops, Rgba, RgbaImage};

const EXTENT_EPSILON: f32 = 1e-3;

/// Size of the box enclosing a `width` x `height` tile rotated by `angle_deg`.
pub fn rotated_extent(width: u32, height: u32, angle_deg: f32) -> (u32, u32) {
    let (sin, cos) = angle_deg.to_radians().sin_cos();
    let (w, h) = (width as f32, height as f32);
    let out_w = (w * cos.abs() + h * sin.abs() - EXTENT_EPSILON).ceil().max(1.0);
    let out_h = (w * sin.abs() + h * cos.abs() - EXTENT_EPSILON).ceil().max(1.0);
    (out_w as u32, out_h as u32)
}

/// Rotate `src` by `angle_deg` about its center, growing the canvas so nothing is clipped.
pub fn rotate_expand(src: &RgbaImage, angle_deg: f32) -> RgbaImage {
    let angle = angle_deg.rem_euclid(360.0);
    if angle == 0.0 || src.width() == 0 || src.height() == 0 {
        return src.clone();
    }
    // image's quarter-turn helpers rotate clockwise.
    if angle == 90.0 {
        return imageops::rotate270(src);
    }
    if angle == 180.0 {
        return imageops::rotate180(src);
    }
    if angle == 270.0 {
        return imageops::rotate90(src);
    }

    let (out_w, out_h) = rotated_extent(src.width(), src.height(), angle);
    let (sin, cos) = angle.to_radians().sin_cos();
    let (cx, cy) = (src.width() as f32 / 2.0, src.height() as f32 / 2.0);
    let (ocx, ocy) = (out_w as f32 / 2.0, out_h as f32 / 2.0);

    RgbaImage::from_fn(out_w, out_h, |ox, oy| {
        let dx = ox as f32 + 0.5 - ocx;
        let dy = oy as f32 + 0.5 - ocy;
        let sx = dx * cos - dy * sin + cx;
        let sy = dx * sin + dy * cos + cy;
        sample_bilinear(src, sx - 0.5, sy - 0.5)
    })
}

fn sample_bilinear(src: &RgbaImage, fx: f32, fy: f32) -> Rgba<u8> {
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let taps = [
        (x0, y0, (1.0 - tx) * (1.0 - ty)),
        (x0 + 1, y0, tx * (1.0 - ty)),
        (x0, y0 + 1, (1.0 - tx) * ty),
        (x0 + 1, y0 + 1, tx * ty),
    ];

    let mut acc = [0.0f32; 4];
    for (x, y, weight) in taps {
        if weight <= 0.0
            || x < 0
            || y < 0
            || x >= src.width() as i64
            || y >= src.height() as i64
        {
            continue;
        }
        let p = src.get_pixel(x as u32, y as u32);
        let a = p[3] as f32 / 255.0 * weight;
        acc[0] += p[0] as f32 * a;
        acc[1] += p[1] as f32 * a;
        acc[2] += p[2] as f32 * a;
        acc[3] += a;
    }

    if acc[3] <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }
    let channel = |v: f32| (v / acc[3]).round().clamp(0.0, 255.0) as u8;
    Rgba([
        channel(acc[0]),
        channel(acc[1]),
        channel(acc[2]),
        (acc[3] * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
