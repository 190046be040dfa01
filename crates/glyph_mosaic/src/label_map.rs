//! Per-pixel region labels produced by an external segmentation step.
//!
//! A [`RegionLabelMap`] stores one [`RegionId`] per source pixel in row-major order. Label `0` is
//! background and is never rendered. Maps whose size differs from the source image are brought
//! to the image size with nearest-neighbour resampling so region boundaries stay hard.
use std::borrow::Cow;
use std::collections::BTreeSet;

use image::{GrayImage, ImageBuffer, Luma};

use crate::error::{Error, Result};
use crate::style::RegionId;

/// Label value for unlabeled pixels.
pub const BACKGROUND_REGION: RegionId = 0;

/// Row-major grid of region ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegionLabelMap {
    width: u32,
    height: u32,
    labels: Vec<RegionId>,
}

impl RegionLabelMap {
    /// Create a map from row-major labels. Fails if a dimension is zero or the length mismatches.
    pub fn new(width: u32, height: u32, labels: Vec<RegionId>) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if labels.len() != expected {
            return Err(Error::InputShape(format!(
                "label map {width}x{height} needs {expected} labels, got {}",
                labels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            labels,
        })
    }

    /// Create a map where every pixel carries the same label.
    pub fn filled(width: u32, height: u32, id: RegionId) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            labels: vec![id; width as usize * height as usize],
        })
    }

    /// Create a map by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> RegionId,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        let mut labels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                labels.push(f(x, y));
            }
        }
        Ok(Self {
            width,
            height,
            labels,
        })
    }

    /// Read labels from an 8-bit single-channel image (the usual segmentation output).
    pub fn from_luma8(img: &GrayImage) -> Result<Self> {
        let (w, h) = img.dimensions();
        Self::new(w, h, img.as_raw().iter().map(|&v| v as RegionId).collect())
    }

    /// Read labels from a 16-bit single-channel image.
    pub fn from_luma16(img: &ImageBuffer<Luma<u16>, Vec<u16>>) -> Result<Self> {
        let (w, h) = img.dimensions();
        Self::new(w, h, img.as_raw().clone())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn as_slice(&self) -> &[RegionId] {
        &self.labels
    }

    /// Label at `(x, y)`, or `None` outside the map.
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> Option<RegionId> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some(self.labels[y as usize * self.width as usize + x as usize])
    }

    /// `true` if `(x, y)` lies inside the map and carries `id`.
    #[inline]
    pub fn is(&self, x: i32, y: i32, id: RegionId) -> bool {
        self.get(x, y) == Some(id)
    }

    /// Labelled regions present in the map, ascending, background excluded.
    pub fn present_regions(&self) -> Vec<RegionId> {
        self.labels
            .iter()
            .copied()
            .filter(|&id| id != BACKGROUND_REGION)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of pixels carrying `id`.
    pub fn count(&self, id: RegionId) -> usize {
        self.labels.iter().filter(|&&v| v == id).count()
    }

    /// Nearest-neighbour resample to `width` x `height`.
    pub fn resized_nearest(&self, width: u32, height: u32) -> Result<Self> {
        check_dimensions(width, height)?;
        let xs: Vec<usize> = (0..width)
            .map(|x| nearest_source(x, width, self.width) as usize)
            .collect();
        let mut labels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            let row = nearest_source(y, height, self.height) as usize * self.width as usize;
            labels.extend(xs.iter().map(|&sx| self.labels[row + sx]));
        }
        Ok(Self {
            width,
            height,
            labels,
        })
    }

    /// Borrow the map if it already has the requested size, otherwise resample it.
    pub fn fit_to(&self, width: u32, height: u32) -> Result<Cow<'_, Self>> {
        if self.dimensions() == (width, height) {
            return Ok(Cow::Borrowed(self));
        }
        self.resized_nearest(width, height).map(Cow::Owned)
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InputShape(format!(
            "label map must not be empty, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Source index sampled by destination index `dst` when scaling `src_len` to `dst_len`,
/// using pixel centers: `floor((dst + 0.5) * src_len / dst_len)`.
#[inline]
fn nearest_source(dst: u32, dst_len: u32, src_len: u32) -> u32 {
    let num = (2 * dst as u64 + 1) * src_len as u64;
    let idx = num / (2 * dst_len as u64);
    (idx as u32).min(src_len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_empty_and_mismatched_input() {
        assert!(RegionLabelMap::new(0, 4, Vec::new())
            .unwrap_err()
            .is_input_shape());
        assert!(RegionLabelMap::new(2, 2, vec![1, 2, 3])
            .unwrap_err()
            .is_input_shape());
    }

    #[test]
    fn get_returns_none_outside_bounds() {
        let map = RegionLabelMap::new(2, 2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(map.get(1, 1), Some(4));
        assert_eq!(map.get(-1, 0), None);
        assert_eq!(map.get(2, 0), None);
        assert!(map.is(0, 1, 3));
        assert!(!map.is(0, 1, 1));
    }

    #[test]
    fn present_regions_are_sorted_and_skip_background() {
        let map = RegionLabelMap::new(3, 2, vec![0, 17, 4, 4, 1, 0]).unwrap();
        assert_eq!(map.present_regions(), vec![1, 4, 17]);
        assert_eq!(map.count(4), 2);
        assert_eq!(map.count(9), 0);
    }

    #[test]
    fn nearest_upscale_preserves_hard_boundaries() {
        let map = RegionLabelMap::new(2, 1, vec![1, 2]).unwrap();
        let up = map.resized_nearest(4, 2).unwrap();
        assert_eq!(up.as_slice(), &[1, 1, 2, 2, 1, 1, 2, 2]);
    }

    #[test]
    fn nearest_downscale_samples_pixel_centers() {
        let map = RegionLabelMap::from_fn(4, 4, |x, y| (y * 4 + x) as RegionId).unwrap();
        let down = map.resized_nearest(2, 2).unwrap();
        // centers of 2x2 blocks land on source (1, 1), (3, 1), (1, 3), (3, 3)
        assert_eq!(down.as_slice(), &[5, 7, 13, 15]);
    }

    #[test]
    fn fit_to_borrows_when_sizes_match() {
        let map = RegionLabelMap::filled(3, 3, 1).unwrap();
        assert!(matches!(map.fit_to(3, 3).unwrap(), Cow::Borrowed(_)));
        assert!(matches!(map.fit_to(6, 6).unwrap(), Cow::Owned(_)));
        assert!(map.fit_to(0, 6).unwrap_err().is_input_shape());
    }

    #[test]
    fn from_luma8_reads_raw_labels() {
        let img = GrayImage::from_raw(2, 1, vec![0, 13]).unwrap();
        let map = RegionLabelMap::from_luma8(&img).unwrap();
        assert_eq!(map.present_regions(), vec![13]);
    }
}
