//! Render results and their encodings. The engine itself never touches the filesystem.
use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::error::Result;
use crate::mosaic::log::PlacementLog;
use crate::mosaic::planner::RegionSummary;
use crate::style::RegionId;

/// Composite image, placement log and per-region diagnostics of one render call.
#[derive(Debug, Clone)]
pub struct MosaicOutput {
    pub image: RgbaImage,
    pub log: PlacementLog,
    /// Summaries in processing order.
    pub regions: Vec<RegionSummary>,
}

impl MosaicOutput {
    pub fn new(image: RgbaImage, log: PlacementLog, regions: Vec<RegionSummary>) -> Self {
        Self {
            image,
            log,
            regions,
        }
    }

    pub fn total_placed(&self) -> usize {
        self.log.len()
    }

    pub fn summary_for(&self, region: RegionId) -> Option<&RegionSummary> {
        self.regions.iter().find(|s| s.region == region)
    }

    /// PNG encoding of the composite, alpha preserved.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.image.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    /// Region summaries as a JSON array.
    pub fn summaries_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.regions)?)
    }
}
