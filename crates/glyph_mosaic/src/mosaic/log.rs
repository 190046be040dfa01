//! Ordered record of every glyph composited during a render call.
//!
//! The log is the replay script for animating a render: records appear in compositing order and
//! carry a 1-based `order` equal to their position in the log plus one.
use glam::{IVec2, UVec2};
use serde::ser::{SerializeStruct, Serializer};
use serde::Serialize;

use crate::error::Result;
use crate::style::RegionId;

/// One composited glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRecord {
    pub symbol: char,
    pub font_size: u32,
    /// Accepted glyph center on the canvas.
    pub center: IVec2,
    /// Top-left corner of the composited tile.
    pub top_left: IVec2,
    /// Signed rotation in degrees, counter-clockwise positive.
    pub rotation: i32,
    pub color: [u8; 4],
    pub region_id: RegionId,
    /// 1-based compositing order, assigned by [`PlacementLog::push`].
    pub order: u64,
    /// Size of the rotated tile.
    pub tile_size: UVec2,
    /// Adjusted brightness level that chose the gray value and the glyph size.
    pub brightness: u8,
    pub alpha: u8,
}

impl PlacementRecord {
    /// Bottom-right corner (exclusive) of the composited tile.
    pub fn bottom_right(&self) -> IVec2 {
        self.top_left + self.tile_size.as_ivec2()
    }
}

impl Serialize for PlacementRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PlacementRecord", 12)?;
        s.serialize_field("symbol", &self.symbol)?;
        s.serialize_field("font_size", &self.font_size)?;
        s.serialize_field("position_center_of_text", &self.center.to_array())?;
        s.serialize_field("position_top_left_of_text", &self.top_left.to_array())?;
        s.serialize_field("rotation", &self.rotation)?;
        s.serialize_field("color", &self.color)?;
        s.serialize_field("region_id", &self.region_id)?;
        s.serialize_field("order", &self.order)?;
        s.serialize_field("text_drawn_size", &self.tile_size.to_array())?;
        s.serialize_field("brightness", &self.brightness)?;
        s.serialize_field("alpha", &self.alpha)?;
        s.serialize_field("timestamp", &self.order)?;
        s.end()
    }
}

/// Append-only list of [`PlacementRecord`]s.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementLog {
    records: Vec<PlacementRecord>,
}

impl PlacementLog {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Order number the next pushed record will receive.
    pub fn next_order(&self) -> u64 {
        self.records.len() as u64 + 1
    }

    /// Append `record`, overwriting its `order` with the next order number.
    pub fn push(&mut self, mut record: PlacementRecord) -> u64 {
        record.order = self.next_order();
        let order = record.order;
        self.records.push(record);
        order
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlacementRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[PlacementRecord] {
        &self.records
    }

    /// Compact JSON array of all records.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.records)?)
    }

    /// Indented JSON array of all records.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.records)?)
    }
}

impl<'a> IntoIterator for &'a PlacementLog {
    type Item = &'a PlacementRecord;
    type IntoIter = std::slice::Iter<'a, PlacementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
