//! Placement resolution for one glyph tile.
//!
//! A tile is first proposed at its jittered grid point. If that candidate is invalid the
//! unjittered grid point is retried once; if both fail the glyph is dropped:
//!
//! `Propose(jittered) -> Validate -> Accept | Retry(unjittered) -> Validate -> Accept | Drop`
use glam::{IVec2, UVec2};

use crate::label_map::RegionLabelMap;
use crate::style::RegionId;

/// Largest jitter offset applied to a grid point along each axis, in pixels.
pub const JITTER_CAP_PX: i32 = 2;

/// Which candidate of the sequence produced a placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Jittered,
    Fallback,
}

/// Validity rule for glyph centers of one region.
#[derive(Debug, Clone, Copy)]
pub struct PlacementBounds<'a> {
    canvas: UVec2,
    labels: &'a RegionLabelMap,
    region: RegionId,
}

impl<'a> PlacementBounds<'a> {
    pub fn new(canvas: UVec2, labels: &'a RegionLabelMap, region: RegionId) -> Self {
        Self {
            canvas,
            labels,
            region,
        }
    }

    pub fn region(&self) -> RegionId {
        self.region
    }

    /// Top-left corner of a `tile` centered on `center`, if that placement is valid.
    ///
    /// Valid means the whole tile box lies inside the canvas and the center pixel carries this
    /// region's label.
    pub fn validate(&self, center: IVec2, tile: UVec2) -> Option<IVec2> {
        let half = IVec2::new((tile.x / 2) as i32, (tile.y / 2) as i32);
        let top_left = center - half;
        let left = top_left.x as i64;
        let top = top_left.y as i64;
        let fits = left >= 0
            && top >= 0
            && left + tile.x as i64 <= self.canvas.x as i64
            && top + tile.y as i64 <= self.canvas.y as i64;
        if fits && self.labels.is(center.x, center.y, self.region) {
            Some(top_left)
        } else {
            None
        }
    }
}

/// Outcome of resolving one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Placed {
        attempt: Attempt,
        center: IVec2,
        top_left: IVec2,
    },
    /// Both candidates were invalid.
    Dropped,
}

impl Resolution {
    pub fn is_placed(&self) -> bool {
        matches!(self, Resolution::Placed { .. })
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Propose { attempt: Attempt, center: IVec2 },
    Reject { attempt: Attempt },
}

/// Runs the jitter/fallback sequence against a [`PlacementBounds`].
#[derive(Debug, Clone, Copy)]
pub struct PlacementResolver<'a> {
    bounds: PlacementBounds<'a>,
}

impl<'a> PlacementResolver<'a> {
    pub fn new(bounds: PlacementBounds<'a>) -> Self {
        Self { bounds }
    }

    pub fn bounds(&self) -> &PlacementBounds<'a> {
        &self.bounds
    }

    /// Resolve a tile of size `tile` for grid point `cell` with the given `jitter` offset.
    pub fn resolve(&self, cell: IVec2, jitter: IVec2, tile: UVec2) -> Resolution {
        let mut step = Step::Propose {
            attempt: Attempt::Jittered,
            center: cell + jitter,
        };
        loop {
            step = match step {
                Step::Propose { attempt, center } => match self.bounds.validate(center, tile) {
                    Some(top_left) => {
                        return Resolution::Placed {
                            attempt,
                            center,
                            top_left,
                        }
                    }
                    None => Step::Reject { attempt },
                },
                Step::Reject {
                    attempt: Attempt::Jittered,
                } => Step::Propose {
                    attempt: Attempt::Fallback,
                    center: cell,
                },
                Step::Reject {
                    attempt: Attempt::Fallback,
                } => return Resolution::Dropped,
            };
        }
    }
}
