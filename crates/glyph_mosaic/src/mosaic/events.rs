//! Event types and sinks for observing render runs.
//!
//! This module defines [`MosaicEvent`] and a set of sinks to collect or forward events while a
//! [`crate::mosaic::runner::MosaicRunner`] or [`crate::mosaic::runner::render_mosaic_with_events`]
//! renders a mosaic.
use glam::{IVec2, UVec2};

use crate::mosaic::log::PlacementRecord;
use crate::mosaic::placement::Attempt;
use crate::mosaic::planner::RegionSummary;
use crate::mosaic::runner::RenderConfig;
use crate::style::settings::RenderSettings;
use crate::style::RegionId;

/// Describes events emitted while rendering.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum MosaicEvent {
    /// Emitted once before any region is processed.
    RunStarted {
        /// The run configuration used.
        config: RenderConfig,
        /// Regions in processing order.
        regions: Vec<RegionId>,
        /// Canvas size in pixels.
        canvas_size: UVec2,
    },

    /// Emitted once after the last region.
    RunFinished {
        /// Total glyphs composited.
        placed: usize,
        /// Per-region summaries in processing order.
        regions: Vec<RegionSummary>,
    },

    /// Emitted when a region starts processing.
    RegionStarted {
        region: RegionId,
        /// Registry name of the region, if any.
        name: Option<String>,
        /// Scan stride in pixels.
        step: u32,
        settings: RenderSettings,
    },

    /// Emitted when a region finishes processing.
    RegionFinished { summary: RegionSummary },

    /// Emitted after a glyph was composited and logged.
    GlyphPlaced {
        record: PlacementRecord,
        /// Which candidate was accepted.
        attempt: Attempt,
    },

    /// Emitted when a grid cell of the region produced no glyph.
    SampleSkipped {
        region: RegionId,
        /// Grid point of the cell.
        cell: IVec2,
        reason: SkipReason,
    },

    /// Non-fatal warning generated during rendering.
    Warning {
        /// Context string (e.g. region id).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

impl MosaicEvent {
    pub fn kind(&self) -> MosaicEventKind {
        match self {
            MosaicEvent::RunStarted { .. } => MosaicEventKind::RunStarted,
            MosaicEvent::RunFinished { .. } => MosaicEventKind::RunFinished,
            MosaicEvent::RegionStarted { .. } => MosaicEventKind::RegionStarted,
            MosaicEvent::RegionFinished { .. } => MosaicEventKind::RegionFinished,
            MosaicEvent::GlyphPlaced { .. } => MosaicEventKind::GlyphPlaced,
            MosaicEvent::SampleSkipped { .. } => MosaicEventKind::SampleSkipped,
            MosaicEvent::Warning { .. } => MosaicEventKind::Warning,
        }
    }
}

/// Discriminant of [`MosaicEvent`], used by sinks to opt out of event classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MosaicEventKind {
    RunStarted,
    RunFinished,
    RegionStarted,
    RegionFinished,
    GlyphPlaced,
    SampleSkipped,
    Warning,
}

/// Why a region cell produced no glyph.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Raw brightness at or below the configured black cutoff.
    BelowBlackCutoff,
    /// The symbol has no ink at the requested size.
    EmptyGlyph,
    /// The rasterizer failed for this sample.
    GlyphFailed(String),
    /// Neither the jittered nor the unjittered candidate was valid.
    Dropped,
}

/// A generic event sink that accepts [`MosaicEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: MosaicEvent);

    /// Whether events of `kind` should be built and sent at all.
    #[inline]
    fn wants(&self, _kind: MosaicEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: MosaicEvent) {}

    #[inline]
    fn wants(&self, _kind: MosaicEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(MosaicEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(MosaicEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(MosaicEvent),
{
    #[inline]
    fn send(&mut self, event: MosaicEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally restricted to some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<MosaicEvent>,
    only: Option<Vec<MosaicEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            only: None,
        }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
            only: None,
        }
    }

    /// Collect only events of the listed kinds.
    pub fn only(kinds: impl IntoIterator<Item = MosaicEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<MosaicEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[MosaicEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of collected events of `kind`.
    pub fn count(&self, kind: MosaicEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: MosaicEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: MosaicEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn into_inner(self) -> Vec<S> {
        self.sinks
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: MosaicEvent) {
        let kind = event.kind();
        let Some(last_idx) = self.sinks.iter().rposition(|s| s.wants(kind)) else {
            return;
        };
        for i in 0..last_idx {
            if self.sinks[i].wants(kind) {
                self.sinks[i].send(event.clone());
            }
        }
        self.sinks[last_idx].send(event);
    }

    fn wants(&self, kind: MosaicEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
