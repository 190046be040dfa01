//! Table-backed style registry.
use std::collections::BTreeMap;

use crate::error::Result;
use crate::style::{RegionId, RegionStyle, RegionStyleRegistry};

#[derive(Clone, Debug, PartialEq)]
struct Entry {
    name: Option<String>,
    style: RegionStyle,
}

/// Registry storing explicit styles by region id plus a fallback for everything else.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct StyleTable {
    entries: BTreeMap<RegionId, Entry>,
    fallback: RegionStyle,
}

impl StyleTable {
    /// Creates an empty table whose fallback is [`RegionStyle::fallback`].
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            fallback: RegionStyle::fallback(),
        }
    }

    /// Replace the fallback style.
    pub fn with_fallback(mut self, fallback: RegionStyle) -> Self {
        self.fallback = fallback;
        self
    }

    /// Add or replace the style of `id`.
    pub fn with_style(mut self, id: RegionId, style: RegionStyle) -> Self {
        self.insert(id, None, style);
        self
    }

    /// Add or replace the style of `id` along with a region name.
    pub fn with_named_style(
        mut self,
        id: RegionId,
        name: impl Into<String>,
        style: RegionStyle,
    ) -> Self {
        self.insert(id, Some(name.into()), style);
        self
    }

    /// Add or replace an entry in place.
    pub fn insert(&mut self, id: RegionId, name: Option<String>, style: RegionStyle) {
        self.entries.insert(id, Entry { name, style });
    }

    /// Returns the number of explicit entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no explicit entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks if `id` has an explicit entry.
    pub fn contains(&self, id: RegionId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Explicit style of `id`, without falling back.
    pub fn get(&self, id: RegionId) -> Option<&RegionStyle> {
        self.entries.get(&id).map(|e| &e.style)
    }

    pub fn fallback(&self) -> &RegionStyle {
        &self.fallback
    }

    /// Region ids with explicit entries, ascending.
    pub fn region_ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.entries.keys().copied()
    }
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionStyleRegistry for StyleTable {
    fn resolve(&self, id: RegionId) -> Result<RegionStyle> {
        let style = self.get(id).unwrap_or(&self.fallback).clone();
        style.validate()?;
        Ok(style)
    }

    fn has_style(&self, id: RegionId) -> bool {
        self.contains(id)
    }

    fn name(&self, id: RegionId) -> Option<&str> {
        self.entries.get(&id).and_then(|e| e.name.as_deref())
    }
}
