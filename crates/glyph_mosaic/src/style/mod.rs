//! Region styles: which symbols a region draws with, how opaque they are, and how large.
//!
//! Define custom catalogues by implementing [`RegionStyleRegistry`] or by filling a
//! [`StyleTable`]. The canonical face-parsing catalogue lives in [`catalogue`].
use serde::Serialize;

use crate::error::{Error, Result};

pub mod catalogue;
pub mod registry;
pub mod settings;

pub use registry::StyleTable;

/// Identifier of a semantic region in a label map. `0` is background.
pub type RegionId = u16;

/// Symbol drawn by regions without an explicit style.
pub const FALLBACK_SYMBOL: char = '·';
/// Opacity of regions without an explicit style.
pub const FALLBACK_OPACITY: u8 = 255;
/// Importance of regions without an explicit style.
pub const FALLBACK_IMPORTANCE: f32 = 1.0;
/// Base font size of regions without an explicit style.
pub const FALLBACK_BASE_FONT_SIZE: u32 = 9;
/// Scan stride base of regions without an explicit style.
pub const FALLBACK_STEP_BASE: u32 = 6;

/// Visual rules for one region.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RegionStyle {
    /// Symbols to choose from, uniformly. Never empty.
    pub symbols: Vec<char>,
    /// Fixed glyph opacity for the region.
    pub opacity: u8,
    /// Size multiplier; `> 0`.
    pub importance: f32,
    /// Base glyph size in pixels; `> 0`.
    pub base_font_size: u32,
    /// Scan stride at density 0; `> 0`.
    pub step_base: u32,
}

impl RegionStyle {
    /// Create a validated style.
    pub fn new(
        symbols: impl IntoIterator<Item = char>,
        opacity: u8,
        importance: f32,
        base_font_size: u32,
        step_base: u32,
    ) -> Result<Self> {
        let style = Self {
            symbols: symbols.into_iter().collect(),
            opacity,
            importance,
            base_font_size,
            step_base,
        };
        style.validate()?;
        Ok(style)
    }

    /// Style used for region ids that have no explicit entry: `·`, opacity 255,
    /// importance 1.0, base font/step (9, 6).
    pub fn fallback() -> Self {
        Self {
            symbols: vec![FALLBACK_SYMBOL],
            opacity: FALLBACK_OPACITY,
            importance: FALLBACK_IMPORTANCE,
            base_font_size: FALLBACK_BASE_FONT_SIZE,
            step_base: FALLBACK_STEP_BASE,
        }
    }

    /// Replace the symbol set, keeping the other fields.
    pub fn with_symbols(mut self, symbols: impl IntoIterator<Item = char>) -> Result<Self> {
        self.symbols = symbols.into_iter().collect();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(Error::Configuration("region style needs at least one symbol".into()));
        }
        if !(self.importance.is_finite() && self.importance > 0.0) {
            return Err(Error::Configuration(format!(
                "region importance must be a positive number, got {}",
                self.importance
            )));
        }
        if self.base_font_size == 0 {
            return Err(Error::Configuration("base font size must be > 0".into()));
        }
        if self.step_base == 0 {
            return Err(Error::Configuration("step base must be > 0".into()));
        }
        Ok(())
    }
}

impl Default for RegionStyle {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Maps region ids to styles.
///
/// Every id that can appear in a label map must resolve, either to an explicit entry or to a
/// fallback. Implementations must be pure: resolving the same id twice yields equal styles.
pub trait RegionStyleRegistry: Send + Sync {
    fn resolve(&self, id: RegionId) -> Result<RegionStyle>;

    /// `true` if `id` has its own entry rather than resolving to the fallback.
    ///
    /// Symbols supplied with render settings only replace the symbols of regions without an
    /// entry.
    fn has_style(&self, _id: RegionId) -> bool {
        false
    }

    /// Human-readable name of the region, if the registry knows one.
    fn name(&self, _id: RegionId) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_invalid_fields() {
        assert!(RegionStyle::new([], 255, 1.0, 9, 6)
            .unwrap_err()
            .is_configuration());
        assert!(RegionStyle::new(['a'], 255, 0.0, 9, 6).is_err());
        assert!(RegionStyle::new(['a'], 255, f32::NAN, 9, 6).is_err());
        assert!(RegionStyle::new(['a'], 255, 1.0, 0, 6).is_err());
        assert!(RegionStyle::new(['a'], 255, 1.0, 9, 0).is_err());
    }

    #[test]
    fn fallback_matches_documented_values() {
        let style = RegionStyle::fallback();
        assert_eq!(style.symbols, vec!['·']);
        assert_eq!(style.opacity, 255);
        assert_eq!(style.importance, 1.0);
        assert_eq!((style.base_font_size, style.step_base), (9, 6));
        assert!(style.validate().is_ok());
    }

    #[test]
    fn with_symbols_keeps_other_fields() {
        let style = RegionStyle::new(['∂'], 170, 1.3, 9, 5)
            .unwrap()
            .with_symbols(['x', 'y'])
            .unwrap();
        assert_eq!(style.symbols, vec!['x', 'y']);
        assert_eq!(style.opacity, 170);
        assert!(RegionStyle::fallback().with_symbols([]).is_err());
    }
}
