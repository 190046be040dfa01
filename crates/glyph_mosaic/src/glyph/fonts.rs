//! Ordered font fallback chain.
//!
//! A [`FontChain`] lists [`FontSource`]s in priority order; [`FontChain::resolve`] returns the
//! first one that loads. The default chain probes common system fonts with good math coverage
//! and ends with the embedded [`BuiltinFace`], so it always resolves.
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::glyph::face::{BuiltinFace, FontdueFace, GlyphFace};

/// System font files probed by [`FontChain::default`], in order.
pub const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuMathTeXGyre.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSansMono.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\seguisym.ttf",
    "C:\\Windows\\Fonts\\cour.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// One candidate in a [`FontChain`].
#[derive(Clone, Debug)]
pub enum FontSource {
    /// A font file on disk.
    File(PathBuf),
    /// Font data already in memory.
    Bytes { name: String, data: Arc<[u8]> },
    /// The embedded [`BuiltinFace`].
    Builtin,
}

impl FontSource {
    /// Load the face behind this source.
    pub fn load(&self) -> Result<Box<dyn GlyphFace>> {
        match self {
            FontSource::File(path) => {
                let data = std::fs::read(path).map_err(|e| {
                    Error::Configuration(format!("cannot read font {}: {e}", path.display()))
                })?;
                let face = FontdueFace::from_bytes(path.display().to_string(), &data)?;
                Ok(Box::new(face))
            }
            FontSource::Bytes { name, data } => {
                Ok(Box::new(FontdueFace::from_bytes(name.clone(), data)?))
            }
            FontSource::Builtin => Ok(Box::new(BuiltinFace::new()?)),
        }
    }
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::File(path) => write!(f, "file '{}'", path.display()),
            FontSource::Bytes { name, .. } => write!(f, "in-memory font '{name}'"),
            FontSource::Builtin => f.write_str("embedded DejaVu Sans"),
        }
    }
}

/// Ordered list of font sources tried one after another.
#[derive(Clone, Debug)]
pub struct FontChain {
    sources: Vec<FontSource>,
}

impl FontChain {
    /// Creates an empty chain. Resolving it fails unless sources are added.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// A chain holding only the built-in face.
    pub fn builtin() -> Self {
        Self::new().with_builtin()
    }

    /// Append a font file.
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(FontSource::File(path.into()));
        self
    }

    /// Append in-memory font data.
    pub fn with_bytes(mut self, name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        self.sources.push(FontSource::Bytes {
            name: name.into(),
            data: data.into(),
        });
        self
    }

    /// Append the built-in face.
    pub fn with_builtin(mut self) -> Self {
        self.sources.push(FontSource::Builtin);
        self
    }

    /// Append every source of `other` after this chain's sources.
    pub fn then(mut self, other: FontChain) -> Self {
        self.sources.extend(other.sources);
        self
    }

    pub fn sources(&self) -> &[FontSource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Load the first source that succeeds.
    pub fn resolve(&self) -> Result<Box<dyn GlyphFace>> {
        for source in &self.sources {
            match source.load() {
                Ok(face) => {
                    info!("Using glyph face '{}' from {}.", face.name(), source);
                    return Ok(face);
                }
                Err(e) => debug!("Font source {} unavailable: {}.", source, e),
            }
        }
        Err(Error::Configuration(format!(
            "none of the {} font sources could be loaded",
            self.sources.len()
        )))
    }
}

impl Default for FontChain {
    fn default() -> Self {
        SYSTEM_FONT_PATHS
            .iter()
            .fold(FontChain::new(), |chain, path| chain.with_file(*path))
            .with_builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::face::BUILTIN_FACE_NAME;

    #[test]
    fn default_chain_ends_with_builtin() {
        let chain = FontChain::default();
        assert_eq!(chain.len(), SYSTEM_FONT_PATHS.len() + 1);
        assert!(matches!(chain.sources().last(), Some(FontSource::Builtin)));
        assert!(chain.resolve().is_ok());
    }

    #[test]
    fn empty_chain_is_a_configuration_error() {
        let err = FontChain::new().resolve().err().expect("nothing to load");
        assert!(err.is_configuration());
    }

    #[test]
    fn unloadable_sources_are_skipped() {
        let chain = FontChain::new()
            .with_file("/definitely/missing/font.ttf")
            .with_bytes("broken", b"nope".to_vec())
            .with_builtin();
        let face = chain.resolve().unwrap();
        assert_eq!(face.name(), BUILTIN_FACE_NAME);
    }

    #[test]
    fn chain_without_fallback_fails_when_nothing_loads() {
        let chain = FontChain::new().with_file("/definitely/missing/font.ttf");
        assert!(chain.resolve().is_err());
    }

    #[test]
    fn then_preserves_priority_order() {
        let chain = FontChain::new()
            .with_file("first.ttf")
            .then(FontChain::builtin());
        assert!(matches!(chain.sources()[0], FontSource::File(_)));
        assert!(matches!(chain.sources()[1], FontSource::Builtin));
    }

    #[test]
    fn display_names_the_source() {
        assert_eq!(FontSource::Builtin.to_string(), "embedded DejaVu Sans");
        assert_eq!(
            FontSource::File("a.ttf".into()).to_string(),
            "file 'a.ttf'"
        );
    }
}
