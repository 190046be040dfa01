//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. The two
//! fatal classes of a render call are configuration problems (settings, fonts, styles) and
//! input shape problems (empty or mismatched rasters). Per-sample rejections are never errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("input shape error: {0}")]
    InputShape(String),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` for malformed settings, unusable fonts, or unresolvable styles.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Returns `true` for raster inputs whose dimensions cannot be reconciled.
    pub fn is_input_shape(&self) -> bool {
        matches!(self, Error::InputShape(_))
    }
}
