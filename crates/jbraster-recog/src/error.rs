//! Error types for jbraster-recog

use thiserror::Error;

/// Errors that can occur during component extraction and matching
#[derive(Debug, Error)]
pub enum RecogError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] jbraster_core::Error),

    /// Transform library error
    #[error("transform error: {0}")]
    Transform(#[from] jbraster_transform::TransformError),

    /// Morphology library error
    #[error("morph error: {0}")]
    Morph(#[from] jbraster_morph::MorphError),

    /// Region library error
    #[error("region error: {0}")]
    Region(#[from] jbraster_region::RegionError),

    /// Invalid parameter provided
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type for recognition operations
pub type RecogResult<T> = Result<T, RecogError>;
