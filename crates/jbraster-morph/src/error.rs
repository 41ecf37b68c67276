//! Error types for jbraster-morph

use thiserror::Error;

/// Errors that can occur during morphological operations
#[derive(Debug, Error)]
pub enum MorphError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] jbraster_core::Error),

    /// Scaling step of a sequence failed
    #[error("transform error: {0}")]
    Transform(#[from] jbraster_transform::TransformError),

    /// Invalid structuring element
    #[error("invalid structuring element: {0}")]
    InvalidSel(String),

    /// Invalid parameters
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// Invalid sequence format or semantics
    #[error("invalid sequence: {0}")]
    InvalidSequence(String),
}

/// Result type for morphological operations
pub type MorphResult<T> = Result<T, MorphError>;
