//! Error types for jbraster-core
//!
//! A single error enum covers the bitmap primitives and the raster engine.
//! Bounds violations from every buffer accessor surface as
//! [`Error::IndexOutOfRange`]; callers higher up attach the name of the
//! operation that failed through [`ResultExt::context`].

use thiserror::Error;

/// jbraster error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid bitmap dimensions
    #[error("invalid bitmap dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Supplied buffer does not match `height * row_stride`
    #[error("data length mismatch: expected {expected} bytes, got {actual}")]
    DataLength { expected: usize, actual: usize },

    /// Byte or pixel index outside the backing buffer
    #[error("index out of range: {index} >= {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Incompatible bitmap sizes
    #[error("incompatible bitmap sizes: {0}x{1} vs {2}x{3}")]
    IncompatibleSizes(u32, u32, u32, u32),

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Raw raster operator code outside the 4-bit truth-table range
    #[error("invalid raster operator code: {0:#x}")]
    InvalidOperator(u8),

    /// Connectivity other than 4 or 8
    #[error("invalid connectivity: {0}")]
    InvalidConnectivity(u32),

    /// Missing required input
    #[error("null or empty input: {0}")]
    NullInput(&'static str),

    /// A lower-level failure, tagged with the operation that hit it
    #[error("{operation}: {source}")]
    Context {
        operation: &'static str,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Strip any [`Error::Context`] layers and return the underlying error.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for jbraster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Attach an operation name to an error on its way up.
pub trait ResultExt<T> {
    fn context(self, operation: &'static str) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, operation: &'static str) -> Result<T> {
        self.map_err(|e| Error::Context {
            operation,
            source: Box::new(e),
        })
    }
}
