//! Error types for the test framework

use thiserror::Error;

/// Errors that can occur while building regression fixtures
#[derive(Debug, Error)]
pub enum TestError {
    /// Fixture text is malformed
    #[error("bad fixture: {0}")]
    Fixture(String),

    /// Bitmap construction failed
    #[error("bitmap error: {0}")]
    Bitmap(#[from] jbraster_core::Error),

    /// Value comparison failed
    #[error(
        "value comparison failed at index {index}: expected {expected}, got {actual}, delta {delta}"
    )]
    ValueMismatch {
        index: usize,
        expected: f64,
        actual: f64,
        delta: f64,
    },

    /// Bitmap comparison failed
    #[error("bitmap comparison failed at index {index}")]
    BitmapMismatch { index: usize },
}

/// Result type for test operations
pub type TestResult<T> = Result<T, TestError>;
