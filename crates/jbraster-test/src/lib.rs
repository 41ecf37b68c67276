//! jbraster-test - Regression test framework for jbraster
//!
//! Every `tests/*_reg.rs` file drives a [`RegParams`] through a numbered
//! series of checks and asserts on [`RegParams::cleanup`] at the end. Two
//! modes are supported:
//!
//! - **Compare**: run every check and record failures (default)
//! - **Display**: run everything but also print each checked value
//!
//! Fixtures are built in code: [`bitmap_from_rows`] parses an ASCII picture
//! and [`random_bitmap`] produces reproducible noise from a seed.
//!
//! # Usage
//!
//! ```ignore
//! use jbraster_test::{RegParams, bitmap_from_rows};
//!
//! let mut rp = RegParams::new("conncomp");
//! let bm = bitmap_from_rows(&["x.x", ".x."]).unwrap();
//! rp.compare_values(3.0, bm.count_pixels() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod fixtures;
mod params;

pub use error::{TestError, TestResult};
pub use fixtures::{bitmap_from_rows, bitmap_to_rows, random_bitmap};
pub use params::{RegParams, RegTestMode};
