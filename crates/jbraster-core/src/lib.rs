//! jbraster core - packed binary images and raster operations
//!
//! This crate provides the data structures shared by every other jbraster
//! crate:
//!
//! - [`Bitmap`] - packed 1-bpp image with pixel/byte accessors, borders,
//!   polarity and counting
//! - [`rasterop`] / [`RopOp`] - the raster-operation engine
//! - [`blit`] / [`CombinationOperator`] - JBIG2 region composition
//! - [`Box`] / [`Boxa`] - rectangles
//! - [`Bitmaps`] - bitmaps with parallel boxes
//! - [`Point`] / [`Pta`] - centroid locations
//! - [`tables`] - masks and bit-count tables
//!
//! With the default `render` feature, [`Bitmap::to_gray_image`] converts a
//! bitmap into an [`image::GrayImage`](https://docs.rs/image) for viewing.

pub mod bitmap;
pub mod bitmaps;
pub mod box_;
pub mod error;
pub mod pta;
pub mod tables;

pub use bitmap::{Bitmap, CombinationOperator, Polarity, RopOp, blit, rasterop};
pub use bitmaps::{Bitmaps, SizeRelation, SizeSelect};
pub use box_::{Box, Boxa};
pub use error::{Error, Result, ResultExt};
pub use pta::{Point, Pta};
