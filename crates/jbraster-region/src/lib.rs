//! jbraster-region - seed fill and connected components
//!
//! # Overview
//!
//! - [`seedfill_binary`] - grow a seed inside a mask, with a configurable
//!   iteration cap
//! - [`fill_holes`], [`clear_border`] - common seed-fill applications
//! - [`seedfill_stack_bb`] - scanline fill of one component, returning its
//!   bounding box
//! - [`conn_components`] - boxes (and optionally bitmaps) of every
//!   4- or 8-connected component
//!
//! # Example
//!
//! ```
//! use jbraster_core::Bitmap;
//! use jbraster_region::{ConnectivityType, count_conn_components};
//!
//! let mut bm = Bitmap::new(8, 8).unwrap();
//! bm.set_pixel(1, 1, true).unwrap();
//! bm.set_pixel(2, 2, true).unwrap();
//!
//! assert_eq!(count_conn_components(&bm, ConnectivityType::FourWay).unwrap(), 2);
//! assert_eq!(count_conn_components(&bm, ConnectivityType::EightWay).unwrap(), 1);
//! ```

pub mod conncomp;
mod error;
pub mod seedfill;

pub use conncomp::{
    ConnectivityType, FillStack, conn_components, conn_components_bb, conn_components_bitmaps,
    conn_components_consume, count_conn_components, seedfill_stack_bb,
};
pub use error::{RegionError, RegionResult};
pub use seedfill::{
    DEFAULT_MAX_ITERATIONS, SeedFill, SeedFillOptions, clear_border, fill_holes, seedfill_binary,
};
