//! jbraster-morph - Binary morphology for jbraster
//!
//! This crate provides morphological operations on packed 1-bpp bitmaps:
//!
//! - Structuring elements (SEL) for defining operation neighborhoods
//! - Erosion, dilation, opening, closing and the hit-miss transform
//! - Brick (rectangular) variants applied as separable passes, and a
//!   border-safe brick closing
//! - Morphological sequences mixing brick operations with rank reduction,
//!   expansion and borders
//!
//! The treatment of off-image pixels is an explicit [`BoundaryCondition`]
//! argument on every operation that erodes.

pub mod binary;
mod error;
pub mod sel;
pub mod sequence;

pub use error::{MorphError, MorphResult};
pub use sel::{Sel, SelElement};

pub use binary::{
    BoundaryCondition, close, close_brick, close_safe_brick, dilate, dilate_brick, erode,
    erode_brick, hit_miss_transform, open, open_brick, safe_border_size,
};

pub use sequence::{MorphOp, MorphSequence, morph_sequence};
