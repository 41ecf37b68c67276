//! jbraster-transform - Binary scaling for jbraster
//!
//! This crate provides the two scale paths used around morphology and
//! component extraction:
//!
//! - Rank reduction: 2x downsampling where each 2x2 block becomes ON when
//!   at least `level` of its pixels are ON, chained into a cascade of up to
//!   four stages
//! - Expansion: power-of-two expansion through spreading tables, and
//!   arbitrary integer replication

pub mod expand;
mod error;
pub mod reduce;

pub use error::{TransformError, TransformResult};
pub use expand::{expand_binary_power2, expand_replicate};
pub use reduce::{reduce_rank_binary_2, reduce_rank_binary_cascade};
