//! jbraster - binary raster engine for JBIG2 symbol extraction
//!
//! Packed 1-bit-per-pixel bitmaps and the pixel-level algorithms a JBIG2
//! symbol classifier is built on.
//!
//! # Overview
//!
//! - Bitmaps, boxes, raster operations and region composition (re-exported
//!   at the top level)
//! - Binary morphology and morphological sequences ([`morph`])
//! - Rank-order reduction and replicative expansion ([`transform`])
//! - Seed fill and connected components ([`region`])
//! - Component extraction, correlation and Hausdorff matching ([`recog`])
//!
//! # Example
//!
//! ```
//! use jbraster::{Bitmap, BoundaryCondition};
//! use jbraster::morph::{MorphSequence, morph_sequence};
//! use jbraster::recog::{JbComponent, get_components};
//!
//! let mut page = Bitmap::new(100, 40).unwrap();
//! page.set_region(10, 10, 8, 12).unwrap();
//! page.set_region(30, 10, 8, 12).unwrap();
//!
//! // Reduce by 4, close, then expand back to full size.
//! let seq: MorphSequence = "r11 + c3.3 + x4".parse().unwrap();
//! let blurred = morph_sequence(&page, &seq, BoundaryCondition::default()).unwrap();
//! assert_eq!((blurred.width(), blurred.height()), (100, 40));
//!
//! let (symbols, _) = get_components(&page, JbComponent::ConnComps, 50, 50).unwrap();
//! assert_eq!(symbols.len(), 2);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use jbraster_core::*;

pub use jbraster_morph::BoundaryCondition;

// Re-export domain crates as modules to avoid name conflicts
pub use jbraster_morph as morph;
pub use jbraster_recog as recog;
pub use jbraster_region as region;
pub use jbraster_transform as transform;
