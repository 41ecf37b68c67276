//! jbraster-recog - symbol extraction and matching for JBIG2 classification
//!
//! This crate provides the pieces a JBIG2 symbol classifier is built from:
//!
//! - **Component extraction**: connected components, characters or words
//!   ([`get_components`], [`word_mask_by_dilation`])
//! - **Correlation matching**: [`correlation_score`] and its thresholded
//!   early-exit form
//! - **Hausdorff matching**: [`hausdorff_test`], [`rank_hausdorff_test`]
//! - **Centroids** for aligning candidates: [`centroid`], [`centroids`]
//!
//! # Quick Start
//!
//! ```
//! use jbraster_core::Bitmap;
//! use jbraster_recog::{JbComponent, centroid, correlation_score, get_components};
//!
//! let mut page = Bitmap::new(64, 32).unwrap();
//! page.set_region(4, 4, 6, 9).unwrap();
//! page.set_region(20, 4, 6, 9).unwrap();
//!
//! let (symbols, boxes) = get_components(&page, JbComponent::ConnComps, 32, 32).unwrap();
//! assert_eq!(boxes.len(), 2);
//!
//! let (a, b) = (symbols.get(0).unwrap(), symbols.get(1).unwrap());
//! let (ca, cb) = (centroid(a), centroid(b));
//! let area = a.count_pixels() as u32;
//! let score = correlation_score(a, b, area, area, ca.x - cb.x, ca.y - cb.y, 2, 2).unwrap();
//! assert_eq!(score, 1.0);
//! ```

mod error;
pub mod jbclass;

pub use error::{RecogError, RecogResult};

pub use jbclass::{
    JbComponent, centroid, centroids, correlation_score, correlation_score_simple,
    correlation_score_thresholded, get_components, hausdorff_test, rank_hausdorff_test,
    word_mask_by_dilation,
};
