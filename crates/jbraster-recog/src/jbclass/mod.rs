//! JBIG2 symbol extraction and matching
//!
//! Everything a symbol classifier needs short of the classifier itself:
//! component extraction at three granularities, correlation and Hausdorff
//! template tests, and centroids for aligning candidates.

mod centroid;
mod components;
mod correlation;
mod hausdorff;
mod types;

pub use centroid::{centroid, centroids};
pub use components::{get_components, word_mask_by_dilation};
pub use correlation::{
    correlation_score, correlation_score_simple, correlation_score_thresholded,
};
pub use hausdorff::{hausdorff_test, rank_hausdorff_test};
pub use types::JbComponent;
