//! Type definitions for JBIG2 symbol extraction

/// Kind of component to extract from a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JbComponent {
    /// 8-connected components
    #[default]
    ConnComps,
    /// Components after a small vertical closing, so that dotted letters
    /// and broken strokes stay whole
    Characters,
    /// Words found through an adaptive horizontal dilation
    Words,
}
