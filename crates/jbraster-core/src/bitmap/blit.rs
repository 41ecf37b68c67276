//! Region composition
//!
//! JBIG2 places decoded regions onto the page with one of five combination
//! operators. Each maps onto a raster operator over the source's full extent,
//! so page pixels outside the region are never touched.

use super::Bitmap;
use super::rop::{RopOp, rasterop};
use crate::error::{Error, Result, ResultExt};

/// How a region is combined with the page beneath it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CombinationOperator {
    #[default]
    Or,
    And,
    Xor,
    Xnor,
    Replace,
}

impl CombinationOperator {
    /// Raster operator implementing this combination.
    pub fn rop(self) -> RopOp {
        match self {
            CombinationOperator::Or => RopOp::SrcOrDst,
            CombinationOperator::And => RopOp::SrcAndDst,
            CombinationOperator::Xor => RopOp::SrcXorDst,
            CombinationOperator::Xnor => RopOp::Xnor,
            CombinationOperator::Replace => RopOp::Src,
        }
    }

    /// Combine one byte of region data (`new`) into page data (`old`).
    #[inline]
    pub fn combine(self, old: u8, new: u8) -> u8 {
        self.rop().apply(new, old)
    }
}

impl TryFrom<u8> for CombinationOperator {
    type Error = Error;

    /// Decode the 3-bit field used in region segment flags.
    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(CombinationOperator::Or),
            1 => Ok(CombinationOperator::And),
            2 => Ok(CombinationOperator::Xor),
            3 => Ok(CombinationOperator::Xnor),
            4 => Ok(CombinationOperator::Replace),
            _ => Err(Error::InvalidParameter(format!(
                "combination operator {value} not in 0..=4"
            ))),
        }
    }
}

/// Draw all of `src` into `dst` with its upper-left corner at `(x, y)`.
///
/// Parts of `src` falling outside `dst` are clipped.
pub fn blit(src: &Bitmap, dst: &mut Bitmap, x: i32, y: i32, op: CombinationOperator) -> Result<()> {
    let (w, h) = (src.width() as i32, src.height() as i32);
    rasterop(dst, x, y, w, h, op.rop(), Some(src), 0, 0).context("blit")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph() -> Bitmap {
        // 11x3, deliberately not byte aligned
        let mut bm = Bitmap::new(11, 3).unwrap();
        for &(x, y) in &[(0, 0), (5, 0), (10, 0), (1, 1), (9, 1), (4, 2), (5, 2), (6, 2)] {
            bm.set_pixel(x, y, true).unwrap();
        }
        bm
    }

    #[test]
    fn test_combine_bytes() {
        assert_eq!(CombinationOperator::Or.combine(0b1100, 0b1010), 0b1110);
        assert_eq!(CombinationOperator::And.combine(0b1100, 0b1010), 0b1000);
        assert_eq!(CombinationOperator::Xor.combine(0b1100, 0b1010), 0b0110);
        assert_eq!(CombinationOperator::Xnor.combine(0b1100, 0b1010), !0b0110u8);
        assert_eq!(CombinationOperator::Replace.combine(0b1100, 0b1010), 0b1010);
        assert!(CombinationOperator::try_from(5).is_err());
        assert_eq!(
            CombinationOperator::try_from(3).unwrap(),
            CombinationOperator::Xnor
        );
    }

    #[test]
    fn test_blit_xor_twice_restores_page() {
        let mut page = Bitmap::new(40, 10).unwrap();
        page.set_region(0, 0, 40, 5).unwrap();
        let before = page.clone();
        let g = glyph();
        blit(&g, &mut page, 13, 3, CombinationOperator::Xor).unwrap();
        assert_ne!(page, before);
        assert!(!page.get_pixel(13, 3));
        assert!(page.get_pixel(13 + 4, 5));
        blit(&g, &mut page, 13, 3, CombinationOperator::Xor).unwrap();
        assert_eq!(page, before);
    }

    #[test]
    fn test_blit_and_leaves_outside_region_alone() {
        let mut page = Bitmap::new(24, 6).unwrap();
        page.set_all();
        blit(&glyph(), &mut page, 5, 1, CombinationOperator::And).unwrap();
        // only the 33 pixels under the region can change
        assert_eq!(page.count_pixels(), 24 * 6 - (33 - 8));
        assert!(page.get_pixel(4, 1));
        assert!(page.get_pixel(16, 1));
    }

    #[test]
    fn test_blit_clips_at_page_edge() {
        let mut page = Bitmap::new(8, 2).unwrap();
        blit(&glyph(), &mut page, -5, 0, CombinationOperator::Replace).unwrap();
        // glyph column 5 lands at page x = 0, column 10 at x = 5
        assert!(page.get_pixel(0, 0));
        assert!(page.get_pixel(5, 0));
        assert!(page.get_pixel(4, 1));
        assert_eq!(page.count_pixels(), 3);
    }
}
