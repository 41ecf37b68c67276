//! Rectangle extraction

use super::Bitmap;
use super::rop::{RopOp, rasterop};
use crate::box_::Box;
use crate::error::{Error, Result, ResultExt};

impl Bitmap {
    /// Copy out the part of the bitmap covered by `rect`.
    ///
    /// Returns the extracted bitmap together with the clipped box actually
    /// used, or `None` if `rect` does not overlap the bitmap at all.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] for a box with negative size.
    pub fn clip_rectangle(&self, rect: &Box) -> Result<Option<(Bitmap, Box)>> {
        if !rect.is_valid() {
            return Err(Error::InvalidParameter(format!(
                "clip box has negative size: {}x{}",
                rect.w, rect.h
            )));
        }
        let bounds = Box::new_unchecked(0, 0, self.width as i32, self.height as i32);
        let Some(clipped) = rect.intersect(&bounds) else {
            return Ok(None);
        };

        let mut out = self
            .derive(clipped.w as u32, clipped.h as u32)
            .context("clip_rectangle")?;
        rasterop(
            &mut out,
            0,
            0,
            clipped.w,
            clipped.h,
            RopOp::Src,
            Some(self),
            clipped.x,
            clipped.y,
        )
        .context("clip_rectangle")?;
        Ok(Some((out, clipped)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_inside_and_partial() {
        let mut bm = Bitmap::new(20, 10).unwrap();
        bm.set_pixel(5, 5, true).unwrap();
        bm.set_pixel(19, 9, true).unwrap();

        let (sub, b) = bm
            .clip_rectangle(&Box::new_unchecked(4, 4, 3, 3))
            .unwrap()
            .unwrap();
        assert_eq!(b, Box::new_unchecked(4, 4, 3, 3));
        assert_eq!((sub.width(), sub.height()), (3, 3));
        assert!(sub.get_pixel(1, 1));
        assert_eq!(sub.count_pixels(), 1);

        let (sub, b) = bm
            .clip_rectangle(&Box::new_unchecked(15, 8, 10, 10))
            .unwrap()
            .unwrap();
        assert_eq!(b, Box::new_unchecked(15, 8, 5, 2));
        assert!(sub.get_pixel(4, 1));
    }

    #[test]
    fn test_clip_outside_is_none() {
        let bm = Bitmap::new(20, 10).unwrap();
        assert!(
            bm.clip_rectangle(&Box::new_unchecked(30, 0, 5, 5))
                .unwrap()
                .is_none()
        );
        assert!(
            bm.clip_rectangle(&Box::new_unchecked(0, 0, -1, 5))
                .is_err()
        );
    }
}
