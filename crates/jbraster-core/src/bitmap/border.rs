//! Border operations
//!
//! Adding a border copies the bitmap into a larger one whose margins are
//! filled with a constant; removing a border copies the interior out.

use super::Bitmap;
use super::rop::{RopOp, rasterop};
use crate::error::{Error, Result, ResultExt};

impl Bitmap {
    /// Add a border of `npix` pixels on all four sides.
    ///
    /// # Arguments
    ///
    /// * `npix` - Border width
    /// * `val` - Fill value for the border pixels
    pub fn add_border(&self, npix: u32, val: bool) -> Result<Bitmap> {
        self.add_border_general(npix, npix, npix, npix, val)
    }

    /// Add a border with independent widths per side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the padded size is too large.
    pub fn add_border_general(
        &self,
        left: u32,
        right: u32,
        top: u32,
        bottom: u32,
        val: bool,
    ) -> Result<Bitmap> {
        let too_big = || Error::InvalidDimension {
            width: self.width.saturating_add(left).saturating_add(right),
            height: self.height.saturating_add(top).saturating_add(bottom),
        };
        let wd = self
            .width
            .checked_add(left)
            .and_then(|w| w.checked_add(right))
            .ok_or_else(too_big)?;
        let hd = self
            .height
            .checked_add(top)
            .and_then(|h| h.checked_add(bottom))
            .ok_or_else(too_big)?;

        let mut out = self.derive(wd, hd).context("add_border")?;
        out.id = self.id;
        if val {
            out.set_all();
        }
        rasterop(
            &mut out,
            left as i32,
            top as i32,
            self.width as i32,
            self.height as i32,
            RopOp::Src,
            Some(self),
            0,
            0,
        )
        .context("add_border")?;
        Ok(out)
    }

    /// Remove `npix` pixels from all four sides.
    pub fn remove_border(&self, npix: u32) -> Result<Bitmap> {
        self.remove_border_general(npix, npix, npix, npix)
    }

    /// Remove a border with independent widths per side.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the border to remove is wider
    /// or taller than the bitmap.
    pub fn remove_border_general(
        &self,
        left: u32,
        right: u32,
        top: u32,
        bottom: u32,
    ) -> Result<Bitmap> {
        let horiz = left as u64 + right as u64;
        let vert = top as u64 + bottom as u64;
        if horiz > self.width as u64 || vert > self.height as u64 {
            return Err(Error::InvalidParameter(format!(
                "border ({left}, {right}, {top}, {bottom}) exceeds {}x{} bitmap",
                self.width, self.height
            )));
        }
        let wd = self.width - horiz as u32;
        let hd = self.height - vert as u32;

        let mut out = self.derive(wd, hd).context("remove_border")?;
        out.id = self.id;
        rasterop(
            &mut out,
            0,
            0,
            wd as i32,
            hd as i32,
            RopOp::Src,
            Some(self),
            left as i32,
            top as i32,
        )
        .context("remove_border")?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scatter(w: u32, h: u32) -> Bitmap {
        let mut bm = Bitmap::new(w, h).unwrap();
        for y in 0..h {
            for x in 0..w {
                if (x * 7 + y * 13) % 5 == 0 || x == w - 1 {
                    bm.set_pixel(x, y, true).unwrap();
                }
            }
        }
        bm
    }

    #[test]
    fn test_add_remove_round_trip() {
        for &(w, h) in &[(19, 19), (20, 7), (2196, 3), (1, 1)] {
            let bm = scatter(w, h);
            for &n in &[0, 1, 8, 17] {
                for &val in &[false, true] {
                    let bordered = bm.add_border(n, val).unwrap();
                    assert_eq!(bordered.width(), w + 2 * n);
                    assert_eq!(bordered.height(), h + 2 * n);
                    let back = bordered.remove_border(n).unwrap();
                    assert_eq!(back, bm, "w={w} n={n} val={val}");
                }
            }
        }
    }

    #[test]
    fn test_border_fill_value() {
        let bm = Bitmap::new(5, 3).unwrap();
        let ones = bm.add_border_general(1, 2, 3, 4, true).unwrap();
        assert_eq!((ones.width(), ones.height()), (8, 10));
        assert_eq!(ones.count_pixels(), 80 - 15);
        assert!(!ones.get_pixel(1, 3));
        assert!(ones.get_pixel(0, 3));
        assert!(ones.get_pixel(6, 3));

        let zeros = scatter(5, 3).add_border(4, false).unwrap();
        assert_eq!(zeros.count_pixels(), scatter(5, 3).count_pixels());
    }

    #[test]
    fn test_remove_too_much() {
        let bm = Bitmap::new(10, 10).unwrap();
        assert!(matches!(
            bm.remove_border(6),
            Err(Error::InvalidParameter(_))
        ));
        assert!(bm.remove_border_general(4, 7, 0, 0).is_err());
        let empty = bm.remove_border(5).unwrap();
        assert_eq!((empty.width(), empty.height()), (0, 0));
    }

    #[test]
    fn test_metadata_survives() {
        let mut bm = scatter(9, 9);
        bm.set_resolution(300, 300);
        bm.set_id(Some(4));
        let b = bm.add_border(3, false).unwrap();
        assert_eq!(b.xres(), 300);
        assert_eq!(b.id(), Some(4));
    }
}
