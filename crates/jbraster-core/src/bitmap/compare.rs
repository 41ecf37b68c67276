//! Pixel counting, equality and raster scans
//!
//! Everything here looks at logical pixels only: padding bits in the last
//! byte of each row are masked off before they are counted or compared.

use super::Bitmap;
use crate::tables::{RIGHT_MASK, count_row};

impl Bitmap {
    /// Number of ON pixels.
    pub fn count_pixels(&self) -> u64 {
        let mask = self.row_end_mask();
        self.rows().map(|row| count_row(row, mask) as u64).sum()
    }

    /// Number of ON pixels in each row.
    pub fn count_pixels_by_row(&self) -> Vec<u32> {
        let mask = self.row_end_mask();
        let mut counts: Vec<u32> = self.rows().map(|row| count_row(row, mask)).collect();
        counts.resize(self.height as usize, 0);
        counts
    }

    /// For each row `i`, the number of ON pixels in rows `i + 1 .. height`.
    pub fn count_pixels_below_rows(&self) -> Vec<u32> {
        let by_row = self.count_pixels_by_row();
        let mut below = vec![0u32; by_row.len()];
        let mut acc = 0u32;
        for (i, &n) in by_row.iter().enumerate().rev() {
            below[i] = acc;
            acc += n;
        }
        below
    }

    /// Whether more than `thresh` pixels are ON.
    ///
    /// Stops scanning as soon as the answer is known.
    pub fn threshold_pixel_sum(&self, thresh: u64) -> bool {
        let mask = self.row_end_mask();
        let mut sum = 0u64;
        for row in self.rows() {
            sum += count_row(row, mask) as u64;
            if sum > thresh {
                return true;
            }
        }
        false
    }

    /// Whether no pixel is ON.
    pub fn is_zero(&self) -> bool {
        let mask = self.row_end_mask();
        self.rows().all(|row| match row.split_last() {
            Some((&last, head)) => last & mask == 0 && head.iter().all(|&b| b == 0),
            None => true,
        })
    }

    /// Same size and same logical pixels; padding and metadata are ignored.
    pub fn equals(&self, other: &Bitmap) -> bool {
        if self.width != other.width || self.height != other.height {
            return false;
        }
        let mask = self.row_end_mask();
        self.rows().zip(other.rows()).all(|(a, b)| {
            match (a.split_last(), b.split_last()) {
                (Some((&la, ha)), Some((&lb, hb))) => ha == hb && (la ^ lb) & mask == 0,
                _ => true,
            }
        })
    }

    /// First ON pixel at or after `(xstart, ystart)` in raster order.
    ///
    /// Whole zero bytes are skipped without looking at their bits.
    pub fn next_on_pixel(&self, xstart: u32, ystart: u32) -> Option<(u32, u32)> {
        if self.width == 0 {
            return None;
        }
        let end_mask = self.row_end_mask();
        let last = self.row_stride - 1;
        for y in ystart..self.height {
            let row = self.row(y).ok()?;
            let x0 = if y == ystart { xstart as usize } else { 0 };
            if x0 >= self.width as usize {
                continue;
            }
            let first = x0 >> 3;
            for (k, &byte) in row.iter().enumerate().skip(first) {
                let mut b = byte;
                if k == first {
                    b &= RIGHT_MASK[8 - (x0 & 7)];
                }
                if k == last {
                    b &= end_mask;
                }
                if b != 0 {
                    let x = 8 * k as u32 + b.leading_zeros();
                    return Some((x, y));
                }
            }
        }
        None
    }
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl Eq for Bitmap {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_ignores_padding() {
        let bm = Bitmap::with_data(10, 2, vec![0xff, 0xff, 0x00, 0x7f]).unwrap();
        assert_eq!(bm.count_pixels(), 10 + 1);
        assert_eq!(bm.count_pixels_by_row(), vec![10, 1]);
        assert_eq!(bm.count_pixels_below_rows(), vec![1, 0]);
    }

    #[test]
    fn test_threshold_pixel_sum() {
        let mut bm = Bitmap::new(16, 4).unwrap();
        bm.set_region(0, 0, 5, 1).unwrap();
        assert!(bm.threshold_pixel_sum(4));
        assert!(!bm.threshold_pixel_sum(5));
    }

    #[test]
    fn test_equals_ignores_padding_and_polarity() {
        let a = Bitmap::with_data(12, 1, vec![0xab, 0xc0]).unwrap();
        let mut b = Bitmap::with_data(12, 1, vec![0xab, 0xcf]).unwrap();
        assert_eq!(a, b);
        b.set_pixel(11, 0, true).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, Bitmap::new(13, 1).unwrap());
        assert!(Bitmap::with_data(4, 1, vec![0x0f]).unwrap().is_zero());
        assert!(!a.is_zero());
    }

    #[test]
    fn test_next_on_pixel() {
        let mut bm = Bitmap::new(21, 4).unwrap();
        // padding bits must not be reported
        bm.set_byte(2, 0x07).unwrap();
        assert_eq!(bm.next_on_pixel(0, 0), None);

        bm.set_pixel(20, 0, true).unwrap();
        bm.set_pixel(3, 2, true).unwrap();
        bm.set_pixel(9, 2, true).unwrap();
        assert_eq!(bm.next_on_pixel(0, 0), Some((20, 0)));
        assert_eq!(bm.next_on_pixel(21, 0), Some((3, 2)));
        assert_eq!(bm.next_on_pixel(4, 2), Some((9, 2)));
        assert_eq!(bm.next_on_pixel(10, 2), None);
        assert_eq!(bm.next_on_pixel(0, 9), None);
    }
}
