//! Correlation matching
//!
//! The correlation of two bitmaps at a given alignment is
//! `|b1 AND shift(b2)|^2 / (|b1| * |b2|)`, 1.0 for identical bitmaps and
//! 0.0 when nothing overlaps. `b2` is shifted by the centroid difference
//! `(delx, dely)`, rounded to the nearest pixel.
//!
//! The AND is counted a byte at a time: each byte of `b1` is paired with the
//! eight `b2` pixels shifted under it, which are assembled from one byte when
//! the shift is byte-aligned and from two neighboring bytes otherwise.

use crate::error::{RecogError, RecogResult};
use jbraster_core::tables::SUM_TABLE;
use jbraster_core::{Bitmap, RopOp, rasterop};

fn check_areas(area1: u32, area2: u32) -> RecogResult<()> {
    if area1 == 0 || area2 == 0 {
        return Err(RecogError::InvalidParameter(format!(
            "areas must be positive, got {area1} and {area2}"
        )));
    }
    Ok(())
}

/// Whether the sizes differ by more than the allowed amounts.
fn sizes_too_different(b1: &Bitmap, b2: &Bitmap, maxdiffw: u32, maxdiffh: u32) -> bool {
    b1.width().abs_diff(b2.width()) > maxdiffw || b1.height().abs_diff(b2.height()) > maxdiffh
}

/// Row-by-row overlap of `b1` with `b2` shifted by `(dx, dy)`
struct Overlap<'a> {
    b1: &'a Bitmap,
    b2: &'a Bitmap,
    dx: i32,
    dy: i32,
    /// Rows of `b1` under the shifted `b2`
    rows: std::ops::Range<i32>,
}

impl<'a> Overlap<'a> {
    fn new(b1: &'a Bitmap, b2: &'a Bitmap, delx: f32, dely: f32) -> Self {
        let dx = delx.round() as i32;
        let dy = dely.round() as i32;
        let lower = dy.max(0);
        let upper = (b2.height() as i32 + dy).min(b1.height() as i32);
        Self {
            b1,
            b2,
            dx,
            dy,
            rows: lower..upper.max(lower),
        }
    }

    /// Number of ON pixels shared by row `y` of `b1` and the shifted `b2`.
    fn row_count(&self, y: i32) -> RecogResult<u32> {
        let row1 = self.b1.row(y as u32)?;
        let row2 = self.b2.row((y - self.dy) as u32)?;
        let end1 = self.b1.row_end_mask();
        let end2 = self.b2.row_end_mask();
        let last1 = row1.len().saturating_sub(1);
        let last2 = row2.len() as isize - 1;

        // Byte `k` of row2, padding masked; zero outside the row.
        let fetch = |k: isize| -> u8 {
            if k < 0 || k > last2 {
                0
            } else if k == last2 {
                row2[k as usize] & end2
            } else {
                row2[k as usize]
            }
        };

        let shift = self.dx.unsigned_abs() as isize;
        let (q, r) = (shift >> 3, (shift & 7) as u32);
        let mut count = 0u32;
        for (k, &byte) in row1.iter().enumerate() {
            let b1 = if k == last1 { byte & end1 } else { byte };
            if b1 == 0 {
                continue;
            }
            let k = k as isize;
            let b2 = if r == 0 {
                // aligned
                if self.dx >= 0 { fetch(k - q) } else { fetch(k + q) }
            } else if self.dx > 0 {
                (fetch(k - q) >> r) | (fetch(k - q - 1) << (8 - r))
            } else {
                (fetch(k + q) << r) | (fetch(k + q + 1) >> (8 - r))
            };
            count += SUM_TABLE[(b1 & b2) as usize] as u32;
        }
        Ok(count)
    }
}

/// Correlation of `b1` with `b2` shifted by `(delx, dely)`.
///
/// `area1` and `area2` are the ON-pixel counts of the two bitmaps. Pairs
/// whose widths differ by more than `maxdiffw` or heights by more than
/// `maxdiffh` score 0 without being compared.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] if either area is 0.
#[allow(clippy::too_many_arguments)]
pub fn correlation_score(
    b1: &Bitmap,
    b2: &Bitmap,
    area1: u32,
    area2: u32,
    delx: f32,
    dely: f32,
    maxdiffw: u32,
    maxdiffh: u32,
) -> RecogResult<f32> {
    check_areas(area1, area2)?;
    if sizes_too_different(b1, b2, maxdiffw, maxdiffh) {
        return Ok(0.0);
    }

    let overlap = Overlap::new(b1, b2, delx, dely);
    let mut count = 0u64;
    for y in overlap.rows.clone() {
        count += overlap.row_count(y)? as u64;
    }
    Ok(score(count, area1, area2))
}

fn score(count: u64, area1: u32, area2: u32) -> f32 {
    ((count * count) as f64 / (area1 as f64 * area2 as f64)) as f32
}

/// Same value as [`correlation_score`], computed by AND-ing a shifted copy
/// of `b2` into `b1` with raster operations and counting the result.
#[allow(clippy::too_many_arguments)]
pub fn correlation_score_simple(
    b1: &Bitmap,
    b2: &Bitmap,
    area1: u32,
    area2: u32,
    delx: f32,
    dely: f32,
    maxdiffw: u32,
    maxdiffh: u32,
) -> RecogResult<f32> {
    check_areas(area1, area2)?;
    if sizes_too_different(b1, b2, maxdiffw, maxdiffh) {
        return Ok(0.0);
    }

    let dx = delx.round() as i32;
    let dy = dely.round() as i32;
    let mut and = b1.create_template();
    rasterop(
        &mut and,
        dx,
        dy,
        b2.width() as i32,
        b2.height() as i32,
        RopOp::Src,
        Some(b2),
        0,
        0,
    )?;
    rasterop(
        &mut and,
        0,
        0,
        b1.width() as i32,
        b1.height() as i32,
        RopOp::SrcAndDst,
        Some(b1),
        0,
        0,
    )?;
    Ok(score(and.count_pixels(), area1, area2))
}

/// Whether the correlation of `b1` with the shifted `b2` reaches
/// `score_threshold`.
///
/// The score is never computed: the AND count is compared against
/// `ceil(sqrt(score_threshold * area1 * area2))` row by row, returning as
/// soon as the count reaches it or can no longer reach it. `rows_below[i]`
/// is the number of ON pixels of `b1` below row `i`
/// ([`Bitmap::count_pixels_below_rows`]); pass it when testing `b1` against
/// many templates, or `None` to have it computed here.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] if either area is 0 or
/// `rows_below` does not have one entry per row of `b1`.
#[allow(clippy::too_many_arguments)]
pub fn correlation_score_thresholded(
    b1: &Bitmap,
    b2: &Bitmap,
    area1: u32,
    area2: u32,
    delx: f32,
    dely: f32,
    maxdiffw: u32,
    maxdiffh: u32,
    rows_below: Option<&[u32]>,
    score_threshold: f32,
) -> RecogResult<bool> {
    check_areas(area1, area2)?;
    if sizes_too_different(b1, b2, maxdiffw, maxdiffh) {
        return Ok(false);
    }

    let computed;
    let below = match rows_below {
        Some(below) => {
            if below.len() != b1.height() as usize {
                return Err(RecogError::InvalidParameter(format!(
                    "rows_below has {} entries for a bitmap of height {}",
                    below.len(),
                    b1.height()
                )));
            }
            below
        }
        None => {
            computed = b1.count_pixels_below_rows();
            computed.as_slice()
        }
    };

    let threshold = (score_threshold as f64 * area1 as f64 * area2 as f64)
        .max(0.0)
        .sqrt()
        .ceil() as u64;

    let overlap = Overlap::new(b1, b2, delx, dely);
    let mut count = 0u64;
    for y in overlap.rows.clone() {
        count += overlap.row_count(y)? as u64;
        if count >= threshold {
            return Ok(true);
        }
        if count + (below[y as usize] as u64) < threshold {
            return Ok(false);
        }
    }
    Ok(count >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(w: u32, h: u32, x: i32, y: i32, bw: i32, bh: i32) -> Bitmap {
        let mut bm = Bitmap::new(w, h).unwrap();
        bm.set_region(x, y, bw, bh).unwrap();
        bm
    }

    #[test]
    fn test_self_correlation() {
        let bm = block(13, 9, 2, 1, 7, 6);
        let area = bm.count_pixels() as u32;
        let s = correlation_score(&bm, &bm, area, area, 0.0, 0.0, 0, 0).unwrap();
        assert_eq!(s, 1.0);
    }

    #[test]
    fn test_shifted_block() {
        // 4x4 blocks overlapping in a 3x4 strip when shifted by one pixel
        let a = block(12, 6, 4, 1, 4, 4);
        for delx in [1.0f32, 0.6, -1.0, -1.4] {
            let s = correlation_score(&a, &a, 16, 16, delx, 0.0, 0, 0).unwrap();
            assert!((s - 144.0 / 256.0).abs() < 1e-6, "delx {delx}: {s}");
        }
        // half a pixel rounds away from zero
        let s = correlation_score(&a, &a, 16, 16, 0.5, -0.5, 0, 0).unwrap();
        assert!((s - 81.0 / 256.0).abs() < 1e-6);
    }

    #[test]
    fn test_shift_across_bytes() {
        let a = block(40, 4, 3, 0, 20, 4);
        for dx in -25..=25 {
            let fast = correlation_score(&a, &a, 80, 80, dx as f32, 1.0, 0, 0).unwrap();
            let simple = correlation_score_simple(&a, &a, 80, 80, dx as f32, 1.0, 0, 0).unwrap();
            assert_eq!(fast, simple, "dx {dx}");
        }
    }

    #[test]
    fn test_size_rejection_and_areas() {
        let a = block(10, 10, 0, 0, 10, 10);
        let b = block(13, 10, 0, 0, 10, 10);
        assert_eq!(correlation_score(&a, &b, 100, 100, 0.0, 0.0, 2, 2).unwrap(), 0.0);
        assert!(correlation_score(&a, &b, 100, 100, 0.0, 0.0, 3, 0).unwrap() > 0.9);
        assert!(correlation_score(&a, &a, 0, 100, 0.0, 0.0, 0, 0).is_err());
        assert!(
            !correlation_score_thresholded(&a, &b, 100, 100, 0.0, 0.0, 2, 2, None, 0.1).unwrap()
        );
    }

    #[test]
    fn test_thresholded_agrees_with_score() {
        let a = block(16, 8, 2, 1, 10, 5);
        let area = 50;
        let below = a.count_pixels_below_rows();
        for dx in -4..=4 {
            let s = correlation_score(&a, &a, area, area, dx as f32, 0.0, 0, 0).unwrap();
            for t in [0.2f32, 0.5, 0.8] {
                let hit = correlation_score_thresholded(
                    &a,
                    &a,
                    area,
                    area,
                    dx as f32,
                    0.0,
                    0,
                    0,
                    Some(&below),
                    t,
                )
                .unwrap();
                assert_eq!(hit, s >= t, "dx {dx} t {t} score {s}");
            }
        }
        assert!(
            correlation_score_thresholded(&a, &a, area, area, 0.0, 0.0, 0, 0, Some(&[0; 3]), 0.5)
                .is_err()
        );
    }
}
