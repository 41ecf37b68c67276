//! Hausdorff template tests
//!
//! Two shapes match when each lies inside a dilation of the other. The
//! callers pass both shapes and their dilations: `b1`/`b3` undilated and
//! `b2`/`b4` their dilations, so the structuring element size is fixed by
//! whoever built `b2` and `b4`.

use crate::error::{RecogError, RecogResult};
use jbraster_core::{Bitmap, RopOp, rasterop};

/// `shape` minus `cover` shifted by `(dx, dy)`, on a canvas the size of `shape`.
fn uncovered(shape: &Bitmap, cover: &Bitmap, dx: i32, dy: i32) -> RecogResult<Bitmap> {
    let mut diff = shape.clone();
    rasterop(
        &mut diff,
        dx,
        dy,
        shape.width() as i32,
        shape.height() as i32,
        RopOp::Subtract,
        Some(cover),
        0,
        0,
    )?;
    Ok(diff)
}

fn sizes_too_different(b1: &Bitmap, b3: &Bitmap, maxdiffw: u32, maxdiffh: u32) -> bool {
    b1.width().abs_diff(b3.width()) > maxdiffw || b1.height().abs_diff(b3.height()) > maxdiffh
}

/// Two-way Hausdorff test.
///
/// `(delx, dely)` is the centroid difference, rounded to the nearest pixel.
/// Passes when `b1` lies inside `b4` shifted by the difference and `b3`
/// lies inside `b2` shifted back.
#[allow(clippy::too_many_arguments)]
pub fn hausdorff_test(
    b1: &Bitmap,
    b2: &Bitmap,
    b3: &Bitmap,
    b4: &Bitmap,
    delx: f32,
    dely: f32,
    maxdiffw: u32,
    maxdiffh: u32,
) -> RecogResult<bool> {
    if sizes_too_different(b1, b3, maxdiffw, maxdiffh) {
        return Ok(false);
    }
    let dx = delx.round() as i32;
    let dy = dely.round() as i32;

    if !uncovered(b1, b4, dx, dy)?.is_zero() {
        return Ok(false);
    }
    Ok(uncovered(b3, b2, -dx, -dy)?.is_zero())
}

/// Rank Hausdorff test.
///
/// Like [`hausdorff_test`], but each direction tolerates up to
/// `round(area * (1 - rank))` uncovered pixels, where `area1` and `area3`
/// are the ON-pixel counts of `b1` and `b3`. A rank of 1.0 is the plain
/// test.
///
/// # Errors
///
/// Returns [`RecogError::InvalidParameter`] if `rank` is outside (0, 1].
#[allow(clippy::too_many_arguments)]
pub fn rank_hausdorff_test(
    b1: &Bitmap,
    b2: &Bitmap,
    b3: &Bitmap,
    b4: &Bitmap,
    delx: f32,
    dely: f32,
    maxdiffw: u32,
    maxdiffh: u32,
    area1: u32,
    area3: u32,
    rank: f32,
) -> RecogResult<bool> {
    if !(rank > 0.0 && rank <= 1.0) {
        return Err(RecogError::InvalidParameter(format!(
            "rank must be in (0, 1], got {rank}"
        )));
    }
    if sizes_too_different(b1, b3, maxdiffw, maxdiffh) {
        return Ok(false);
    }
    let dx = delx.round() as i32;
    let dy = dely.round() as i32;
    let slack = |area: u32| (area as f64 * (1.0 - rank as f64) + 0.5) as u64;

    if uncovered(b1, b4, dx, dy)?.threshold_pixel_sum(slack(area1)) {
        return Ok(false);
    }
    Ok(!uncovered(b3, b2, -dx, -dy)?.threshold_pixel_sum(slack(area3)))
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
    fn test_hausdorff_identical() {
        let a = block(10, 10, 2, 2, 5, 5);
        let ad = block(10, 10, 1, 1, 7, 7);
        assert!(hausdorff_test(&a, &ad, &a, &ad, 0.0, 0.0, 0, 0).unwrap());
        // one pixel of shift is absorbed by the dilation
        assert!(hausdorff_test(&a, &ad, &a, &ad, 1.0, 0.0, 0, 0).unwrap());
        assert!(!hausdorff_test(&a, &ad, &a, &ad, 2.0, 0.0, 0, 0).unwrap());
    }

    #[test]
    fn test_hausdorff_extra_pixel() {
        let a = block(10, 10, 2, 2, 5, 5);
        let ad = block(10, 10, 1, 1, 7, 7);
        let mut b = a.clone();
        b.set_pixel(9, 9, true).unwrap();
        let bd = block(10, 10, 1, 1, 7, 7).or(&block(10, 10, 8, 8, 2, 2)).unwrap();

        // b's stray pixel is not covered by a's dilation
        assert!(!hausdorff_test(&a, &ad, &b, &bd, 0.0, 0.0, 0, 0).unwrap());
        // one stray pixel out of 26 is tolerated at rank 0.95
        assert!(rank_hausdorff_test(&a, &ad, &b, &bd, 0.0, 0.0, 0, 0, 25, 26, 0.95).unwrap());
        assert!(!rank_hausdorff_test(&a, &ad, &b, &bd, 0.0, 0.0, 0, 0, 25, 26, 1.0).unwrap());
    }

    #[test]
    fn test_rank_validation_and_sizes() {
        let a = block(10, 10, 2, 2, 5, 5);
        let b = block(14, 10, 2, 2, 5, 5);
        assert!(rank_hausdorff_test(&a, &a, &a, &a, 0.0, 0.0, 0, 0, 25, 25, 0.0).is_err());
        assert!(rank_hausdorff_test(&a, &a, &a, &a, 0.0, 0.0, 0, 0, 25, 25, 1.5).is_err());
        assert!(!hausdorff_test(&a, &a, &b, &b, 0.0, 0.0, 3, 0).unwrap());
        assert!(hausdorff_test(&a, &a, &b, &b, 0.0, 0.0, 4, 0).unwrap());
    }
}
