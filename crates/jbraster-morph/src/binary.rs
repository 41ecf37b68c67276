//! Binary morphological operations
//!
//! Erosion, dilation, opening and closing of 1-bpp bitmaps, built from
//! whole-image raster operations: one shifted OR (dilation) or AND
//! (erosion) per Hit of the structuring element.
//!
//! The treatment of pixels beyond the image edge is selected per call by
//! [`BoundaryCondition`].

use crate::{MorphError, MorphResult, Sel, SelElement};
use jbraster_core::{Bitmap, RopOp, rasterop};

/// How erosion treats pixels outside the image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryCondition {
    /// Off-image pixels are OFF: erosion clears the edge strips reached by
    /// the structuring element
    #[default]
    Asymmetric,
    /// Off-image pixels are treated as ON for erosion; dilation and
    /// erosion become dual operations
    Symmetric,
}

/// Dilate: OR of `src` shifted by `(j - cx, i - cy)` for every Hit.
pub fn dilate(src: &Bitmap, sel: &Sel) -> MorphResult<Bitmap> {
    let (w, h) = (src.width() as i32, src.height() as i32);
    let mut out = src.create_template();
    for (dx, dy) in sel.hit_offsets() {
        rasterop(&mut out, dx, dy, w, h, RopOp::SrcOrDst, Some(src), 0, 0)?;
    }
    Ok(out)
}

/// Erode: AND of `src` shifted by `(cx - j, cy - i)` for every Hit.
///
/// Under [`BoundaryCondition::Asymmetric`] the edge strips given by
/// [`Sel::find_max_translations`] are cleared afterwards.
pub fn erode(src: &Bitmap, sel: &Sel, bc: BoundaryCondition) -> MorphResult<Bitmap> {
    let (w, h) = (src.width() as i32, src.height() as i32);
    let mut out = src.create_template();
    out.set_all();
    for (dx, dy) in sel.hit_offsets() {
        rasterop(&mut out, -dx, -dy, w, h, RopOp::SrcAndDst, Some(src), 0, 0)?;
    }
    if bc == BoundaryCondition::Asymmetric {
        clear_edge_strips(&mut out, sel.find_max_translations())?;
    }
    Ok(out)
}

fn clear_edge_strips(bm: &mut Bitmap, (xp, yp, xn, yn): (u32, u32, u32, u32)) -> MorphResult<()> {
    let (w, h) = (bm.width() as i32, bm.height() as i32);
    let (xp, yp, xn, yn) = (xp as i32, yp as i32, xn as i32, yn as i32);
    if xp > 0 {
        bm.clear_region(0, 0, xp, h)?;
    }
    if xn > 0 {
        bm.clear_region(w - xn, 0, xn, h)?;
    }
    if yp > 0 {
        bm.clear_region(0, 0, w, yp)?;
    }
    if yn > 0 {
        bm.clear_region(0, h - yn, w, yn)?;
    }
    Ok(())
}

/// Open: erosion followed by dilation with the same Sel.
pub fn open(src: &Bitmap, sel: &Sel, bc: BoundaryCondition) -> MorphResult<Bitmap> {
    let eroded = erode(src, sel, bc)?;
    dilate(&eroded, sel)
}

/// Close: dilation followed by erosion with the same Sel.
pub fn close(src: &Bitmap, sel: &Sel, bc: BoundaryCondition) -> MorphResult<Bitmap> {
    let dilated = dilate(src, sel)?;
    erode(&dilated, sel, bc)
}

/// Hit-miss transform
///
/// A pixel is ON when every Hit lands on an ON pixel and every Miss on an
/// OFF pixel. Under [`BoundaryCondition::Asymmetric`] the edge strips where
/// the hits reach off the image are cleared. A Sel with neither hits nor
/// misses yields an empty result.
pub fn hit_miss_transform(src: &Bitmap, sel: &Sel, bc: BoundaryCondition) -> MorphResult<Bitmap> {
    let (w, h) = (src.width() as i32, src.height() as i32);
    let mut out = src.create_template();
    let mut first = true;

    for i in 0..sel.height() {
        for j in 0..sel.width() {
            let dx = sel.origin_x() as i32 - j as i32;
            let dy = sel.origin_y() as i32 - i as i32;
            let op = match sel.get_element(j, i) {
                Some(SelElement::Hit) => {
                    if first {
                        out.clear_all();
                        RopOp::Src
                    } else {
                        RopOp::SrcAndDst
                    }
                }
                Some(SelElement::Miss) => {
                    if first {
                        out.set_all();
                    }
                    RopOp::Subtract
                }
                _ => continue,
            };
            first = false;
            rasterop(&mut out, dx, dy, w, h, op, Some(src), 0, 0)?;
        }
    }

    if bc == BoundaryCondition::Asymmetric {
        clear_edge_strips(&mut out, sel.find_max_translations())?;
    }
    Ok(out)
}

fn check_brick(hsize: u32, vsize: u32) -> MorphResult<()> {
    if hsize == 0 || vsize == 0 {
        return Err(MorphError::InvalidParameters(format!(
            "brick sizes must be > 0, got {hsize}x{vsize}"
        )));
    }
    Ok(())
}

/// The horizontal and vertical passes of an `hsize x vsize` brick
fn brick_passes(hsize: u32, vsize: u32) -> MorphResult<(Sel, Sel)> {
    Ok((Sel::create_horizontal(hsize)?, Sel::create_vertical(vsize)?))
}

/// Dilate with an `hsize x vsize` brick.
///
/// A 1x1 brick returns a copy. When both sizes exceed 1 the brick is
/// applied as a horizontal pass followed by a vertical pass.
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] if either size is 0.
pub fn dilate_brick(src: &Bitmap, hsize: u32, vsize: u32) -> MorphResult<Bitmap> {
    check_brick(hsize, vsize)?;
    if hsize == 1 && vsize == 1 {
        return Ok(src.clone());
    }
    if hsize == 1 || vsize == 1 {
        return dilate(src, &Sel::create_brick(hsize, vsize)?);
    }
    let (sel_h, sel_v) = brick_passes(hsize, vsize)?;
    let tmp = dilate(src, &sel_h)?;
    dilate(&tmp, &sel_v)
}

/// Erode with an `hsize x vsize` brick.
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] if either size is 0.
pub fn erode_brick(
    src: &Bitmap,
    hsize: u32,
    vsize: u32,
    bc: BoundaryCondition,
) -> MorphResult<Bitmap> {
    check_brick(hsize, vsize)?;
    if hsize == 1 && vsize == 1 {
        return Ok(src.clone());
    }
    if hsize == 1 || vsize == 1 {
        return erode(src, &Sel::create_brick(hsize, vsize)?, bc);
    }
    let (sel_h, sel_v) = brick_passes(hsize, vsize)?;
    let tmp = erode(src, &sel_h, bc)?;
    erode(&tmp, &sel_v, bc)
}

/// Open with an `hsize x vsize` brick.
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] if either size is 0.
pub fn open_brick(
    src: &Bitmap,
    hsize: u32,
    vsize: u32,
    bc: BoundaryCondition,
) -> MorphResult<Bitmap> {
    check_brick(hsize, vsize)?;
    if hsize == 1 && vsize == 1 {
        return Ok(src.clone());
    }
    if hsize == 1 || vsize == 1 {
        return open(src, &Sel::create_brick(hsize, vsize)?, bc);
    }
    let (sel_h, sel_v) = brick_passes(hsize, vsize)?;
    let tmp = erode(src, &sel_h, bc)?;
    let tmp = erode(&tmp, &sel_v, bc)?;
    let tmp = dilate(&tmp, &sel_h)?;
    dilate(&tmp, &sel_v)
}

/// Close with an `hsize x vsize` brick.
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] if either size is 0.
pub fn close_brick(
    src: &Bitmap,
    hsize: u32,
    vsize: u32,
    bc: BoundaryCondition,
) -> MorphResult<Bitmap> {
    check_brick(hsize, vsize)?;
    if hsize == 1 && vsize == 1 {
        return Ok(src.clone());
    }
    if hsize == 1 || vsize == 1 {
        return close(src, &Sel::create_brick(hsize, vsize)?, bc);
    }
    let (sel_h, sel_v) = brick_passes(hsize, vsize)?;
    let tmp = dilate(src, &sel_h)?;
    let tmp = dilate(&tmp, &sel_v)?;
    let tmp = erode(&tmp, &sel_h, bc)?;
    erode(&tmp, &sel_v, bc)
}

/// Border added by [`close_safe_brick`]: the largest half-extent of the
/// brick rounded up to a whole byte.
pub fn safe_border_size(hsize: u32, vsize: u32) -> u32 {
    let maxtrans = (hsize / 2).max(vsize / 2);
    maxtrans.div_ceil(8) * 8
}

/// Close with a brick without losing pixels near the edges.
///
/// Under [`BoundaryCondition::Asymmetric`] the source is padded with an OFF
/// border of [`safe_border_size`] pixels, closed, and the border removed.
/// The symmetric convention is already safe and closes directly.
///
/// # Errors
///
/// Returns [`MorphError::InvalidParameters`] if either size is 0.
pub fn close_safe_brick(
    src: &Bitmap,
    hsize: u32,
    vsize: u32,
    bc: BoundaryCondition,
) -> MorphResult<Bitmap> {
    check_brick(hsize, vsize)?;
    if hsize == 1 && vsize == 1 {
        return Ok(src.clone());
    }
    if bc == BoundaryCondition::Symmetric {
        return close_brick(src, hsize, vsize, bc);
    }
    let bordsize = safe_border_size(hsize, vsize);
    let padded = src.add_border(bordsize, false)?;
    let closed = close_brick(&padded, hsize, vsize, bc)?;
    Ok(closed.remove_border(bordsize)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASYM: BoundaryCondition = BoundaryCondition::Asymmetric;
    const SYM: BoundaryCondition = BoundaryCondition::Symmetric;

    fn from_rows(rows: &[&str]) -> Bitmap {
        let mut bm = Bitmap::new(rows[0].len() as u32, rows.len() as u32).unwrap();
        for (y, row) in rows.iter().enumerate() {
            for (x, c) in row.chars().enumerate() {
                if c == 'x' {
                    bm.set_pixel(x as u32, y as u32, true).unwrap();
                }
            }
        }
        bm
    }

    #[test]
    fn test_dilate_single_pixel() {
        let src = from_rows(&[".....", ".....", "..x..", ".....", "....."]);
        let out = dilate(&src, &Sel::create_brick(3, 3).unwrap()).unwrap();
        let want = from_rows(&[".....", ".xxx.", ".xxx.", ".xxx.", "....."]);
        assert!(out.equals(&want));
    }

    #[test]
    fn test_dilate_uses_origin() {
        let src = from_rows(&["x...", "....", "...."]);
        let sel = Sel::from_string("xx", 0, 0).unwrap();
        let out = dilate(&src, &sel).unwrap();
        assert!(out.equals(&from_rows(&["xx..", "....", "...."])));
        let sel = Sel::from_string("xx", 1, 0).unwrap();
        let out = dilate(&src, &sel).unwrap();
        assert!(out.equals(&from_rows(&["x...", "....", "...."])));
    }

    #[test]
    fn test_erode_boundary_conditions() {
        let mut src = Bitmap::new(6, 4).unwrap();
        src.set_all();
        let sel = Sel::create_brick(3, 3).unwrap();

        let sym = erode(&src, &sel, SYM).unwrap();
        assert_eq!(sym.count_pixels(), 24);

        let asym = erode(&src, &sel, ASYM).unwrap();
        assert!(asym.equals(&from_rows(&["......", ".xxxx.", ".xxxx.", "......"])));
    }

    #[test]
    fn test_erode_removes_thin_features() {
        let src = from_rows(&[
            "........", ".xxxxx..", ".xxxxx..", ".xxxxx..", "......x.", "........",
        ]);
        let out = erode(&src, &Sel::create_brick(3, 3).unwrap(), ASYM).unwrap();
        assert!(out.equals(&from_rows(&[
            "........", "........", "..xxx...", "........", "........", "........",
        ])));
    }

    #[test]
    fn test_open_close_brick() {
        let src = from_rows(&["xxx.xxx", "xxx.xxx", "xxx.xxx", "......."]);
        let closed = close_brick(&src, 3, 1, SYM).unwrap();
        assert!(closed.equals(&from_rows(&["xxxxxxx", "xxxxxxx", "xxxxxxx", "......."])));

        let noisy = from_rows(&["x......", ".xxx...", ".xxx...", ".xxx..x"]);
        let opened = open_brick(&noisy, 3, 3, ASYM).unwrap();
        assert!(opened.equals(&from_rows(&[".......", ".xxx...", ".xxx...", ".xxx..."])));
    }

    #[test]
    fn test_brick_identity_and_errors() {
        let src = from_rows(&["x.x", ".x."]);
        assert!(dilate_brick(&src, 1, 1).unwrap().equals(&src));
        assert!(erode_brick(&src, 1, 1, ASYM).unwrap().equals(&src));
        assert!(close_safe_brick(&src, 1, 1, ASYM).unwrap().equals(&src));
        assert!(dilate_brick(&src, 0, 3).is_err());
        assert!(close_brick(&src, 2, 0, ASYM).is_err());
    }

    #[test]
    fn test_close_safe_keeps_edge_pixels() {
        let src = from_rows(&["x.x....", "......."]);
        // a plain asymmetric close erodes the left edge away
        let plain = close_brick(&src, 3, 1, ASYM).unwrap();
        assert!(!plain.get_pixel(0, 0));
        let safe = close_safe_brick(&src, 3, 1, ASYM).unwrap();
        assert!(safe.equals(&from_rows(&["xxx....", "......."])));
        assert_eq!(safe_border_size(3, 1), 8);
        assert_eq!(safe_border_size(40, 3), 24);
    }

    #[test]
    fn test_hit_miss_finds_isolated_pixels() {
        let src = from_rows(&[".....", ".x...", "...xx", "....."]);
        let sel = Sel::from_string("ooo\noxo\nooo", 1, 1).unwrap();
        let out = hit_miss_transform(&src, &sel, ASYM).unwrap();
        assert!(out.equals(&from_rows(&[".....", ".x...", ".....", "....."])));
    }
}
