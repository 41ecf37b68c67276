//! Connected component extraction
//!
//! Components are found with a stack-based scanline fill (Heckbert's
//! algorithm): each ON pixel found by a raster scan seeds a fill that
//! clears its component from a scratch copy and reports the bounding box.
//! The fill stack is an explicit [`FillStack`] so that repeated fills reuse
//! one allocation instead of recursing.

use crate::error::{RegionError, RegionResult};
use jbraster_core::bitmap::{clear_data_bit, get_data_bit};
use jbraster_core::{Bitmap, Bitmaps, Box, Boxa, ResultExt, RopOp, rasterop};

/// Pixel connectivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// Horizontal and vertical neighbors only
    #[default]
    FourWay,
    /// Diagonal neighbors as well
    EightWay,
}

impl ConnectivityType {
    /// Connectivity from its numeric form, 4 or 8.
    ///
    /// # Errors
    ///
    /// Returns [`jbraster_core::Error::InvalidConnectivity`] for any other value.
    pub fn from_value(value: u32) -> RegionResult<Self> {
        match value {
            4 => Ok(ConnectivityType::FourWay),
            8 => Ok(ConnectivityType::EightWay),
            other => Err(jbraster_core::Error::InvalidConnectivity(other).into()),
        }
    }

    pub fn value(self) -> u32 {
        match self {
            ConnectivityType::FourWay => 4,
            ConnectivityType::EightWay => 8,
        }
    }

    /// Horizontal reach into the next row: 0 for 4-cc, 1 for 8-cc.
    fn reach(self) -> i32 {
        match self {
            ConnectivityType::FourWay => 0,
            ConnectivityType::EightWay => 1,
        }
    }
}

/// A run `xleft..=xright` on row `y` whose neighbors on row `y + dy` are
/// still to be filled.
#[derive(Debug, Clone, Copy)]
struct FillSegment {
    xleft: i32,
    xright: i32,
    y: i32,
    dy: i32,
}

/// Reusable segment stack for [`seedfill_stack_bb`]
#[derive(Debug, Default)]
pub struct FillStack {
    segments: Vec<FillSegment>,
}

impl FillStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            segments: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Push unless the row to visit lies outside `0..=ymax`.
    fn push(&mut self, xleft: i32, xright: i32, y: i32, dy: i32, ymax: i32) {
        if y + dy >= 0 && y + dy <= ymax {
            self.segments.push(FillSegment {
                xleft,
                xright,
                y,
                dy,
            });
        }
    }

    fn pop(&mut self) -> Option<FillSegment> {
        self.segments.pop()
    }

    fn clear(&mut self) {
        self.segments.clear();
    }
}

/// Running bounding box of the cleared pixels
struct Extent {
    xmin: i32,
    ymin: i32,
    xmax: i32,
    ymax: i32,
}

impl Extent {
    fn at(x: i32, y: i32) -> Self {
        Self {
            xmin: x,
            ymin: y,
            xmax: x,
            ymax: y,
        }
    }

    fn include_run(&mut self, x0: i32, x1: i32, y: i32) {
        self.xmin = self.xmin.min(x0);
        self.xmax = self.xmax.max(x1);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }

    fn to_box(&self) -> Box {
        Box::from_extent(self.xmin, self.ymin, self.xmax, self.ymax)
    }
}

/// Clear the component containing `(x, y)` and return its bounding box.
///
/// Returns `Ok(None)` when the seed is OFF or outside the bitmap; nothing
/// is changed in that case. The stack is emptied before use.
///
/// # Errors
///
/// Only fails if a row access goes out of range, which the fill never
/// attempts for a well-formed bitmap.
pub fn seedfill_stack_bb(
    bm: &mut Bitmap,
    stack: &mut FillStack,
    x: u32,
    y: u32,
    connectivity: ConnectivityType,
) -> RegionResult<Option<Box>> {
    if !bm.get_pixel(x, y) {
        return Ok(None);
    }
    stack.clear();

    let xmax = bm.width() as i32 - 1;
    let ymax = bm.height() as i32 - 1;
    let reach = connectivity.reach();
    let (x, y) = (x as i32, y as i32);
    let mut extent = Extent::at(x, y);

    stack.push(x, x, y, 1, ymax);
    stack.push(x, x, y + 1, -1, ymax);

    while let Some(seg) = stack.pop() {
        let (x1, x2, dy) = (seg.xleft, seg.xright, seg.dy);
        let y = seg.y + dy;
        let row = bm.row_mut(y as u32).context("seedfill_stack_bb")?;

        // Run left from the first pixel the parent segment can touch.
        let start = x1 - reach;
        let mut x = start;
        while x >= 0 && get_data_bit(row, x as usize) {
            clear_data_bit(row, x as usize);
            x -= 1;
        }

        let mut in_run = x < start;
        let mut xstart = x + 1;
        if in_run {
            if xstart < x1 {
                // leak on the left
                stack.push(xstart, x1 - 1, y, -dy, ymax);
            }
            x = start + 1;
        }

        loop {
            if in_run {
                while x <= xmax && get_data_bit(row, x as usize) {
                    clear_data_bit(row, x as usize);
                    x += 1;
                }
                extent.include_run(xstart, x - 1, y);
                stack.push(xstart, x - 1, y, dy, ymax);
                if x > x2 + 1 {
                    // leak on the right
                    stack.push(x2 + 1, x - 1, y, -dy, ymax);
                }
            }

            // Skip OFF pixels still under the parent segment.
            x += 1;
            while x <= x2 + reach && x <= xmax && !get_data_bit(row, x as usize) {
                x += 1;
            }
            xstart = x;
            if x > x2 + reach || x > xmax {
                break;
            }
            in_run = true;
        }
    }

    Ok(Some(extent.to_box()))
}

/// Fill every component of `scratch` in raster order, handing each box to
/// `visit` right after its component was cleared.
fn for_each_component<F>(
    scratch: &mut Bitmap,
    connectivity: ConnectivityType,
    mut visit: F,
) -> RegionResult<()>
where
    F: FnMut(&Bitmap, Box) -> RegionResult<()>,
{
    let mut stack = FillStack::new();
    let (mut xs, mut ys) = (0, 0);
    while let Some((x, y)) = scratch.next_on_pixel(xs, ys) {
        let found = seedfill_stack_bb(scratch, &mut stack, x, y, connectivity)?;
        match found {
            Some(b) => visit(scratch, b)?,
            None => {
                return Err(RegionError::InvalidParameters(format!(
                    "no component at ON pixel ({x}, {y})"
                )));
            }
        }
        xs = x;
        ys = y;
    }
    Ok(())
}

/// Bounding boxes of all components, in raster order of their first pixel.
pub fn conn_components_bb(src: &Bitmap, connectivity: ConnectivityType) -> RegionResult<Boxa> {
    let mut scratch = src.clone();
    let mut boxa = Boxa::new();
    for_each_component(&mut scratch, connectivity, |_, b| {
        boxa.push(b);
        Ok(())
    })?;
    log::trace!(
        "conn_components_bb: {} components ({}-cc)",
        boxa.len(),
        connectivity.value()
    );
    Ok(boxa)
}

/// Bounding boxes and per-component bitmaps.
///
/// Each bitmap is the size of its box and holds only the pixels of its own
/// component, even when another component reaches into the same box.
pub fn conn_components_bitmaps(
    src: &Bitmap,
    connectivity: ConnectivityType,
) -> RegionResult<(Boxa, Bitmaps)> {
    let mut scratch = src.clone();
    // Components already extracted are removed from `remaining`, so
    // `remaining - scratch` inside a box is exactly the newest component.
    let mut remaining = src.clone();
    let mut comps = Bitmaps::new();

    for_each_component(&mut scratch, connectivity, |filled, b| {
        let (after, _) = filled
            .clip_rectangle(&b)?
            .ok_or_else(|| RegionError::InvalidParameters(format!("empty component box {b:?}")))?;
        let (before, _) = remaining
            .clip_rectangle(&b)?
            .ok_or_else(|| RegionError::InvalidParameters(format!("empty component box {b:?}")))?;
        let comp = after.xor(&before)?;
        rasterop(
            &mut remaining,
            b.x,
            b.y,
            b.w,
            b.h,
            RopOp::SrcXorDst,
            Some(&comp),
            0,
            0,
        )
        .context("conn_components_bitmaps")?;
        comps.push_with_box(comp, b)?;
        Ok(())
    })?;

    log::trace!(
        "conn_components_bitmaps: {} components ({}-cc)",
        comps.len(),
        connectivity.value()
    );
    let boxa = comps.boxes().clone();
    Ok((boxa, comps))
}

/// Bounding boxes, plus the component bitmaps when `with_bitmaps` is set.
pub fn conn_components(
    src: &Bitmap,
    connectivity: ConnectivityType,
    with_bitmaps: bool,
) -> RegionResult<(Boxa, Option<Bitmaps>)> {
    if with_bitmaps {
        let (boxa, comps) = conn_components_bitmaps(src, connectivity)?;
        Ok((boxa, Some(comps)))
    } else {
        Ok((conn_components_bb(src, connectivity)?, None))
    }
}

/// Number of components.
pub fn count_conn_components(src: &Bitmap, connectivity: ConnectivityType) -> RegionResult<usize> {
    let mut scratch = src.clone();
    let mut count = 0usize;
    for_each_component(&mut scratch, connectivity, |_, _| {
        count += 1;
        Ok(())
    })?;
    Ok(count)
}

/// Bounding boxes of all components, using `src` itself as the scratch
/// image. The bitmap is consumed and comes out empty.
pub fn conn_components_consume(
    mut src: Bitmap,
    connectivity: ConnectivityType,
) -> RegionResult<Boxa> {
    let mut boxa = Boxa::new();
    for_each_component(&mut src, connectivity, |_, b| {
        boxa.push(b);
        Ok(())
    })?;
    Ok(boxa)
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_connectivity_from_value() {
        assert_eq!(ConnectivityType::from_value(4).unwrap(), ConnectivityType::FourWay);
        assert_eq!(ConnectivityType::from_value(8).unwrap(), ConnectivityType::EightWay);
        assert!(matches!(
            ConnectivityType::from_value(6),
            Err(RegionError::Core(jbraster_core::Error::InvalidConnectivity(6)))
        ));
    }

    #[test]
    fn test_seedfill_off_seed() {
        let mut bm = from_rows(&["x.", ".."]);
        let mut stack = FillStack::new();
        let r = seedfill_stack_bb(&mut bm, &mut stack, 1, 1, ConnectivityType::FourWay).unwrap();
        assert!(r.is_none());
        let r = seedfill_stack_bb(&mut bm, &mut stack, 9, 9, ConnectivityType::FourWay).unwrap();
        assert!(r.is_none());
        assert_eq!(bm.count_pixels(), 1);
    }

    #[test]
    fn test_seedfill_diagonal() {
        let rows = ["x...", ".x..", "..x.", "...x"];
        let mut stack = FillStack::new();

        let mut bm = from_rows(&rows);
        let b = seedfill_stack_bb(&mut bm, &mut stack, 0, 0, ConnectivityType::FourWay).unwrap();
        assert_eq!(b, Some(Box::new_unchecked(0, 0, 1, 1)));
        assert_eq!(bm.count_pixels(), 3);

        let mut bm = from_rows(&rows);
        let b = seedfill_stack_bb(&mut bm, &mut stack, 2, 2, ConnectivityType::EightWay).unwrap();
        assert_eq!(b, Some(Box::new_unchecked(0, 0, 4, 4)));
        assert!(bm.is_zero());
    }

    #[test]
    fn test_seedfill_u_shape() {
        // Filling from the right arm must leak back up the left arm.
        let mut bm = from_rows(&[
            "x...x", //
            "x...x", //
            "x.x.x", //
            "xxxxx",
        ]);
        let mut stack = FillStack::new();
        let b = seedfill_stack_bb(&mut bm, &mut stack, 4, 0, ConnectivityType::FourWay).unwrap();
        assert_eq!(b, Some(Box::new_unchecked(0, 0, 5, 4)));
        assert!(bm.is_zero());
    }

    #[test]
    fn test_conn_components_counts() {
        let bm = from_rows(&[
            "xx..x.", //
            "x..x..", //
            "......", //
            ".xxx.x",
        ]);
        assert_eq!(count_conn_components(&bm, ConnectivityType::FourWay).unwrap(), 5);
        assert_eq!(count_conn_components(&bm, ConnectivityType::EightWay).unwrap(), 4);

        let boxa = conn_components_bb(&bm, ConnectivityType::EightWay).unwrap();
        assert_eq!(boxa.get(0), Some(Box::new_unchecked(0, 0, 2, 2)));
        assert_eq!(boxa.get(1), Some(Box::new_unchecked(3, 0, 2, 2)));
        assert_eq!(boxa.get(2), Some(Box::new_unchecked(1, 3, 3, 1)));
        assert_eq!(boxa.get(3), Some(Box::new_unchecked(5, 3, 1, 1)));

        let consumed = conn_components_consume(bm.clone(), ConnectivityType::EightWay).unwrap();
        assert_eq!(consumed, boxa);
    }

    #[test]
    fn test_component_bitmaps_exclude_neighbors() {
        // The box of the L reaches the lone pixel inside it only by area.
        let bm = from_rows(&[
            "x....", //
            "x.x..", //
            "x....", //
            "xxxxx",
        ]);
        let (boxa, comps) = conn_components_bitmaps(&bm, ConnectivityType::FourWay).unwrap();
        assert_eq!(boxa.len(), 2);
        assert_eq!(comps.len(), 2);

        let l = comps.get(0).unwrap();
        assert_eq!((l.width(), l.height()), (5, 4));
        assert_eq!(l.count_pixels(), 8);
        assert!(!l.get_pixel(2, 1));

        let dot = comps.get(1).unwrap();
        assert_eq!(comps.get_box(1), Some(Box::new_unchecked(2, 1, 1, 1)));
        assert_eq!(dot.count_pixels(), 1);
    }

    #[test]
    fn test_empty_image() {
        let bm = Bitmap::new(10, 10).unwrap();
        let (boxa, comps) = conn_components(&bm, ConnectivityType::EightWay, true).unwrap();
        assert!(boxa.is_empty());
        assert!(comps.unwrap().is_empty());
    }
}
