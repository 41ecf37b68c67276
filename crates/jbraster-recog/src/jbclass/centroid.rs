//! Centroids of binary images

use jbraster_core::tables::{CENTROID_TABLE, SUM_TABLE};
use jbraster_core::{Bitmap, Bitmaps, Point, Pta};

/// Centroid of the ON pixels, relative to the upper-left corner.
///
/// A bitmap with no ON pixels has its centroid at (0, 0).
pub fn centroid(bm: &Bitmap) -> Point {
    let end_mask = bm.row_end_mask();
    let last = bm.row_stride().saturating_sub(1);
    let mut xsum = 0u64;
    let mut ysum = 0u64;
    let mut total = 0u64;

    for (y, row) in bm.rows().enumerate() {
        let mut rowsum = 0u64;
        for (k, &byte) in row.iter().enumerate() {
            let b = if k == last { byte & end_mask } else { byte };
            if b == 0 {
                continue;
            }
            let n = SUM_TABLE[b as usize] as u64;
            rowsum += n;
            xsum += CENTROID_TABLE[b as usize] as u64 + 8 * k as u64 * n;
        }
        total += rowsum;
        ysum += rowsum * y as u64;
    }

    if total == 0 {
        log::debug!(
            "centroid: no ON pixels in {}x{} bitmap",
            bm.width(),
            bm.height()
        );
        return Point::new(0.0, 0.0);
    }
    Point::new(
        (xsum as f64 / total as f64) as f32,
        (ysum as f64 / total as f64) as f32,
    )
}

/// Centroid of every bitmap, in order.
pub fn centroids(bitmaps: &Bitmaps) -> Pta {
    bitmaps.iter().map(centroid).collect()
}
