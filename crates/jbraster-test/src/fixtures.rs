//! Bitmap fixtures built in code

use crate::error::{TestError, TestResult};
use jbraster_core::Bitmap;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build a bitmap from an ASCII picture.
///
/// Each string is one row; `x`, `X`, `#` and `1` are ON, `.`, `0` and space
/// are OFF. All rows must have the same length.
pub fn bitmap_from_rows(rows: &[&str]) -> TestResult<Bitmap> {
    let width = rows.first().map_or(0, |r| r.chars().count());
    let mut bm = Bitmap::new(width as u32, rows.len() as u32)?;
    for (y, row) in rows.iter().enumerate() {
        if row.chars().count() != width {
            return Err(TestError::Fixture(format!(
                "row {y} has {} columns, expected {width}",
                row.chars().count()
            )));
        }
        for (x, c) in row.chars().enumerate() {
            match c {
                'x' | 'X' | '#' | '1' => bm.set_pixel(x as u32, y as u32, true)?,
                '.' | '0' | ' ' => {}
                other => {
                    return Err(TestError::Fixture(format!(
                        "unexpected character {other:?} at ({x}, {y})"
                    )));
                }
            }
        }
    }
    Ok(bm)
}

/// Render a bitmap back to rows of `x` and `.`.
pub fn bitmap_to_rows(bm: &Bitmap) -> Vec<String> {
    (0..bm.height())
        .map(|y| {
            (0..bm.width())
                .map(|x| if bm.get_pixel(x, y) { 'x' } else { '.' })
                .collect()
        })
        .collect()
}

/// Reproducible random bitmap with each pixel ON with probability `density`.
pub fn random_bitmap(width: u32, height: u32, density: f64, seed: u64) -> TestResult<Bitmap> {
    if !(0.0..=1.0).contains(&density) {
        return Err(TestError::Fixture(format!(
            "density {density} outside [0, 1]"
        )));
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut bm = Bitmap::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            if rng.random_bool(density) {
                bm.set_pixel(x, y, true)?;
            }
        }
    }
    Ok(bm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_round_trip() {
        let rows = ["x..x", ".xx.", "...."];
        let bm = bitmap_from_rows(&rows).unwrap();
        assert_eq!((bm.width(), bm.height()), (4, 3));
        assert_eq!(bm.count_pixels(), 4);
        assert_eq!(bitmap_to_rows(&bm), rows);
    }

    #[test]
    fn test_rows_rejects_ragged() {
        assert!(bitmap_from_rows(&["xx", "x"]).is_err());
        assert!(bitmap_from_rows(&["x?"]).is_err());
    }

    #[test]
    fn test_random_is_reproducible() {
        let a = random_bitmap(37, 11, 0.3, 7).unwrap();
        let b = random_bitmap(37, 11, 0.3, 7).unwrap();
        assert!(a.equals(&b));
        assert!(random_bitmap(4, 4, 1.5, 0).is_err());
        assert_eq!(random_bitmap(9, 3, 1.0, 1).unwrap().count_pixels(), 27);
    }
}
