//! Binary expansion
//!
//! Power-of-two expansion spreads each source byte through a lookup table
//! into 2, 4 or 8 output bytes and then replicates the expanded row
//! vertically. Other integer factors fall back to pixel replication.

use std::sync::LazyLock;

use crate::{TransformError, TransformResult};
use jbraster_core::Bitmap;
use jbraster_core::bitmap::set_data_bit;

/// Each source bit repeated twice
static EXPAND_2: LazyLock<[u16; 256]> = LazyLock::new(|| {
    std::array::from_fn(|b| spread(b as u8, 2) as u16)
});

/// Each source bit repeated four times
static EXPAND_4: LazyLock<[u32; 256]> = LazyLock::new(|| {
    std::array::from_fn(|b| spread(b as u8, 4) as u32)
});

/// Each source bit repeated eight times
static EXPAND_8: LazyLock<[u64; 256]> = LazyLock::new(|| {
    std::array::from_fn(|b| spread(b as u8, 8))
});

fn spread(byte: u8, factor: u32) -> u64 {
    let run = (1u64 << factor) - 1;
    (0..8).fold(0u64, |acc, k| {
        if (byte >> k) & 1 == 1 {
            acc | (run << (k * factor))
        } else {
            acc
        }
    })
}

/// Expand one source row into `out` (already sized to the output stride).
fn expand_row(src: &[u8], out: &mut [u8], factor: u32) {
    let mut spread_bytes = Vec::with_capacity(src.len() * factor as usize);
    for &b in src {
        match factor {
            2 => spread_bytes.extend_from_slice(&EXPAND_2[b as usize].to_be_bytes()),
            4 => spread_bytes.extend_from_slice(&EXPAND_4[b as usize].to_be_bytes()),
            _ => spread_bytes.extend_from_slice(&EXPAND_8[b as usize].to_be_bytes()),
        }
    }
    let n = out.len().min(spread_bytes.len());
    out[..n].copy_from_slice(&spread_bytes[..n]);
}

/// Expand by 1, 2, 4 or 8 in both directions.
///
/// Factor 1 returns a copy. Resolution is multiplied by the factor.
///
/// # Errors
///
/// Returns [`TransformError::InvalidScaleFactor`] for any other factor.
pub fn expand_binary_power2(src: &Bitmap, factor: u32) -> TransformResult<Bitmap> {
    if factor == 1 {
        return Ok(src.clone());
    }
    if !matches!(factor, 2 | 4 | 8) {
        return Err(TransformError::InvalidScaleFactor(format!(
            "power-of-two expansion factor must be 1, 2, 4 or 8, got {factor}"
        )));
    }

    let (wd, hd) = scaled_size(src, factor, factor)?;
    let mut out = src.derive(wd, hd)?;
    out.set_resolution(src.xres() * factor, src.yres() * factor);

    let ds = out.row_stride();
    let mut expanded = vec![0u8; ds];
    for y in 0..src.height() {
        expand_row(src.row(y)?, &mut expanded, factor);
        for k in 0..factor {
            out.row_mut(y * factor + k)?.copy_from_slice(&expanded);
        }
    }
    out.clear_padding();
    Ok(out)
}

/// Expand by independent integer factors in x and y.
///
/// Equal factors of 1, 2, 4 or 8 take the table-driven path of
/// [`expand_binary_power2`]; anything else replicates pixel by pixel.
///
/// # Errors
///
/// Returns [`TransformError::InvalidScaleFactor`] if either factor is 0.
pub fn expand_replicate(src: &Bitmap, xfact: u32, yfact: u32) -> TransformResult<Bitmap> {
    if xfact == 0 || yfact == 0 {
        return Err(TransformError::InvalidScaleFactor(format!(
            "replication factors must be >= 1, got {xfact}x{yfact}"
        )));
    }
    if xfact == yfact && matches!(xfact, 1 | 2 | 4 | 8) {
        return expand_binary_power2(src, xfact);
    }

    let (wd, hd) = scaled_size(src, xfact, yfact)?;
    let mut out = src.derive(wd, hd)?;
    out.set_resolution(src.xres() * xfact, src.yres() * yfact);

    let mut expanded = vec![0u8; out.row_stride()];
    for y in 0..src.height() {
        expanded.fill(0);
        for x in 0..src.width() {
            if src.get_pixel(x, y) {
                for k in x * xfact..(x + 1) * xfact {
                    set_data_bit(&mut expanded, k as usize);
                }
            }
        }
        for k in 0..yfact {
            out.row_mut(y * yfact + k)?.copy_from_slice(&expanded);
        }
    }
    Ok(out)
}

fn scaled_size(src: &Bitmap, xfact: u32, yfact: u32) -> TransformResult<(u32, u32)> {
    let w = src.width().checked_mul(xfact);
    let h = src.height().checked_mul(yfact);
    match (w, h) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(TransformError::InvalidScaleFactor(format!(
            "{}x{} expanded by {xfact}x{yfact} overflows",
            src.width(),
            src.height()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables() {
        assert_eq!(EXPAND_2[0x80], 0xc000);
        assert_eq!(EXPAND_2[0x81], 0xc003);
        assert_eq!(EXPAND_4[0x40], 0x0f00_0000);
        assert_eq!(EXPAND_8[0x01], 0xff);
        assert_eq!(EXPAND_8[0xff], u64::MAX);
    }

    #[test]
    fn test_power2_matches_replication() {
        let mut src = Bitmap::new(11, 3).unwrap();
        for &(x, y) in &[(0, 0), (3, 0), (10, 1), (7, 2), (8, 2)] {
            src.set_pixel(x, y, true).unwrap();
        }
        for factor in [2, 4, 8] {
            let out = expand_binary_power2(&src, factor).unwrap();
            assert_eq!((out.width(), out.height()), (11 * factor, 3 * factor));
            assert_eq!(out.count_pixels(), 5 * (factor * factor) as u64);
            for y in 0..out.height() {
                for x in 0..out.width() {
                    assert_eq!(out.get_pixel(x, y), src.get_pixel(x / factor, y / factor));
                }
            }
        }
    }

    #[test]
    fn test_power2_factor_checks() {
        let src = Bitmap::new(4, 4).unwrap();
        assert!(expand_binary_power2(&src, 1).unwrap().equals(&src));
        assert!(expand_binary_power2(&src, 3).is_err());
        assert!(expand_binary_power2(&src, 16).is_err());
    }

    #[test]
    fn test_replicate_unequal_factors() {
        let mut src = Bitmap::new(3, 2).unwrap();
        src.set_pixel(1, 0, true).unwrap();
        src.set_pixel(2, 1, true).unwrap();
        let out = expand_replicate(&src, 3, 2).unwrap();
        assert_eq!((out.width(), out.height()), (9, 4));
        assert_eq!(out.count_pixels(), 12);
        assert!(out.get_pixel(3, 1) && out.get_pixel(5, 0) && !out.get_pixel(6, 0));
        assert!(out.get_pixel(8, 3) && !out.get_pixel(5, 2));
        assert!(expand_replicate(&src, 0, 2).is_err());
    }

    #[test]
    fn test_replicate_delegates_to_power2() {
        let mut src = Bitmap::new(9, 5).unwrap();
        src.set_pixel(8, 4, true).unwrap();
        let a = expand_replicate(&src, 4, 4).unwrap();
        let b = expand_binary_power2(&src, 4).unwrap();
        assert!(a.equals(&b));
    }
}
