//! Binary rank reduction
//!
//! A 2x rank reduction maps each 2x2 block of the source to one output
//! pixel, which is ON when at least `level` (1..=4) of the block's four
//! pixels are ON. Rows are processed in 32-bit big-endian windows: the two
//! source rows are combined with OR/AND and a one-bit shift so that the even
//! bit positions hold the block result, then the even bits are compacted
//! through [`SUBSAMPLE_2X`].
//!
//! | level | rule on `o = top \| bottom`, `v = top & bottom` |
//! |---|---|
//! | 1 | `o \| o<<1` |
//! | 2 | `v \| v<<1 \| (o & o<<1)` |
//! | 3 | `(v & o<<1) \| (o & v<<1)` |
//! | 4 | `v & v<<1` |

use crate::{TransformError, TransformResult};
use jbraster_core::Bitmap;

/// Gathers bits 7, 5, 3 and 1 of a byte into the high nibble, in order.
pub static SUBSAMPLE_2X: [u8; 256] = make_subsample_2x();

const fn make_subsample_2x() -> [u8; 256] {
    let mut tab = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let b = i as u8;
        tab[i] = (b & 0x80) | ((b & 0x20) << 1) | ((b & 0x08) << 2) | ((b & 0x02) << 3);
        i += 1;
    }
    tab
}

/// Even (leftmost-of-pair) bit positions of a big-endian word
const EVEN_BITS: u32 = 0xaaaa_aaaa;

/// Read four bytes starting at `start` as a big-endian word; bytes past the
/// end of the row read as zero.
fn load_word(row: &[u8], start: usize) -> u32 {
    let mut buf = [0u8; 4];
    if let Some(tail) = row.get(start..) {
        let n = tail.len().min(4);
        buf[..n].copy_from_slice(&tail[..n]);
    }
    u32::from_be_bytes(buf)
}

fn rank_word(top: u32, bottom: u32, level: u8) -> u32 {
    let o = top | bottom;
    let v = top & bottom;
    match level {
        1 => o | (o << 1),
        2 => v | (v << 1) | (o & (o << 1)),
        3 => (v & (o << 1)) | (o & (v << 1)),
        _ => v & (v << 1),
    }
}

/// One 2x rank-reduction stage.
///
/// The output is `width / 2` by `height / 2`; an odd last row or column of
/// the source is dropped. Resolution is halved.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if `level` is outside
/// `1..=4` or the source is smaller than 2x2.
pub fn reduce_rank_binary_2(src: &Bitmap, level: u8) -> TransformResult<Bitmap> {
    if !(1..=4).contains(&level) {
        return Err(TransformError::InvalidParameters(format!(
            "rank level {level} not in 1..=4"
        )));
    }
    let (ws, hs) = (src.width(), src.height());
    if ws < 2 || hs < 2 {
        return Err(TransformError::InvalidParameters(format!(
            "source {ws}x{hs} too small for 2x reduction"
        )));
    }

    let (wd, hd) = (ws / 2, hs / 2);
    let mut out = src.derive(wd, hd)?;
    out.set_resolution(src.xres() / 2, src.yres() / 2);

    let mut reduced = vec![0u8; src.row_stride().next_multiple_of(4)];
    for i in 0..hd {
        let top = src.row(2 * i)?;
        let bottom = src.row(2 * i + 1)?;
        for (w, chunk) in reduced.chunks_exact_mut(4).enumerate() {
            let word = rank_word(load_word(top, 4 * w), load_word(bottom, 4 * w), level);
            chunk.copy_from_slice(&(word & EVEN_BITS).to_be_bytes());
        }

        let drow = out.row_mut(i)?;
        for (k, d) in drow.iter_mut().enumerate() {
            let hi = reduced.get(2 * k).copied().unwrap_or(0);
            let lo = reduced.get(2 * k + 1).copied().unwrap_or(0);
            *d = SUBSAMPLE_2X[hi as usize] | (SUBSAMPLE_2X[lo as usize] >> 4);
        }
    }
    out.clear_padding();
    Ok(out)
}

/// Cascade of up to four 2x rank reductions.
///
/// `levels[i]` is the rank level of stage `i`. A first level `<= 0` returns
/// a copy of the source; otherwise the cascade stops at the first level
/// `<= 0`.
///
/// # Errors
///
/// Returns [`TransformError::InvalidParameters`] if `levels` is empty, has
/// more than four entries, or contains a level above 4, and propagates the
/// size check of [`reduce_rank_binary_2`].
pub fn reduce_rank_binary_cascade(src: &Bitmap, levels: &[i32]) -> TransformResult<Bitmap> {
    if levels.is_empty() || levels.len() > 4 {
        return Err(TransformError::InvalidParameters(format!(
            "cascade needs 1 to 4 levels, got {}",
            levels.len()
        )));
    }
    if levels[0] <= 0 {
        return Ok(src.clone());
    }
    if let Some(&bad) = levels.iter().find(|&&l| l > 4) {
        return Err(TransformError::InvalidParameters(format!(
            "rank level {bad} not in 1..=4"
        )));
    }

    let mut out = reduce_rank_binary_2(src, levels[0] as u8)?;
    for &level in &levels[1..] {
        if level <= 0 {
            break;
        }
        out = reduce_rank_binary_2(&out, level as u8)?;
    }
    log::trace!(
        "rank cascade {:?}: {}x{} -> {}x{}",
        levels,
        src.width(),
        src.height(),
        out.width(),
        out.height()
    );
    Ok(out)
}
