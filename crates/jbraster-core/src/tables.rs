//! Fixed lookup tables for packed 1-bpp data
//!
//! All tables here are computed at compile time. Tables that only the
//! scale engine needs live next to it and are built lazily.

/// `LEFT_MASK[n]` has the top (leftmost) `n` bits of a byte set.
pub const LEFT_MASK: [u8; 9] = [0x00, 0x80, 0xc0, 0xe0, 0xf0, 0xf8, 0xfc, 0xfe, 0xff];

/// `RIGHT_MASK[n]` has the bottom (rightmost) `n` bits of a byte set.
pub const RIGHT_MASK: [u8; 9] = [0x00, 0x01, 0x03, 0x07, 0x0f, 0x1f, 0x3f, 0x7f, 0xff];

/// Number of ON bits in each byte value.
pub static SUM_TABLE: [u8; 256] = make_sum_table();

/// Sum of the in-byte x positions (0 = MSB) of the ON bits of each byte value.
pub static CENTROID_TABLE: [u8; 256] = make_centroid_table();

const fn make_sum_table() -> [u8; 256] {
    let mut tab = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        tab[i] = (i as u8).count_ones() as u8;
        i += 1;
    }
    tab
}

const fn make_centroid_table() -> [u8; 256] {
    let mut tab = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut k = 0;
        let mut sum = 0u8;
        while k < 8 {
            if (i >> (7 - k)) & 1 == 1 {
                sum += k as u8;
            }
            k += 1;
        }
        tab[i] = sum;
        i += 1;
    }
    tab
}

/// Mask selecting the valid pixels of the last byte of a row of `width` pixels.
#[inline]
pub fn row_end_mask(width: u32) -> u8 {
    match width & 7 {
        0 => 0xff,
        n => LEFT_MASK[n as usize],
    }
}

/// Merge `value` into `dst` on the bits selected by `mask`.
#[inline]
pub fn combine(dst: u8, value: u8, mask: u8) -> u8 {
    (dst & !mask) | (value & mask)
}

/// Number of ON pixels in one packed row, ignoring bits outside `end_mask`
/// in the final byte.
pub fn count_row(row: &[u8], end_mask: u8) -> u32 {
    match row.split_last() {
        Some((&last, head)) => {
            head.iter().map(|&b| SUM_TABLE[b as usize] as u32).sum::<u32>()
                + SUM_TABLE[(last & end_mask) as usize] as u32
        }
        None => 0,
    }
}
