//! Binary scale regression test
//!
//! Checks rank-reduction cascades against a direct block-count reference
//! and expansion against pixel replication on random data.
//!
//! Run with:
//! ```
//! cargo test -p jbraster-transform --test scale_reg
//! ```

use jbraster_core::Bitmap;
use jbraster_test::{RegParams, random_bitmap};
use jbraster_transform::{
    expand_binary_power2, expand_replicate, reduce_rank_binary_2, reduce_rank_binary_cascade,
};

/// Count-based 2x rank reduction, one pixel at a time.
fn reference_reduce(src: &Bitmap, level: u32) -> Bitmap {
    let mut out = Bitmap::new(src.width() / 2, src.height() / 2).unwrap();
    for y in 0..out.height() {
        for x in 0..out.width() {
            let n = [(0, 0), (1, 0), (0, 1), (1, 1)]
                .iter()
                .filter(|&&(dx, dy)| src.get_pixel(2 * x + dx, 2 * y + dy))
                .count() as u32;
            if n >= level {
                out.set_pixel(x, y, true).unwrap();
            }
        }
    }
    out
}

#[test]
fn scale_reg() {
    let mut rp = RegParams::new("scale");

    // Widths around word and byte boundaries
    for (i, &(w, h)) in [(2, 2), (17, 9), (64, 20), (95, 31), (130, 7)].iter().enumerate() {
        let src = random_bitmap(w, h, 0.4, 100 + i as u64).unwrap();
        for level in 1..=4u8 {
            let got = reduce_rank_binary_2(&src, level).unwrap();
            rp.compare_bitmaps(&reference_reduce(&src, level as u32), &got);
        }
    }

    // Cascade equals the chained stages
    let src = random_bitmap(203, 117, 0.5, 7).unwrap();
    let cascade = reduce_rank_binary_cascade(&src, &[1, 2, 3, 4]).unwrap();
    let mut chained = src.clone();
    for level in 1..=4u32 {
        chained = reference_reduce(&chained, level);
    }
    rp.compare_bitmaps(&chained, &cascade);
    rp.compare_values(12.0, cascade.width() as f64, 0.0);
    rp.compare_values(7.0, cascade.height() as f64, 0.0);

    // Level-1 reduction followed by 2x expansion covers the source
    let src = random_bitmap(48, 30, 0.2, 9).unwrap();
    let back = expand_binary_power2(&reduce_rank_binary_2(&src, 1).unwrap(), 2).unwrap();
    rp.check(src.subtract(&back).unwrap().is_zero(), "expand(reduce1) covers source");

    // Replication with every factor pair up to 5
    let src = random_bitmap(13, 6, 0.5, 3).unwrap();
    for xf in 1..=5u32 {
        for yf in 1..=5u32 {
            let out = expand_replicate(&src, xf, yf).unwrap();
            let mut ok = out.width() == 13 * xf && out.height() == 6 * yf;
            for y in 0..out.height() {
                for x in 0..out.width() {
                    ok &= out.get_pixel(x, y) == src.get_pixel(x / xf, y / yf);
                }
            }
            rp.check(ok, "replicate matches source");
        }
    }

    assert!(rp.cleanup());
}
