//! Binary seed fill (morphological reconstruction)
//!
//! The seed is grown inside the mask by alternating raster and
//! anti-raster passes. Each pass works a byte at a time: the byte is ORed
//! with its already-visited neighbors, ANDed with the mask, then smeared
//! sideways inside the byte until it stops changing. Passes repeat until
//! the image no longer changes or the iteration cap is hit.

use crate::conncomp::ConnectivityType;
use crate::error::RegionResult;
use jbraster_core::{Bitmap, Error};

/// Default cap on raster/anti-raster iteration pairs
pub const DEFAULT_MAX_ITERATIONS: u32 = 5000;

/// Options for [`seedfill_binary`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedFillOptions {
    /// Connectivity used to grow the seed
    pub connectivity: ConnectivityType,
    /// Upper bound on iteration pairs
    pub max_iterations: u32,
}

impl Default for SeedFillOptions {
    fn default() -> Self {
        Self {
            connectivity: ConnectivityType::FourWay,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SeedFillOptions {
    pub fn new(connectivity: ConnectivityType) -> Self {
        Self {
            connectivity,
            ..Default::default()
        }
    }

    pub fn with_connectivity(mut self, connectivity: ConnectivityType) -> Self {
        self.connectivity = connectivity;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a seed fill
#[derive(Debug, Clone)]
pub struct SeedFill {
    /// Filled image, always a subset of the mask
    pub bitmap: Bitmap,
    /// Iteration pairs performed
    pub iterations: u32,
    /// `false` if the cap was reached before a fixed point
    pub converged: bool,
}

/// Grow `seed` into every mask pixel connected to it.
///
/// Seed pixels outside the mask are dropped. With a cap of 0 the result is
/// `seed AND mask`, reported as not converged.
///
/// # Errors
///
/// Returns [`Error::IncompatibleSizes`] if seed and mask differ in size.
pub fn seedfill_binary(
    seed: &Bitmap,
    mask: &Bitmap,
    options: &SeedFillOptions,
) -> RegionResult<SeedFill> {
    let (w, h) = (seed.width(), seed.height());
    if (w, h) != (mask.width(), mask.height()) {
        return Err(Error::IncompatibleSizes(w, h, mask.width(), mask.height()).into());
    }

    let mut out = seed.and(mask)?;
    out.clear_padding();
    let stride = out.row_stride();
    let end_mask = out.row_end_mask();
    let mask_data = mask.data();

    let mut iterations = 0;
    let mut converged = false;
    while iterations < options.max_iterations {
        let before = out.data().to_vec();
        let data = out.data_mut();
        raster_pass(data, mask_data, stride, end_mask, options.connectivity);
        anti_raster_pass(data, mask_data, stride, end_mask, options.connectivity);
        iterations += 1;
        if data == before.as_slice() {
            converged = true;
            break;
        }
    }

    if converged {
        log::trace!("seedfill_binary: converged after {iterations} iterations");
    } else {
        log::warn!(
            "seedfill_binary: no fixed point after {iterations} iterations on {w}x{h}; result is partial"
        );
    }

    Ok(SeedFill {
        bitmap: out,
        iterations,
        converged,
    })
}

/// Smear ON bits sideways inside one byte until stable, never leaving `mask`.
#[inline]
fn smear(mut word: u8, mask: u8) -> u8 {
    if word == 0 || word == mask {
        return word;
    }
    loop {
        let prev = word;
        word = (word | (word >> 1) | (word << 1)) & mask;
        if word == prev {
            return word;
        }
    }
}

/// Mask byte `j` of a row, padding bits cleared.
#[inline]
fn mask_byte(mrow: &[u8], j: usize, stride: usize, end_mask: u8) -> u8 {
    if j + 1 == stride { mrow[j] & end_mask } else { mrow[j] }
}

/// Contribution of the neighbor row (above or below) to byte `j`.
#[inline]
fn from_neighbor_row(nrow: &[u8], j: usize, stride: usize, conn: ConnectivityType) -> u8 {
    let mut word = nrow[j];
    if conn == ConnectivityType::EightWay {
        word |= (nrow[j] << 1) | (nrow[j] >> 1);
        if j > 0 {
            word |= nrow[j - 1] << 7;
        }
        if j + 1 < stride {
            word |= nrow[j + 1] >> 7;
        }
    }
    word
}

/// Top-to-bottom, left-to-right pass.
fn raster_pass(data: &mut [u8], mask: &[u8], stride: usize, end_mask: u8, conn: ConnectivityType) {
    if stride == 0 {
        return;
    }
    let height = data.len() / stride;
    for i in 0..height {
        let (before, rest) = data.split_at_mut(i * stride);
        let above = i.checked_sub(1).map(|k| &before[k * stride..]);
        let row = &mut rest[..stride];
        let mrow = &mask[i * stride..(i + 1) * stride];
        for j in 0..stride {
            let mut word = row[j];
            if let Some(above) = above {
                word |= from_neighbor_row(above, j, stride, conn);
            }
            if j > 0 {
                word |= row[j - 1] << 7;
            }
            let m = mask_byte(mrow, j, stride, end_mask);
            row[j] = smear(word & m, m);
        }
    }
}

/// Bottom-to-top, right-to-left pass.
fn anti_raster_pass(
    data: &mut [u8],
    mask: &[u8],
    stride: usize,
    end_mask: u8,
    conn: ConnectivityType,
) {
    if stride == 0 {
        return;
    }
    let height = data.len() / stride;
    for i in (0..height).rev() {
        let (head, after) = data.split_at_mut((i + 1) * stride);
        let below = (i + 1 < height).then(|| &after[..stride]);
        let row = &mut head[i * stride..];
        let mrow = &mask[i * stride..(i + 1) * stride];
        for j in (0..stride).rev() {
            let mut word = row[j];
            if let Some(below) = below {
                word |= from_neighbor_row(below, j, stride, conn);
            }
            if j + 1 < stride {
                word |= row[j + 1] >> 7;
            }
            let m = mask_byte(mrow, j, stride, end_mask);
            row[j] = smear(word & m, m);
        }
    }
}

/// One-pixel frame around the edge of a bitmap the size of `like`.
fn border_frame(like: &Bitmap) -> RegionResult<Bitmap> {
    let mut frame = like.create_template();
    let (w, h) = (like.width() as i32, like.height() as i32);
    frame.set_region(0, 0, w, 1)?;
    frame.set_region(0, h - 1, w, 1)?;
    frame.set_region(0, 0, 1, h)?;
    frame.set_region(w - 1, 0, 1, h)?;
    Ok(frame)
}

/// Fill the holes of the foreground.
///
/// A hole is a background region not connected to the image edge; the
/// background is traced with `connectivity`, so a foreground drawn with
/// 4-connected strokes should be filled with 8-connected background
/// tracing and vice versa.
pub fn fill_holes(src: &Bitmap, connectivity: ConnectivityType) -> RegionResult<Bitmap> {
    let background = src.invert();
    let seed = border_frame(src)?.and(&background)?;
    let fill = seedfill_binary(&seed, &background, &SeedFillOptions::new(connectivity))?;
    let mut filled = fill.bitmap.invert();
    filled.clear_padding();
    Ok(filled)
}

/// Remove every foreground component that touches the image edge.
pub fn clear_border(src: &Bitmap, connectivity: ConnectivityType) -> RegionResult<Bitmap> {
    let seed = border_frame(src)?.and(src)?;
    let fill = seedfill_binary(&seed, src, &SeedFillOptions::new(connectivity))?;
    Ok(src.subtract(&fill.bitmap)?)
}
