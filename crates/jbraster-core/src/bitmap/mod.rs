//! Bitmap - packed 1-bpp raster
//!
//! A `Bitmap` stores `height` scanlines of `row_stride = ceil(width / 8)`
//! bytes each. Within a byte the most significant bit is the leftmost pixel.
//! Bits past `width` in the final byte of a row are padding; they are not
//! guaranteed to be zero after every mutation, so operations whose result
//! depends on the logical pixel count mask them explicitly.
//!
//! # Submodules
//!
//! - `access` - pixel and byte accessors
//! - `border` - border add/remove
//! - `clip` - rectangle extraction
//! - `compare` - counting, equality and raster scans
//! - `rop` - the raster-operation engine
//! - `blit` - JBIG2 region composition on top of `rop`

mod access;
mod blit;
mod border;
mod clip;
mod compare;
#[cfg(feature = "render")]
mod render;
mod rop;

pub use access::{clear_data_bit, get_data_bit, set_data_bit};
pub use blit::{CombinationOperator, blit};
pub use rop::{RopOp, rasterop};

use crate::error::{Error, Result};
use crate::tables::{LEFT_MASK, row_end_mask};

/// Interpretation of an ON bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Polarity {
    /// 1 = black (the usual document convention)
    #[default]
    Vanilla,
    /// 1 = white
    Chocolate,
}

impl Polarity {
    /// The opposite polarity
    pub fn toggled(self) -> Self {
        match self {
            Polarity::Vanilla => Polarity::Chocolate,
            Polarity::Chocolate => Polarity::Vanilla,
        }
    }
}

/// Packed binary image
///
/// `Clone` performs a deep copy of the pixel buffer.
#[derive(Debug, Clone)]
pub struct Bitmap {
    width: u32,
    height: u32,
    row_stride: usize,
    data: Vec<u8>,
    polarity: Polarity,
    id: Option<i32>,
    xres: u32,
    yres: u32,
}

impl Bitmap {
    /// Create a zero-filled bitmap.
    ///
    /// Zero width or height is allowed and yields an empty buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if a dimension does not fit in
    /// `i32` (raster coordinates are signed) or the buffer size overflows.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let len = Self::buffer_len(width, height)?;
        Ok(Self {
            width,
            height,
            row_stride: Self::stride_for(width),
            data: vec![0; len],
            polarity: Polarity::Vanilla,
            id: None,
            xres: 0,
            yres: 0,
        })
    }

    /// Create a bitmap that takes ownership of an existing packed buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLength`] if `data.len() != height * row_stride`.
    pub fn with_data(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::buffer_len(width, height)?;
        if data.len() != expected {
            return Err(Error::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            row_stride: Self::stride_for(width),
            data,
            polarity: Polarity::Vanilla,
            id: None,
            xres: 0,
            yres: 0,
        })
    }

    /// Create a zeroed bitmap with the same size and metadata as `self`.
    pub fn create_template(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            row_stride: self.row_stride,
            data: vec![0; self.data.len()],
            polarity: self.polarity,
            id: self.id,
            xres: self.xres,
            yres: self.yres,
        }
    }

    /// Create a zeroed bitmap of a new size that inherits polarity and resolution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] under the same rules as [`Bitmap::new`].
    pub fn derive(&self, width: u32, height: u32) -> Result<Self> {
        let mut out = Self::new(width, height)?;
        out.polarity = self.polarity;
        out.xres = self.xres;
        out.yres = self.yres;
        Ok(out)
    }

    fn stride_for(width: u32) -> usize {
        (width as usize).div_ceil(8)
    }

    fn buffer_len(width: u32, height: u32) -> Result<usize> {
        if width > i32::MAX as u32 || height > i32::MAX as u32 {
            return Err(Error::InvalidDimension { width, height });
        }
        Self::stride_for(width)
            .checked_mul(height as usize)
            .ok_or(Error::InvalidDimension { width, height })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per scanline
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// The packed buffer, rows back to back
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable packed buffer. Writes may leave padding bits set.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Give up the bitmap and return its buffer.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn id(&self) -> Option<i32> {
        self.id
    }

    pub fn set_id(&mut self, id: Option<i32>) {
        self.id = id;
    }

    /// Horizontal resolution in ppi (0 = unknown)
    pub fn xres(&self) -> u32 {
        self.xres
    }

    /// Vertical resolution in ppi (0 = unknown)
    pub fn yres(&self) -> u32 {
        self.yres
    }

    pub fn set_resolution(&mut self, xres: u32, yres: u32) {
        self.xres = xres;
        self.yres = yres;
    }

    /// Mask of the valid pixels in the last byte of each row.
    #[inline]
    pub fn row_end_mask(&self) -> u8 {
        row_end_mask(self.width)
    }

    /// Bounds-checked scanline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `y >= height`.
    pub fn row(&self, y: u32) -> Result<&[u8]> {
        let start = y as usize * self.row_stride;
        if y >= self.height {
            return Err(Error::IndexOutOfRange {
                index: start,
                len: self.data.len(),
            });
        }
        Ok(&self.data[start..start + self.row_stride])
    }

    /// Bounds-checked mutable scanline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `y >= height`.
    pub fn row_mut(&mut self, y: u32) -> Result<&mut [u8]> {
        let start = y as usize * self.row_stride;
        if y >= self.height {
            return Err(Error::IndexOutOfRange {
                index: start,
                len: self.data.len(),
            });
        }
        Ok(&mut self.data[start..start + self.row_stride])
    }

    /// Iterate over the scanlines.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.row_stride.max(1))
    }

    /// Iterate mutably over the scanlines.
    pub fn rows_mut(&mut self) -> std::slice::ChunksExactMut<'_, u8> {
        self.data.chunks_exact_mut(self.row_stride.max(1))
    }

    /// Zero the padding bits at the end of every row.
    pub fn clear_padding(&mut self) {
        let mask = self.row_end_mask();
        if mask == 0xff {
            return;
        }
        for row in self.rows_mut() {
            if let Some(last) = row.last_mut() {
                *last &= mask;
            }
        }
    }

    /// Turn every pixel on; padding stays clear.
    pub fn set_all(&mut self) {
        self.data.fill(0xff);
        self.clear_padding();
    }

    /// Turn every pixel off.
    pub fn clear_all(&mut self) {
        self.data.fill(0);
    }

    /// Flip every bit of the buffer and toggle the polarity flag.
    ///
    /// Padding bits flip too; applying this twice restores the buffer exactly.
    pub fn invert_data(&mut self) {
        for b in &mut self.data {
            *b = !*b;
        }
        self.polarity = self.polarity.toggled();
    }

    /// Make ON mean black, inverting the buffer if needed.
    pub fn to_vanilla(&mut self) {
        if self.polarity == Polarity::Chocolate {
            self.invert_data();
        }
    }

    /// Make ON mean white, inverting the buffer if needed.
    pub fn to_chocolate(&mut self) {
        if self.polarity == Polarity::Vanilla {
            self.invert_data();
        }
    }

    /// Copy of the buffer in vanilla (1 = black) convention.
    pub fn vanilla_data(&self) -> Vec<u8> {
        self.data_as(Polarity::Vanilla)
    }

    /// Copy of the buffer in chocolate (1 = white) convention.
    pub fn chocolate_data(&self) -> Vec<u8> {
        self.data_as(Polarity::Chocolate)
    }

    fn data_as(&self, polarity: Polarity) -> Vec<u8> {
        if self.polarity == polarity {
            self.data.clone()
        } else {
            self.data.iter().map(|b| !b).collect()
        }
    }

    /// Repack the rows into a continuous bit stream with no per-row padding.
    ///
    /// The last byte is zero-filled past `width * height` bits. This is the
    /// layout generic-region encoders emit on the wire.
    pub fn unpadded_data(&self) -> Vec<u8> {
        if self.width & 7 == 0 {
            return self.data.clone();
        }
        let width = self.width as usize;
        let total_bits = width * self.height as usize;
        let mut out = vec![0u8; total_bits.div_ceil(8)];
        let mut bitpos = 0usize;
        for row in self.rows() {
            for (k, &byte) in row.iter().enumerate() {
                let nbits = (width - 8 * k).min(8);
                let value = byte & LEFT_MASK[nbits];
                let idx = bitpos >> 3;
                let off = bitpos & 7;
                out[idx] |= value >> off;
                if off + nbits > 8 {
                    out[idx + 1] |= value << (8 - off);
                }
                bitpos += nbits;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_stride() {
        let bm = Bitmap::new(19, 3).unwrap();
        assert_eq!(bm.row_stride(), 3);
        assert_eq!(bm.data().len(), 9);
        assert!(bm.data().iter().all(|&b| b == 0));

        let empty = Bitmap::new(0, 5).unwrap();
        assert_eq!(empty.row_stride(), 0);
        assert!(empty.data().is_empty());
        assert_eq!(empty.rows().count(), 0);
    }

    #[test]
    fn test_with_data_length_check() {
        assert!(Bitmap::with_data(16, 2, vec![0; 4]).is_ok());
        let err = Bitmap::with_data(16, 2, vec![0; 5]).unwrap_err();
        assert!(matches!(
            err,
            Error::DataLength {
                expected: 4,
                actual: 5
            }
        ));
    }

    #[test]
    fn test_row_bounds() {
        let mut bm = Bitmap::new(10, 2).unwrap();
        assert_eq!(bm.row(1).unwrap().len(), 2);
        assert!(matches!(bm.row(2), Err(Error::IndexOutOfRange { .. })));
        assert!(bm.row_mut(5).is_err());
    }

    #[test]
    fn test_polarity_double_inversion() {
        let mut bm = Bitmap::with_data(12, 2, vec![0x12, 0x30, 0xab, 0xc0]).unwrap();
        let orig = bm.data().to_vec();
        bm.invert_data();
        assert_eq!(bm.polarity(), Polarity::Chocolate);
        assert_eq!(bm.data()[0], 0xed);
        bm.invert_data();
        assert_eq!(bm.polarity(), Polarity::Vanilla);
        assert_eq!(bm.data(), &orig[..]);
    }

    #[test]
    fn test_polarity_tagged_getters() {
        let mut bm = Bitmap::with_data(8, 1, vec![0x0f]).unwrap();
        assert_eq!(bm.vanilla_data(), vec![0x0f]);
        assert_eq!(bm.chocolate_data(), vec![0xf0]);
        bm.to_chocolate();
        assert_eq!(bm.data(), &[0xf0]);
        assert_eq!(bm.vanilla_data(), vec![0x0f]);
        bm.to_chocolate();
        assert_eq!(bm.data(), &[0xf0]);
        bm.to_vanilla();
        assert_eq!(bm.data(), &[0x0f]);
    }

    #[test]
    fn test_unpadded_data_literal() {
        let mut bm = Bitmap::new(20, 2).unwrap();
        for &(x, y) in &[(17, 0), (19, 0), (3, 1), (4, 1), (9, 1), (12, 1), (19, 1)] {
            bm.set_pixel(x, y, true).unwrap();
        }
        assert_eq!(bm.unpadded_data(), vec![0x00, 0x00, 0x51, 0x84, 0x81]);
    }

    #[test]
    fn test_unpadded_ignores_padding() {
        // width 3: only the top 3 bits of each byte are pixels
        let bm = Bitmap::with_data(3, 3, vec![0xff, 0x5f, 0xbf]).unwrap();
        // rows: 111, 010, 101 -> 1110 1010 1 -> 0xea 0x80
        assert_eq!(bm.unpadded_data(), vec![0xea, 0x80]);
    }

    #[test]
    fn test_set_all_keeps_padding_clear() {
        let mut bm = Bitmap::new(10, 2).unwrap();
        bm.set_all();
        assert_eq!(bm.data(), &[0xff, 0xc0, 0xff, 0xc0]);
        bm.clear_all();
        assert!(bm.data().iter().all(|&b| b == 0));
    }
}
