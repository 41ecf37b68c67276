//! Pixel and byte access
//!
//! Pixel reads are permissive (out-of-range reads return `false`); every
//! write is bounds-checked and fails with [`Error::IndexOutOfRange`].

use super::Bitmap;
use crate::error::{Error, Result};

/// Read bit `x` of a packed row.
#[inline]
pub fn get_data_bit(row: &[u8], x: usize) -> bool {
    (row[x >> 3] >> (7 - (x & 7))) & 1 == 1
}

/// Turn bit `x` of a packed row on.
#[inline]
pub fn set_data_bit(row: &mut [u8], x: usize) {
    row[x >> 3] |= 0x80 >> (x & 7);
}

/// Turn bit `x` of a packed row off.
#[inline]
pub fn clear_data_bit(row: &mut [u8], x: usize) {
    row[x >> 3] &= !(0x80 >> (x & 7));
}

impl Bitmap {
    /// Byte offset of the byte holding pixel `(x, y)`.
    #[inline]
    pub fn byte_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.row_stride + (x as usize >> 3)
    }

    /// Value of pixel `(x, y)`; `false` outside the bitmap.
    pub fn get_pixel(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        let idx = self.byte_index(x, y);
        (self.data[idx] >> (7 - (x & 7))) & 1 == 1
    }

    /// OR `bit` into pixel `(x, y)`.
    ///
    /// Passing `false` never clears a pixel that is already on; use
    /// [`Bitmap::clear_pixel`] for that.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `(x, y)` lies outside the bitmap.
    pub fn set_pixel(&mut self, x: u32, y: u32, bit: bool) -> Result<()> {
        let idx = self.checked_pixel_index(x, y)?;
        self.data[idx] |= (bit as u8) << (7 - (x & 7));
        Ok(())
    }

    /// Turn pixel `(x, y)` off.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `(x, y)` lies outside the bitmap.
    pub fn clear_pixel(&mut self, x: u32, y: u32) -> Result<()> {
        let idx = self.checked_pixel_index(x, y)?;
        self.data[idx] &= !(0x80 >> (x & 7));
        Ok(())
    }

    fn checked_pixel_index(&self, x: u32, y: u32) -> Result<usize> {
        let idx = self.byte_index(x, y);
        if x >= self.width || y >= self.height {
            return Err(Error::IndexOutOfRange {
                index: idx,
                len: self.data.len(),
            });
        }
        Ok(idx)
    }

    /// Read a raw byte of the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is past the buffer.
    pub fn get_byte(&self, index: usize) -> Result<u8> {
        self.data
            .get(index)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.data.len(),
            })
    }

    /// Overwrite a raw byte of the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` is past the buffer.
    pub fn set_byte(&mut self, index: usize, value: u8) -> Result<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }
}
