//! Raster operations (ROP)
//!
//! [`rasterop`] combines a rectangle of a source bitmap (or nothing, for
//! the unary operators) into a rectangle of a destination bitmap with one of
//! the sixteen boolean functions of two bits.
//!
//! The rectangle is clipped against both bitmaps first; a window that clips
//! away entirely is a successful no-op. The remaining work is dispatched to
//! one of four low-level loops:
//!
//! - unary (no source)
//! - byte-aligned: `dx` and `sx` both multiples of 8
//! - vertically aligned: `dx & 7 == sx & 7`
//! - general: source bytes are rebuilt by shifting two neighbors
//!
//! Partial bytes at either end of a row are merged with
//! [`combine`](crate::tables::combine) using the `LEFT_MASK` / `RIGHT_MASK`
//! tables, so pixels outside the window (including row padding) are never
//! touched.

use super::Bitmap;
use crate::error::{Error, Result, ResultExt};
use crate::tables::{LEFT_MASK, RIGHT_MASK, combine};

/// Raster operation
///
/// Each operator is a 4-bit truth table over `(src, dst)`; [`RopOp::code`]
/// returns it with `Src = 0xc` and `Dst = 0xa`, so e.g. `Src | Dst = 0xe`.
/// `Paint` and `Mask` are aliases for `SrcOrDst` and `SrcAndDst`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RopOp {
    /// 0
    Clear,
    /// NOT (src OR dst)
    Nor,
    /// (NOT src) AND dst
    Subtract,
    /// NOT src
    NotSrc,
    /// src AND (NOT dst)
    SrcAndNotDst,
    /// NOT dst
    NotDst,
    /// src XOR dst
    SrcXorDst,
    /// NOT (src AND dst)
    Nand,
    /// src AND dst
    SrcAndDst,
    /// NOT (src XOR dst)
    Xnor,
    /// dst (no-op)
    Dst,
    /// (NOT src) OR dst
    NotSrcOrDst,
    /// src
    Src,
    /// src OR (NOT dst)
    SrcOrNotDst,
    /// src OR dst
    SrcOrDst,
    /// 1
    Set,
    /// Alias of `SrcOrDst`
    Paint,
    /// Alias of `SrcAndDst`
    Mask,
}

impl RopOp {
    /// Canonical operators indexed by truth-table code.
    const BY_CODE: [RopOp; 16] = [
        RopOp::Clear,
        RopOp::Nor,
        RopOp::Subtract,
        RopOp::NotSrc,
        RopOp::SrcAndNotDst,
        RopOp::NotDst,
        RopOp::SrcXorDst,
        RopOp::Nand,
        RopOp::SrcAndDst,
        RopOp::Xnor,
        RopOp::Dst,
        RopOp::NotSrcOrDst,
        RopOp::Src,
        RopOp::SrcOrNotDst,
        RopOp::SrcOrDst,
        RopOp::Set,
    ];

    /// 4-bit truth-table code; bit `2*s + d` holds the result for `(s, d)`.
    pub fn code(self) -> u8 {
        match self {
            RopOp::Clear => 0x0,
            RopOp::Nor => 0x1,
            RopOp::Subtract => 0x2,
            RopOp::NotSrc => 0x3,
            RopOp::SrcAndNotDst => 0x4,
            RopOp::NotDst => 0x5,
            RopOp::SrcXorDst => 0x6,
            RopOp::Nand => 0x7,
            RopOp::SrcAndDst | RopOp::Mask => 0x8,
            RopOp::Xnor => 0x9,
            RopOp::Dst => 0xa,
            RopOp::NotSrcOrDst => 0xb,
            RopOp::Src => 0xc,
            RopOp::SrcOrNotDst => 0xd,
            RopOp::SrcOrDst | RopOp::Paint => 0xe,
            RopOp::Set => 0xf,
        }
    }

    /// Apply the operator to one byte of source and destination.
    #[inline]
    pub fn apply(self, s: u8, d: u8) -> u8 {
        match self {
            RopOp::Clear => 0x00,
            RopOp::Nor => !(s | d),
            RopOp::Subtract => !s & d,
            RopOp::NotSrc => !s,
            RopOp::SrcAndNotDst => s & !d,
            RopOp::NotDst => !d,
            RopOp::SrcXorDst => s ^ d,
            RopOp::Nand => !(s & d),
            RopOp::SrcAndDst | RopOp::Mask => s & d,
            RopOp::Xnor => !(s ^ d),
            RopOp::Dst => d,
            RopOp::NotSrcOrDst => !s | d,
            RopOp::Src => s,
            RopOp::SrcOrNotDst => s | !d,
            RopOp::SrcOrDst | RopOp::Paint => s | d,
            RopOp::Set => 0xff,
        }
    }

    /// Whether the operator reads the source.
    ///
    /// `Clear`, `Set`, `Dst` and `NotDst` only touch the destination.
    pub fn requires_source(self) -> bool {
        !matches!(self, Self::Clear | Self::Set | Self::Dst | Self::NotDst)
    }
}

impl TryFrom<u8> for RopOp {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        RopOp::BY_CODE
            .get(code as usize)
            .copied()
            .ok_or(Error::InvalidOperator(code))
    }
}

/// Bytes of one row covered by a horizontal pixel span, with edge masks.
#[derive(Debug, Clone, Copy)]
struct ByteSpan {
    first: usize,
    last: usize,
    first_mask: u8,
    last_mask: u8,
}

impl ByteSpan {
    /// Span of pixels `[x, x + w)`; `w` must be positive.
    fn new(x: usize, w: usize) -> Self {
        let end = x + w - 1;
        Self {
            first: x >> 3,
            last: end >> 3,
            first_mask: RIGHT_MASK[8 - (x & 7)],
            last_mask: LEFT_MASK[(end & 7) + 1],
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.last - self.first + 1
    }

    /// Mask for the `k`-th byte of the span.
    #[inline]
    fn mask(&self, k: usize) -> u8 {
        let mut m = 0xff;
        if k == 0 {
            m &= self.first_mask;
        }
        if k == self.last - self.first {
            m &= self.last_mask;
        }
        m
    }
}

/// A clipped rectangle shared by source and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Window {
    dx: usize,
    dy: usize,
    w: usize,
    h: usize,
    sx: usize,
    sy: usize,
}

impl Window {
    /// Clip a destination-only rectangle. `None` when nothing remains.
    fn clip_unary(dest: &Bitmap, dx: i32, dy: i32, dw: i32, dh: i32) -> Option<Self> {
        let (mut dx, mut dy, mut dw, mut dh) = (dx as i64, dy as i64, dw as i64, dh as i64);
        if dx < 0 {
            dw += dx;
            dx = 0;
        }
        let over = dx + dw - dest.width() as i64;
        if over > 0 {
            dw -= over;
        }
        if dy < 0 {
            dh += dy;
            dy = 0;
        }
        let over = dy + dh - dest.height() as i64;
        if over > 0 {
            dh -= over;
        }
        if dw <= 0 || dh <= 0 {
            return None;
        }
        Some(Self {
            dx: dx as usize,
            dy: dy as usize,
            w: dw as usize,
            h: dh as usize,
            sx: 0,
            sy: 0,
        })
    }

    /// Clip a rectangle against both bitmaps, moving the opposite origin
    /// whenever one side is negative.
    #[allow(clippy::too_many_arguments)]
    fn clip_binary(
        dest: &Bitmap,
        src: &Bitmap,
        dx: i32,
        dy: i32,
        dw: i32,
        dh: i32,
        sx: i32,
        sy: i32,
    ) -> Option<Self> {
        let (mut dx, mut dy, mut dw, mut dh) = (dx as i64, dy as i64, dw as i64, dh as i64);
        let (mut sx, mut sy) = (sx as i64, sy as i64);

        if dx < 0 {
            sx -= dx;
            dw += dx;
            dx = 0;
        }
        if sx < 0 {
            dx -= sx;
            dw += sx;
            sx = 0;
        }
        let over = dx + dw - dest.width() as i64;
        if over > 0 {
            dw -= over;
        }
        let over = sx + dw - src.width() as i64;
        if over > 0 {
            dw -= over;
        }

        if dy < 0 {
            sy -= dy;
            dh += dy;
            dy = 0;
        }
        if sy < 0 {
            dy -= sy;
            dh += sy;
            sy = 0;
        }
        let over = dy + dh - dest.height() as i64;
        if over > 0 {
            dh -= over;
        }
        let over = sy + dh - src.height() as i64;
        if over > 0 {
            dh -= over;
        }

        if dw <= 0 || dh <= 0 {
            return None;
        }
        Some(Self {
            dx: dx as usize,
            dy: dy as usize,
            w: dw as usize,
            h: dh as usize,
            sx: sx as usize,
            sy: sy as usize,
        })
    }
}

fn out_of_range(index: usize, len: usize) -> Error {
    Error::IndexOutOfRange { index, len }
}

/// Bounds-checked byte range of a row.
fn bytes_mut(row: &mut [u8], first: usize, n: usize) -> Result<&mut [u8]> {
    let len = row.len();
    row.get_mut(first..first + n)
        .ok_or_else(|| out_of_range(first + n, len))
}

fn bytes(row: &[u8], first: usize, n: usize) -> Result<&[u8]> {
    row.get(first..first + n)
        .ok_or_else(|| out_of_range(first + n, row.len()))
}

/// Composite a `dw x dh` window of `src` at `(sx, sy)` into `dest` at `(dx, dy)`.
///
/// # Arguments
///
/// * `dest` - Destination bitmap, modified in place
/// * `dx`, `dy` - Upper-left corner of the window in `dest`; may be negative
/// * `dw`, `dh` - Window size
/// * `op` - Raster operator
/// * `src` - Source bitmap; `None` is accepted only for operators that do
///   not read it
/// * `sx`, `sy` - Upper-left corner of the window in `src`; may be negative
///
/// # Errors
///
/// Returns [`Error::NullInput`] if `op` needs a source and none is given.
/// Low-level bounds failures are reported as [`Error::IndexOutOfRange`]
/// wrapped in the `rasterop` context.
#[allow(clippy::too_many_arguments)]
pub fn rasterop(
    dest: &mut Bitmap,
    dx: i32,
    dy: i32,
    dw: i32,
    dh: i32,
    op: RopOp,
    src: Option<&Bitmap>,
    sx: i32,
    sy: i32,
) -> Result<()> {
    if op == RopOp::Dst {
        return Ok(());
    }

    if !op.requires_source() {
        let Some(win) = Window::clip_unary(dest, dx, dy, dw, dh) else {
            return Ok(());
        };
        return rasterop_uni_low(dest, win, op).context("rasterop");
    }

    let src = src.ok_or(Error::NullInput("rasterop source bitmap"))?;
    let Some(win) = Window::clip_binary(dest, src, dx, dy, dw, dh, sx, sy) else {
        return Ok(());
    };

    let result = if win.dx & 7 == 0 && win.sx & 7 == 0 {
        rasterop_byte_aligned_low(dest, src, win, op)
    } else if win.dx & 7 == win.sx & 7 {
        rasterop_valigned_low(dest, src, win, op)
    } else {
        rasterop_general_low(dest, src, win, op)
    };
    result.context("rasterop")
}

fn rasterop_uni_low(dest: &mut Bitmap, win: Window, op: RopOp) -> Result<()> {
    let span = ByteSpan::new(win.dx, win.w);
    for y in win.dy..win.dy + win.h {
        let row = dest.row_mut(y as u32)?;
        let d = bytes_mut(row, span.first, span.len())?;
        for (k, dv) in d.iter_mut().enumerate() {
            *dv = combine(*dv, op.apply(0, *dv), span.mask(k));
        }
    }
    Ok(())
}

/// Both windows start on a byte boundary: whole bytes, then one masked tail.
fn rasterop_byte_aligned_low(dest: &mut Bitmap, src: &Bitmap, win: Window, op: RopOp) -> Result<()> {
    let dfirst = win.dx >> 3;
    let sfirst = win.sx >> 3;
    let nfull = win.w >> 3;
    let tail_bits = win.w & 7;
    let tail_mask = LEFT_MASK[tail_bits];
    let nbytes = nfull + usize::from(tail_bits != 0);

    for i in 0..win.h {
        let s = bytes(src.row((win.sy + i) as u32)?, sfirst, nbytes)?;
        let d = bytes_mut(dest.row_mut((win.dy + i) as u32)?, dfirst, nbytes)?;
        for (dv, &sv) in d[..nfull].iter_mut().zip(&s[..nfull]) {
            *dv = op.apply(sv, *dv);
        }
        if tail_bits != 0 {
            let dv = d[nfull];
            d[nfull] = combine(dv, op.apply(s[nfull], dv), tail_mask);
        }
    }
    Ok(())
}

/// Same bit offset in source and destination: a masked head byte, a run of
/// whole bytes, and a masked tail byte.
fn rasterop_valigned_low(dest: &mut Bitmap, src: &Bitmap, win: Window, op: RopOp) -> Result<()> {
    let off = win.dx & 7;
    let head_bits = (8 - off).min(win.w);
    let head_mask = RIGHT_MASK[8 - off] & LEFT_MASK[off + head_bits];
    let rest = win.w - head_bits;
    let nfull = rest >> 3;
    let tail_bits = rest & 7;
    let tail_mask = LEFT_MASK[tail_bits];
    let nbytes = 1 + nfull + usize::from(tail_bits != 0);

    let dfirst = win.dx >> 3;
    let sfirst = win.sx >> 3;

    for i in 0..win.h {
        let s = bytes(src.row((win.sy + i) as u32)?, sfirst, nbytes)?;
        let d = bytes_mut(dest.row_mut((win.dy + i) as u32)?, dfirst, nbytes)?;

        d[0] = combine(d[0], op.apply(s[0], d[0]), head_mask);
        for k in 1..=nfull {
            d[k] = op.apply(s[k], d[k]);
        }
        if tail_bits != 0 {
            let k = nfull + 1;
            d[k] = combine(d[k], op.apply(s[k], d[k]), tail_mask);
        }
    }
    Ok(())
}

/// Different bit offsets: each destination byte takes the low part of one
/// source byte and the high part of the next.
fn rasterop_general_low(dest: &mut Bitmap, src: &Bitmap, win: Window, op: RopOp) -> Result<()> {
    let span = ByteSpan::new(win.dx, win.w);
    // source pixel = dest pixel + delta
    let delta = win.sx as i64 - win.dx as i64;
    let shift = delta.rem_euclid(8) as u32;

    for i in 0..win.h {
        let srow = src.row((win.sy + i) as u32)?;
        let d = bytes_mut(dest.row_mut((win.dy + i) as u32)?, span.first, span.len())?;
        for (k, dv) in d.iter_mut().enumerate() {
            let p = 8 * (span.first + k) as i64 + delta;
            let sbyte = p.div_euclid(8);
            let value = shifted_byte(srow, sbyte, shift);
            *dv = combine(*dv, op.apply(value, *dv), span.mask(k));
        }
    }
    Ok(())
}

/// Byte starting `shift` bits into byte `index` of `row`. Bytes outside the
/// row read as zero; callers mask away the bits that came from them.
#[inline]
fn shifted_byte(row: &[u8], index: i64, shift: u32) -> u8 {
    let at = |i: i64| -> u8 {
        if i < 0 {
            0
        } else {
            row.get(i as usize).copied().unwrap_or(0)
        }
    };
    if shift == 0 {
        return at(index);
    }
    (at(index) << shift) | (at(index + 1) >> (8 - shift))
}

impl Bitmap {
    /// Clear the pixels of a rectangle (clipped to the bitmap).
    pub fn clear_region(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<()> {
        rasterop(self, x, y, w, h, RopOp::Clear, None, 0, 0)
    }

    /// Set the pixels of a rectangle (clipped to the bitmap).
    pub fn set_region(&mut self, x: i32, y: i32, w: i32, h: i32) -> Result<()> {
        rasterop(self, x, y, w, h, RopOp::Set, None, 0, 0)
    }

    /// Combine `other` over the whole of a copy of `self`.
    fn binary_full(&self, other: &Bitmap, op: RopOp, name: &'static str) -> Result<Bitmap> {
        if self.width != other.width || self.height != other.height {
            return Err(Error::Context {
                operation: name,
                source: Box::new(Error::IncompatibleSizes(
                    self.width,
                    self.height,
                    other.width,
                    other.height,
                )),
            });
        }
        let mut out = self.clone();
        let (w, h) = (self.width as i32, self.height as i32);
        rasterop(&mut out, 0, 0, w, h, op, Some(other), 0, 0).context(name)?;
        Ok(out)
    }

    /// Pixelwise AND.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleSizes`] if the sizes differ.
    pub fn and(&self, other: &Bitmap) -> Result<Bitmap> {
        self.binary_full(other, RopOp::SrcAndDst, "and")
    }

    /// Pixelwise OR.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleSizes`] if the sizes differ.
    pub fn or(&self, other: &Bitmap) -> Result<Bitmap> {
        self.binary_full(other, RopOp::SrcOrDst, "or")
    }

    /// Pixelwise XOR.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleSizes`] if the sizes differ.
    pub fn xor(&self, other: &Bitmap) -> Result<Bitmap> {
        self.binary_full(other, RopOp::SrcXorDst, "xor")
    }

    /// Pixels on in `self` but off in `other`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompatibleSizes`] if the sizes differ.
    pub fn subtract(&self, other: &Bitmap) -> Result<Bitmap> {
        self.binary_full(other, RopOp::Subtract, "subtract")
    }

    /// Pixelwise NOT; padding stays clear and polarity is unchanged.
    pub fn invert(&self) -> Bitmap {
        let mut out = self.clone();
        for b in out.data_mut() {
            *b = !*b;
        }
        out.clear_padding();
        out
    }
}
