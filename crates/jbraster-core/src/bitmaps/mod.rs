//! Bitmaps - ordered collection of bitmaps with optional boxes
//!
//! Component extraction returns each component as a bitmap plus the box
//! locating it in the source. When boxes are present there is exactly one
//! per bitmap, index for index.

use crate::bitmap::Bitmap;
use crate::box_::{Box, Boxa};
use crate::error::{Error, Result};

/// Which dimension(s) a size selection looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSelect {
    Width,
    Height,
    /// Keep if either dimension satisfies the relation
    IfEither,
    /// Keep if both dimensions satisfy the relation
    IfBoth,
}

/// Comparison used by a size selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRelation {
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl SizeRelation {
    fn holds(self, value: u32, limit: u32) -> bool {
        match self {
            SizeRelation::LessThan => value < limit,
            SizeRelation::GreaterThan => value > limit,
            SizeRelation::LessThanOrEqual => value <= limit,
            SizeRelation::GreaterThanOrEqual => value >= limit,
        }
    }
}

/// Array of bitmaps with parallel boxes
#[derive(Debug, Clone, Default)]
pub struct Bitmaps {
    bitmaps: Vec<Bitmap>,
    boxes: Boxa,
}

impl Bitmaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bitmaps: Vec::with_capacity(capacity),
            boxes: Boxa::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }

    /// Whether every bitmap has a box.
    pub fn has_boxes(&self) -> bool {
        !self.boxes.is_empty()
    }

    /// Append a bitmap without a box.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if the collection already carries boxes.
    pub fn push(&mut self, bitmap: Bitmap) -> Result<()> {
        if self.has_boxes() {
            return Err(Error::InvalidParameter(
                "bitmap without box added to a boxed collection".to_string(),
            ));
        }
        self.bitmaps.push(bitmap);
        Ok(())
    }

    /// Append a bitmap with its box.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if earlier bitmaps were added without boxes.
    pub fn push_with_box(&mut self, bitmap: Bitmap, b: Box) -> Result<()> {
        if self.boxes.len() != self.bitmaps.len() {
            return Err(Error::InvalidParameter(
                "boxed bitmap added to an unboxed collection".to_string(),
            ));
        }
        self.bitmaps.push(bitmap);
        self.boxes.push(b);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Bitmap> {
        self.bitmaps.get(index)
    }

    pub fn get_box(&self, index: usize) -> Option<Box> {
        self.boxes.get(index)
    }

    pub fn bitmaps(&self) -> &[Bitmap] {
        &self.bitmaps
    }

    pub fn boxes(&self) -> &Boxa {
        &self.boxes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bitmap> {
        self.bitmaps.iter()
    }

    /// Split into the bitmaps and boxes.
    pub fn into_parts(self) -> (Vec<Bitmap>, Boxa) {
        (self.bitmaps, self.boxes)
    }

    /// `(width, height)` of every bitmap.
    pub fn dimensions(&self) -> Vec<(u32, u32)> {
        self.bitmaps
            .iter()
            .map(|b| (b.width(), b.height()))
            .collect()
    }

    /// Keep the bitmaps whose size satisfies `relation` against the limits.
    ///
    /// Boxes, if any, follow their bitmaps.
    pub fn select_by_size(
        &self,
        width: u32,
        height: u32,
        select: SizeSelect,
        relation: SizeRelation,
    ) -> Bitmaps {
        let keep = |bm: &Bitmap| {
            let w_ok = relation.holds(bm.width(), width);
            let h_ok = relation.holds(bm.height(), height);
            match select {
                SizeSelect::Width => w_ok,
                SizeSelect::Height => h_ok,
                SizeSelect::IfEither => w_ok || h_ok,
                SizeSelect::IfBoth => w_ok && h_ok,
            }
        };

        let mut out = Bitmaps::new();
        for (i, bm) in self.bitmaps.iter().enumerate() {
            if keep(bm) {
                out.bitmaps.push(bm.clone());
                if let Some(b) = self.boxes.get(i) {
                    out.boxes.push(b);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(w: u32, h: u32) -> Bitmap {
        Bitmap::new(w, h).unwrap()
    }

    #[test]
    fn test_box_invariant() {
        let mut unboxed = Bitmaps::new();
        unboxed.push(sized(1, 1)).unwrap();
        assert!(
            unboxed
                .push_with_box(sized(1, 1), Box::new_unchecked(0, 0, 1, 1))
                .is_err()
        );

        let mut boxed = Bitmaps::new();
        boxed
            .push_with_box(sized(2, 2), Box::new_unchecked(0, 0, 2, 2))
            .unwrap();
        assert!(boxed.push(sized(1, 1)).is_err());
        assert_eq!(boxed.len(), boxed.boxes().len());
    }

    #[test]
    fn test_select_by_size() {
        let mut ba = Bitmaps::new();
        for (i, &(w, h)) in [(5, 5), (20, 3), (3, 20), (10, 10)].iter().enumerate() {
            ba.push_with_box(sized(w, h), Box::new_unchecked(i as i32, 0, w as i32, h as i32))
                .unwrap();
        }
        let small = ba.select_by_size(10, 10, SizeSelect::IfBoth, SizeRelation::LessThanOrEqual);
        assert_eq!(small.dimensions(), vec![(5, 5), (10, 10)]);
        assert_eq!(small.get_box(1).unwrap().x, 3);

        let wide = ba.select_by_size(10, 0, SizeSelect::Width, SizeRelation::GreaterThan);
        assert_eq!(wide.dimensions(), vec![(20, 3)]);

        let either = ba.select_by_size(4, 4, SizeSelect::IfEither, SizeRelation::LessThan);
        assert_eq!(either.dimensions(), vec![(20, 3), (3, 20)]);
    }
}
