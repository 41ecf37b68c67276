//! Structuring Element (SEL) for morphological operations
//!
//! A structuring element is a small grid of [`SelElement`]s with an origin.
//! Dilation and erosion only look at the Hit elements; the hit-miss
//! transform uses Miss elements as well.

use crate::{MorphError, MorphResult};

/// Element type in a structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SelElement {
    /// Don't care - this position is ignored
    #[default]
    DontCare = 0,
    /// Hit - must match foreground (set pixels)
    Hit = 1,
    /// Miss - must match background (unset pixels)
    Miss = 2,
}

/// Structuring Element (SEL)
///
/// The origin `(cx, cy)` is the element that lands on the output pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sel {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    data: Vec<SelElement>,
    name: Option<String>,
}

impl Sel {
    /// Create an all-DontCare structuring element with the origin at its center.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSel`] if either dimension is 0.
    pub fn new(width: u32, height: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "dimensions must be > 0, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![SelElement::DontCare; (width * height) as usize],
            name: None,
        })
    }

    /// Create a rectangular "brick" of hits with the origin at `(w/2, h/2)`.
    pub fn create_brick(width: u32, height: u32) -> MorphResult<Self> {
        let mut sel = Self::new(width, height)?;
        sel.data.fill(SelElement::Hit);
        sel.name = Some(format!("brick_{width}x{height}"));
        Ok(sel)
    }

    /// Create a square brick
    pub fn create_square(size: u32) -> MorphResult<Self> {
        Self::create_brick(size, size)
    }

    /// Create a `length x 1` brick with the origin at `(length/2, 0)`
    pub fn create_horizontal(length: u32) -> MorphResult<Self> {
        Self::create_brick(length, 1)
    }

    /// Create a `1 x length` brick with the origin at `(0, length/2)`
    pub fn create_vertical(length: u32) -> MorphResult<Self> {
        Self::create_brick(1, length)
    }

    /// Create a structuring element from a string pattern
    ///
    /// Rows are separated by newlines; leading and trailing whitespace on
    /// each row and blank rows are ignored.
    ///
    /// # Arguments
    /// * `pattern` - `x` for hit, `o` for miss, `.` for don't care
    /// * `origin_x` - X coordinate of origin
    /// * `origin_y` - Y coordinate of origin
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSel`] for ragged rows, unknown
    /// characters, an empty pattern, or an origin outside the grid.
    pub fn from_string(pattern: &str, origin_x: u32, origin_y: u32) -> MorphResult<Self> {
        let rows: Vec<&str> = pattern
            .lines()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .collect();
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as u32;
        let mut sel = Self::new(width, height)?;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() as u32 != width {
                return Err(MorphError::InvalidSel(format!(
                    "row {y} has {} elements, expected {width}",
                    row.chars().count()
                )));
            }
            for (x, c) in row.chars().enumerate() {
                let elem = match c {
                    'x' | 'X' => SelElement::Hit,
                    'o' | 'O' => SelElement::Miss,
                    '.' => SelElement::DontCare,
                    other => {
                        return Err(MorphError::InvalidSel(format!(
                            "unknown element {other:?} at ({x}, {y})"
                        )));
                    }
                };
                sel.data[y * width as usize + x] = elem;
            }
        }
        sel.set_origin(origin_x, origin_y)?;
        Ok(sel)
    }

    /// Get the width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the origin x coordinate
    #[inline]
    pub fn origin_x(&self) -> u32 {
        self.cx
    }

    /// Get the origin y coordinate
    #[inline]
    pub fn origin_y(&self) -> u32 {
        self.cy
    }

    /// Set the origin
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSel`] if the origin is outside the grid.
    pub fn set_origin(&mut self, cx: u32, cy: u32) -> MorphResult<()> {
        if cx >= self.width || cy >= self.height {
            return Err(MorphError::InvalidSel(format!(
                "origin ({cx}, {cy}) outside {}x{}",
                self.width, self.height
            )));
        }
        self.cx = cx;
        self.cy = cy;
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = Some(name.into());
    }

    /// Get the element at column `x`, row `y`
    #[inline]
    pub fn get_element(&self, x: u32, y: u32) -> Option<SelElement> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get((y * self.width + x) as usize).copied()
    }

    /// Set the element at column `x`, row `y`
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidSel`] if `(x, y)` is outside the grid.
    pub fn set_element(&mut self, x: u32, y: u32, elem: SelElement) -> MorphResult<()> {
        if x >= self.width || y >= self.height {
            return Err(MorphError::InvalidSel(format!(
                "element ({x}, {y}) outside {}x{}",
                self.width, self.height
            )));
        }
        self.data[(y * self.width + x) as usize] = elem;
        Ok(())
    }

    /// Get raw element data
    pub fn data(&self) -> &[SelElement] {
        &self.data
    }

    /// Count the number of hit elements
    pub fn hit_count(&self) -> usize {
        self.data.iter().filter(|&&e| e == SelElement::Hit).count()
    }

    /// Count the number of miss elements
    pub fn miss_count(&self) -> usize {
        self.data.iter().filter(|&&e| e == SelElement::Miss).count()
    }

    fn offsets_of(&self, kind: SelElement) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cx = self.cx as i32;
        let cy = self.cy as i32;
        let width = self.width;

        self.data
            .iter()
            .enumerate()
            .filter_map(move |(idx, &elem)| {
                if elem == kind {
                    let x = (idx as u32 % width) as i32;
                    let y = (idx as u32 / width) as i32;
                    Some((x - cx, y - cy))
                } else {
                    None
                }
            })
    }

    /// Hit positions `(j - cx, i - cy)` relative to the origin
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.offsets_of(SelElement::Hit)
    }

    /// Miss positions relative to the origin
    pub fn miss_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.offsets_of(SelElement::Miss)
    }

    /// Largest shifts the hits apply during erosion.
    ///
    /// Returns `(xp, yp, xn, yn)`: the maxima of `cx - j`, `cy - i`,
    /// `j - cx` and `i - cy` over the hits, each at least 0. These are the
    /// widths of the left, top, right and bottom edge strips that an
    /// asymmetric erosion clears.
    pub fn find_max_translations(&self) -> (u32, u32, u32, u32) {
        self.hit_offsets()
            .fold((0, 0, 0, 0), |(xp, yp, xn, yn), (dx, dy)| {
                (
                    xp.max((-dx).max(0) as u32),
                    yp.max((-dy).max(0) as u32),
                    xn.max(dx.max(0) as u32),
                    yn.max(dy.max(0) as u32),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brick_origin() {
        let sel = Sel::create_brick(5, 4).unwrap();
        assert_eq!((sel.origin_x(), sel.origin_y()), (2, 2));
        assert_eq!(sel.hit_count(), 20);
        let h = Sel::create_horizontal(6).unwrap();
        assert_eq!((h.width(), h.height(), h.origin_x(), h.origin_y()), (6, 1, 3, 0));
        let v = Sel::create_vertical(7).unwrap();
        assert_eq!((v.width(), v.height(), v.origin_x(), v.origin_y()), (1, 7, 0, 3));
        assert!(Sel::create_brick(0, 3).is_err());
    }

    #[test]
    fn test_from_string() {
        let sel = Sel::from_string(
            "
            x.o
            xxx
            ",
            1,
            1,
        )
        .unwrap();
        assert_eq!((sel.width(), sel.height()), (3, 2));
        assert_eq!(sel.get_element(2, 0), Some(SelElement::Miss));
        assert_eq!(sel.get_element(1, 0), Some(SelElement::DontCare));
        assert_eq!(sel.get_element(3, 0), None);
        assert_eq!(sel.hit_count(), 4);
        let hits: Vec<_> = sel.hit_offsets().collect();
        assert_eq!(hits, vec![(-1, -1), (-1, 0), (0, 0), (1, 0)]);
        assert_eq!(sel.miss_offsets().collect::<Vec<_>>(), vec![(1, -1)]);

        assert!(Sel::from_string("xx\nx", 0, 0).is_err());
        assert!(Sel::from_string("xq", 0, 0).is_err());
        assert!(Sel::from_string("xx", 2, 0).is_err());
        assert!(Sel::from_string("", 0, 0).is_err());
    }

    #[test]
    fn test_set_element_bounds() {
        let mut sel = Sel::new(2, 2).unwrap();
        sel.set_element(1, 1, SelElement::Hit).unwrap();
        assert!(sel.set_element(2, 0, SelElement::Hit).is_err());
        assert_eq!(sel.hit_count(), 1);
    }

    #[test]
    fn test_max_translations() {
        let sel = Sel::create_brick(5, 3).unwrap();
        assert_eq!(sel.find_max_translations(), (2, 1, 2, 1));
        let sel = Sel::from_string("x..\n...\n..x", 0, 0).unwrap();
        assert_eq!(sel.find_max_translations(), (0, 0, 2, 2));
        let empty = Sel::new(3, 3).unwrap();
        assert_eq!(empty.find_max_translations(), (0, 0, 0, 0));
    }
}
