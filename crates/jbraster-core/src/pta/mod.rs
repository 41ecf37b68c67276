//! Point, Pta - floating-point point arrays
//!
//! Points are stored as separate x and y arrays (structure of arrays).

/// Floating-point location relative to a bitmap's upper-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Array of points
#[derive(Debug, Clone, Default)]
pub struct Pta {
    x: Vec<f32>,
    y: Vec<f32>,
}

impl Pta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn push(&mut self, x: f32, y: f32) {
        self.x.push(x);
        self.y.push(y);
    }

    pub fn push_point(&mut self, p: Point) {
        self.push(p.x, p.y);
    }

    pub fn get(&self, index: usize) -> Option<Point> {
        Some(Point::new(*self.x.get(index)?, *self.y.get(index)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = Point> + '_ {
        self.x.iter().zip(&self.y).map(|(&x, &y)| Point::new(x, y))
    }
}

impl FromIterator<Point> for Pta {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        let mut pta = Pta::new();
        for p in iter {
            pta.push_point(p);
        }
        pta
    }
}
