//! Integer pixel rectangles.

use std::fmt;

use nalgebra::Point2;

/// An axis-aligned rectangle in integer pixel coordinates.
///
/// Rectangles may have zero width and/or height. Negative dimensions are not allowed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl Rect {
    /// Creates a rectangle extending downwards and right from a point.
    #[inline]
    pub fn from_top_left(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle that spans the pixels from `(x_min, y_min)` to `(x_max, y_max)`
    /// inclusive.
    ///
    /// # Panics
    ///
    /// Panics when a minimum exceeds its corresponding maximum.
    pub fn span(x_min: i32, y_min: i32, x_max: i32, y_max: i32) -> Self {
        assert!(x_min <= x_max, "x_min={x_min}, x_max={x_max}");
        assert!(y_min <= y_max, "y_min={y_min}, y_max={y_max}");
        Self::from_top_left(
            x_min,
            y_min,
            (x_max - x_min) as u32,
            (y_max - y_min) as u32,
        )
    }

    /// Computes the axis-aligned bounding rectangle of `points`.
    ///
    /// Returns [`None`] when `points` is empty.
    pub fn bounding<I: IntoIterator<Item = Point2<i32>>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for pt in iter {
            min = Point2::new(min.x.min(pt.x), min.y.min(pt.y));
            max = Point2::new(max.x.max(pt.x), max.y.max(pt.y));
        }

        Some(Self::span(min.x, min.y, max.x, max.y))
    }

    /// Returns whether `pt` lies inside `self`.
    ///
    /// The left and top edges are inclusive, the right and bottom edges exclusive.
    pub fn contains(&self, pt: Point2<i32>) -> bool {
        pt.x >= self.x
            && pt.y >= self.y
            && pt.x < self.x + self.width as i32
            && pt.y < self.y + self.height as i32
    }

    /// Grows each side of the rectangle outwards by `amount` pixels.
    #[must_use]
    pub fn grow(&self, amount: u32) -> Self {
        Self {
            x: self.x - amount as i32,
            y: self.y - amount as i32,
            width: self.width + 2 * amount,
            height: self.height + 2 * amount,
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn center(&self) -> Point2<i32> {
        Point2::new(
            self.x + self.width as i32 / 2,
            self.y + self.height as i32 / 2,
        )
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Rect @ ({},{}), size {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_of_two_corners() {
        let rect =
            Rect::bounding([Point2::new(0, 0), Point2::new(100, 100)]).unwrap();
        assert_eq!((rect.x(), rect.y()), (0, 0));
        assert_eq!((rect.width(), rect.height()), (100, 100));
    }

    #[test]
    fn bounding_of_nothing() {
        assert_eq!(Rect::bounding([]), None);
    }

    #[test]
    fn contains_edges() {
        let rect = Rect::from_top_left(10, 10, 5, 5);
        assert!(rect.contains(Point2::new(10, 10)));
        assert!(rect.contains(Point2::new(14, 14)));
        assert!(!rect.contains(Point2::new(15, 14)));
        assert!(!rect.contains(Point2::new(9, 10)));
    }

    #[test]
    fn grow_moves_origin() {
        let rect = Rect::from_top_left(10, 10, 5, 5).grow(20);
        assert_eq!((rect.x(), rect.y()), (-10, -10));
        assert_eq!((rect.width(), rect.height()), (45, 45));
    }
}
