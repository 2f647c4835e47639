//! Contains functions that are related to the geometry of shapes and their
//! interaction. Rendering works with floating point coordinates, while the
//! drawings that are compacted live on an integer grid.

use super::base::OrthoDir;

// Stores a 2D coordinate, or a vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn zero() -> Point {
        Self { x: 0., y: 0. }
    }

    pub fn new(x: f64, y: f64) -> Point {
        Self { x, y }
    }

    pub fn splat(s: f64) -> Point {
        Point::new(s, s)
    }

    pub fn scale(&self, s: f64) -> Point {
        Point::new(self.x * s, self.y * s)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "(x: {:.3}, y: {:.3})", self.x, self.y)
    }
}

/// A point on the integer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl GridPoint {
    pub fn new(x: i64, y: i64) -> GridPoint {
        Self { x, y }
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }

    /// \returns the direction from this point to \p other, if the two
    /// points are distinct and on one horizontal or vertical line.
    pub fn dir_to(&self, other: GridPoint) -> Option<OrthoDir> {
        OrthoDir::from_delta(other.x - self.x, other.y - self.y)
    }
}

impl std::fmt::Display for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

pub fn in_range(range: (i64, i64), x: i64) -> bool {
    x >= range.0 && x <= range.1
}

/// \returns True if the closed boxes \p p1 and \p p2, given as (top-left,
/// bottom-right) pairs, share at least one point.
pub fn do_boxes_intersect(p1: (GridPoint, GridPoint), p2: (GridPoint, GridPoint)) -> bool {
    let overlap_x = p2.0.x <= p1.1.x && p1.0.x <= p2.1.x;
    let overlap_y = p2.0.y <= p1.1.y && p1.0.y <= p2.1.y;
    overlap_x && overlap_y
}

/// An axis parallel segment between two grid points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrthoSegment {
    pub from: GridPoint,
    pub to: GridPoint,
}

impl OrthoSegment {
    pub fn new(from: GridPoint, to: GridPoint) -> Self {
        Self { from, to }
    }

    pub fn is_horizontal(&self) -> bool {
        self.from.y == self.to.y
    }

    /// \returns the normalized bounding box of the segment.
    pub fn bbox(&self) -> (GridPoint, GridPoint) {
        (
            GridPoint::new(self.from.x.min(self.to.x), self.from.y.min(self.to.y)),
            GridPoint::new(self.from.x.max(self.to.x), self.from.y.max(self.to.y)),
        )
    }

    pub fn contains(&self, p: GridPoint) -> bool {
        let (lo, hi) = self.bbox();
        in_range((lo.x, hi.x), p.x) && in_range((lo.y, hi.y), p.y)
    }

    /// \returns True if \p p lies on the segment but is not one of its
    /// endpoints.
    pub fn contains_interior(&self, p: GridPoint) -> bool {
        self.contains(p) && p != self.from && p != self.to
    }

    /// \returns True if the segments share a point.
    pub fn touches(&self, other: &OrthoSegment) -> bool {
        do_boxes_intersect(self.bbox(), other.bbox())
    }

    /// \returns the point where a horizontal and a vertical segment cross
    /// in the interior of both, if they do.
    pub fn proper_crossing(&self, other: &OrthoSegment) -> Option<GridPoint> {
        let (h, v) = if self.is_horizontal() && !other.is_horizontal() {
            (self, other)
        } else if !self.is_horizontal() && other.is_horizontal() {
            (other, self)
        } else {
            return None;
        };
        let p = GridPoint::new(v.from.x, h.from.y);
        if h.contains_interior(p) && v.contains_interior(p) {
            return Some(p);
        }
        None
    }
}

#[test]
fn test_segments() {
    let p = GridPoint::new;
    let h = OrthoSegment::new(p(0, 5), p(10, 5));
    let v = OrthoSegment::new(p(4, 0), p(4, 10));
    assert_eq!(h.proper_crossing(&v), Some(p(4, 5)));
    assert_eq!(v.proper_crossing(&h), Some(p(4, 5)));

    // A T-junction is not a proper crossing.
    let t = OrthoSegment::new(p(4, 5), p(4, 10));
    assert!(h.touches(&t));
    assert_eq!(h.proper_crossing(&t), None);

    let far = OrthoSegment::new(p(20, 0), p(20, 10));
    assert!(!h.touches(&far));
    assert_eq!(p(0, 0).dir_to(p(0, -3)), Some(OrthoDir::North));
    assert_eq!(p(0, 0).dir_to(p(2, -3)), None);
}
