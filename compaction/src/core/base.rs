//! Contains utilities, enums, constants and simple data structures that are
//! used across the program.

use std::fmt;

/// The four compass directions of an orthogonal drawing. The drawing uses
/// screen coordinates: x grows to the East and y grows to the South.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrthoDir {
    North,
    East,
    South,
    West,
}

impl OrthoDir {
    pub fn opposite(&self) -> OrthoDir {
        match self {
            OrthoDir::North => OrthoDir::South,
            OrthoDir::East => OrthoDir::West,
            OrthoDir::South => OrthoDir::North,
            OrthoDir::West => OrthoDir::East,
        }
    }

    /// \returns the position of the direction in a clockwise sweep that
    /// starts at East. Rotations are sorted by this key.
    pub fn rank(&self) -> usize {
        match self {
            OrthoDir::East => 0,
            OrthoDir::South => 1,
            OrthoDir::West => 2,
            OrthoDir::North => 3,
        }
    }

    /// \returns the unit vector of the direction.
    pub fn delta(&self) -> (i64, i64) {
        match self {
            OrthoDir::North => (0, -1),
            OrthoDir::East => (1, 0),
            OrthoDir::South => (0, 1),
            OrthoDir::West => (-1, 0),
        }
    }

    /// \returns the direction of the vector (dx, dy), or None if the vector
    /// is not axis parallel or is empty.
    pub fn from_delta(dx: i64, dy: i64) -> Option<OrthoDir> {
        match (dx.signum(), dy.signum()) {
            (1, 0) => Some(OrthoDir::East),
            (-1, 0) => Some(OrthoDir::West),
            (0, 1) => Some(OrthoDir::South),
            (0, -1) => Some(OrthoDir::North),
            _ => None,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, OrthoDir::East | OrthoDir::West)
    }

    pub fn is_vertical(&self) -> bool {
        !self.is_horizontal()
    }
}

impl fmt::Display for OrthoDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrthoDir::North => "N",
            OrthoDir::East => "E",
            OrthoDir::South => "S",
            OrthoDir::West => "W",
        };
        write!(f, "{}", name)
    }
}

/// The coordinate that a compaction pass assigns. The X pass moves segments
/// along the East/West direction, the Y pass along North/South.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(&self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// \returns the direction in which constraint arcs point: the target of
    /// an arc lies in this direction from its source.
    pub fn arc_dir(&self) -> OrthoDir {
        match self {
            Axis::X => OrthoDir::East,
            Axis::Y => OrthoDir::South,
        }
    }

    /// \returns True if an edge in direction \p dir is part of a segment,
    /// which means that it is perpendicular to the compaction direction.
    pub fn is_segment_dir(&self, dir: OrthoDir) -> bool {
        match self {
            Axis::X => dir.is_vertical(),
            Axis::Y => dir.is_horizontal(),
        }
    }

    /// \returns the coordinate that this axis assigns.
    pub fn coord(&self, x: i64, y: i64) -> i64 {
        match self {
            Axis::X => x,
            Axis::Y => y,
        }
    }

    /// \returns the coordinate along the segments of this axis.
    pub fn perp(&self, x: i64, y: i64) -> i64 {
        match self {
            Axis::X => y,
            Axis::Y => x,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

#[test]
fn test_directions() {
    for dir in [OrthoDir::North, OrthoDir::East, OrthoDir::South, OrthoDir::West] {
        let (dx, dy) = dir.delta();
        assert_eq!(OrthoDir::from_delta(dx * 7, dy * 7), Some(dir));
        assert_eq!(dir.opposite().opposite(), dir);
        assert_eq!((dir.rank() + 2) % 4, dir.opposite().rank());
    }
    assert_eq!(OrthoDir::from_delta(1, 1), None);
    assert_eq!(OrthoDir::from_delta(0, 0), None);
    assert!(Axis::X.is_segment_dir(OrthoDir::North));
    assert!(Axis::Y.is_segment_dir(OrthoDir::West));
    assert_eq!(Axis::Y.coord(3, 4), 4);
    assert_eq!(Axis::Y.perp(3, 4), 3);
}
