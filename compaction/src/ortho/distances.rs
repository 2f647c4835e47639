//! Minimum distances between the objects of a drawing. The compaction passes
//! query these through the `EdgeDistances` trait.

use crate::core::base::OrthoDir;
use std::collections::HashMap;

pub trait EdgeDistances {
    /// \returns the minimum gap between two parallel segments.
    fn separation(&self) -> i64;

    /// \returns the minimum distance between two neighboring ports on side
    /// \p side of vertex \p vertex.
    fn delta(&self, _vertex: usize, _side: OrthoDir) -> i64 {
        self.separation()
    }

    /// \returns the minimum distance between a corner of vertex \p vertex and
    /// the nearest port on side \p side.
    fn epsilon(&self, _vertex: usize, _side: OrthoDir) -> i64 {
        self.separation()
    }
}

/// A uniform separation between all segments.
#[derive(Debug, Clone, Copy)]
pub struct RoutingChannel {
    sep: i64,
}

impl RoutingChannel {
    pub fn new(sep: i64) -> Self {
        assert!(sep > 0, "The separation must be positive");
        RoutingChannel { sep }
    }
}

impl EdgeDistances for RoutingChannel {
    fn separation(&self) -> i64 {
        self.sep
    }
}

/// A separation that can change between compaction rounds, plus per-side
/// overrides of the port distances.
#[derive(Debug, Clone)]
pub struct MinimumEdgeDistances {
    sep: i64,
    delta: HashMap<(usize, OrthoDir), i64>,
    epsilon: HashMap<(usize, OrthoDir), i64>,
}

impl MinimumEdgeDistances {
    pub fn new(sep: i64) -> Self {
        assert!(sep > 0, "The separation must be positive");
        MinimumEdgeDistances {
            sep,
            delta: HashMap::new(),
            epsilon: HashMap::new(),
        }
    }

    pub fn set_separation(&mut self, sep: i64) {
        assert!(sep > 0, "The separation must be positive");
        self.sep = sep;
    }

    pub fn set_delta(&mut self, vertex: usize, side: OrthoDir, val: i64) {
        self.delta.insert((vertex, side), val);
    }

    pub fn set_epsilon(&mut self, vertex: usize, side: OrthoDir, val: i64) {
        self.epsilon.insert((vertex, side), val);
    }
}

impl EdgeDistances for MinimumEdgeDistances {
    fn separation(&self) -> i64 {
        self.sep
    }

    fn delta(&self, vertex: usize, side: OrthoDir) -> i64 {
        *self.delta.get(&(vertex, side)).unwrap_or(&self.sep)
    }

    fn epsilon(&self, vertex: usize, side: OrthoDir) -> i64 {
        *self.epsilon.get(&(vertex, side)).unwrap_or(&self.sep)
    }
}

#[test]
fn test_distances() {
    let rc = RoutingChannel::new(4);
    assert_eq!(rc.delta(0, OrthoDir::North), 4);

    let mut med = MinimumEdgeDistances::new(10);
    med.set_delta(1, OrthoDir::West, 3);
    med.set_epsilon(1, OrthoDir::West, 2);
    assert_eq!(med.delta(1, OrthoDir::West), 3);
    assert_eq!(med.epsilon(1, OrthoDir::West), 2);
    assert_eq!(med.delta(1, OrthoDir::East), 10);
    med.set_separation(20);
    assert_eq!(med.epsilon(0, OrthoDir::South), 20);
}
