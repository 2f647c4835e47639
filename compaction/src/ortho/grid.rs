//! Integer grid coordinates for the nodes of a planarized drawing.

use crate::adt::NodeHandle;
use crate::core::base::Axis;
use crate::core::geometry::GridPoint;

#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    x: Vec<i64>,
    y: Vec<i64>,
    // The size of one grid unit when converting to real coordinates.
    unit: f64,
}

impl GridLayout {
    /// Create a layout for \p n nodes, all at the origin.
    pub fn new(n: usize) -> Self {
        GridLayout {
            x: vec![0; n],
            y: vec![0; n],
            unit: 1.,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self, v: NodeHandle) -> i64 {
        self.x[v.get_index()]
    }

    pub fn y(&self, v: NodeHandle) -> i64 {
        self.y[v.get_index()]
    }

    pub fn point(&self, v: NodeHandle) -> GridPoint {
        GridPoint::new(self.x(v), self.y(v))
    }

    pub fn set(&mut self, v: NodeHandle, p: GridPoint) {
        self.x[v.get_index()] = p.x;
        self.y[v.get_index()] = p.y;
    }

    /// \returns the coordinate of \p v that the \p axis pass assigns.
    pub fn coord(&self, axis: Axis, v: NodeHandle) -> i64 {
        axis.coord(self.x(v), self.y(v))
    }

    pub fn set_coord(&mut self, axis: Axis, v: NodeHandle, val: i64) {
        match axis {
            Axis::X => self.x[v.get_index()] = val,
            Axis::Y => self.y[v.get_index()] = val,
        }
    }

    pub fn set_unit(&mut self, unit: f64) {
        self.unit = unit;
    }

    /// Convert a grid coordinate to a real coordinate.
    pub fn to_double(&self, val: i64) -> f64 {
        val as f64 * self.unit
    }

    /// \returns the (top-left, bottom-right) corners of the bounding box of
    /// the nodes in \p nodes.
    pub fn bounding_box<I: Iterator<Item = NodeHandle>>(
        &self,
        nodes: I,
    ) -> Option<(GridPoint, GridPoint)> {
        let mut res: Option<(GridPoint, GridPoint)> = None;
        for v in nodes {
            let p = self.point(v);
            res = Some(match res {
                None => (p, p),
                Some((lo, hi)) => (
                    GridPoint::new(lo.x.min(p.x), lo.y.min(p.y)),
                    GridPoint::new(hi.x.max(p.x), hi.y.max(p.y)),
                ),
            });
        }
        res
    }

    /// Move the nodes in \p nodes so that the top-left corner of their
    /// bounding box is at the origin.
    pub fn align_to_origin<I: Iterator<Item = NodeHandle> + Clone>(&mut self, nodes: I) {
        if let Some((lo, _)) = self.bounding_box(nodes.clone()) {
            for v in nodes {
                self.x[v.get_index()] -= lo.x;
                self.y[v.get_index()] -= lo.y;
            }
        }
    }
}

#[test]
fn test_grid_layout() {
    let mut layout = GridLayout::new(3);
    let nodes: Vec<NodeHandle> = (0..3).map(NodeHandle::new).collect();
    layout.set(nodes[0], GridPoint::new(5, 7));
    layout.set(nodes[1], GridPoint::new(15, 3));
    layout.set(nodes[2], GridPoint::new(9, 20));
    let bb = layout.bounding_box(nodes.iter().copied()).unwrap();
    assert_eq!(bb, (GridPoint::new(5, 3), GridPoint::new(15, 20)));

    layout.align_to_origin(nodes.iter().copied());
    assert_eq!(layout.point(nodes[0]), GridPoint::new(0, 4));
    assert_eq!(layout.coord(Axis::Y, nodes[2]), 17);
    layout.set_unit(0.5);
    assert_eq!(layout.to_double(layout.x(nodes[1])), 5.);
}
