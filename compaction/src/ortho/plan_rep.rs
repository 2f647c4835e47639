//! The planarized representation of a drawing. Every vertex of the input is
//! expanded into a cage: four corner nodes, one port node for each incident
//! edge and the border edges between them. Edge bends and edge crossings
//! become nodes of their own. A center node per vertex carries the position
//! of the vertex label; it has no edges.

use super::distances::EdgeDistances;
use crate::adt::{AdjEntry, EdgeHandle, Graph, NodeHandle};
use crate::core::base::OrthoDir;
use crate::core::geometry::GridPoint;
use crate::error::{Error, Result};
use crate::ortho::grid::GridLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    pub fn index(&self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomRight => 2,
            Corner::BottomLeft => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Center,
    Corner(Corner),
    Port(OrthoDir),
    Bend,
    Crossing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Association,
    Generalization,
    Border,
}

#[derive(Debug, Clone)]
pub struct VertexInfo {
    pub name: String,
    pub width: i64,
    pub height: i64,
    pub center: NodeHandle,
    /// Indexed by `Corner::index`.
    pub corners: [NodeHandle; 4],
}

impl VertexInfo {
    pub fn corner(&self, c: Corner) -> NodeHandle {
        self.corners[c.index()]
    }
}

#[derive(Debug, Clone)]
pub struct EdgeInfo {
    pub from: usize,
    pub to: usize,
    pub kind: EdgeKind,
    /// The plan edges of the edge, in order from the source port to the
    /// target port.
    pub pieces: Vec<EdgeHandle>,
}

#[derive(Debug, Clone, Default)]
pub struct PlanRep {
    graph: Graph,
    node_kind: Vec<NodeKind>,
    node_vertex: Vec<Option<usize>>,
    edge_kind: Vec<EdgeKind>,
    edge_original: Vec<Option<usize>>,
    vertices: Vec<VertexInfo>,
    edges: Vec<EdgeInfo>,
}

impl PlanRep {
    pub fn new() -> Self {
        PlanRep::default()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn add_node(&mut self, kind: NodeKind, vertex: Option<usize>) -> NodeHandle {
        let v = self.graph.new_node();
        self.node_kind.push(kind);
        self.node_vertex.push(vertex);
        v
    }

    pub fn add_edge(
        &mut self,
        from: NodeHandle,
        to: NodeHandle,
        kind: EdgeKind,
        original: Option<usize>,
    ) -> EdgeHandle {
        let e = self.graph.new_edge(from, to);
        self.edge_kind.push(kind);
        self.edge_original.push(original);
        e
    }

    pub fn add_vertex(&mut self, info: VertexInfo) -> usize {
        self.vertices.push(info);
        self.vertices.len() - 1
    }

    pub fn add_original_edge(&mut self, info: EdgeInfo) -> usize {
        self.edges.push(info);
        self.edges.len() - 1
    }

    /// Install the rotation \p order at \p v.
    pub fn set_rotation(&mut self, v: NodeHandle, order: &[AdjEntry]) {
        self.graph.set_rotation(v, order);
    }

    pub fn kind_of_node(&self, v: NodeHandle) -> NodeKind {
        self.node_kind[v.get_index()]
    }

    /// \returns the vertex that the cage node \p v belongs to.
    pub fn vertex_of(&self, v: NodeHandle) -> Option<usize> {
        self.node_vertex[v.get_index()]
    }

    pub fn kind_of_edge(&self, e: EdgeHandle) -> EdgeKind {
        self.edge_kind[e.get_index()]
    }

    /// \returns the input edge that \p e is a piece of; None for border
    /// edges.
    pub fn original_edge(&self, e: EdgeHandle) -> Option<usize> {
        self.edge_original[e.get_index()]
    }

    pub fn vertices(&self) -> &[VertexInfo] {
        &self.vertices
    }

    pub fn vertex(&self, i: usize) -> &VertexInfo {
        &self.vertices[i]
    }

    pub fn original_edges(&self) -> &[EdgeInfo] {
        &self.edges
    }

    pub fn original_edge_info(&self, i: usize) -> &EdgeInfo {
        &self.edges[i]
    }

    pub fn is_center(&self, v: NodeHandle) -> bool {
        self.kind_of_node(v) == NodeKind::Center
    }

    /// \returns the port nodes on side \p side of vertex \p vertex.
    pub fn ports_on(&self, vertex: usize, side: OrthoDir) -> Vec<NodeHandle> {
        self.graph
            .nodes()
            .filter(|v| {
                self.node_vertex[v.get_index()] == Some(vertex)
                    && self.node_kind[v.get_index()] == NodeKind::Port(side)
            })
            .collect()
    }

    /// Check that every side of every vertex is long enough to place its
    /// ports at the distances that \p distances asks for: the corner
    /// distance `epsilon` at both ends and `delta` between ports.
    pub fn check_port_spacing(&self, distances: &dyn EdgeDistances) -> Result<()> {
        let sides = [OrthoDir::North, OrthoDir::East, OrthoDir::South, OrthoDir::West];
        for (i, info) in self.vertices.iter().enumerate() {
            for side in sides {
                let k = self.ports_on(i, side).len() as i64;
                if k == 0 {
                    continue;
                }
                let extent = if side.is_horizontal() {
                    info.height
                } else {
                    info.width
                };
                let needed =
                    2 * distances.epsilon(i, side) + (k - 1) * distances.delta(i, side);
                if extent < needed {
                    return Err(Error::VertexTooSmall(info.name.clone(), side));
                }
            }
        }
        Ok(())
    }

    /// \returns the (top-left, bottom-right) box of vertex \p i in
    /// \p layout.
    pub fn vertex_box(
        &self,
        i: usize,
        layout: &GridLayout,
    ) -> (GridPoint, GridPoint) {
        let info = &self.vertices[i];
        (
            layout.point(info.corner(Corner::TopLeft)),
            layout.point(info.corner(Corner::BottomRight)),
        )
    }
}
