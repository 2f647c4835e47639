//! Builds the planarized representation of an orthogonal drawing. The input
//! is a list of boxes and a list of orthogonal polylines that connect the
//! sides of the boxes. The builder validates the input, expands each box into
//! a cage, turns crossings into nodes and derives the rotation system and
//! the orthogonal representation from the coordinates.

use super::grid::GridLayout;
use super::ortho_rep::OrthoRep;
use super::plan_rep::{Corner, EdgeInfo, EdgeKind, NodeKind, PlanRep, VertexInfo};
use crate::adt::{AdjEntry, NodeHandle};
use crate::core::base::OrthoDir;
use crate::core::geometry::{do_boxes_intersect, GridPoint, OrthoSegment};
use crate::error::{Error, Result};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexSpec {
    pub name: String,
    /// The top-left corner.
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl VertexSpec {
    pub fn new(name: &str, x: i64, y: i64, width: i64, height: i64) -> Self {
        VertexSpec {
            name: name.to_string(),
            x,
            y,
            width,
            height,
        }
    }

    fn top_left(&self) -> GridPoint {
        GridPoint::new(self.x, self.y)
    }

    fn bottom_right(&self) -> GridPoint {
        GridPoint::new(self.x + self.width, self.y + self.height)
    }

    /// \returns the side that \p p lies on, if it lies on a side and is not
    /// a corner.
    fn side_of(&self, p: GridPoint) -> Option<OrthoDir> {
        let (lo, hi) = (self.top_left(), self.bottom_right());
        let inside_x = p.x > lo.x && p.x < hi.x;
        let inside_y = p.y > lo.y && p.y < hi.y;
        if inside_x && p.y == lo.y {
            Some(OrthoDir::North)
        } else if inside_x && p.y == hi.y {
            Some(OrthoDir::South)
        } else if inside_y && p.x == lo.x {
            Some(OrthoDir::West)
        } else if inside_y && p.x == hi.x {
            Some(OrthoDir::East)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeSpec {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    /// The polyline, from a point on a side of `from` to a point on a side
    /// of `to`.
    pub points: Vec<GridPoint>,
}

impl EdgeSpec {
    pub fn new(from: &str, to: &str, kind: EdgeKind, points: &[(i64, i64)]) -> Self {
        EdgeSpec {
            from: from.to_string(),
            to: to.to_string(),
            kind,
            points: points.iter().map(|p| GridPoint::new(p.0, p.1)).collect(),
        }
    }

    fn describe(&self) -> String {
        format!("{}->{}", self.from, self.to)
    }
}

/// An orthogonal drawing, as it is read from and written to text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Drawing {
    pub vertices: Vec<VertexSpec>,
    pub edges: Vec<EdgeSpec>,
}

/// The result of planarizing a drawing.
#[derive(Debug, Clone)]
pub struct OrthoDrawing {
    pub plan: PlanRep,
    pub ortho: OrthoRep,
    pub layout: GridLayout,
}

/// Remove repeated points and merge consecutive pieces that continue in the
/// same direction. Fails if a piece is not axis parallel or if the line
/// turns back onto itself.
fn normalize_points(edge: &EdgeSpec) -> Result<Vec<GridPoint>> {
    let mut pts: Vec<GridPoint> = Vec::new();
    for p in edge.points.iter() {
        if pts.last() != Some(p) {
            pts.push(*p);
        }
    }
    if pts.len() < 2 {
        return Err(Error::DegenerateEdge(edge.describe()));
    }

    let mut res: Vec<GridPoint> = vec![pts[0]];
    let mut last_dir: Option<OrthoDir> = None;
    for p in pts.iter().skip(1) {
        let prev = res[res.len() - 1];
        let dir = match prev.dir_to(*p) {
            Some(dir) => dir,
            None => return Err(Error::NotOrthogonal(edge.describe())),
        };
        match last_dir {
            Some(last) if last == dir => {
                res.pop();
            }
            Some(last) if last == dir.opposite() => {
                return Err(Error::NotOrthogonal(edge.describe()));
            }
            _ => {}
        }
        res.push(*p);
        last_dir = Some(dir);
    }
    Ok(res)
}

fn pieces_of(points: &[GridPoint]) -> Vec<OrthoSegment> {
    points
        .windows(2)
        .map(|w| OrthoSegment::new(w[0], w[1]))
        .collect()
}

impl Drawing {
    pub fn new() -> Self {
        Drawing::default()
    }

    pub fn add_vertex(&mut self, v: VertexSpec) {
        self.vertices.push(v);
    }

    pub fn add_edge(&mut self, e: EdgeSpec) {
        self.edges.push(e);
    }

    /// Validate the drawing and build its planarized representation.
    pub fn build(&self) -> Result<OrthoDrawing> {
        // Check the vertices.
        let mut index: HashMap<&str, usize> = HashMap::new();
        for (i, v) in self.vertices.iter().enumerate() {
            if index.insert(v.name.as_str(), i).is_some() {
                return Err(Error::DuplicateVertex(v.name.clone()));
            }
            if v.width <= 0 || v.height <= 0 {
                return Err(Error::InvalidSize(v.name.clone()));
            }
        }
        for (i, a) in self.vertices.iter().enumerate() {
            for b in self.vertices.iter().skip(i + 1) {
                let ba = (a.top_left(), a.bottom_right());
                let bb = (b.top_left(), b.bottom_right());
                if do_boxes_intersect(ba, bb) {
                    return Err(Error::OverlappingVertices(
                        a.name.clone(),
                        b.name.clone(),
                    ));
                }
            }
        }

        // Check the edges, one by one.
        let mut polylines: Vec<Vec<GridPoint>> = Vec::new();
        // Per edge: the two vertices and the sides that the ports are on.
        let mut endpoints: Vec<(usize, usize, OrthoDir, OrthoDir)> = Vec::new();
        for edge in self.edges.iter() {
            let from = *index
                .get(edge.from.as_str())
                .ok_or_else(|| Error::UnknownVertex(edge.from.clone()))?;
            let to = *index
                .get(edge.to.as_str())
                .ok_or_else(|| Error::UnknownVertex(edge.to.clone()))?;
            let pts = normalize_points(edge)?;
            let n = pts.len();

            // The line must leave through a side, moving away from the box,
            // and enter through a side, moving into the box.
            let leaves = self.vertices[from].side_of(pts[0]);
            let enters = self.vertices[to].side_of(pts[n - 1]);
            let first_dir = pts[0].dir_to(pts[1]);
            let last_dir = pts[n - 2].dir_to(pts[n - 1]);
            let (side_a, side_b) = match (leaves, enters) {
                (Some(side_a), Some(side_b))
                    if first_dir == Some(side_a)
                        && last_dir == Some(side_b.opposite()) =>
                {
                    (side_a, side_b)
                }
                _ => return Err(Error::PortNotOnBorder(edge.describe())),
            };

            let pieces = pieces_of(&pts);
            for (pi, piece) in pieces.iter().enumerate() {
                for (vi, v) in self.vertices.iter().enumerate() {
                    let vbox = (v.top_left(), v.bottom_right());
                    if !do_boxes_intersect(piece.bbox(), vbox) {
                        continue;
                    }
                    let at_start = pi == 0 && vi == from;
                    let at_end = pi + 1 == pieces.len() && vi == to;
                    if !at_start && !at_end {
                        return Err(Error::EdgeThroughVertex(
                            edge.describe(),
                            v.name.clone(),
                        ));
                    }
                }
            }
            polylines.push(pts);
            endpoints.push((from, to, side_a, side_b));
        }

        // Check the pairs of pieces and collect the crossings.
        let all_pieces: Vec<Vec<OrthoSegment>> =
            polylines.iter().map(|p| pieces_of(p)).collect();
        // Per edge and piece, the crossing points on that piece.
        let mut crossings: Vec<Vec<Vec<GridPoint>>> = all_pieces
            .iter()
            .map(|p| vec![Vec::new(); p.len()])
            .collect();
        for ea in 0..all_pieces.len() {
            for pa in 0..all_pieces[ea].len() {
                for eb in ea..all_pieces.len() {
                    let start = if eb == ea { pa + 1 } else { 0 };
                    for pb in start..all_pieces[eb].len() {
                        let a = &all_pieces[ea][pa];
                        let b = &all_pieces[eb][pb];
                        if !a.touches(b) {
                            continue;
                        }
                        if ea == eb && pb == pa + 1 {
                            continue;
                        }
                        match a.proper_crossing(b) {
                            Some(p) => {
                                crossings[ea][pa].push(p);
                                crossings[eb][pb].push(p);
                            }
                            None => {
                                return Err(Error::OverlappingEdges(
                                    self.edges[ea].describe(),
                                    self.edges[eb].describe(),
                                ));
                            }
                        }
                    }
                }
            }
        }

        let mut plan = PlanRep::new();
        let mut points: Vec<GridPoint> = Vec::new();

        // Create the cage nodes.
        for (i, v) in self.vertices.iter().enumerate() {
            let center = plan.add_node(NodeKind::Center, Some(i));
            points.push(GridPoint::new(v.x + v.width / 2, v.y + v.height / 2));
            let corner_pos = [
                (Corner::TopLeft, v.x, v.y),
                (Corner::TopRight, v.x + v.width, v.y),
                (Corner::BottomRight, v.x + v.width, v.y + v.height),
                (Corner::BottomLeft, v.x, v.y + v.height),
            ];
            let mut corners = [NodeHandle::default(); 4];
            for (c, x, y) in corner_pos.iter() {
                corners[c.index()] = plan.add_node(NodeKind::Corner(*c), Some(i));
                points.push(GridPoint::new(*x, *y));
            }
            plan.add_vertex(VertexInfo {
                name: v.name.clone(),
                width: v.width,
                height: v.height,
                center,
                corners,
            });
        }

        // Create the nodes of the edges: ports, bends and crossings.
        let mut crossing_nodes: HashMap<GridPoint, NodeHandle> = HashMap::new();
        let mut chains: Vec<Vec<NodeHandle>> = Vec::new();
        for (ei, pts) in polylines.iter().enumerate() {
            let (from, to, side_a, side_b) = endpoints[ei];
            let n = pts.len();
            let mut chain = Vec::new();
            for (pi, p) in pts.iter().enumerate() {
                let node = if pi == 0 {
                    plan.add_node(NodeKind::Port(side_a), Some(from))
                } else if pi + 1 == n {
                    plan.add_node(NodeKind::Port(side_b), Some(to))
                } else {
                    plan.add_node(NodeKind::Bend, None)
                };
                points.push(*p);
                chain.push(node);

                // Add the crossings of the piece that starts here.
                if pi + 1 < n {
                    let mut on_piece = crossings[ei][pi].clone();
                    on_piece.sort_by_key(|c| (c.x - p.x).abs() + (c.y - p.y).abs());
                    for c in on_piece {
                        let node = match crossing_nodes.get(&c) {
                            Some(node) => *node,
                            None => {
                                let node = plan.add_node(NodeKind::Crossing, None);
                                points.push(c);
                                crossing_nodes.insert(c, node);
                                node
                            }
                        };
                        chain.push(node);
                    }
                }
            }
            chains.push(chain);
        }

        let mut layout = GridLayout::new(points.len());
        for (i, p) in points.iter().enumerate() {
            layout.set(NodeHandle::new(i), *p);
        }

        // Create the border edges of the cages, clockwise.
        for i in 0..self.vertices.len() {
            let info = plan.vertex(i).clone();
            let sides = [
                (OrthoDir::North, Corner::TopLeft, Corner::TopRight),
                (OrthoDir::East, Corner::TopRight, Corner::BottomRight),
                (OrthoDir::South, Corner::BottomRight, Corner::BottomLeft),
                (OrthoDir::West, Corner::BottomLeft, Corner::TopLeft),
            ];
            for (side, c0, c1) in sides.iter() {
                let start = layout.point(info.corner(*c0));
                let mut ports = plan.ports_on(i, *side);
                ports.sort_by_key(|v| {
                    let p = layout.point(*v);
                    (p.x - start.x).abs() + (p.y - start.y).abs()
                });
                let mut prev = info.corner(*c0);
                for port in ports.into_iter().chain(std::iter::once(info.corner(*c1))) {
                    plan.add_edge(prev, port, EdgeKind::Border, None);
                    prev = port;
                }
            }
        }

        // Create the pieces of the edges.
        for (ei, chain) in chains.iter().enumerate() {
            let (from, to, _, _) = endpoints[ei];
            let mut pieces = Vec::new();
            for w in chain.windows(2) {
                pieces.push(plan.add_edge(w[0], w[1], self.edges[ei].kind, Some(ei)));
            }
            plan.add_original_edge(EdgeInfo {
                from,
                to,
                kind: self.edges[ei].kind,
                pieces,
            });
        }

        // Sort the rotations clockwise, by direction.
        let ortho = OrthoRep::from_layout(plan.graph(), &layout);
        let nodes: Vec<NodeHandle> = plan.graph().nodes().collect();
        for v in nodes {
            let mut rot: Vec<AdjEntry> = plan.graph().adj_entries(v);
            rot.sort_by_key(|adj| ortho.direction(*adj).rank());
            plan.set_rotation(v, &rot);
        }
        assert!(ortho.is_orientated(plan.graph()), "Invalid orthogonal rep");

        let not_center = |v: NodeHandle| !plan.is_center(v);
        if !plan.graph().is_connected_by(not_center) {
            return Err(Error::Disconnected);
        }

        #[cfg(feature = "log")]
        log::info!(
            "Planarized {} vertices and {} edges into {} nodes, {} crossings",
            self.vertices.len(),
            self.edges.len(),
            plan.graph().num_nodes(),
            crossing_nodes.len()
        );

        Ok(OrthoDrawing {
            plan,
            ortho,
            layout,
        })
    }
}

impl OrthoDrawing {
    /// \returns the drawing that \p layout describes for the vertices and
    /// edges of this representation.
    pub fn to_drawing(&self, layout: &GridLayout) -> Drawing {
        let mut drawing = Drawing::new();
        for (i, info) in self.plan.vertices().iter().enumerate() {
            let (tl, _) = self.plan.vertex_box(i, layout);
            drawing.add_vertex(VertexSpec::new(
                &info.name,
                tl.x,
                tl.y,
                info.width,
                info.height,
            ));
        }
        let g = self.plan.graph();
        for info in self.plan.original_edges().iter() {
            let mut points = Vec::new();
            if let Some(first) = info.pieces.first() {
                points.push(layout.point(g.source(*first)));
            }
            for e in info.pieces.iter() {
                points.push(layout.point(g.target(*e)));
            }
            drawing.add_edge(EdgeSpec {
                from: self.plan.vertex(info.from).name.clone(),
                to: self.plan.vertex(info.to).name.clone(),
                kind: info.kind,
                points,
            });
        }
        drawing
    }
}

#[cfg(test)]
fn two_boxes() -> Drawing {
    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("a", 0, 0, 40, 20));
    d.add_vertex(VertexSpec::new("b", 100, 60, 40, 20));
    d.add_edge(EdgeSpec::new(
        "a",
        "b",
        EdgeKind::Association,
        &[(40, 10), (70, 10), (70, 70), (100, 70)],
    ));
    d
}

#[test]
fn test_build_simple_drawing() {
    let od = two_boxes().build().unwrap();
    let g = od.plan.graph();
    // Two cages (center, four corners), two ports and two bends.
    assert_eq!(g.num_nodes(), 14);
    // Four border edges per box, plus one for each port, and three pieces.
    assert_eq!(g.num_edges(), 4 + 4 + 2 + 3);
    assert!(od.ortho.is_orientated(g));

    let info = od.plan.original_edge_info(0);
    assert_eq!(info.pieces.len(), 3);
    let first = info.pieces[0];
    assert_eq!(od.ortho.direction(first.src_adj()), OrthoDir::East);
    assert_eq!(od.ortho.direction(info.pieces[1].src_adj()), OrthoDir::South);
    assert_eq!(
        od.plan.kind_of_node(g.source(first)),
        NodeKind::Port(OrthoDir::East)
    );
    assert_eq!(od.to_drawing(&od.layout), two_boxes());
}

#[test]
fn test_build_crossing() {
    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("l", 0, 40, 20, 20));
    d.add_vertex(VertexSpec::new("r", 100, 40, 20, 20));
    d.add_vertex(VertexSpec::new("t", 50, 0, 20, 20));
    d.add_vertex(VertexSpec::new("b", 50, 80, 20, 20));
    d.add_edge(EdgeSpec::new("l", "r", EdgeKind::Association, &[(20, 50), (100, 50)]));
    d.add_edge(EdgeSpec::new("t", "b", EdgeKind::Generalization, &[(60, 20), (60, 80)]));
    let od = d.build().unwrap();
    let g = od.plan.graph();
    let crossings: Vec<NodeHandle> = g
        .nodes()
        .filter(|v| od.plan.kind_of_node(*v) == NodeKind::Crossing)
        .collect();
    assert_eq!(crossings.len(), 1);
    assert_eq!(g.degree(crossings[0]), 4);
    assert_eq!(od.layout.point(crossings[0]), GridPoint::new(60, 50));
    assert_eq!(od.plan.original_edge_info(1).pieces.len(), 2);
    let vertical = od.plan.original_edge_info(1).pieces[0];
    assert_eq!(od.plan.kind_of_edge(vertical), EdgeKind::Generalization);
    assert_eq!(od.plan.original_edge(vertical), Some(1));

    // The crossing survives a round trip through the drawing.
    let back = od.to_drawing(&od.layout);
    let again = back.build().unwrap();
    assert_eq!(again.to_drawing(&again.layout).edges[0].points.len(), 3);
}

#[test]
fn test_build_errors() {
    let mut d = two_boxes();
    d.add_vertex(VertexSpec::new("a", 300, 300, 10, 10));
    assert!(matches!(d.build(), Err(Error::DuplicateVertex(_))));

    let mut d = two_boxes();
    d.add_vertex(VertexSpec::new("c", 30, 10, 10, 10));
    assert!(matches!(d.build(), Err(Error::OverlappingVertices(_, _))));

    let mut d = two_boxes();
    d.edges[0].points[1] = GridPoint::new(70, 11);
    assert!(matches!(d.build(), Err(Error::NotOrthogonal(_))));

    let mut d = two_boxes();
    d.edges[0].points[0] = GridPoint::new(40, 0);
    d.edges[0].points[1] = GridPoint::new(70, 0);
    assert!(matches!(d.build(), Err(Error::PortNotOnBorder(_))));

    let mut d = two_boxes();
    d.edges[0].to = "z".to_string();
    assert!(matches!(d.build(), Err(Error::UnknownVertex(_))));

    let mut d = two_boxes();
    d.add_vertex(VertexSpec::new("c", 60, 30, 20, 10));
    assert!(matches!(d.build(), Err(Error::EdgeThroughVertex(_, _))));

    let mut d = two_boxes();
    d.add_edge(EdgeSpec::new(
        "a",
        "b",
        EdgeKind::Association,
        &[(20, 20), (20, 70), (100, 70)],
    ));
    assert!(matches!(d.build(), Err(Error::OverlappingEdges(_, _))));

    let mut d = two_boxes();
    d.add_vertex(VertexSpec::new("lonely", 300, 300, 10, 10));
    assert!(matches!(d.build(), Err(Error::Disconnected)));
}

#[test]
fn test_port_spacing() {
    use super::distances::{MinimumEdgeDistances, RoutingChannel};

    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("a", 0, 0, 10, 10));
    d.add_vertex(VertexSpec::new("b", 30, 0, 10, 10));
    let assoc = EdgeKind::Association;
    d.add_edge(EdgeSpec::new("a", "b", assoc, &[(10, 2), (30, 2)]));
    d.add_edge(EdgeSpec::new("a", "b", assoc, &[(10, 8), (30, 8)]));
    let od = d.build().unwrap();

    // Two ports need two corner gaps and one port gap.
    assert!(od.plan.check_port_spacing(&RoutingChannel::new(3)).is_ok());
    assert!(matches!(
        od.plan.check_port_spacing(&RoutingChannel::new(5)),
        Err(Error::VertexTooSmall(_, OrthoDir::East))
    ));

    let mut dist = MinimumEdgeDistances::new(5);
    dist.set_epsilon(0, OrthoDir::East, 2);
    dist.set_epsilon(1, OrthoDir::West, 2);
    assert!(od.plan.check_port_spacing(&dist).is_ok());
}
