//! The constraint graph of one compaction pass. Every node is a segment: a
//! maximal chain of plan edges perpendicular to the compaction direction,
//! which moves as one piece. Every arc (s, t) asks for
//! pos\[t\] - pos\[s\] >= length. The arcs are drawn where the objects that
//! they separate are, so the graph inherits a planar embedding from the
//! current drawing.

use super::visibility::{visible_pairs, SweepSegment};
use crate::adt::{AdjEntry, CombinatorialEmbedding, EdgeHandle, Graph, NodeHandle};
use crate::core::base::Axis;
use crate::ortho::distances::EdgeDistances;
use crate::ortho::grid::GridLayout;
use crate::ortho::ortho_rep::OrthoRep;
use crate::ortho::plan_rep::{Corner, EdgeKind, NodeKind, PlanRep};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

/// The kinds of arcs that the passes generate. Median arcs, which pull a
/// vertex towards the middle of its neighbors, and reducible arcs are not
/// generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcKind {
    /// Derived from an edge piece of the drawing.
    Basic,
    /// Keeps the extent of a vertex.
    VertexSize,
    /// Keeps two segments that see each other apart.
    Visibility,
    /// A zig-zag piece that may shrink to zero and then stays there.
    FixToZero,
}

impl fmt::Display for ArcKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ArcKind::Basic => "basic",
            ArcKind::VertexSize => "vertex-size",
            ArcKind::Visibility => "visibility",
            ArcKind::FixToZero => "fix-to-zero",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone)]
struct ArcInfo {
    length: i64,
    cost: i64,
    kind: ArcKind,
    vertical: bool,
    on_border: bool,
    fix_on_border: bool,
    alignment: bool,
    /// Doubled coordinate, along the segments, of the line where the arc is
    /// drawn.
    key: i64,
    plan_edge: Option<EdgeHandle>,
}

#[derive(Debug, Clone)]
struct NodeInfo {
    /// The plan nodes on the segment, or the center node of an extra node.
    nodes: Vec<NodeHandle>,
    /// The extent of the segment along its own direction.
    range: (i64, i64),
    /// Extra nodes follow another node at a fixed offset.
    extra: Option<(NodeHandle, i64)>,
}

#[derive(Debug, Clone)]
pub struct ConstraintGraph {
    graph: Graph,
    axis: Axis,
    sep: i64,
    nodes: Vec<NodeInfo>,
    arcs: Vec<ArcInfo>,
    /// Maps plan nodes to their constraint nodes.
    path_node: Vec<Option<NodeHandle>>,
    /// The coordinate of each plan node along the segments.
    perp: Vec<i64>,
}

impl ConstraintGraph {
    /// Create an empty constraint graph for compacting along \p axis.
    pub fn empty(axis: Axis, separation: i64) -> Self {
        ConstraintGraph {
            graph: Graph::new(),
            axis,
            sep: separation,
            nodes: Vec::new(),
            arcs: Vec::new(),
            path_node: Vec::new(),
            perp: Vec::new(),
        }
    }

    /// Build the segments and the basic arcs of the drawing in \p plan,
    /// \p ortho and \p layout. The vertex centers become extra nodes that
    /// follow the segment of the left (or top) side of their vertex.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ortho: &OrthoRep,
        plan: &PlanRep,
        layout: &GridLayout,
        axis: Axis,
        separation: i64,
        cost_gen: i64,
        cost_assoc: i64,
        align: bool,
    ) -> Self {
        assert!(ortho.is_orientated(plan.graph()), "Invalid directions");
        let g = plan.graph();
        let mut cg = ConstraintGraph::empty(axis, separation);
        cg.path_node = vec![None; g.node_capacity()];
        cg.perp = vec![0; g.node_capacity()];
        for v in g.nodes() {
            let p = layout.point(v);
            cg.perp[v.get_index()] = axis.perp(p.x, p.y);
        }

        cg.build_segments(ortho, plan, layout);
        cg.build_basic_arcs(ortho, plan, cost_gen, cost_assoc, align);

        // Centers follow the segment of the top-left corner.
        for info in plan.vertices().iter() {
            let rep = cg.path_node_of(info.corner(Corner::TopLeft));
            let ofs = match axis {
                Axis::X => info.width / 2,
                Axis::Y => info.height / 2,
            };
            let v = cg.new_extra_node(rep, ofs);
            cg.nodes[v.get_index()].nodes.push(info.center);
            cg.path_node[info.center.get_index()] = Some(v);
        }

        #[cfg(feature = "log")]
        log::debug!(
            "Constraint graph ({}): {} segments, {} arcs",
            axis,
            cg.graph.num_nodes() - plan.vertices().len(),
            cg.graph.num_edges()
        );
        cg
    }

    /// Group the plan nodes into segments.
    fn build_segments(&mut self, ortho: &OrthoRep, plan: &PlanRep, layout: &GridLayout) {
        let g = plan.graph();
        for v in g.nodes() {
            if plan.is_center(v) || self.path_node[v.get_index()].is_some() {
                continue;
            }
            let seg = self.new_segment((0, 0));
            let mut members = Vec::new();
            let mut worklist = vec![v];
            self.path_node[v.get_index()] = Some(seg);
            while let Some(u) = worklist.pop() {
                members.push(u);
                for adj in g.adj_entries(u) {
                    if !self.axis.is_segment_dir(ortho.direction(adj)) {
                        continue;
                    }
                    let w = g.twin_node(adj);
                    if self.path_node[w.get_index()].is_none() {
                        self.path_node[w.get_index()] = Some(seg);
                        worklist.push(w);
                    }
                }
            }

            let pos = layout.coord(self.axis, v);
            let mut lo = i64::MAX;
            let mut hi = i64::MIN;
            for u in members.iter() {
                debug_assert_eq!(layout.coord(self.axis, *u), pos, "Bent segment");
                lo = lo.min(self.perp[u.get_index()]);
                hi = hi.max(self.perp[u.get_index()]);
            }
            let info = &mut self.nodes[seg.get_index()];
            info.nodes = members;
            info.range = (lo, hi);
        }
    }

    fn build_basic_arcs(
        &mut self,
        ortho: &OrthoRep,
        plan: &PlanRep,
        cost_gen: i64,
        cost_assoc: i64,
        align: bool,
    ) {
        let g = plan.graph();
        for e in g.edges() {
            let dir = ortho.direction(e.src_adj());
            if self.axis.is_segment_dir(dir) {
                continue;
            }
            let (src, tgt) = (g.source(e), g.target(e));
            let (s, t) = if dir == self.axis.arc_dir() {
                (self.path_node_of(src), self.path_node_of(tgt))
            } else {
                (self.path_node_of(tgt), self.path_node_of(src))
            };
            let key = 2 * self.perp[src.get_index()];

            let arc = match plan.kind_of_edge(e) {
                EdgeKind::Border => {
                    let src_corner = matches!(plan.kind_of_node(src), NodeKind::Corner(_));
                    let tgt_corner = matches!(plan.kind_of_node(tgt), NodeKind::Corner(_));
                    let len = if src_corner && tgt_corner { 0 } else { self.sep };
                    let arc = self.new_arc(s, t, len, 0, ArcKind::Basic, key);
                    self.set_on_border(arc, src_corner || tgt_corner);
                    arc
                }
                EdgeKind::Association => {
                    if self.is_zig_zag(ortho, plan, e) {
                        self.new_arc(s, t, 0, cost_assoc, ArcKind::FixToZero, key)
                    } else {
                        self.new_arc(s, t, self.sep, cost_assoc, ArcKind::Basic, key)
                    }
                }
                EdgeKind::Generalization => {
                    let arc = if self.is_zig_zag(ortho, plan, e) {
                        self.new_arc(s, t, 0, cost_gen, ArcKind::FixToZero, key)
                    } else {
                        self.new_arc(s, t, self.sep, cost_gen, ArcKind::Basic, key)
                    };
                    self.set_vertical_arc(arc, true);
                    self.set_alignment_arc(arc, align);
                    arc
                }
            };
            self.arcs[arc.get_index()].plan_edge = Some(e);
        }
    }

    /// \returns True if \p e connects two bends whose other pieces leave in
    /// opposite directions. Such a piece can shrink to a point.
    fn is_zig_zag(&self, ortho: &OrthoRep, plan: &PlanRep, e: EdgeHandle) -> bool {
        let g = plan.graph();
        let (src, tgt) = (g.source(e), g.target(e));
        if plan.kind_of_node(src) != NodeKind::Bend || plan.kind_of_node(tgt) != NodeKind::Bend {
            return false;
        }
        let other_src = g.cyclic_succ(e.src_adj());
        let other_tgt = g.cyclic_succ(e.tgt_adj());
        ortho.direction(other_src) == ortho.direction(other_tgt).opposite()
    }

    /// Add a node for a segment that spans \p range.
    pub fn new_segment(&mut self, range: (i64, i64)) -> NodeHandle {
        let v = self.graph.new_node();
        self.nodes.push(NodeInfo {
            nodes: Vec::new(),
            range,
            extra: None,
        });
        v
    }

    /// Add a node that is placed at pos\[rep\] + ofs after the positions of
    /// the segments are known.
    pub fn new_extra_node(&mut self, rep: NodeHandle, ofs: i64) -> NodeHandle {
        assert!(self.extra_rep_opt(rep).is_none(), "Extra nodes can't be chained");
        let v = self.graph.new_node();
        self.nodes.push(NodeInfo {
            nodes: Vec::new(),
            range: (0, 0),
            extra: Some((rep, ofs)),
        });
        v
    }

    /// Add the arc \p s -> \p t. The arc is drawn on the line \p key, in
    /// doubled coordinates along the segments.
    pub fn new_arc(
        &mut self,
        s: NodeHandle,
        t: NodeHandle,
        length: i64,
        cost: i64,
        kind: ArcKind,
        key: i64,
    ) -> EdgeHandle {
        assert!(!self.extra_node(s) && !self.extra_node(t));
        assert!(cost >= 0, "Negative costs are not supported");
        let e = self.graph.new_edge(s, t);
        self.arcs.push(ArcInfo {
            length,
            cost,
            kind,
            vertical: false,
            on_border: false,
            fix_on_border: false,
            alignment: false,
            key,
            plan_edge: None,
        });
        e
    }

    /// Mark \p e as an arc of a vertex cage. Arcs that touch a corner are
    /// fixed on the border.
    pub fn set_on_border(&mut self, e: EdgeHandle, fix: bool) {
        let info = &mut self.arcs[e.get_index()];
        info.on_border = true;
        info.fix_on_border = fix;
    }

    pub fn set_vertical_arc(&mut self, e: EdgeHandle, val: bool) {
        self.arcs[e.get_index()].vertical = val;
    }

    pub fn set_alignment_arc(&mut self, e: EdgeHandle, val: bool) {
        self.arcs[e.get_index()].alignment = val;
    }

    /// Add one arc per vertex that keeps the vertex at its width (or
    /// height), and set the lengths of the border arcs to the corner and
    /// port distances of \p distances.
    pub fn insert_vertex_size_arcs(&mut self, plan: &PlanRep, distances: &dyn EdgeDistances) {
        let g = plan.graph();
        for e in self.graph.edges().collect::<Vec<EdgeHandle>>() {
            let info = &self.arcs[e.get_index()];
            if !info.on_border {
                continue;
            }
            let pe = match info.plan_edge {
                Some(pe) => pe,
                None => continue,
            };
            let (src, tgt) = (g.source(pe), g.target(pe));
            let vertex = match plan.vertex_of(src) {
                Some(vertex) => vertex,
                None => continue,
            };
            let len = match (plan.kind_of_node(src), plan.kind_of_node(tgt)) {
                (NodeKind::Corner(_), NodeKind::Corner(_)) => 0,
                (NodeKind::Port(side), NodeKind::Port(_)) => distances.delta(vertex, side),
                (NodeKind::Port(side), _) | (_, NodeKind::Port(side)) => {
                    distances.epsilon(vertex, side)
                }
                _ => continue,
            };
            self.arcs[e.get_index()].length = len;
        }

        for info in plan.vertices().iter() {
            let tl = info.corner(Corner::TopLeft);
            let (far, side, len) = match self.axis {
                Axis::X => (
                    info.corner(Corner::TopRight),
                    info.corner(Corner::BottomLeft),
                    info.width,
                ),
                Axis::Y => (
                    info.corner(Corner::BottomLeft),
                    info.corner(Corner::TopRight),
                    info.height,
                ),
            };
            let key = self.perp[tl.get_index()] + self.perp[side.get_index()];
            let s = self.path_node_of(tl);
            let t = self.path_node_of(far);
            self.new_arc(s, t, len, 0, ArcKind::VertexSize, key);
        }
    }

    /// Add an arc between every two segments that see each other in
    /// \p layout, unless an arc already connects them.
    pub fn insert_visibility_arcs(&mut self, layout: &GridLayout, distances: &dyn EdgeDistances) {
        let mut joined: HashSet<(NodeHandle, NodeHandle)> = HashSet::new();
        for e in self.graph.edges() {
            let (s, t) = (self.graph.source(e), self.graph.target(e));
            joined.insert((s, t));
            joined.insert((t, s));
        }

        let mut segments = Vec::new();
        for v in self.graph.nodes() {
            if self.extra_node(v) {
                continue;
            }
            let info = &self.nodes[v.get_index()];
            let first = match info.nodes.first() {
                Some(first) => *first,
                None => continue,
            };
            let mut range = (i64::MAX, i64::MIN);
            for u in info.nodes.iter() {
                let p = layout.point(*u);
                let val = self.axis.perp(p.x, p.y);
                range = (range.0.min(val), range.1.max(val));
            }
            segments.push(SweepSegment {
                id: v,
                pos: layout.coord(self.axis, first),
                range,
            });
        }

        #[cfg(feature = "log")]
        let before = self.graph.num_edges();
        for (s, t, key) in visible_pairs(&segments) {
            if joined.contains(&(s, t)) {
                continue;
            }
            self.new_arc(s, t, distances.separation(), 0, ArcKind::Visibility, key);
            joined.insert((s, t));
            joined.insert((t, s));
        }
        #[cfg(feature = "log")]
        log::debug!(
            "Inserted {} visibility arcs ({})",
            self.graph.num_edges() - before,
            self.axis
        );
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn separation(&self) -> i64 {
        self.sep
    }

    pub fn length(&self, e: EdgeHandle) -> i64 {
        self.arcs[e.get_index()].length
    }

    pub fn cost(&self, e: EdgeHandle) -> i64 {
        self.arcs[e.get_index()].cost
    }

    pub fn type_of(&self, e: EdgeHandle) -> ArcKind {
        self.arcs[e.get_index()].kind
    }

    /// \returns True for arcs that come from generalization edges.
    pub fn vertical_arc(&self, e: EdgeHandle) -> bool {
        self.arcs[e.get_index()].vertical
    }

    pub fn on_border(&self, e: EdgeHandle) -> bool {
        self.arcs[e.get_index()].on_border
    }

    pub fn fix_on_border(&self, e: EdgeHandle) -> bool {
        self.arcs[e.get_index()].fix_on_border
    }

    pub fn alignment_arc(&self, e: EdgeHandle) -> bool {
        self.arcs[e.get_index()].alignment
    }

    pub fn key(&self, e: EdgeHandle) -> i64 {
        self.arcs[e.get_index()].key
    }

    pub fn plan_edge(&self, e: EdgeHandle) -> Option<EdgeHandle> {
        self.arcs[e.get_index()].plan_edge
    }

    pub fn range(&self, v: NodeHandle) -> (i64, i64) {
        self.nodes[v.get_index()].range
    }

    pub fn extra_node(&self, v: NodeHandle) -> bool {
        self.nodes[v.get_index()].extra.is_some()
    }

    fn extra_rep_opt(&self, v: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(v.get_index()).and_then(|n| n.extra).map(|x| x.0)
    }

    /// \returns the node that the extra node \p v follows.
    pub fn extra_rep(&self, v: NodeHandle) -> NodeHandle {
        match self.nodes[v.get_index()].extra {
            Some((rep, _)) => rep,
            None => panic!("{} is not an extra node", v),
        }
    }

    pub fn extra_ofs(&self, v: NodeHandle) -> i64 {
        match self.nodes[v.get_index()].extra {
            Some((_, ofs)) => ofs,
            None => panic!("{} is not an extra node", v),
        }
    }

    /// \returns the plan nodes that move with \p v.
    pub fn nodes_in(&self, v: NodeHandle) -> &[NodeHandle] {
        &self.nodes[v.get_index()].nodes
    }

    pub fn path_node_of(&self, n: NodeHandle) -> NodeHandle {
        match self.path_node.get(n.get_index()).copied().flatten() {
            Some(v) => v,
            None => panic!("Plan node {} is not in the constraint graph", n),
        }
    }

    /// \returns the sum of cost * length over all arcs, where the lengths
    /// are taken from the positions \p pos.
    pub fn compute_total_costs(&self, pos: &[i64]) -> i64 {
        self.graph
            .edges()
            .map(|e| {
                let s = self.graph.source(e).get_index();
                let t = self.graph.target(e).get_index();
                self.cost(e) * (pos[t] - pos[s])
            })
            .sum()
    }

    /// \returns the position of every node in \p layout.
    pub fn positions(&self, layout: &GridLayout) -> Vec<i64> {
        let mut pos = vec![0; self.graph.node_capacity()];
        for v in self.graph.nodes() {
            if let Some(first) = self.nodes_in(v).first() {
                pos[v.get_index()] = layout.coord(self.axis, *first);
            }
        }
        pos
    }

    /// Move the plan nodes in \p layout to the positions \p pos.
    pub fn write_back(&self, pos: &[i64], layout: &mut GridLayout) {
        for v in self.graph.nodes() {
            for n in self.nodes_in(v).iter() {
                layout.set_coord(self.axis, *n, pos[v.get_index()]);
            }
        }
    }

    /// \returns the embedding of the graph for the positions \p pos. The
    /// arcs leave their source on the side of the compaction direction and
    /// are ordered by the line they are drawn on, which gives a planar
    /// rotation at every segment.
    pub fn embed(&self, pos: &[i64]) -> CombinatorialEmbedding {
        let mut graph = self.graph.clone();
        for v in self.graph.nodes() {
            let mut out: Vec<AdjEntry> = Vec::new();
            let mut inc: Vec<AdjEntry> = Vec::new();
            for adj in self.graph.adj_entries(v) {
                if adj.is_source() {
                    out.push(adj);
                } else {
                    inc.push(adj);
                }
            }
            out.sort_by(|a, b| self.cmp_along_side(pos, v, *a, *b));
            inc.sort_by(|a, b| self.cmp_along_side(pos, v, *a, *b));
            // Clockwise in screen coordinates: the East side top to bottom
            // then the West side bottom to top, or the North side left to
            // right then the South side right to left.
            let order: Vec<AdjEntry> = match self.axis {
                Axis::X => out.iter().chain(inc.iter().rev()).copied().collect(),
                Axis::Y => inc.iter().chain(out.iter().rev()).copied().collect(),
            };
            if !order.is_empty() {
                graph.set_rotation(v, &order);
            }
        }
        let mut emb = CombinatorialEmbedding::new(graph);
        emb.compute_faces();
        emb
    }

    /// Order two arcs that leave the same side of \p v along the segment.
    /// Arcs on the same line are ordered by the nearest of their other
    /// endpoints: the longer arc passes that segment on the side it does
    /// not extend to. A zig-zag piece of length zero and a sightline along
    /// the same line meet this way.
    fn cmp_along_side(
        &self,
        pos: &[i64],
        v: NodeHandle,
        a: AdjEntry,
        b: AdjEntry,
    ) -> Ordering {
        let key = self.key(a.edge());
        if key != self.key(b.edge()) {
            return key.cmp(&self.key(b.edge()));
        }
        let here = pos[v.get_index()];
        let (x, y) = (self.graph.twin_node(a), self.graph.twin_node(b));
        let dist = |w: NodeHandle| (pos[w.get_index()] - here).abs();
        let mid = |w: NodeHandle| {
            let (lo, hi) = self.range(w);
            lo + hi
        };
        match dist(x).cmp(&dist(y)) {
            Ordering::Less if mid(x) < key => Ordering::Less,
            Ordering::Less => Ordering::Greater,
            Ordering::Greater if mid(y) < key => Ordering::Greater,
            Ordering::Greater => Ordering::Less,
            Ordering::Equal => mid(x)
                .cmp(&mid(y))
                .then(a.edge().get_index().cmp(&b.edge().get_index())),
        }
    }
}

#[cfg(test)]
use crate::ortho::builder::{Drawing, EdgeSpec, VertexSpec};
#[cfg(test)]
use crate::ortho::distances::RoutingChannel;

#[cfg(test)]
fn two_boxes() -> Drawing {
    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("a", 0, 0, 20, 10));
    d.add_vertex(VertexSpec::new("b", 40, 0, 20, 10));
    d.add_edge(EdgeSpec::new(
        "a",
        "b",
        EdgeKind::Association,
        &[(20, 5), (40, 5)],
    ));
    d
}

#[test]
fn test_segments_and_basic_arcs() {
    let od = two_boxes().build().unwrap();
    let rc = RoutingChannel::new(10);
    let mut cg = ConstraintGraph::new(
        &od.ortho,
        &od.plan,
        &od.layout,
        Axis::X,
        10,
        2,
        1,
        false,
    );
    // Four sides and two centers.
    assert_eq!(cg.graph().num_nodes(), 6);
    assert_eq!(cg.graph().num_edges(), 5);

    let a = od.plan.vertex(0);
    let b = od.plan.vertex(1);
    let a_left = cg.path_node_of(a.corner(Corner::TopLeft));
    assert_eq!(a_left, cg.path_node_of(a.corner(Corner::BottomLeft)));
    assert_eq!(cg.range(a_left), (0, 10));
    let port_a = od.plan.ports_on(0, crate::core::base::OrthoDir::East)[0];
    assert_eq!(
        cg.path_node_of(port_a),
        cg.path_node_of(a.corner(Corner::TopRight))
    );

    let center = cg.path_node_of(b.center);
    assert!(cg.extra_node(center));
    assert_eq!(cg.extra_rep(center), cg.path_node_of(b.corner(Corner::TopLeft)));
    assert_eq!(cg.extra_ofs(center), 10);
    assert_eq!(cg.nodes_in(center), &[b.center]);

    let mut assoc = 0;
    for e in cg.graph().edges() {
        if cg.on_border(e) {
            assert!(cg.fix_on_border(e));
            assert_eq!(cg.length(e), 0);
            assert_eq!(cg.cost(e), 0);
        } else {
            assoc += 1;
            assert_eq!(cg.length(e), 10);
            assert_eq!(cg.cost(e), 1);
            assert_eq!(cg.key(e), 10);
        }
    }
    assert_eq!(assoc, 1);

    cg.insert_vertex_size_arcs(&od.plan, &rc);
    assert_eq!(cg.graph().num_edges(), 7);
    let sizes: Vec<i64> = cg
        .graph()
        .edges()
        .filter(|e| cg.type_of(*e) == ArcKind::VertexSize)
        .map(|e| cg.length(e))
        .collect();
    assert_eq!(sizes, vec![20, 20]);

    // Every pair that sees each other is already connected.
    cg.insert_visibility_arcs(&od.layout, &rc);
    assert_eq!(cg.graph().num_edges(), 7);

    // Two faces inside each box plus the outer face.
    let emb = cg.embed(&cg.positions(&od.layout));
    assert_eq!(emb.num_faces(), 5);
    emb.verify();

    let pos = cg.positions(&od.layout);
    assert_eq!(pos[a_left.get_index()], 0);
    assert_eq!(cg.compute_total_costs(&pos), 20);
}

#[test]
fn test_visibility_arcs() {
    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("a", 0, 0, 10, 10));
    d.add_vertex(VertexSpec::new("b", 30, 0, 10, 10));
    d.add_vertex(VertexSpec::new("c", 0, 30, 50, 10));
    d.add_edge(EdgeSpec::new(
        "a",
        "b",
        EdgeKind::Association,
        &[(10, 5), (30, 5)],
    ));
    d.add_edge(EdgeSpec::new(
        "a",
        "c",
        EdgeKind::Generalization,
        &[(5, 10), (5, 30)],
    ));
    let od = d.build().unwrap();
    let rc = RoutingChannel::new(10);
    let mut cg = ConstraintGraph::new(
        &od.ortho,
        &od.plan,
        &od.layout,
        Axis::Y,
        10,
        2,
        1,
        true,
    );
    assert_eq!(cg.graph().num_edges(), 9);
    cg.insert_vertex_size_arcs(&od.plan, &rc);
    assert_eq!(cg.graph().num_edges(), 12);
    cg.insert_visibility_arcs(&od.layout, &rc);
    assert_eq!(cg.graph().num_edges(), 14);

    // The horizontal edge and the bottom of b both see the top of c.
    let c_top = cg.path_node_of(od.plan.vertex(2).corner(Corner::TopLeft));
    let b_bottom = cg.path_node_of(od.plan.vertex(1).corner(Corner::BottomLeft));
    let port = od.plan.ports_on(0, crate::core::base::OrthoDir::East)[0];
    let edge_seg = cg.path_node_of(port);
    let mut seen = Vec::new();
    for e in cg.graph().edges() {
        if cg.type_of(e) != ArcKind::Visibility {
            continue;
        }
        assert_eq!(cg.graph().target(e), c_top);
        assert_eq!(cg.length(e), 10);
        seen.push((cg.graph().source(e), cg.key(e)));
    }
    seen.sort();
    let mut expected = vec![(edge_seg, 40), (b_bottom, 70)];
    expected.sort();
    assert_eq!(seen, expected);

    // The generalization piece is a vertical alignment arc.
    let gen: Vec<EdgeHandle> = cg
        .graph()
        .edges()
        .filter(|e| cg.vertical_arc(*e))
        .collect();
    assert_eq!(gen.len(), 1);
    assert!(cg.alignment_arc(gen[0]));
    assert_eq!(cg.cost(gen[0]), 2);

    let emb = cg.embed(&cg.positions(&od.layout));
    emb.verify();
    // Euler: faces = arcs - segments + 2.
    let segments = cg.graph().num_nodes() - 3;
    assert_eq!(emb.num_faces(), 14 - segments + 2);
}

#[test]
fn test_zig_zag_pieces() {
    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("a", 0, 0, 10, 10));
    d.add_vertex(VertexSpec::new("b", 40, 40, 10, 10));
    d.add_edge(EdgeSpec::new(
        "a",
        "b",
        EdgeKind::Association,
        &[(5, 10), (5, 20), (45, 20), (45, 40)],
    ));
    let od = d.build().unwrap();
    let cg = ConstraintGraph::new(
        &od.ortho,
        &od.plan,
        &od.layout,
        Axis::X,
        10,
        2,
        1,
        false,
    );
    let zig: Vec<EdgeHandle> = cg
        .graph()
        .edges()
        .filter(|e| cg.type_of(*e) == ArcKind::FixToZero)
        .collect();
    assert_eq!(zig.len(), 1);
    assert_eq!(cg.length(zig[0]), 0);
    assert_eq!(cg.cost(zig[0]), 1);
    assert_eq!(cg.key(zig[0]), 40);
}

#[test]
fn test_sightline_past_collapsed_zig_zag() {
    use crate::core::geometry::GridPoint;

    // The zig-zag of a -> b runs along y = 30 and the sightline from its
    // upper half to the top of c runs along the same line.
    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("a", 0, 0, 20, 20));
    d.add_vertex(VertexSpec::new("b", 15, 50, 20, 20));
    d.add_vertex(VertexSpec::new("c", 60, 30, 20, 40));
    d.add_edge(EdgeSpec::new(
        "a",
        "b",
        EdgeKind::Association,
        &[(10, 20), (10, 30), (25, 30), (25, 50)],
    ));
    d.add_edge(EdgeSpec::new(
        "a",
        "c",
        EdgeKind::Association,
        &[(20, 10), (70, 10), (70, 30)],
    ));
    let od = d.build().unwrap();

    // Shrink the zig-zag to a point by moving b under a.
    let mut layout = od.layout.clone();
    let g = od.plan.graph();
    let moved: Vec<NodeHandle> = g
        .nodes()
        .filter(|v| {
            od.plan.vertex_of(*v) == Some(1) || layout.point(*v) == GridPoint::new(25, 30)
        })
        .collect();
    for v in moved {
        let p = layout.point(v);
        layout.set(v, GridPoint::new(p.x - 15, p.y));
    }

    let rc = RoutingChannel::new(5);
    let mut cg = ConstraintGraph::new(
        &od.ortho,
        &od.plan,
        &layout,
        Axis::X,
        5,
        2,
        1,
        false,
    );
    cg.insert_vertex_size_arcs(&od.plan, &rc);
    cg.insert_visibility_arcs(&layout, &rc);

    let port = od.plan.ports_on(0, crate::core::base::OrthoDir::South)[0];
    let upper = cg.path_node_of(port);
    let c_left = cg.path_node_of(od.plan.vertex(2).corner(Corner::TopLeft));
    let mut keys = Vec::new();
    for e in cg.graph().edges() {
        if cg.graph().source(e) != upper {
            continue;
        }
        if cg.type_of(e) == ArcKind::FixToZero {
            keys.push(("zig", cg.key(e)));
        }
        if cg.graph().target(e) == c_left {
            assert_eq!(cg.type_of(e), ArcKind::Visibility);
            keys.push(("sight", cg.key(e)));
        }
    }
    keys.sort();
    assert_eq!(keys, vec![("sight", 60), ("zig", 60)]);

    // Euler: faces = arcs - segments + 2.
    let emb = cg.embed(&cg.positions(&layout));
    emb.verify();
    let segments = cg.graph().num_nodes() - 3;
    assert_eq!(emb.num_faces(), cg.graph().num_edges() - segments + 2);
}
