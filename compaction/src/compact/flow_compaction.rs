//! Compaction by minimum cost flow. The arcs of a constraint graph are
//! dual to the arcs of its dual graph, and a circulation in the dual graph
//! assigns lengths to the arcs that can be realized by coordinates. So the
//! cheapest circulation that respects the lower bounds gives the cheapest
//! coordinates for one direction. The driver runs one pass per axis and
//! repeats the passes while the drawing gets cheaper.

use super::constraint_graph::{ArcKind, ConstraintGraph};
use super::trace::RoundObserver;
use super::verifier;
use crate::adt::{FaceHandle, NodeHandle};
use crate::core::base::{Axis, OrthoDir};
use crate::flow::{FlowNetwork, MinCostFlow, SuccessiveShortestPath};
use crate::ortho::distances::{EdgeDistances, MinimumEdgeDistances};
use crate::ortho::grid::GridLayout;
use crate::ortho::ortho_rep::OrthoRep;
use crate::ortho::plan_rep::PlanRep;

/// The knobs of the compaction driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompactionOptions {
    /// The maximum number of improvement rounds; zero means no limit.
    pub max_steps: usize,
    /// The rounds before this one only compact generalization edges.
    pub num_gen_steps: usize,
    /// The number of rounds in which the separation is scaled down.
    pub scaling_steps: usize,
    /// Freeze the generalization arcs once the general rounds start.
    pub align: bool,
    pub cost_gen: i64,
    pub cost_assoc: i64,
    /// Keep the zig-zag pieces that reached zero length at zero.
    pub fix_zero_length: bool,
    /// Keep the vertices at their exact size.
    pub fix_vertex_size: bool,
}

impl Default for CompactionOptions {
    fn default() -> Self {
        CompactionOptions {
            max_steps: 0,
            num_gen_steps: 3,
            scaling_steps: 0,
            align: false,
            cost_gen: 2,
            cost_assoc: 1,
            fix_zero_length: true,
            fix_vertex_size: true,
        }
    }
}

impl CompactionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_steps(mut self, val: usize) -> Self {
        self.max_steps = val;
        self
    }

    pub fn num_gen_steps(mut self, val: usize) -> Self {
        self.num_gen_steps = val;
        self
    }

    pub fn scaling_steps(mut self, val: usize) -> Self {
        self.scaling_steps = val;
        self
    }

    pub fn align(mut self, val: bool) -> Self {
        self.align = val;
        self
    }

    pub fn cost_gen(mut self, val: i64) -> Self {
        assert!(val >= 0, "Costs must be non-negative");
        self.cost_gen = val;
        self
    }

    pub fn cost_assoc(mut self, val: i64) -> Self {
        assert!(val >= 0, "Costs must be non-negative");
        self.cost_assoc = val;
        self
    }

    pub fn fix_zero_length(mut self, val: bool) -> Self {
        self.fix_zero_length = val;
        self
    }

    pub fn fix_vertex_size(mut self, val: bool) -> Self {
        self.fix_vertex_size = val;
        self
    }
}

/// Forwards the port distances of another object but replaces the
/// separation. The scaling rounds use this to work with a wider channel.
struct WithSeparation<'a> {
    inner: &'a dyn EdgeDistances,
    sep: i64,
}

impl<'a> EdgeDistances for WithSeparation<'a> {
    fn separation(&self) -> i64 {
        self.sep
    }

    fn delta(&self, vertex: usize, side: OrthoDir) -> i64 {
        self.inner.delta(vertex, side)
    }

    fn epsilon(&self, vertex: usize, side: OrthoDir) -> i64 {
        self.inner.epsilon(vertex, side)
    }
}

pub struct FlowCompaction<M: MinCostFlow = SuccessiveShortestPath> {
    options: CompactionOptions,
    solver: M,
    observer: Option<Box<dyn RoundObserver>>,
}

impl FlowCompaction<SuccessiveShortestPath> {
    pub fn new(options: CompactionOptions) -> Self {
        FlowCompaction::with_solver(options, SuccessiveShortestPath::new())
    }
}

impl<M: MinCostFlow> FlowCompaction<M> {
    pub fn with_solver(options: CompactionOptions, solver: M) -> Self {
        FlowCompaction {
            options,
            solver,
            observer: None,
        }
    }

    pub fn options(&self) -> &CompactionOptions {
        &self.options
    }

    /// Register \p observer to see every solved constraint graph.
    pub fn set_observer(&mut self, observer: Box<dyn RoundObserver>) {
        self.observer = Some(observer);
    }

    /// Assign new positions to the nodes of \p d. On entry \p pos holds the
    /// current positions, which the improvement mode uses to keep the
    /// drawing valid. \returns the length of every arc, indexed by arc.
    /// In \p only_gen mode only the generalization arcs, the vertex arcs and
    /// the cage arcs can shrink.
    pub fn compute_coords(
        &mut self,
        d: &ConstraintGraph,
        pos: &mut [i64],
        improvement: bool,
        only_gen: bool,
    ) -> Vec<i64> {
        let g = d.graph();
        let emb = d.embed(pos);
        let segments = g.nodes().filter(|v| !d.extra_node(*v)).count();
        debug_assert!(
            segments == 0 || emb.num_faces() + segments == g.num_edges() + 2,
            "The {} constraint graph is not embedded planar",
            d.axis()
        );

        // Dense ids for the dual nodes.
        let mut face_id = vec![usize::MAX; emb.face_capacity()];
        for (i, f) in emb.faces().enumerate() {
            face_id[f.get_index()] = i;
        }
        let dual = |f: FaceHandle| face_id[f.get_index()];

        let inf = self.solver.infinity();
        let sep = d.separation();
        let opts = self.options;
        let mut net = FlowNetwork::new(emb.num_faces());
        let mut arc_of = vec![usize::MAX; g.edge_capacity()];

        for e in g.edges() {
            let s = g.source(e).get_index();
            let t = g.target(e).get_index();
            let cur = pos[t] - pos[s];
            let kind = d.type_of(e);

            let mut lower = d.length(e);
            let mut upper = inf;
            if opts.fix_zero_length && cur == 0 && kind == ArcKind::FixToZero {
                lower = 0;
                upper = 0;
            } else if improvement && cur < lower {
                lower = cur;
            }
            if opts.align && improvement && d.alignment_arc(e) && !only_gen {
                upper = cur;
            }
            if improvement && d.fix_on_border(e) && cur < sep {
                lower = cur;
                upper = cur;
            }
            if only_gen && !d.vertical_arc(e) && kind != ArcKind::VertexSize && !d.on_border(e) {
                lower = cur;
                upper = inf;
            }
            if opts.fix_vertex_size && kind == ArcKind::VertexSize {
                upper = lower;
            }

            let from = dual(emb.right_face(e.tgt_adj()));
            let to = dual(emb.right_face(e.src_adj()));
            arc_of[e.get_index()] = net.add_arc(from, to, lower, upper, d.cost(e));
        }

        #[cfg(feature = "log")]
        log::debug!(
            "Solving the dual of the {} pass: {} faces, {} arcs",
            d.axis(),
            net.num_nodes(),
            net.arcs().len()
        );

        // A single face means that there are no cycles to balance.
        let flow: Vec<i64> = if net.num_nodes() <= 1 {
            net.arcs().iter().map(|arc| arc.lower).collect()
        } else {
            match self.solver.call(&net) {
                Some(flow) => flow,
                None => panic!("The {} pass has no feasible solution", d.axis()),
            }
        };
        assert!(net.is_feasible(&flow), "Invalid flow");

        let mut lengths = vec![0; g.edge_capacity()];
        for e in g.edges() {
            lengths[e.get_index()] = flow[arc_of[e.get_index()]];
        }

        // Recover the coordinates from the lengths.
        let root = g.nodes().find(|v| !d.extra_node(*v));
        let mut visited = vec![false; g.node_capacity()];
        if let Some(root) = root {
            visited[root.get_index()] = true;
            let mut stack: Vec<NodeHandle> = vec![root];
            while let Some(u) = stack.pop() {
                for adj in g.adj_entries(u) {
                    let w = g.twin_node(adj);
                    if visited[w.get_index()] {
                        continue;
                    }
                    let len = lengths[adj.edge().get_index()];
                    pos[w.get_index()] = if adj.is_source() {
                        pos[u.get_index()] + len
                    } else {
                        pos[u.get_index()] - len
                    };
                    visited[w.get_index()] = true;
                    stack.push(w);
                }
            }
        }
        for v in g.nodes() {
            if d.extra_node(v) {
                let rep = d.extra_rep(v);
                pos[v.get_index()] = pos[rep.get_index()] + d.extra_ofs(v);
            } else {
                assert!(visited[v.get_index()], "The constraint graph is not connected");
            }
        }

        lengths
    }

    /// Build the constraint graph of \p axis from the drawing in \p layout,
    /// solve it and write the result back. \returns the cost of the pass.
    #[allow(clippy::too_many_arguments)]
    fn pass(
        &mut self,
        ortho: &OrthoRep,
        plan: &PlanRep,
        distances: &dyn EdgeDistances,
        layout: &mut GridLayout,
        axis: Axis,
        round: usize,
        improvement: bool,
        only_gen: bool,
    ) -> i64 {
        let opts = self.options;
        let mut d = ConstraintGraph::new(
            ortho,
            plan,
            layout,
            axis,
            distances.separation(),
            opts.cost_gen,
            opts.cost_assoc,
            opts.align,
        );
        d.insert_vertex_size_arcs(plan, distances);
        if improvement {
            d.insert_visibility_arcs(layout, distances);
        }

        let mut pos = d.positions(layout);
        let lengths = self.compute_coords(&d, &mut pos, improvement, only_gen);
        verifier::do_it(&d, &pos, &lengths, opts.fix_vertex_size);
        d.write_back(&pos, layout);

        if let Some(observer) = self.observer.as_mut() {
            observer.on_pass(round, &d, &pos, &lengths);
        }
        d.compute_total_costs(&pos)
    }

    /// Compute a drawing from scratch: one pass per axis that only looks at
    /// the lengths the drawing asks for. The sides of every vertex must be
    /// long enough for their ports (see `PlanRep::check_port_spacing`).
    pub fn constructive_heuristics(
        &mut self,
        ortho: &OrthoRep,
        plan: &PlanRep,
        rc: &dyn EdgeDistances,
        layout: &mut GridLayout,
    ) {
        #[cfg(feature = "log")]
        log::info!(
            "Constructive compaction of {} vertices with separation {}",
            plan.vertices().len(),
            rc.separation()
        );
        self.pass(ortho, plan, rc, layout, Axis::X, 0, false, false);
        self.pass(ortho, plan, rc, layout, Axis::Y, 0, false, false);
        Self::align(plan, layout);
    }

    /// Shrink the drawing in \p layout without adding crossings or
    /// overlaps. \returns the number of rounds.
    pub fn improvement_heuristics(
        &mut self,
        ortho: &OrthoRep,
        plan: &PlanRep,
        rc: &dyn EdgeDistances,
        layout: &mut GridLayout,
    ) -> usize {
        let sep = rc.separation();
        self.improve(ortho, plan, rc, layout, sep, 0).0
    }

    /// Like `improvement_heuristics`, but the first rounds work with a
    /// larger separation that halves every round until it reaches
    /// \p original_sep. On return \p min_dist holds the separation of the
    /// last round.
    pub fn improvement_heuristics_scaled(
        &mut self,
        ortho: &OrthoRep,
        plan: &PlanRep,
        min_dist: &mut MinimumEdgeDistances,
        layout: &mut GridLayout,
        original_sep: i64,
    ) -> usize {
        let steps = self.options.scaling_steps;
        let (rounds, sep) = self.improve(ortho, plan, &*min_dist, layout, original_sep, steps);
        min_dist.set_separation(sep);
        rounds
    }

    /// The improvement loop. \returns the number of rounds and the last
    /// separation.
    fn improve(
        &mut self,
        ortho: &OrthoRep,
        plan: &PlanRep,
        base: &dyn EdgeDistances,
        layout: &mut GridLayout,
        original_sep: i64,
        scaling_steps: usize,
    ) -> (usize, i64) {
        let opts = self.options;
        let min_rounds = if scaling_steps > 0 {
            (scaling_steps + 1).max(opts.num_gen_steps)
        } else {
            opts.num_gen_steps
        };

        let mut sep = original_sep;
        for _ in 0..scaling_steps {
            sep = sep.saturating_mul(2);
        }

        #[cfg(feature = "log")]
        log::info!(
            "Improving the drawing of {} vertices, separation {}",
            plan.vertices().len(),
            original_sep
        );

        let mut costs = i64::MAX;
        let mut steps = 0;
        loop {
            let last_costs = costs;
            steps += 1;
            if steps <= scaling_steps {
                sep = (sep / 2).max(original_sep);
            }
            let only_gen = steps < opts.num_gen_steps;
            let distances = WithSeparation { inner: base, sep };

            costs = self.pass(ortho, plan, &distances, layout, Axis::X, steps, true, only_gen);
            costs += self.pass(ortho, plan, &distances, layout, Axis::Y, steps, true, only_gen);

            #[cfg(feature = "log")]
            log::info!(
                "Round {}: costs {} (separation {}{})",
                steps,
                costs,
                sep,
                if only_gen { ", generalizations only" } else { "" }
            );

            let more_steps = opts.max_steps == 0 || steps < opts.max_steps;
            let improving = steps < min_rounds || costs < last_costs;
            if !(more_steps && improving) {
                break;
            }
        }

        Self::align(plan, layout);
        (steps, sep)
    }

    fn align(plan: &PlanRep, layout: &mut GridLayout) {
        let nodes: Vec<NodeHandle> = plan.graph().nodes().collect();
        layout.align_to_origin(nodes.iter().copied());
    }
}

#[cfg(test)]
use crate::ortho::builder::{Drawing, EdgeSpec, VertexSpec};
#[cfg(test)]
use crate::ortho::distances::RoutingChannel;
#[cfg(test)]
use crate::ortho::plan_rep::{Corner, EdgeKind};

/// A triangle a -> b -> c with the long arc a -> c below b.
#[cfg(test)]
fn triangle(kind_ab: ArcKind, len_ab: i64) -> ConstraintGraph {
    let mut d = ConstraintGraph::empty(Axis::X, 5);
    let a = d.new_segment((0, 10));
    let b = d.new_segment((0, 4));
    let c = d.new_segment((0, 10));
    d.new_arc(a, b, len_ab, 0, kind_ab, 4);
    d.new_arc(b, c, 5, 1, ArcKind::Basic, 4);
    d.new_arc(a, c, 30, 0, ArcKind::Basic, 14);
    d
}

#[test]
fn test_chain() {
    let mut d = ConstraintGraph::empty(Axis::X, 5);
    let a = d.new_segment((0, 10));
    let b = d.new_segment((0, 10));
    let c = d.new_segment((0, 10));
    let center = d.new_extra_node(b, 4);
    d.new_arc(a, b, 3, 1, ArcKind::Basic, 10);
    d.new_arc(b, c, 7, 1, ArcKind::Basic, 10);

    let mut fc = FlowCompaction::new(CompactionOptions::new());
    let mut pos = vec![0, 50, 100, 0];
    let lengths = fc.compute_coords(&d, &mut pos, false, false);
    assert_eq!(pos, vec![0, 3, 10, 7]);
    assert_eq!(lengths, vec![3, 7]);
    assert_eq!(pos[center.get_index()], 7);
    assert_eq!(d.compute_total_costs(&pos), 10);
}

#[test]
fn test_vertex_size_is_exact() {
    let d = triangle(ArcKind::VertexSize, 10);
    let mut fc = FlowCompaction::new(CompactionOptions::new());
    let mut pos = vec![0, 10, 40];
    fc.compute_coords(&d, &mut pos, false, false);
    assert_eq!(pos, vec![0, 10, 30]);

    // Without the fix the vertex grows to make the cheap arc short.
    let mut fc = FlowCompaction::new(CompactionOptions::new().fix_vertex_size(false));
    let mut pos = vec![0, 10, 40];
    fc.compute_coords(&d, &mut pos, false, false);
    assert_eq!(pos[2] - pos[1], 5);
    assert!(pos[1] >= 25);
    assert!(pos[2] >= 30);
}

#[test]
fn test_zero_length_pieces_stay() {
    let d = triangle(ArcKind::FixToZero, 0);
    let mut fc = FlowCompaction::new(CompactionOptions::new());
    let mut pos = vec![0, 0, 20];
    fc.compute_coords(&d, &mut pos, true, false);
    assert_eq!(pos, vec![0, 0, 20]);

    let mut fc = FlowCompaction::new(CompactionOptions::new().fix_zero_length(false));
    let mut pos = vec![0, 0, 20];
    fc.compute_coords(&d, &mut pos, true, false);
    assert_eq!(pos[2] - pos[1], 5);
}

#[test]
fn test_improvement_keeps_short_arcs() {
    let mut d = ConstraintGraph::empty(Axis::Y, 10);
    let a = d.new_segment((0, 10));
    let b = d.new_segment((0, 10));
    d.new_arc(a, b, 10, 1, ArcKind::Basic, 10);
    let mut fc = FlowCompaction::new(CompactionOptions::new());

    let mut pos = vec![0, 4];
    fc.compute_coords(&d, &mut pos, true, false);
    assert_eq!(pos, vec![0, 4]);

    let mut pos = vec![0, 4];
    fc.compute_coords(&d, &mut pos, false, false);
    assert_eq!(pos, vec![0, 10]);

    // Only the generalizations move in the first rounds.
    let mut pos = vec![0, 40];
    fc.compute_coords(&d, &mut pos, true, true);
    assert_eq!(pos, vec![0, 40]);
    pos = vec![0, 40];
    fc.compute_coords(&d, &mut pos, true, false);
    assert_eq!(pos, vec![0, 10]);
}

#[cfg(test)]
fn two_boxes(gap: i64) -> Drawing {
    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("a", 0, 0, 20, 10));
    d.add_vertex(VertexSpec::new("b", 20 + gap, 0, 20, 10));
    d.add_edge(EdgeSpec::new(
        "a",
        "b",
        EdgeKind::Association,
        &[(20, 5), (20 + gap, 5)],
    ));
    d
}

#[test]
fn test_constructive() {
    let mut od = two_boxes(20).build().unwrap();
    let rc = RoutingChannel::new(5);
    od.plan.check_port_spacing(&rc).unwrap();
    let mut fc = FlowCompaction::new(CompactionOptions::new());
    fc.constructive_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);

    let (tl, br) = od.plan.vertex_box(1, &od.layout);
    assert_eq!((tl.x, tl.y), (25, 0));
    assert_eq!((br.x, br.y), (45, 10));
    let center = od.plan.vertex(1).center;
    assert_eq!(od.layout.x(center), 35);

    // A second run changes nothing.
    let before = od.layout.clone();
    fc.constructive_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);
    assert_eq!(od.layout, before);
}

#[test]
fn test_improvement_rounds() {
    let mut od = two_boxes(80).build().unwrap();
    let rc = RoutingChannel::new(5);
    let mut fc = FlowCompaction::new(CompactionOptions::new());
    let rounds = fc.improvement_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);
    // Two rounds for generalizations, one that shrinks the edge and one
    // that finds nothing to improve.
    assert_eq!(rounds, 4);
    let tl = od.layout.point(od.plan.vertex(1).corner(Corner::TopLeft));
    assert_eq!((tl.x, tl.y), (25, 0));

    // The generalization rounds don't touch association edges.
    let mut od = two_boxes(80).build().unwrap();
    let mut fc = FlowCompaction::new(CompactionOptions::new().max_steps(2));
    let rounds = fc.improvement_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);
    assert_eq!(rounds, 2);
    let tl = od.layout.point(od.plan.vertex(1).corner(Corner::TopLeft));
    assert_eq!(tl.x, 100);
}

#[test]
fn test_scaled_improvement() {
    let mut od = two_boxes(80).build().unwrap();
    let mut min_dist = MinimumEdgeDistances::new(5);
    let mut fc = FlowCompaction::new(CompactionOptions::new().scaling_steps(2));
    let rounds =
        fc.improvement_heuristics_scaled(&od.ortho, &od.plan, &mut min_dist, &mut od.layout, 5);
    assert!(rounds >= 3);
    assert_eq!(min_dist.separation(), 5);
    let tl = od.layout.point(od.plan.vertex(1).corner(Corner::TopLeft));
    assert_eq!(tl.x, 25);
}
