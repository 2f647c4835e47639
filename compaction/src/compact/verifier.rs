use crate::compact::constraint_graph::{ArcKind, ConstraintGraph};
use crate::core::geometry::do_boxes_intersect;
use crate::error::{Error, Result};
use crate::ortho::builder::OrthoDrawing;
use crate::ortho::grid::GridLayout;

/// Check the result of one compaction pass.
pub fn do_it(d: &ConstraintGraph, pos: &[i64], lengths: &[i64], fix_vertex_size: bool) {
    verify_lengths_match_positions(d, pos, lengths);
    verify_arc_lengths(d, lengths, fix_vertex_size);
    verify_extra_nodes(d, pos);
}

fn verify_lengths_match_positions(d: &ConstraintGraph, pos: &[i64], lengths: &[i64]) {
    let g = d.graph();
    for e in g.edges() {
        let s = g.source(e).get_index();
        let t = g.target(e).get_index();
        assert_eq!(
            pos[t] - pos[s],
            lengths[e.get_index()],
            "The positions must realize the arc lengths"
        );
    }
}

fn verify_arc_lengths(d: &ConstraintGraph, lengths: &[i64], fix_vertex_size: bool) {
    for e in d.graph().edges() {
        let len = lengths[e.get_index()];
        assert!(len >= 0, "Arcs must not flip");
        if fix_vertex_size && d.type_of(e) == ArcKind::VertexSize {
            assert_eq!(len, d.length(e), "Vertices must keep their size");
        }
    }
}

fn verify_extra_nodes(d: &ConstraintGraph, pos: &[i64]) {
    for v in d.graph().nodes() {
        if d.extra_node(v) {
            let rep = d.extra_rep(v);
            assert_eq!(pos[v.get_index()], pos[rep.get_index()] + d.extra_ofs(v));
        }
    }
}

/// Check that \p layout is a valid drawing of \p od: the boxes are
/// disjoint, and rebuilding the drawing from the new coordinates finds no
/// edge that runs through a box or over another edge.
pub fn check_drawing(od: &OrthoDrawing, layout: &GridLayout) -> Result<()> {
    let plan = &od.plan;
    let n = plan.vertices().len();
    for i in 0..n {
        for j in (i + 1)..n {
            if do_boxes_intersect(plan.vertex_box(i, layout), plan.vertex_box(j, layout)) {
                return Err(Error::OverlappingVertices(
                    plan.vertex(i).name.clone(),
                    plan.vertex(j).name.clone(),
                ));
            }
        }
    }
    od.to_drawing(layout).build().map(|_| ())
}

#[test]
fn test_check_drawing() {
    use crate::core::geometry::GridPoint;
    use crate::ortho::builder::{Drawing, EdgeSpec, VertexSpec};
    use crate::ortho::plan_rep::{Corner, EdgeKind};

    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("a", 0, 0, 20, 10));
    d.add_vertex(VertexSpec::new("b", 40, 0, 20, 10));
    d.add_edge(EdgeSpec::new(
        "a",
        "b",
        EdgeKind::Association,
        &[(20, 5), (40, 5)],
    ));
    let od = d.build().unwrap();
    assert!(check_drawing(&od, &od.layout).is_ok());

    // Slide b onto a.
    let mut layout = od.layout.clone();
    let b = od.plan.vertex(1);
    let nodes: Vec<_> = od
        .plan
        .graph()
        .nodes()
        .filter(|v| od.plan.vertex_of(*v) == Some(1))
        .collect();
    for v in nodes {
        let p = layout.point(v);
        layout.set(v, GridPoint::new(p.x - 30, p.y));
    }
    assert_eq!(layout.x(b.corner(Corner::TopLeft)), 10);
    assert!(matches!(
        check_drawing(&od, &layout),
        Err(Error::OverlappingVertices(_, _))
    ));
}
