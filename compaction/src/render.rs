//! Draws a planarized drawing with the coordinates of a grid layout.

use crate::core::format::RenderBackend;
use crate::core::geometry::Point;
use crate::core::style::{Color, StyleAttr};
use crate::ortho::grid::GridLayout;
use crate::ortho::plan_rep::{Corner, EdgeKind, NodeKind, PlanRep};

/// The empty space around the drawing.
const MARGIN: f64 = 20.;

fn to_point(layout: &GridLayout, x: i64, y: i64) -> Point {
    Point::new(
        layout.to_double(x) + MARGIN,
        layout.to_double(y) + MARGIN,
    )
}

/// Render the vertices and edges of \p plan at the positions in \p layout.
/// In \p debug mode the bends, ports and crossings are marked too.
pub fn render_drawing(
    plan: &PlanRep,
    layout: &GridLayout,
    svg: &mut dyn RenderBackend,
    debug: bool,
) {
    let g = plan.graph();
    let edge_look = StyleAttr::line("black");
    let gen_look = StyleAttr::new(Color::fast("blue"), 2, None, 10);

    for info in plan.vertices().iter() {
        let tl = layout.point(info.corner(Corner::TopLeft));
        let br = layout.point(info.corner(Corner::BottomRight));
        let xy = to_point(layout, tl.x, tl.y);
        let size = Point::new(
            layout.to_double(br.x - tl.x),
            layout.to_double(br.y - tl.y),
        );
        let look = if debug {
            StyleAttr::debug1()
        } else {
            StyleAttr::simple()
        };
        svg.draw_rect(xy, size, &look);
        let c = layout.point(info.center);
        svg.draw_text(to_point(layout, c.x, c.y), &info.name, &look);
    }

    for info in plan.original_edges().iter() {
        let look = match info.kind {
            EdgeKind::Generalization => &gen_look,
            _ => &edge_look,
        };
        for e in info.pieces.iter() {
            let a = layout.point(g.source(*e));
            let b = layout.point(g.target(*e));
            svg.draw_line(to_point(layout, a.x, a.y), to_point(layout, b.x, b.y), look);
        }
    }

    if !debug {
        return;
    }
    for v in g.nodes() {
        let look = match plan.kind_of_node(v) {
            NodeKind::Port(_) => StyleAttr::debug0(),
            NodeKind::Bend | NodeKind::Crossing => StyleAttr::debug1(),
            _ => continue,
        };
        let p = layout.point(v);
        svg.draw_circle(to_point(layout, p.x, p.y), Point::splat(4.), &look);
    }
}

#[test]
fn test_render_drawing() {
    use crate::backends::svg::SVGWriter;
    use crate::ortho::builder::{Drawing, EdgeSpec, VertexSpec};

    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("a", 0, 0, 20, 10));
    d.add_vertex(VertexSpec::new("b", 40, 30, 20, 10));
    d.add_edge(EdgeSpec::new(
        "a",
        "b",
        EdgeKind::Association,
        &[(10, 10), (10, 35), (40, 35)],
    ));
    let od = d.build().unwrap();

    let mut svg = SVGWriter::new();
    render_drawing(&od.plan, &od.layout, &mut svg, false);
    let content = svg.finalize();
    assert_eq!(content.matches("<rect").count(), 2);
    assert_eq!(content.matches("<line").count(), 2);
    assert!(!content.contains("<ellipse"));

    let mut svg = SVGWriter::new();
    render_drawing(&od.plan, &od.layout, &mut svg, true);
    // Two ports and one bend.
    assert_eq!(svg.finalize().matches("<ellipse").count(), 3);
}
