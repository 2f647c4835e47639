//! This is a sample program that builds a few loose drawings, compacts them,
//! and saves the drawings before and after compaction to SVG files so we can
//! visually see if the result looks right.

use compaction::backends::svg::SVGWriter;
use compaction::compact::verifier::check_drawing;
use compaction::compact::{CompactionOptions, CostLog, FlowCompaction};
use compaction::core::utils::save_to_file;
use compaction::ortho::{
    Drawing, EdgeKind, EdgeSpec, GridLayout, PlanRep, RoutingChannel, VertexSpec,
};
use compaction::render::render_drawing;
use std::cell::RefCell;
use std::rc::Rc;

pub const DEBUG_MODE: bool = true;

/// A tiny linear congruential generator, so every run draws the same
/// boxes.
struct Lcg(u64);

impl Lcg {
    fn next_in(&mut self, lo: i64, hi: i64) -> i64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        lo + ((self.0 >> 33) % ((hi - lo) as u64)) as i64
    }
}

/// A grid of boxes of random sizes. Boxes in a row are connected by
/// associations and boxes in a column by generalizations.
fn grid_drawing(cols: i64, rows: i64) -> Drawing {
    let mut rng = Lcg(7);
    let mut d = Drawing::new();
    let name = |c: i64, r: i64| format!("n{}_{}", c, r);
    let mut sizes = Vec::new();
    for r in 0..rows {
        for c in 0..cols {
            let w = rng.next_in(10, 40);
            let h = rng.next_in(10, 30);
            d.add_vertex(VertexSpec::new(&name(c, r), c * 100, r * 100, w, h));
            sizes.push((w, h));
        }
    }
    for r in 0..rows {
        for c in 0..cols {
            let (w, h) = sizes[(r * cols + c) as usize];
            if c + 1 < cols {
                let pts = [(c * 100 + w, r * 100 + 5), ((c + 1) * 100, r * 100 + 5)];
                d.add_edge(EdgeSpec::new(
                    &name(c, r),
                    &name(c + 1, r),
                    EdgeKind::Association,
                    &pts,
                ));
            }
            if r + 1 < rows {
                let pts = [(c * 100 + 5, r * 100 + h), (c * 100 + 5, (r + 1) * 100)];
                d.add_edge(EdgeSpec::new(
                    &name(c, r),
                    &name(c, r + 1),
                    EdgeKind::Generalization,
                    &pts,
                ));
            }
        }
    }
    d
}

/// A class with three subclasses, connected by bent generalizations.
fn hierarchy_drawing() -> Drawing {
    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("base", 200, 0, 40, 20));
    d.add_vertex(VertexSpec::new("left", 0, 200, 40, 20));
    d.add_vertex(VertexSpec::new("middle", 200, 200, 40, 20));
    d.add_vertex(VertexSpec::new("right", 400, 200, 40, 20));
    let gen = EdgeKind::Generalization;
    d.add_edge(EdgeSpec::new(
        "left",
        "base",
        gen,
        &[(20, 200), (20, 100), (210, 100), (210, 20)],
    ));
    d.add_edge(EdgeSpec::new("middle", "base", gen, &[(220, 200), (220, 20)]));
    d.add_edge(EdgeSpec::new(
        "right",
        "base",
        gen,
        &[(420, 200), (420, 100), (230, 100), (230, 20)],
    ));
    d
}

fn save_drawing(plan: &PlanRep, layout: &GridLayout, name: &str) {
    let mut svg = SVGWriter::new();
    render_drawing(plan, layout, &mut svg, DEBUG_MODE);
    let path = format!("/tmp/{}.svg", name);
    if let Err(err) = save_to_file(&path, &svg.finalize()) {
        eprintln!("Can't write {}: {}", path, err);
    }
}

fn run_demo(d: &Drawing, name: &str, options: CompactionOptions) {
    let od = match d.build() {
        Ok(od) => od,
        Err(err) => {
            eprintln!("Invalid drawing {}: {}", name, err);
            return;
        }
    };
    save_drawing(&od.plan, &od.layout, &format!("{}_before", name));

    let costs = Rc::new(RefCell::new(CostLog::new()));
    let mut fc = FlowCompaction::new(options);
    fc.set_observer(Box::new(costs.clone()));

    let mut layout = od.layout.clone();
    let rc = RoutingChannel::new(10);
    let rounds = fc.improvement_heuristics(&od.ortho, &od.plan, &rc, &mut layout);
    println!(
        "{}: {} rounds, costs {:?}",
        name,
        rounds,
        costs.borrow().round_costs()
    );

    if let Err(err) = check_drawing(&od, &layout) {
        eprintln!("{}: {}", name, err);
    }
    save_drawing(&od.plan, &layout, &format!("{}_after", name));
}

fn main() {
    run_demo(&grid_drawing(4, 3), "grid", CompactionOptions::new());
    run_demo(
        &hierarchy_drawing(),
        "hierarchy",
        CompactionOptions::new().align(true),
    );
}
