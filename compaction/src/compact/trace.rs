//! Hooks that let callers look at the constraint graphs while the driver
//! runs, and an observer that draws every solved graph to an SVG file.

use crate::backends::svg::SVGWriter;
use crate::compact::constraint_graph::{ArcKind, ConstraintGraph};
use crate::core::base::Axis;
use crate::core::format::RenderBackend;
use crate::core::geometry::Point;
use crate::core::style::StyleAttr;
use crate::core::utils::save_to_file;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

pub trait RoundObserver {
    /// Called after the pass of round \p round solved the graph \p d. The
    /// nodes are at \p pos and \p lengths has the length of every arc.
    /// Constructive passes report round zero.
    fn on_pass(&mut self, round: usize, d: &ConstraintGraph, pos: &[i64], lengths: &[i64]);
}

/// Lets the caller keep a handle on an observer that the driver owns.
impl<T: RoundObserver> RoundObserver for Rc<RefCell<T>> {
    fn on_pass(&mut self, round: usize, d: &ConstraintGraph, pos: &[i64], lengths: &[i64]) {
        self.borrow_mut().on_pass(round, d, pos, lengths);
    }
}

/// Records the cost of every pass.
#[derive(Debug, Default, Clone)]
pub struct CostLog {
    pub entries: Vec<(usize, Axis, i64)>,
}

impl CostLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// \returns the total cost of every round.
    pub fn round_costs(&self) -> Vec<i64> {
        let mut res: Vec<i64> = Vec::new();
        let mut last_round = None;
        for (round, _, cost) in self.entries.iter() {
            if last_round == Some(*round) {
                if let Some(last) = res.last_mut() {
                    *last += cost;
                }
            } else {
                res.push(*cost);
                last_round = Some(*round);
            }
        }
        res
    }
}

impl RoundObserver for CostLog {
    fn on_pass(&mut self, round: usize, d: &ConstraintGraph, pos: &[i64], _lengths: &[i64]) {
        self.entries.push((round, d.axis(), d.compute_total_costs(pos)));
    }
}

/// Scale from grid units to pixels in the trace files.
const SCALE: f64 = 4.;
const MARGIN: f64 = 20.;

fn arc_style(kind: ArcKind) -> StyleAttr {
    match kind {
        ArcKind::Basic => StyleAttr::line("black"),
        ArcKind::VertexSize => StyleAttr::line("blue"),
        ArcKind::Visibility => StyleAttr::line("gray").dashed(),
        ArcKind::FixToZero => StyleAttr::line("red"),
    }
}

/// Writes one SVG file per pass into a directory, named after the round
/// and the axis. Segments are drawn where they are, arcs as lines between
/// them and extra nodes as small circles.
pub struct SvgTrace {
    dir: PathBuf,
    written: Vec<PathBuf>,
    error: Option<std::io::Error>,
}

impl SvgTrace {
    pub fn new(dir: &str) -> Self {
        SvgTrace {
            dir: PathBuf::from(dir),
            written: Vec::new(),
            error: None,
        }
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    /// \returns the first error that happened while writing the files.
    pub fn take_error(&mut self) -> Option<std::io::Error> {
        self.error.take()
    }

    /// Render \p d with its nodes at \p pos.
    pub fn render(d: &ConstraintGraph, pos: &[i64]) -> String {
        let g = d.graph();
        let axis = d.axis();
        let mut lo = (i64::MAX, i64::MAX);
        for v in g.nodes().filter(|v| !d.extra_node(*v)) {
            let (a, _) = d.range(v);
            lo = (lo.0.min(pos[v.get_index()]), lo.1.min(a));
        }
        if lo.0 == i64::MAX {
            lo = (0, 0);
        }

        // Maps (position, doubled coordinate along the segment) to a point.
        let to_point = |p: i64, key: i64| {
            let along = (key as f64 / 2. - lo.1 as f64) * SCALE + MARGIN;
            let across = (p - lo.0) as f64 * SCALE + MARGIN;
            match axis {
                Axis::X => Point::new(across, along),
                Axis::Y => Point::new(along, across),
            }
        };

        let mut svg = SVGWriter::new();
        let segment_look = StyleAttr::simple();
        for v in g.nodes() {
            let p = pos[v.get_index()];
            if d.extra_node(v) {
                let rep = d.extra_rep(v);
                let (a, b) = d.range(rep);
                let center = to_point(p, a + b);
                svg.draw_circle(center, Point::splat(6.), &StyleAttr::debug0());
                continue;
            }
            let (a, b) = d.range(v);
            svg.draw_line(to_point(p, 2 * a), to_point(p, 2 * b), &segment_look);
        }
        for e in g.edges() {
            let s = g.source(e).get_index();
            let t = g.target(e).get_index();
            let key = d.key(e);
            svg.draw_line(
                to_point(pos[s], key),
                to_point(pos[t], key),
                &arc_style(d.type_of(e)),
            );
        }
        svg.finalize()
    }
}

impl RoundObserver for SvgTrace {
    fn on_pass(&mut self, round: usize, d: &ConstraintGraph, pos: &[i64], _lengths: &[i64]) {
        let path = self.dir.join(format!("round{}_{}.svg", round, d.axis()));
        let content = SvgTrace::render(d, pos);
        match save_to_file(&path.to_string_lossy(), &content) {
            Ok(()) => self.written.push(path),
            Err(err) => {
                #[cfg(feature = "log")]
                log::error!("Can't write {}: {}", path.display(), err);
                if self.error.is_none() {
                    self.error = Some(err);
                }
            }
        }
    }
}

#[test]
fn test_cost_log() {
    let mut d = ConstraintGraph::empty(Axis::X, 5);
    let a = d.new_segment((0, 10));
    let b = d.new_segment((0, 10));
    d.new_arc(a, b, 5, 2, ArcKind::Basic, 10);

    let mut costs = CostLog::new();
    costs.on_pass(1, &d, &[0, 5], &[5]);
    costs.on_pass(1, &d, &[0, 7], &[7]);
    costs.on_pass(2, &d, &[0, 5], &[5]);
    assert_eq!(costs.round_costs(), vec![24, 10]);

    let svg = SvgTrace::render(&d, &[0, 5]);
    assert!(svg.contains("<line"));
}
