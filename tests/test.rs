use compaction::ortho::OrthoDrawing;

#[cfg(test)]
mod tests {

    use compaction::backends::svg::SVGWriter;
    use compaction::compact::verifier::check_drawing;
    use compaction::compact::{CompactionOptions, CostLog, FlowCompaction, SvgTrace};
    use compaction::ortho::{Corner, MinimumEdgeDistances, RoutingChannel};
    use compaction::render::render_drawing;
    use compaction::text::{print_drawing, DrawingParser};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn get_sample_program() -> String {
        r##"# A class with an association and a generalization.
        vertex a 0 0 10 10;
        vertex b 80 0 10 10;
        vertex c 0 80 100 10;
        edge a b (10, 5) (80, 5);
        edge a c gen (5, 10) (5, 80);
        "##
        .to_string()
    }

    fn get_bent_program() -> String {
        r##"/* Three subclasses under one base class. */
        vertex base 200 0 40 20;
        vertex left 0 200 40 20;
        vertex middle 200 200 40 20;
        vertex right 400 200 40 20;
        edge left base gen (20, 200) (20, 100) (210, 100) (210, 20);
        edge middle base gen (220, 200) (220, 20);
        edge right base gen (420, 200) (420, 100) (230, 100) (230, 20);
        "##
        .to_string()
    }

    #[test]
    fn test_parse_and_compact() {
        let mut od = super::build(&get_sample_program());
        let rc = RoutingChannel::new(5);
        let mut fc = FlowCompaction::new(CompactionOptions::new());
        let rounds = fc.improvement_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);
        assert!(rounds >= 4);
        assert!(check_drawing(&od, &od.layout).is_ok());

        // The edges are as short as the separation allows.
        let (a_tl, a_br) = od.plan.vertex_box(0, &od.layout);
        let (b_tl, _) = od.plan.vertex_box(1, &od.layout);
        let (c_tl, _) = od.plan.vertex_box(2, &od.layout);
        assert_eq!(b_tl.x - a_br.x, 5);
        assert_eq!(b_tl.y, a_tl.y);
        assert_eq!(c_tl.y - a_br.y, 5);

        // The sizes of the boxes don't change.
        let (tl, br) = od.plan.vertex_box(2, &od.layout);
        assert_eq!(br.x - tl.x, 100);
        assert_eq!(br.y - tl.y, 10);
    }

    #[test]
    fn test_costs_never_grow() {
        // Includes the rounds where the bounds change: the switch from the
        // generalization rounds to the full rounds, and the rounds that
        // scale the separation down.
        let configs = [
            (CompactionOptions::new().num_gen_steps(1), false),
            (CompactionOptions::new(), false),
            (CompactionOptions::new().align(true), false),
            (CompactionOptions::new().scaling_steps(3), true),
            (CompactionOptions::new().scaling_steps(2).num_gen_steps(5), true),
        ];
        for program in [get_sample_program(), get_bent_program()] {
            for (opts, scaled) in configs.iter() {
                let mut od = super::build(&program);
                let costs = Rc::new(RefCell::new(CostLog::new()));
                let mut fc = FlowCompaction::new(*opts);
                fc.set_observer(Box::new(costs.clone()));
                let rounds = if *scaled {
                    let mut min_dist = MinimumEdgeDistances::new(10);
                    fc.improvement_heuristics_scaled(
                        &od.ortho,
                        &od.plan,
                        &mut min_dist,
                        &mut od.layout,
                        10,
                    )
                } else {
                    let rc = RoutingChannel::new(10);
                    fc.improvement_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout)
                };

                let round_costs = costs.borrow().round_costs();
                assert_eq!(round_costs.len(), rounds);
                for w in round_costs.windows(2) {
                    assert!(w[1] <= w[0], "costs went up: {:?}", round_costs);
                }
                assert!(check_drawing(&od, &od.layout).is_ok());
            }
        }
    }

    /// A small linear congruential generator for the random drawings.
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

    /// A 3x3 grid of boxes of random sizes. Neighbors in a row and in a
    /// column are connected by Z shaped edges of a random kind. The bends
    /// of the row edges are right of every column edge and the bends of
    /// the column edges are below every row edge, so nothing overlaps.
    fn get_random_program(seed: u64) -> String {
        let mut rng = Lcg(seed);
        let cell = 120;
        let mut sizes = Vec::new();
        let mut program = String::new();
        for r in 0..3 {
            for c in 0..3 {
                let (w, h) = (rng.next_in(20, 50), rng.next_in(20, 40));
                program.push_str(&format!(
                    "vertex n{}{} {} {} {} {};\n",
                    c,
                    r,
                    c * cell,
                    r * cell,
                    w,
                    h
                ));
                sizes.push((w, h));
            }
        }
        let size = |c: i64, r: i64| sizes[(r * 3 + c) as usize];
        let mut edge = |rng: &mut Lcg, from: String, to: String, pts: Vec<(i64, i64)>| {
            let kind = if rng.next_in(0, 2) == 0 { " gen" } else { "" };
            let pts: Vec<String> = pts.iter().map(|(x, y)| format!("({}, {})", x, y)).collect();
            program.push_str(&format!("edge {} {}{} {};\n", from, to, kind, pts.join(" ")));
        };
        for r in 0..3 {
            for c in 0..3 {
                let (x0, y0) = (c * cell, r * cell);
                let (w, h) = size(c, r);
                if c + 1 < 3 {
                    let x1 = x0 + cell;
                    let y_from = rng.next_in(y0 + 5, y0 + h - 4);
                    let y_to = rng.next_in(y0 + 5, y0 + size(c + 1, r).1 - 4);
                    let xm = rng.next_in(x0 + 60, x1 - 9);
                    let pts = vec![(x0 + w, y_from), (xm, y_from), (xm, y_to), (x1, y_to)];
                    edge(&mut rng, format!("n{}{}", c, r), format!("n{}{}", c + 1, r), pts);
                }
                if r + 1 < 3 {
                    let y1 = y0 + cell;
                    let x_from = rng.next_in(x0 + 5, x0 + w - 4);
                    let x_to = rng.next_in(x0 + 5, x0 + size(c, r + 1).0 - 4);
                    let ym = rng.next_in(y0 + 60, y1 - 9);
                    let pts = vec![(x_from, y0 + h), (x_from, ym), (x_to, ym), (x_to, y1)];
                    edge(&mut rng, format!("n{}{}", c, r), format!("n{}{}", c, r + 1), pts);
                }
            }
        }
        program
    }

    #[test]
    fn test_random_zig_zags() {
        // The zig-zags shrink to points in the first rounds. The later
        // rounds have to keep the drawing valid around them.
        let configs = [
            (CompactionOptions::new(), false),
            (CompactionOptions::new().align(true), false),
            (CompactionOptions::new().num_gen_steps(1), false),
            (CompactionOptions::new().scaling_steps(3), true),
        ];
        for seed in 1..=40 {
            let program = get_random_program(seed);
            for (opts, scaled) in configs.iter() {
                let mut od = super::build(&program);
                let costs = Rc::new(RefCell::new(CostLog::new()));
                let mut fc = FlowCompaction::new(*opts);
                fc.set_observer(Box::new(costs.clone()));
                if *scaled {
                    let mut min_dist = MinimumEdgeDistances::new(10);
                    fc.improvement_heuristics_scaled(
                        &od.ortho,
                        &od.plan,
                        &mut min_dist,
                        &mut od.layout,
                        10,
                    );
                } else {
                    let rc = RoutingChannel::new(10);
                    fc.improvement_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);
                }
                let round_costs = costs.borrow().round_costs();
                for w in round_costs.windows(2) {
                    assert!(w[1] <= w[0], "seed {}: costs went up: {:?}", seed, round_costs);
                }
                if let Err(err) = check_drawing(&od, &od.layout) {
                    panic!("seed {}: {}", seed, err);
                }
            }

            // From scratch, then improved. The constructive pass has no
            // visibility arcs, so only drawings without overlaps go on.
            let mut od = super::build(&program);
            let rc = RoutingChannel::new(5);
            od.plan.check_port_spacing(&rc).unwrap();
            let costs = Rc::new(RefCell::new(CostLog::new()));
            let mut fc = FlowCompaction::new(CompactionOptions::new());
            fc.set_observer(Box::new(costs.clone()));
            fc.constructive_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);
            if check_drawing(&od, &od.layout).is_err() {
                continue;
            }
            fc.improvement_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);
            let round_costs = costs.borrow().round_costs();
            for w in round_costs.windows(2) {
                assert!(w[1] <= w[0], "seed {}: costs went up: {:?}", seed, round_costs);
            }
            assert!(check_drawing(&od, &od.layout).is_ok());
        }
    }

    #[test]
    fn test_bent_generalizations() {
        let mut od = super::build(&get_bent_program());
        let rc = RoutingChannel::new(10);
        let before = od.layout.clone();
        let mut fc = FlowCompaction::new(CompactionOptions::new().align(true));
        fc.improvement_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);
        assert!(check_drawing(&od, &od.layout).is_ok());

        let g = od.plan.graph();
        let (lo, hi) = before.bounding_box(g.nodes()).unwrap();
        let (new_lo, new_hi) = od.layout.bounding_box(g.nodes()).unwrap();
        assert!(new_hi.x - new_lo.x < hi.x - lo.x);
        assert!(new_hi.y - new_lo.y < hi.y - lo.y);

        // The subclasses are still side by side.
        let x = |i: usize| od.layout.x(od.plan.vertex(i).corner(Corner::TopLeft));
        assert!(x(1) < x(2) && x(2) < x(3));
    }

    #[test]
    fn test_constructive() {
        let mut od = super::build(&get_sample_program());
        let rc = RoutingChannel::new(5);
        od.plan.check_port_spacing(&rc).unwrap();
        let mut fc = FlowCompaction::new(CompactionOptions::new());
        fc.constructive_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);
        assert!(check_drawing(&od, &od.layout).is_ok());

        let (_, a_br) = od.plan.vertex_box(0, &od.layout);
        let (b_tl, _) = od.plan.vertex_box(1, &od.layout);
        assert_eq!(b_tl.x - a_br.x, 5);
    }

    #[test]
    fn test_scaled() {
        let mut od = super::build(&get_bent_program());
        let mut min_dist = MinimumEdgeDistances::new(10);
        let opts = CompactionOptions::new().scaling_steps(2);
        let mut fc = FlowCompaction::new(opts);
        let rounds = fc.improvement_heuristics_scaled(
            &od.ortho,
            &od.plan,
            &mut min_dist,
            &mut od.layout,
            10,
        );
        assert!(rounds >= 3);
        assert!(check_drawing(&od, &od.layout).is_ok());
    }

    #[test]
    fn test_emit_and_reparse() {
        let mut od = super::build(&get_bent_program());
        let rc = RoutingChannel::new(10);
        let mut fc = FlowCompaction::new(CompactionOptions::new());
        fc.improvement_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);

        let text = print_drawing(&od.to_drawing(&od.layout));
        let again = super::build(&text);
        assert_eq!(again.to_drawing(&again.layout), od.to_drawing(&od.layout));

        let mut svg = SVGWriter::new();
        render_drawing(&od.plan, &od.layout, &mut svg, false);
        assert_eq!(svg.finalize().matches("<rect").count(), 4);
    }

    #[test]
    fn test_trace() {
        let dir = std::env::temp_dir().join("compaction_trace_test");
        std::fs::create_dir_all(&dir).unwrap();

        let mut od = super::build(&get_sample_program());
        let trace = Rc::new(RefCell::new(SvgTrace::new(&dir.to_string_lossy())));
        let rc = RoutingChannel::new(5);
        let mut fc = FlowCompaction::new(CompactionOptions::new().max_steps(1));
        fc.set_observer(Box::new(trace.clone()));
        fc.improvement_heuristics(&od.ortho, &od.plan, &rc, &mut od.layout);

        let mut trace = trace.borrow_mut();
        assert!(trace.take_error().is_none());
        assert_eq!(trace.written().len(), 2);
        assert!(dir.join("round1_x.svg").exists());
        assert!(dir.join("round1_y.svg").exists());
    }

    #[test]
    fn test_parse_errors() {
        let mut parser = DrawingParser::new("vertex a 0 0 10;");
        assert!(parser.process().is_err());

        // The parser accepts the drawing but it does not describe a valid
        // picture: b is unknown.
        let mut parser =
            DrawingParser::new("vertex a 0 0 10 10; edge a b (10, 5) (20, 5);");
        let drawing = parser.process().unwrap();
        assert!(drawing.build().is_err());
    }
}

fn build(program: &str) -> OrthoDrawing {
    let mut parser = compaction::text::DrawingParser::new(program);
    match parser.process() {
        Ok(drawing) => drawing.build().unwrap(),
        Err(err) => {
            parser.print_error();
            panic!("{}", err);
        }
    }
}
