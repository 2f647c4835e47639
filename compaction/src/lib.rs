/*!
This crate compacts orthogonal drawings. A drawing is a set of boxes and
edges that are made of horizontal and vertical pieces. The crate moves the
boxes and the bends of the edges closer together, without changing the
shape of the drawing: the order of the objects, the bends of the edges and
the crossings all stay the same.

Compaction runs one pass per axis. A pass builds a constraint graph whose
nodes are the maximal horizontal or vertical segments of the drawing, and
solves a minimum cost flow problem on the dual graph of its planar
embedding. The flow gives the cheapest coordinates that keep the segments
apart.

The project also comes with a command line utility that compacts drawings
that are written in a small text format and saves the result as `.svg`.

# Parser example: read a drawing

The text format lists the boxes and the polylines of the edges:

```rust
    use compaction::text::DrawingParser;

    let contents = "vertex a 0 0 20 10; vertex b 60 0 20 10;
                    edge a b (20, 5) (60, 5);";
    let mut parser = DrawingParser::new(contents);
    match parser.process() {
        Result::Err(err) => {
            parser.print_error();
            eprintln!("Error: {}", err);
        }

        Result::Ok(drawing) => {
            assert_eq!(drawing.vertices.len(), 2);
        }
    }
```

A bad input is reported with the offending line, such as:

```txt
vertex a 0 0 20;
               ^
Error: Expected the height (at offset 15)
```

# Compaction example: shrink a drawing and render it

```rust
    use compaction::backends::svg::SVGWriter;
    use compaction::compact::{CompactionOptions, FlowCompaction};
    use compaction::ortho::RoutingChannel;
    use compaction::render::render_drawing;
    use compaction::text::DrawingParser;

    let contents = "vertex a 0 0 20 10; vertex b 60 0 20 10;
                    edge a b (20, 5) (60, 5);";
    let drawing = DrawingParser::new(contents).process().unwrap();

    // Planarize the drawing and compute its orthogonal representation.
    let od = drawing.build().unwrap();
    let mut layout = od.layout.clone();

    // Pull the boxes together, down to the minimum separation.
    let rc = RoutingChannel::new(5);
    let mut fc = FlowCompaction::new(CompactionOptions::new());
    fc.improvement_heuristics(&od.ortho, &od.plan, &rc, &mut layout);

    // Render the result to some rendering backend.
    let mut svg = SVGWriter::new();
    render_drawing(&od.plan, &layout, &mut svg, false);
    let _content = svg.finalize();
```

*/

pub mod adt;
pub mod backends;
pub mod compact;
pub mod core;
pub mod error;
pub mod flow;
pub mod ortho;
pub mod render;
pub mod text;
