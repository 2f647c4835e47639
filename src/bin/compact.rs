//! This is the command line tool that loads drawings, compacts them, and
//! saves the output.

extern crate clap;
extern crate env_logger;
extern crate log;

use clap::{value_parser, Arg, ArgAction, Command};
use compaction::backends::svg::SVGWriter;
use compaction::compact::verifier::check_drawing;
use compaction::compact::{CompactionOptions, FlowCompaction, SvgTrace};
use compaction::core::utils::save_to_file;
use compaction::ortho::{MinimumEdgeDistances, OrthoDrawing};
use compaction::render::render_drawing;
use compaction::text::{print_drawing, DrawingParser};
use std::fs;

struct CLIOptions {
    constructive: bool,
    emit_text: bool,
    separation: i64,
    output_path: String,
    trace_dir: Option<String>,
    debug_mode: bool,
}

fn compact(od: &OrthoDrawing, cli: &CLIOptions, options: CompactionOptions) {
    let mut layout = od.layout.clone();
    let mut min_dist = MinimumEdgeDistances::new(cli.separation);
    let mut fc = FlowCompaction::new(options);
    if let Some(dir) = &cli.trace_dir {
        fc.set_observer(Box::new(SvgTrace::new(dir)));
    }

    if cli.constructive {
        if let Err(err) = od.plan.check_port_spacing(&min_dist) {
            log::error!("Can't compute a drawing from scratch: {}", err);
            return;
        }
        fc.constructive_heuristics(&od.ortho, &od.plan, &min_dist, &mut layout);
        if let Err(err) = check_drawing(od, &layout) {
            log::warn!("Starting from the input drawing: {}", err);
            layout = od.layout.clone();
        }
    }

    let rounds = if options.scaling_steps > 0 {
        fc.improvement_heuristics_scaled(
            &od.ortho,
            &od.plan,
            &mut min_dist,
            &mut layout,
            cli.separation,
        )
    } else {
        fc.improvement_heuristics(&od.ortho, &od.plan, &min_dist, &mut layout)
    };
    log::info!("Finished after {} rounds", rounds);

    if let Err(err) = check_drawing(od, &layout) {
        log::error!("The compacted drawing is broken: {}", err);
    }

    if cli.emit_text {
        print!("{}", print_drawing(&od.to_drawing(&layout)));
    }

    let mut svg = SVGWriter::new();
    render_drawing(&od.plan, &layout, &mut svg, cli.debug_mode);
    let content = svg.finalize();

    let res = save_to_file(&cli.output_path, &content);
    if let Result::Err(err) = res {
        log::error!("Could not write the file {}", cli.output_path);
        log::error!("Error {}", err);
        return;
    }
    log::info!("Wrote {}", cli.output_path);
}

fn main() {
    let matches = Command::new("Compact")
        .version("0.1")
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Mark the ports and bends in the output"),
        )
        .arg(
            Arg::new("emit")
                .long("emit")
                .action(ArgAction::SetTrue)
                .help("Print the compacted drawing as text"),
        )
        .arg(
            Arg::new("constructive")
                .long("constructive")
                .action(ArgAction::SetTrue)
                .help("Recompute the drawing from scratch before improving it"),
        )
        .arg(
            Arg::new("align")
                .long("align")
                .action(ArgAction::SetTrue)
                .help("Keep generalization edges straight once they are placed"),
        )
        .arg(
            Arg::new("separation")
                .short('s')
                .long("separation")
                .value_name("N")
                .value_parser(value_parser!(i64).range(1..))
                .default_value("10")
                .help("Minimum distance between parallel segments"),
        )
        .arg(
            Arg::new("max-steps")
                .long("max-steps")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("0")
                .help("Limit the number of improvement rounds (0 is unlimited)"),
        )
        .arg(
            Arg::new("gen-steps")
                .long("gen-steps")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("3")
                .help("Number of rounds that only shorten generalizations"),
        )
        .arg(
            Arg::new("scaling-steps")
                .long("scaling-steps")
                .value_name("N")
                .value_parser(value_parser!(usize))
                .default_value("0")
                .help("Number of rounds that start from a larger separation"),
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .value_name("DIR")
                .help("Save the constraint graph of every pass to DIR"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .default_value("/tmp/out.svg")
                .help("Path of the output file"),
        )
        .arg(
            Arg::new("INPUT")
                .help("Sets the input file to use")
                .required(true)
                .index(1),
        )
        .get_matches();

    env_logger::builder().format_timestamp(None).init();

    let cli = CLIOptions {
        constructive: matches.get_flag("constructive"),
        emit_text: matches.get_flag("emit"),
        separation: *matches.get_one::<i64>("separation").unwrap(),
        output_path: matches.get_one::<String>("output").unwrap().clone(),
        trace_dir: matches.get_one::<String>("trace").cloned(),
        debug_mode: matches.get_flag("debug"),
    };

    let options = CompactionOptions::new()
        .max_steps(*matches.get_one::<usize>("max-steps").unwrap())
        .num_gen_steps(*matches.get_one::<usize>("gen-steps").unwrap())
        .scaling_steps(*matches.get_one::<usize>("scaling-steps").unwrap())
        .align(matches.get_flag("align"));

    let input_path = matches.get_one::<String>("INPUT").unwrap();
    let contents = fs::read_to_string(input_path).expect("Can't open the file");
    let mut parser = DrawingParser::new(&contents);

    match parser.process() {
        Result::Err(err) => {
            parser.print_error();
            log::error!("Error: {}", err);
        }

        Result::Ok(drawing) => match drawing.build() {
            Result::Err(err) => {
                log::error!("Invalid drawing: {}", err);
            }
            Result::Ok(od) => {
                compact(&od, &cli, options);
            }
        },
    }
}
