//! SVG rendering backend. Draw calls are collected as SVG elements and
//! `finalize` wraps them in a document whose view box fits the drawing.

use crate::core::format::RenderBackend;
use crate::core::geometry::Point;
use crate::core::style::{Color, LineStyleKind, StyleAttr};
use std::collections::BTreeSet;
use std::fmt::Write;

static SVG_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#;

static SVG_FOOTER: &str = "</svg>";

/// The empty space around the drawn elements.
const PAD: f64 = 5.;

fn escape_string(x: &str) -> String {
    let mut res = String::with_capacity(x.len());
    for c in x.chars() {
        match c {
            '&' => res.push_str("&amp;"),
            '<' => res.push_str("&lt;"),
            '>' => res.push_str("&gt;"),
            '"' => res.push_str("&quot;"),
            '\'' => res.push_str("&apos;"),
            _ => res.push(c),
        }
    }
    res
}

/// \returns the stroke attributes of \p look.
fn stroke_of(look: &StyleAttr) -> String {
    let mut res = format!(
        "stroke=\"{}\" stroke-width=\"{}\"",
        look.line_color.to_web_color(),
        look.line_width
    );
    if look.line_style == LineStyleKind::Dashed {
        res.push_str(" stroke-dasharray=\"5,5\"");
    }
    res
}

fn fill_of(look: &StyleAttr) -> String {
    let fill = look.fill_color.unwrap_or_else(Color::transparent);
    format!("fill=\"{}\"", fill.to_web_color())
}

pub struct SVGWriter {
    content: String,
    // The smallest box that contains everything that was drawn.
    lo: Point,
    hi: Point,
    font_sizes: BTreeSet<usize>,
}

impl SVGWriter {
    pub fn new() -> SVGWriter {
        SVGWriter {
            content: String::new(),
            lo: Point::splat(f64::INFINITY),
            hi: Point::splat(f64::NEG_INFINITY),
            font_sizes: BTreeSet::new(),
        }
    }
}

impl Default for SVGWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SVGWriter {
    // Grow the view box to include the box at \p center with the half
    // extent \p half.
    fn grow_window(&mut self, center: Point, half: Point) {
        self.lo.x = self.lo.x.min(center.x - half.x);
        self.lo.y = self.lo.y.min(center.y - half.y);
        self.hi.x = self.hi.x.max(center.x + half.x);
        self.hi.y = self.hi.y.max(center.y + half.y);
    }

    /// \returns the view box as (x, y, width, height).
    fn view_box(&self) -> (f64, f64, f64, f64) {
        if self.lo.x > self.hi.x {
            return (0., 0., 0., 0.);
        }
        // The origin is always in view.
        let x = (self.lo.x - PAD).min(0.);
        let y = (self.lo.y - PAD).min(0.);
        (x, y, self.hi.x + PAD - x, self.hi.y + PAD - y)
    }

    fn emit_font_styles(&self) -> String {
        let mut content = String::from("<style>\n");
        for size in self.font_sizes.iter() {
            let _ = writeln!(
                content,
                ".a{} {{ font-size: {}px; font-family: Times, serif; }}",
                size, size
            );
        }
        content.push_str("</style>\n");
        content
    }

    pub fn finalize(&self) -> String {
        let (x, y, w, h) = self.view_box();
        let mut result = String::from(SVG_HEADER);
        let _ = writeln!(
            result,
            "<svg width=\"{}\" height=\"{}\" viewBox=\"{} {} {} {}\" \
            xmlns=\"http://www.w3.org/2000/svg\">",
            w, h, x, y, w, h
        );
        result.push_str(&self.emit_font_styles());
        result.push_str(&self.content);
        result.push_str(SVG_FOOTER);
        result
    }
}

impl RenderBackend for SVGWriter {
    fn draw_rect(&mut self, xy: Point, size: Point, look: &StyleAttr) {
        let half = size.scale(0.5);
        self.grow_window(Point::new(xy.x + half.x, xy.y + half.y), half);
        let _ = writeln!(
            self.content,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" {} {} />",
            xy.x,
            xy.y,
            size.x,
            size.y,
            fill_of(look),
            stroke_of(look)
        );
    }

    fn draw_line(&mut self, start: Point, stop: Point, look: &StyleAttr) {
        self.grow_window(start, Point::zero());
        self.grow_window(stop, Point::zero());
        let _ = writeln!(
            self.content,
            "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" {} />",
            start.x,
            start.y,
            stop.x,
            stop.y,
            stroke_of(look)
        );
    }

    fn draw_circle(&mut self, xy: Point, size: Point, look: &StyleAttr) {
        let half = size.scale(0.5);
        self.grow_window(xy, half);
        let _ = writeln!(
            self.content,
            "<ellipse cx=\"{}\" cy=\"{}\" rx=\"{}\" ry=\"{}\" {} {} />",
            xy.x,
            xy.y,
            half.x,
            half.y,
            fill_of(look),
            stroke_of(look)
        );
    }

    fn draw_text(&mut self, xy: Point, text: &str, look: &StyleAttr) {
        self.font_sizes.insert(look.font_size);
        // Roughly half a character per font pixel.
        let width = text.chars().count() as f64 * look.font_size as f64 / 2.;
        self.grow_window(xy, Point::new(width / 2., look.font_size as f64 / 2.));
        let _ = writeln!(
            self.content,
            "<text dominant-baseline=\"middle\" text-anchor=\"middle\" \
            x=\"{}\" y=\"{}\" class=\"a{}\">{}</text>",
            xy.x,
            xy.y,
            look.font_size,
            escape_string(text)
        );
    }
}

#[test]
fn test_svg_output() {
    let mut svg = SVGWriter::new();
    let look = StyleAttr::simple();
    svg.draw_rect(Point::new(10., 10.), Point::new(30., 20.), &look);
    svg.draw_line(Point::zero(), Point::new(100., 0.), &look.clone().dashed());
    svg.draw_text(Point::new(25., 20.), "a<b", &look);
    let out = svg.finalize();
    assert!(out.starts_with(SVG_HEADER));
    assert!(out.ends_with(SVG_FOOTER));
    assert!(out.contains("a&lt;b"));
    assert!(out.contains("stroke-dasharray"));
    assert!(out.contains(".a15 {"));
    assert!(out.contains("viewBox=\"-5 -5 110 40\""));
}

#[test]
fn test_negative_coordinates() {
    let mut svg = SVGWriter::new();
    let look = StyleAttr::line("black");
    svg.draw_circle(Point::new(-10., -20.), Point::splat(4.), &look);
    svg.draw_line(Point::new(-10., -20.), Point::new(40., -20.), &look);
    assert!(svg.finalize().contains("viewBox=\"-17 -27 62 14\""));
    assert!(SVGWriter::new().finalize().contains("viewBox=\"0 0 0 0\""));
}
