//! Writes drawings in the text format that the parser reads.

use crate::ortho::builder::Drawing;
use crate::ortho::plan_rep::EdgeKind;

/// Quote names that the lexer would not read back as one identifier.
fn print_name(name: &str) -> String {
    let plain = name
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic() || c == '_')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        && !matches!(name, "vertex" | "edge" | "assoc" | "gen");
    if plain {
        return name.to_string();
    }
    let mut res = String::from("\"");
    for c in name.chars() {
        if c == '"' || c == '\\' {
            res.push('\\');
        }
        res.push(c);
    }
    res.push('"');
    res
}

pub fn print_drawing(d: &Drawing) -> String {
    let mut res = String::new();
    for v in d.vertices.iter() {
        res.push_str(&format!(
            "vertex {} {} {} {} {};\n",
            print_name(&v.name),
            v.x,
            v.y,
            v.width,
            v.height
        ));
    }
    for e in d.edges.iter() {
        let kind = match e.kind {
            EdgeKind::Generalization => " gen",
            _ => "",
        };
        res.push_str(&format!(
            "edge {} {}{}",
            print_name(&e.from),
            print_name(&e.to),
            kind
        ));
        for p in e.points.iter() {
            res.push_str(&format!(" ({}, {})", p.x, p.y));
        }
        res.push_str(";\n");
    }
    res
}

#[test]
fn test_print_and_parse() {
    use super::parser::DrawingParser;
    use crate::ortho::builder::{EdgeSpec, VertexSpec};

    let mut d = Drawing::new();
    d.add_vertex(VertexSpec::new("a", 0, 0, 20, 10));
    d.add_vertex(VertexSpec::new("big box", 40, -10, 20, 30));
    d.add_edge(EdgeSpec::new(
        "a",
        "big box",
        EdgeKind::Generalization,
        &[(20, 5), (40, 5)],
    ));
    let text = print_drawing(&d);
    assert!(text.contains("vertex \"big box\" 40 -10 20 30;"));
    assert!(text.contains("edge a \"big box\" gen (20, 5) (40, 5);"));
    let parsed = DrawingParser::new(&text).process().unwrap();
    assert_eq!(parsed, d);
}
