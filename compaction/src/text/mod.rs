//! A small text format for orthogonal drawings:
//!
//! ```text
//! vertex NAME X Y WIDTH HEIGHT;
//! edge FROM TO [assoc|gen] (X, Y) (X, Y) ...;
//! ```
//!
//! Vertices are boxes given by their top-left corner. Every edge lists its
//! polyline, from a point on the side of the source box to a point on the
//! side of the target box.

pub mod lexer;
pub mod parser;
pub mod printer;

pub use lexer::Lexer;
pub use lexer::Token;
pub use parser::DrawingParser;
pub use printer::print_drawing;
