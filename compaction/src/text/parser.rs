use super::lexer::Lexer;
use super::lexer::Token;
use crate::error::{Error, Result};
use crate::ortho::builder::{Drawing, EdgeSpec, VertexSpec};
use crate::ortho::plan_rep::EdgeKind;

#[derive(Debug, Clone)]
pub struct DrawingParser {
    lexer: Lexer,
    tok: Token,
}

impl DrawingParser {
    pub fn new(input: &str) -> Self {
        Self {
            lexer: Lexer::from_string(input),
            tok: Token::Semicolon,
        }
    }

    /// Creates an error at the current position.
    fn to_error<T>(&self, msg: &str) -> Result<T> {
        Err(Error::Parse {
            pos: self.lexer.start,
            msg: msg.to_string(),
        })
    }

    pub fn print_error(&self) {
        self.lexer.print_error();
    }

    /// \returns the line of the input where parsing stopped, with a marker.
    pub fn error_context(&self) -> String {
        self.lexer.error_context()
    }

    pub fn lex(&mut self) {
        match self.tok {
            Token::Error(_) => {
                panic!("can't parse after error");
            }
            Token::EOF => {
                panic!("can't parse after EOF");
            }
            _ => {
                // Lex the next token.
                self.tok = self.lexer.next_token();
            }
        }
    }

    fn parse_number(&mut self, what: &str) -> Result<i64> {
        if let Token::Number(val) = self.tok {
            self.lex();
            return Ok(val);
        }
        self.to_error(&format!("Expected {}", what))
    }

    fn parse_name(&mut self, what: &str) -> Result<String> {
        if let Token::Identifier(name) = self.tok.clone() {
            self.lex();
            return Ok(name);
        }
        self.to_error(&format!("Expected {}", what))
    }

    fn expect(&mut self, tok: Token, what: &str) -> Result<()> {
        if self.tok == tok {
            self.lex();
            return Ok(());
        }
        self.to_error(&format!("Expected '{}'", what))
    }

    // vertex : 'vertex' ID NUM NUM NUM NUM ';'
    pub fn parse_vertex(&mut self) -> Result<VertexSpec> {
        self.expect(Token::VertexKW, "vertex")?;
        let name = self.parse_name("a vertex name")?;
        let x = self.parse_number("the x coordinate")?;
        let y = self.parse_number("the y coordinate")?;
        let width = self.parse_number("the width")?;
        let height = self.parse_number("the height")?;
        self.expect(Token::Semicolon, ";")?;
        Ok(VertexSpec::new(&name, x, y, width, height))
    }

    // point : '(' NUM ',' NUM ')'
    pub fn parse_point(&mut self) -> Result<(i64, i64)> {
        self.expect(Token::OpenParen, "(")?;
        let x = self.parse_number("the x coordinate")?;
        self.expect(Token::Comma, ",")?;
        let y = self.parse_number("the y coordinate")?;
        self.expect(Token::CloseParen, ")")?;
        Ok((x, y))
    }

    // edge : 'edge' ID ID [ 'assoc' | 'gen' ] point+ ';'
    pub fn parse_edge(&mut self) -> Result<EdgeSpec> {
        self.expect(Token::EdgeKW, "edge")?;
        let from = self.parse_name("the source vertex")?;
        let to = self.parse_name("the target vertex")?;
        let kind = match self.tok {
            Token::AssocKW => {
                self.lex();
                EdgeKind::Association
            }
            Token::GenKW => {
                self.lex();
                EdgeKind::Generalization
            }
            _ => EdgeKind::Association,
        };

        let mut points = Vec::new();
        while let Token::OpenParen = self.tok {
            points.push(self.parse_point()?);
        }
        if points.is_empty() {
            return self.to_error("Expected the points of the edge");
        }
        self.expect(Token::Semicolon, ";")?;
        Ok(EdgeSpec::new(&from, &to, kind, &points))
    }

    /// Parses a whole drawing: a list of vertex and edge statements.
    pub fn process(&mut self) -> Result<Drawing> {
        self.lex();
        let mut drawing = Drawing::new();
        loop {
            match self.tok {
                Token::VertexKW => {
                    let v = self.parse_vertex()?;
                    drawing.add_vertex(v);
                }
                Token::EdgeKW => {
                    let e = self.parse_edge()?;
                    drawing.add_edge(e);
                }
                Token::Semicolon => {
                    self.lex();
                }
                Token::EOF => {
                    return Ok(drawing);
                }
                _ => {
                    return self.to_error("Expected 'vertex' or 'edge'");
                }
            }
        }
    }
}

#[test]
fn test_parse_drawing() {
    let input = "
        // Two boxes.
        vertex a 0 0 20 10;
        vertex b 40 0 20 10;
        edge a b gen (20, 5) (40, 5);
        edge a b (10, 10) (10, 20) (50, 20) (50, 10);
    ";
    let mut parser = DrawingParser::new(input);
    let d = parser.process().unwrap();
    assert_eq!(d.vertices.len(), 2);
    assert_eq!(d.vertices[1], VertexSpec::new("b", 40, 0, 20, 10));
    assert_eq!(d.edges.len(), 2);
    assert_eq!(d.edges[0].kind, EdgeKind::Generalization);
    assert_eq!(d.edges[1].kind, EdgeKind::Association);
    assert_eq!(d.edges[1].points.len(), 4);
    assert!(d.build().is_ok());
}

#[test]
fn test_parse_errors() {
    let bad = [
        "vertex a 0 0 20;",
        "vertex a 0 0 20 10",
        "edge a b;",
        "edge a b (1 2);",
        "node a;",
        "vertex a 0 0 1 1 $",
    ];
    for input in bad {
        let mut parser = DrawingParser::new(input);
        assert!(
            matches!(parser.process(), Err(Error::Parse { .. })),
            "{}",
            input
        );
    }

    let mut parser = DrawingParser::new("vertex a 0 0 20;\n");
    let err = parser.process().unwrap_err();
    assert_eq!(err.to_string(), "Expected the height (at offset 15)");
    assert_eq!(parser.error_context(), "vertex a 0 0 20;\n               ^");
}
