//! The lexer for the text format of orthogonal drawings.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    EOF,
    Identifier(String),
    Number(i64),
    VertexKW,
    EdgeKW,
    AssocKW,
    GenKW,
    OpenParen,
    CloseParen,
    Comma,
    Semicolon,
    Error(usize),
}

#[derive(Debug, Clone)]
pub struct Lexer {
    input: Vec<char>,
    pub pos: usize,
    pub ch: char,
    /// Where the last token starts.
    pub start: usize,
}

impl Lexer {
    pub fn from_string(input: &str) -> Self {
        let chars = input.chars().collect();
        Lexer::new(chars)
    }

    pub fn new(input: Vec<char>) -> Self {
        let mut l = Self {
            input,
            pos: 0,
            ch: '\0',
            start: 0,
        };
        l.read_char();
        l
    }

    /// \returns the line that contains the last token, and a second line
    /// with a '^' marker under its first character.
    pub fn error_context(&self) -> String {
        let at = self.start.min(self.input.len());
        let start = self.input[..at]
            .iter()
            .rposition(|c| *c == '\n')
            .map_or(0, |p| p + 1);
        let end = self.input[at..]
            .iter()
            .position(|c| *c == '\n')
            .map_or(self.input.len(), |p| at + p);
        let line: String = self.input[start..end].iter().collect();
        format!("{}\n{}^", line, " ".repeat(at - start))
    }

    pub fn print_error(&self) {
        println!("{}", self.error_context());
    }

    pub fn has_next(&self) -> bool {
        self.pos < self.input.len()
    }

    pub fn read_char(&mut self) {
        if !self.has_next() {
            self.ch = '\0';
            // Step past the end so that 'pos' always points one character
            // after 'ch'.
            self.pos = self.input.len() + 1;
        } else {
            self.ch = self.input[self.pos];
            self.pos += 1;
        }
    }

    pub fn skip_whitespace(&mut self) -> bool {
        let mut changed = false;
        while self.ch.is_ascii_whitespace() {
            self.read_char();
            changed = true;
        }
        changed
    }

    /// Skip '#' and '//' line comments and '/* */' block comments.
    pub fn skip_comment(&mut self) -> bool {
        if self.ch == '#' {
            while self.ch != '\n' && self.ch != '\0' {
                self.read_char();
            }
            return true;
        }
        if self.ch != '/' {
            return false;
        }
        match self.input.get(self.pos) {
            Some('/') => {
                while self.ch != '\n' && self.ch != '\0' {
                    self.read_char();
                }
            }
            Some('*') => {
                self.read_char();
                self.read_char();
                let mut prev = '\0';
                while self.ch != '\0' {
                    if prev == '*' && self.ch == '/' {
                        self.read_char();
                        break;
                    }
                    prev = self.ch;
                    self.read_char();
                }
            }
            _ => return false,
        }
        true
    }

    pub fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while self.ch.is_ascii_alphanumeric() || self.ch == '_' || self.ch == '.' {
            result.push(self.ch);
            self.read_char();
        }
        result
    }

    pub fn read_number(&mut self) -> Token {
        let start = self.pos;
        let mut result = String::new();
        while self.ch.is_ascii_digit() {
            result.push(self.ch);
            self.read_char();
        }
        match result.parse::<i64>() {
            Ok(val) => Token::Number(val),
            Err(_) => Token::Error(start),
        }
    }

    pub fn read_string(&mut self) -> Token {
        let mut result = String::new();
        self.read_char();
        while self.ch != '"' {
            if self.ch == '\\' {
                // Consume the escape character.
                self.read_char();
            }
            if self.ch == '\0' {
                // Reached EOF without completing the string
                return Token::Error(self.pos);
            }
            result.push(self.ch);
            self.read_char();
        }
        self.read_char();
        Token::Identifier(result)
    }

    pub fn next_token(&mut self) -> Token {
        let tok: Token;
        while self.skip_comment() || self.skip_whitespace() {}
        self.start = self.pos.saturating_sub(1);
        match self.ch {
            ';' => {
                tok = Token::Semicolon;
            }
            ',' => {
                tok = Token::Comma;
            }
            '(' => {
                tok = Token::OpenParen;
            }
            ')' => {
                tok = Token::CloseParen;
            }
            '"' => {
                return self.read_string();
            }
            '-' => {
                self.read_char();
                if !self.ch.is_ascii_digit() {
                    return Token::Error(self.pos);
                }
                return match self.read_number() {
                    Token::Number(val) => Token::Number(-val),
                    other => other,
                };
            }
            '\0' => {
                return Token::EOF;
            }
            _ => {
                if self.ch.is_ascii_alphabetic() || self.ch == '_' {
                    let name = self.read_identifier();
                    return match name.as_str() {
                        "vertex" => Token::VertexKW,
                        "edge" => Token::EdgeKW,
                        "assoc" => Token::AssocKW,
                        "gen" => Token::GenKW,
                        _ => Token::Identifier(name),
                    };
                }
                if self.ch.is_ascii_digit() {
                    return self.read_number();
                }
                return Token::Error(self.pos);
            }
        }
        self.read_char();
        tok
    }
}

#[test]
fn test_lexer() {
    let mut lexer = Lexer::from_string("vertex a 0 -10 5 5; // note\nedge a b gen (1,2) /* x */;");
    let mut tokens = Vec::new();
    loop {
        let tok = lexer.next_token();
        if tok == Token::EOF {
            break;
        }
        tokens.push(tok);
    }
    assert_eq!(
        tokens,
        vec![
            Token::VertexKW,
            Token::Identifier("a".to_string()),
            Token::Number(0),
            Token::Number(-10),
            Token::Number(5),
            Token::Number(5),
            Token::Semicolon,
            Token::EdgeKW,
            Token::Identifier("a".to_string()),
            Token::Identifier("b".to_string()),
            Token::GenKW,
            Token::OpenParen,
            Token::Number(1),
            Token::Comma,
            Token::Number(2),
            Token::CloseParen,
            Token::Semicolon,
        ]
    );

    let mut lexer = Lexer::from_string("vertex a $");
    lexer.next_token();
    lexer.next_token();
    assert!(matches!(lexer.next_token(), Token::Error(_)));
    assert_eq!(lexer.error_context(), "vertex a $\n         ^");
}
