//! Go source lexer.
//!
//! Converts raw source text into `Token`s carrying byte spans and
//! line/column positions. Semicolons are inserted automatically at line
//! ends following the Go rules, so the parser only ever sees explicit
//! statement terminators.

use std::fmt;

/// Location of a token in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Line number (1-indexed)
    pub line: usize,
    /// Column number in characters (1-indexed)
    pub column: usize,
}

/// Go keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Break,
    Case,
    Chan,
    Const,
    Continue,
    Default,
    Defer,
    Else,
    Fallthrough,
    For,
    Func,
    Go,
    Goto,
    If,
    Import,
    Interface,
    Map,
    Package,
    Range,
    Return,
    Select,
    Struct,
    Switch,
    Type,
    Var,
}

impl Keyword {
    pub fn from_ident(ident: &str) -> Option<Self> {
        Some(match ident {
            "break" => Self::Break,
            "case" => Self::Case,
            "chan" => Self::Chan,
            "const" => Self::Const,
            "continue" => Self::Continue,
            "default" => Self::Default,
            "defer" => Self::Defer,
            "else" => Self::Else,
            "fallthrough" => Self::Fallthrough,
            "for" => Self::For,
            "func" => Self::Func,
            "go" => Self::Go,
            "goto" => Self::Goto,
            "if" => Self::If,
            "import" => Self::Import,
            "interface" => Self::Interface,
            "map" => Self::Map,
            "package" => Self::Package,
            "range" => Self::Range,
            "return" => Self::Return,
            "select" => Self::Select,
            "struct" => Self::Struct,
            "switch" => Self::Switch,
            "type" => Self::Type,
            "var" => Self::Var,
            _ => return None,
        })
    }
}

/// Kinds of Go tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Keyword(Keyword),
    Int,
    Float,
    Imag,
    Char,
    Str,
    /// Any operator not listed separately below (`*`, `<-`, `~`, `+=`, ...)
    Operator,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Ellipsis,
    Assign,
    Semicolon,
    Eof,
}

/// A token paired with its source text and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Source text; `"\n"` or empty for automatically inserted semicolons
    pub text: &'a str,
    pub span: Span,
}

impl Token<'_> {
    /// Whether this is the operator with the given spelling.
    pub fn is_op(&self, op: &str) -> bool {
        self.kind == TokenKind::Operator && self.text == op
    }

    /// Whether this token is the given keyword.
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}

/// Errors that can occur while lexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at {}:{})", self.message, self.line, self.column)
    }
}

impl std::error::Error for LexError {}

/// Convenient alias for lexer results.
pub type LexResult<T> = Result<T, LexError>;

const OPERATORS_3: &[&str] = &["<<=", ">>=", "&^=", "..."];
const OPERATORS_2: &[&str] = &[
    "&&", "||", "<-", "++", "--", "==", "!=", "<=", ">=", ":=", "+=", "-=", "*=", "/=", "%=",
    "&=", "|=", "^=", "<<", ">>", "&^",
];

/// Pull-based lexer producing tokens from a source string.
pub struct Lexer<'a> {
    source: &'a str,
    cursor: usize,
    line: usize,
    column: usize,
    /// Whether a newline at this point terminates a statement
    insert_semi: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer positioned at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        let cursor = if source.starts_with('\u{feff}') { 3 } else { 0 };
        Self {
            source,
            cursor,
            line: 1,
            column: 1,
            insert_semi: false,
            finished: false,
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.cursor..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.source[self.cursor..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            message: message.into(),
            line: self.line,
            column: self.column,
        }
    }

    fn span_from(&self, start: usize, line: usize, column: usize) -> Span {
        Span {
            start,
            end: self.cursor,
            line,
            column,
        }
    }

    fn implicit_semicolon(&mut self, text: &'a str) -> Token<'a> {
        self.insert_semi = false;
        Token {
            kind: TokenKind::Semicolon,
            text,
            span: Span {
                start: self.cursor,
                end: self.cursor,
                line: self.line,
                column: self.column,
            },
        }
    }

    /// Skips whitespace and comments. Returns an implicit semicolon when a
    /// line break ends a statement.
    fn skip_trivia(&mut self) -> LexResult<Option<Token<'a>>> {
        loop {
            match self.peek() {
                Some('\n') => {
                    if self.insert_semi {
                        let tok = self.implicit_semicolon("\n");
                        self.bump();
                        return Ok(Some(tok));
                    }
                    self.bump();
                }
                Some(' ' | '\t' | '\r') => {
                    self.bump();
                }
                Some('/') if self.peek_nth(1) == Some('/') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('/') if self.peek_nth(1) == Some('*') => {
                    let (line, column) = (self.line, self.column);
                    self.bump();
                    self.bump();
                    let mut had_newline = false;
                    loop {
                        match self.bump() {
                            Some('*') if self.peek() == Some('/') => {
                                self.bump();
                                break;
                            }
                            Some('\n') => had_newline = true,
                            Some(_) => {}
                            None => {
                                return Err(LexError {
                                    message: "comment not terminated".to_string(),
                                    line,
                                    column,
                                })
                            }
                        }
                    }
                    if had_newline && self.insert_semi {
                        return Ok(Some(self.implicit_semicolon("\n")));
                    }
                }
                _ => return Ok(None),
            }
        }
    }

    /// Pull the next token from the stream.
    pub fn next_token(&mut self) -> LexResult<Token<'a>> {
        if let Some(semi) = self.skip_trivia()? {
            return Ok(semi);
        }

        let (start, line, column) = (self.cursor, self.line, self.column);
        let Some(c) = self.peek() else {
            if self.insert_semi {
                return Ok(self.implicit_semicolon(""));
            }
            self.finished = true;
            return Ok(Token {
                kind: TokenKind::Eof,
                text: "",
                span: self.span_from(start, line, column),
            });
        };

        let kind = if c.is_alphabetic() || c == '_' {
            self.lex_ident(start)
        } else if c.is_ascii_digit()
            || (c == '.' && self.peek_nth(1).is_some_and(|n| n.is_ascii_digit()))
        {
            self.lex_number()
        } else if c == '"' {
            self.lex_interpreted('"', TokenKind::Str, "string literal not terminated")?
        } else if c == '\'' {
            self.lex_interpreted('\'', TokenKind::Char, "rune literal not terminated")?
        } else if c == '`' {
            self.lex_raw_string(line, column)?
        } else {
            self.lex_punct(c)?
        };

        let text = &self.source[start..self.cursor];
        self.insert_semi = match kind {
            TokenKind::Ident
            | TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imag
            | TokenKind::Char
            | TokenKind::Str
            | TokenKind::RParen
            | TokenKind::RBrack
            | TokenKind::RBrace => true,
            TokenKind::Keyword(k) => matches!(
                k,
                Keyword::Break | Keyword::Continue | Keyword::Fallthrough | Keyword::Return
            ),
            TokenKind::Operator => text == "++" || text == "--",
            _ => false,
        };

        Ok(Token {
            kind,
            text,
            span: self.span_from(start, line, column),
        })
    }

    fn lex_ident(&mut self, start: usize) -> TokenKind {
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        match Keyword::from_ident(&self.source[start..self.cursor]) {
            Some(k) => TokenKind::Keyword(k),
            None => TokenKind::Ident,
        }
    }

    fn lex_number(&mut self) -> TokenKind {
        let mut kind = TokenKind::Int;
        let mut hex = false;
        if self.peek() == Some('0') {
            match self.peek_nth(1) {
                Some('x' | 'X') => {
                    hex = true;
                    self.bump();
                    self.bump();
                }
                Some('b' | 'B' | 'o' | 'O') => {
                    self.bump();
                    self.bump();
                }
                _ => {}
            }
        }

        while let Some(c) = self.peek() {
            let exponent = if hex {
                matches!(c, 'p' | 'P')
            } else {
                matches!(c, 'e' | 'E')
            };
            if exponent {
                kind = TokenKind::Float;
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
            } else if c == 'i' {
                self.bump();
                kind = TokenKind::Imag;
                break;
            } else if c.is_ascii_alphanumeric() || c == '_' {
                self.bump();
            } else if c == '.' && self.peek_nth(1) != Some('.') {
                kind = TokenKind::Float;
                self.bump();
            } else {
                break;
            }
        }
        kind
    }

    fn lex_interpreted(
        &mut self,
        quote: char,
        kind: TokenKind,
        unterminated: &str,
    ) -> LexResult<TokenKind> {
        self.bump();
        loop {
            match self.peek() {
                None | Some('\n') => return Err(self.error(unterminated)),
                Some('\\') => {
                    self.bump();
                    if self.bump().is_none() {
                        return Err(self.error(unterminated));
                    }
                }
                Some(c) => {
                    self.bump();
                    if c == quote {
                        return Ok(kind);
                    }
                }
            }
        }
    }

    fn lex_raw_string(&mut self, line: usize, column: usize) -> LexResult<TokenKind> {
        self.bump();
        loop {
            match self.bump() {
                Some('`') => return Ok(TokenKind::Str),
                Some(_) => {}
                None => {
                    return Err(LexError {
                        message: "raw string literal not terminated".to_string(),
                        line,
                        column,
                    })
                }
            }
        }
    }

    fn lex_punct(&mut self, c: char) -> LexResult<TokenKind> {
        let rest = &self.source[self.cursor..];
        if let Some(op) = OPERATORS_3.iter().find(|op| rest.starts_with(**op)) {
            for _ in 0..op.len() {
                self.bump();
            }
            return Ok(if *op == "..." {
                TokenKind::Ellipsis
            } else {
                TokenKind::Operator
            });
        }
        if let Some(op) = OPERATORS_2.iter().find(|op| rest.starts_with(**op)) {
            for _ in 0..op.len() {
                self.bump();
            }
            return Ok(TokenKind::Operator);
        }

        let kind = match c {
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBrack,
            ']' => TokenKind::RBrack,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            '.' => TokenKind::Dot,
            '=' => TokenKind::Assign,
            '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '<' | '>' | '!' | ':' | '~' => {
                TokenKind::Operator
            }
            other => return Err(self.error(format!("invalid character {:?}", other))),
        };
        self.bump();
        Ok(kind)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = LexResult<Token<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        Some(self.next_token())
    }
}

/// Tokenizes a whole source file, ending with a single `Eof` token.
pub fn tokenize(source: &str) -> LexResult<Vec<Token<'_>>> {
    Lexer::new(source).collect()
}
