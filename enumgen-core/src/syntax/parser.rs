//! Top-level Go declaration parser.
//!
//! Parses the package clause, imports and every top-level declaration.
//! Function signatures/bodies and initializer expressions are skipped with
//! balanced-bracket tracking; their text is kept where callers need it.

use std::fmt;

use super::ast::{
    ChanDir, Decl, Expr, FuncDecl, Ident, ImportSpec, SourceFile, TypeExpr, TypeSpec, ValueGroup,
    ValueSpec,
};
use super::lexer::{tokenize, Keyword, LexError, Span, Token, TokenKind};

/// A syntax error with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<LexError> for ParseError {
    fn from(e: LexError) -> Self {
        Self {
            message: e.message,
            line: e.line,
            column: e.column,
        }
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete Go source file.
pub fn parse_file(source: &str) -> ParseResult<SourceFile> {
    let tokens = tokenize(source)?;
    Parser::new(source, tokens).parse_file()
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, tokens: Vec<Token<'a>>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    fn peek(&self) -> Token<'a> {
        self.peek_at(0)
    }

    fn peek_at(&self, n: usize) -> Token<'a> {
        let idx = (self.pos + n).min(self.tokens.len().saturating_sub(1));
        self.tokens[idx]
    }

    fn bump(&mut self) -> Token<'a> {
        let tok = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().kind == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn error_at(&self, tok: Token<'_>, message: impl Into<String>) -> ParseError {
        ParseError {
            message: message.into(),
            line: tok.span.line,
            column: tok.span.column,
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let tok = self.peek();
        let found = match tok.kind {
            TokenKind::Eof => "EOF".to_string(),
            TokenKind::Semicolon if tok.text == "\n" || tok.text.is_empty() => "newline".to_string(),
            _ => format!("'{}'", tok.text),
        };
        self.error_at(tok, format!("expected {}, found {}", expected, found))
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> ParseResult<Token<'a>> {
        if self.peek().kind == kind {
            Ok(self.bump())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self) -> ParseResult<Ident> {
        let tok = self.expect(TokenKind::Ident, "identifier")?;
        Ok(Ident {
            name: tok.text.to_string(),
            span: tok.span,
        })
    }

    /// A declaration ends at `;`, or right before a closing `)` / EOF.
    fn expect_terminator(&mut self) -> ParseResult<()> {
        match self.peek().kind {
            TokenKind::Semicolon => {
                self.bump();
                Ok(())
            }
            TokenKind::RParen | TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("';' or newline")),
        }
    }

    fn parse_file(&mut self) -> ParseResult<SourceFile> {
        while self.eat(TokenKind::Semicolon) {}
        self.expect(TokenKind::Keyword(Keyword::Package), "'package'")?;
        let package = self.expect_ident()?;
        self.expect_terminator()?;

        let mut imports = Vec::new();
        let mut decls = Vec::new();

        loop {
            let tok = self.peek();
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Semicolon => {
                    self.bump();
                    continue;
                }
                TokenKind::Keyword(Keyword::Import) => {
                    if !decls.is_empty() {
                        return Err(
                            self.error_at(tok, "imports must appear before other declarations")
                        );
                    }
                    self.parse_import_decl(&mut imports)?;
                }
                TokenKind::Keyword(Keyword::Const) => {
                    decls.push(Decl::Const(self.parse_value_group()?));
                }
                TokenKind::Keyword(Keyword::Var) => {
                    decls.push(Decl::Var(self.parse_value_group()?));
                }
                TokenKind::Keyword(Keyword::Type) => {
                    decls.push(Decl::Type(self.parse_type_decl()?));
                }
                TokenKind::Keyword(Keyword::Func) => {
                    decls.push(Decl::Func(self.parse_func_decl()?));
                }
                _ => {
                    return Err(self.error_at(tok, "non-declaration statement outside function body"))
                }
            }
            if self.peek().kind != TokenKind::Eof {
                self.expect(TokenKind::Semicolon, "';' or newline after top level declaration")?;
            }
        }

        Ok(SourceFile {
            package,
            imports,
            decls,
        })
    }

    // ------------------------------------------------------------------
    // Imports
    // ------------------------------------------------------------------

    fn parse_import_decl(&mut self, imports: &mut Vec<ImportSpec>) -> ParseResult<()> {
        self.bump();
        if self.eat(TokenKind::LParen) {
            loop {
                while self.eat(TokenKind::Semicolon) {}
                if self.eat(TokenKind::RParen) {
                    break;
                }
                imports.push(self.parse_import_spec()?);
                self.expect_terminator()?;
            }
        } else {
            imports.push(self.parse_import_spec()?);
        }
        Ok(())
    }

    fn parse_import_spec(&mut self) -> ParseResult<ImportSpec> {
        let start = self.peek().span;
        let name = match self.peek().kind {
            TokenKind::Ident => Some(self.bump().text.to_string()),
            TokenKind::Dot => {
                self.bump();
                Some(".".to_string())
            }
            _ => None,
        };
        let path_tok = self.expect(TokenKind::Str, "import path")?;
        let path = unquote(path_tok.text);
        if path.is_empty() {
            return Err(self.error_at(path_tok, "invalid import path: empty"));
        }
        Ok(ImportSpec {
            name,
            path,
            span: start,
        })
    }

    // ------------------------------------------------------------------
    // const / var
    // ------------------------------------------------------------------

    fn parse_value_group(&mut self) -> ParseResult<ValueGroup> {
        let span = self.bump().span;
        if self.eat(TokenKind::LParen) {
            let mut specs = Vec::new();
            loop {
                while self.eat(TokenKind::Semicolon) {}
                if self.eat(TokenKind::RParen) {
                    break;
                }
                specs.push(self.parse_value_spec()?);
                self.expect_terminator()?;
            }
            Ok(ValueGroup {
                grouped: true,
                specs,
                span,
            })
        } else {
            Ok(ValueGroup {
                grouped: false,
                specs: vec![self.parse_value_spec()?],
                span,
            })
        }
    }

    fn parse_value_spec(&mut self) -> ParseResult<ValueSpec> {
        let mut names = vec![self.expect_ident()?];
        while self.eat(TokenKind::Comma) {
            names.push(self.expect_ident()?);
        }

        let ty = match self.peek().kind {
            TokenKind::Assign | TokenKind::Semicolon | TokenKind::RParen | TokenKind::Eof => None,
            _ => Some(self.parse_type()?),
        };

        let values = if self.eat(TokenKind::Assign) {
            self.parse_expr_list()?
        } else {
            Vec::new()
        };

        Ok(ValueSpec { names, ty, values })
    }

    fn parse_expr_list(&mut self) -> ParseResult<Vec<Expr>> {
        let mut values = vec![self.parse_expr()?];
        while self.eat(TokenKind::Comma) {
            values.push(self.parse_expr()?);
        }
        Ok(values)
    }

    /// Skips one expression, stopping at a depth-0 `,`, `;` or closing bracket.
    fn parse_expr(&mut self) -> ParseResult<Expr> {
        let first = self.peek();
        let mut last: Option<Span> = None;
        let mut depth = 0usize;
        loop {
            let tok = self.peek();
            match tok.kind {
                TokenKind::Eof => {
                    if depth > 0 {
                        return Err(self.unexpected("closing bracket"));
                    }
                    break;
                }
                TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Comma | TokenKind::Semicolon if depth == 0 => break,
                _ => {}
            }
            last = Some(self.bump().span);
        }

        let Some(last) = last else {
            return Err(self.unexpected("expression"));
        };
        Ok(Expr {
            text: self.source[first.span.start..last.end].trim().to_string(),
            span: Span {
                start: first.span.start,
                end: last.end,
                line: first.span.line,
                column: first.span.column,
            },
        })
    }

    // ------------------------------------------------------------------
    // type
    // ------------------------------------------------------------------

    fn parse_type_decl(&mut self) -> ParseResult<Vec<TypeSpec>> {
        self.bump();
        if self.eat(TokenKind::LParen) {
            let mut specs = Vec::new();
            loop {
                while self.eat(TokenKind::Semicolon) {}
                if self.eat(TokenKind::RParen) {
                    break;
                }
                specs.push(self.parse_type_spec()?);
                self.expect_terminator()?;
            }
            Ok(specs)
        } else {
            Ok(vec![self.parse_type_spec()?])
        }
    }

    fn parse_type_spec(&mut self) -> ParseResult<TypeSpec> {
        let name = self.expect_ident()?;
        let generic = self.peek().kind == TokenKind::LBrack && self.looks_like_type_params();
        if generic {
            self.skip_balanced()?;
        }
        let alias = self.eat(TokenKind::Assign);
        let ty = self.parse_type()?;
        Ok(TypeSpec {
            name,
            alias,
            generic,
            ty,
        })
    }

    /// Distinguishes `type S[T any] ...` from the array type `type A [N]int`.
    fn looks_like_type_params(&self) -> bool {
        let first = self.peek_at(1);
        let second = self.peek_at(2);
        if first.kind != TokenKind::Ident {
            return false;
        }
        match second.kind {
            TokenKind::Ident | TokenKind::Comma | TokenKind::LBrack => true,
            TokenKind::Keyword(k) => matches!(
                k,
                Keyword::Interface | Keyword::Func | Keyword::Map | Keyword::Chan | Keyword::Struct
            ),
            TokenKind::Operator if second.text == "~" => true,
            // `[N * 2]` and `[P *C]` are array lengths; `[P *C,]` is a parameter list.
            TokenKind::Operator if second.text == "*" => self.bracket_has_top_level_comma(),
            TokenKind::LParen => self.bracket_has_top_level_comma(),
            _ => false,
        }
    }

    /// Whether the bracket opened at the current token holds a comma outside
    /// any nested bracket.
    fn bracket_has_top_level_comma(&self) -> bool {
        let mut depth = 0usize;
        let mut n = 0;
        loop {
            let tok = self.peek_at(n);
            match tok.kind {
                TokenKind::LBrack | TokenKind::LParen | TokenKind::LBrace => depth += 1,
                TokenKind::RBrack | TokenKind::RParen | TokenKind::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return false;
                    }
                }
                TokenKind::Comma if depth == 1 => return true,
                TokenKind::Eof => return false,
                _ => {}
            }
            n += 1;
        }
    }

    fn starts_type(tok: Token<'_>) -> bool {
        match tok.kind {
            TokenKind::Ident | TokenKind::LBrack | TokenKind::LParen => true,
            TokenKind::Keyword(k) => matches!(
                k,
                Keyword::Map | Keyword::Chan | Keyword::Func | Keyword::Struct | Keyword::Interface
            ),
            TokenKind::Operator => tok.text == "*" || tok.text == "<-",
            _ => false,
        }
    }

    fn parse_type(&mut self) -> ParseResult<TypeExpr> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Ident => {
                let first = self.expect_ident()?;
                let base = if self.peek().kind == TokenKind::Dot
                    && self.peek_at(1).kind == TokenKind::Ident
                {
                    self.bump();
                    let name = self.expect_ident()?;
                    TypeExpr::Qualified {
                        package: first,
                        name,
                    }
                } else {
                    TypeExpr::Name(first)
                };
                if self.eat(TokenKind::LBrack) {
                    let mut args = vec![self.parse_type()?];
                    while self.eat(TokenKind::Comma) {
                        if self.peek().kind == TokenKind::RBrack {
                            break;
                        }
                        args.push(self.parse_type()?);
                    }
                    self.expect(TokenKind::RBrack, "']'")?;
                    return Ok(TypeExpr::Generic {
                        base: Box::new(base),
                        args,
                    });
                }
                Ok(base)
            }
            TokenKind::Operator if tok.text == "*" => {
                self.bump();
                Ok(TypeExpr::Pointer(Box::new(self.parse_type()?)))
            }
            TokenKind::Operator if tok.text == "<-" => {
                self.bump();
                self.expect(TokenKind::Keyword(Keyword::Chan), "'chan'")?;
                Ok(TypeExpr::Chan {
                    dir: ChanDir::Recv,
                    elem: Box::new(self.parse_type()?),
                })
            }
            TokenKind::LBrack => {
                if self.peek_at(1).kind == TokenKind::RBrack {
                    self.bump();
                    self.bump();
                    return Ok(TypeExpr::Slice(Box::new(self.parse_type()?)));
                }
                let len = if self.peek_at(1).kind == TokenKind::Ellipsis
                    && self.peek_at(2).kind == TokenKind::RBrack
                {
                    self.bump();
                    self.bump();
                    self.bump();
                    "...".to_string()
                } else {
                    let (start, end) = self.skip_balanced()?;
                    self.source[start + 1..end - 1].trim().to_string()
                };
                Ok(TypeExpr::Array {
                    len,
                    elem: Box::new(self.parse_type()?),
                })
            }
            TokenKind::Keyword(Keyword::Map) => {
                self.bump();
                self.expect(TokenKind::LBrack, "'['")?;
                let key = self.parse_type()?;
                self.expect(TokenKind::RBrack, "']'")?;
                let value = self.parse_type()?;
                Ok(TypeExpr::Map {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            TokenKind::Keyword(Keyword::Chan) => {
                self.bump();
                let dir = if self.peek().is_op("<-") {
                    self.bump();
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Ok(TypeExpr::Chan {
                    dir,
                    elem: Box::new(self.parse_type()?),
                })
            }
            TokenKind::Keyword(Keyword::Func) => {
                let start = self.pos;
                self.bump();
                if self.peek().kind != TokenKind::LParen {
                    return Err(self.unexpected("'('"));
                }
                self.skip_balanced()?;
                if self.peek().kind == TokenKind::LParen {
                    self.skip_balanced()?;
                } else if Self::starts_type(self.peek()) {
                    self.parse_type()?;
                }
                Ok(TypeExpr::Func(self.joined_text(start, self.pos)))
            }
            TokenKind::Keyword(Keyword::Struct) | TokenKind::Keyword(Keyword::Interface) => {
                let start = self.pos;
                self.bump();
                if self.peek().kind != TokenKind::LBrace {
                    return Err(self.unexpected("'{'"));
                }
                self.skip_balanced()?;
                let text = self.joined_text(start, self.pos);
                Ok(if tok.is_keyword(Keyword::Struct) {
                    TypeExpr::Struct(text)
                } else {
                    TypeExpr::Interface(text)
                })
            }
            TokenKind::LParen => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(TypeExpr::Paren(Box::new(inner)))
            }
            _ => Err(self.unexpected("type")),
        }
    }

    // ------------------------------------------------------------------
    // func
    // ------------------------------------------------------------------

    fn parse_func_decl(&mut self) -> ParseResult<FuncDecl> {
        self.bump();
        let receiver = if self.peek().kind == TokenKind::LParen {
            let (start, end) = self.skip_balanced()?;
            Some(self.source[start..end].to_string())
        } else {
            None
        };
        let name = self.expect_ident()?;

        let mut prev_kind = TokenKind::Ident;
        loop {
            let tok = self.peek();
            match tok.kind {
                TokenKind::LBrace => {
                    let type_body = matches!(
                        prev_kind,
                        TokenKind::Keyword(Keyword::Struct) | TokenKind::Keyword(Keyword::Interface)
                    );
                    self.skip_balanced()?;
                    if !type_body {
                        break;
                    }
                    prev_kind = TokenKind::RBrace;
                }
                TokenKind::LParen | TokenKind::LBrack => {
                    self.skip_balanced()?;
                    prev_kind = TokenKind::RParen;
                }
                TokenKind::Semicolon | TokenKind::Eof => break,
                TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace => {
                    return Err(self.error_at(tok, format!("unexpected '{}'", tok.text)));
                }
                kind => {
                    self.bump();
                    prev_kind = kind;
                }
            }
        }

        Ok(FuncDecl { name, receiver })
    }

    // ------------------------------------------------------------------
    // helpers
    // ------------------------------------------------------------------

    /// Skips a bracketed region starting at the current opener.
    /// Returns the byte range covering both brackets.
    fn skip_balanced(&mut self) -> ParseResult<(usize, usize)> {
        let open = self.bump();
        let start = open.span.start;
        let mut stack = vec![open.kind];
        loop {
            let tok = self.bump();
            match tok.kind {
                TokenKind::LParen | TokenKind::LBrack | TokenKind::LBrace => stack.push(tok.kind),
                TokenKind::RParen | TokenKind::RBrack | TokenKind::RBrace => {
                    let expected = match stack.pop() {
                        Some(TokenKind::LParen) => TokenKind::RParen,
                        Some(TokenKind::LBrack) => TokenKind::RBrack,
                        _ => TokenKind::RBrace,
                    };
                    if tok.kind != expected {
                        return Err(self.error_at(tok, format!("unexpected '{}'", tok.text)));
                    }
                    if stack.is_empty() {
                        return Ok((start, tok.span.end));
                    }
                }
                TokenKind::Eof => {
                    return Err(self.error_at(open, format!("unclosed '{}'", open.text)));
                }
                _ => {}
            }
        }
    }

    /// Joins the token texts in `[from, to)` with Go-like spacing.
    fn joined_text(&self, from: usize, to: usize) -> String {
        let mut out = String::new();
        let tokens = &self.tokens[from..to];
        for (i, tok) in tokens.iter().enumerate() {
            let next = tokens.get(i + 1);
            if tok.kind == TokenKind::Semicolon {
                if next.is_some_and(|n| n.kind == TokenKind::RBrace) {
                    continue;
                }
                out.push(';');
            } else {
                out.push_str(tok.text);
            }
            let Some(next) = next else { break };
            let glue_after = matches!(
                tok.kind,
                TokenKind::LParen
                    | TokenKind::LBrack
                    | TokenKind::RBrack
                    | TokenKind::LBrace
                    | TokenKind::Dot
            ) || tok.is_op("*")
                || (tok.is_op("<-") && next.is_keyword(Keyword::Chan));
            let glue_before = match next.kind {
                TokenKind::RParen
                | TokenKind::RBrack
                | TokenKind::RBrace
                | TokenKind::Comma
                | TokenKind::Dot
                | TokenKind::Semicolon => true,
                TokenKind::LParen => {
                    matches!(tok.kind, TokenKind::Ident | TokenKind::Keyword(Keyword::Func))
                }
                TokenKind::LBrace => matches!(
                    tok.kind,
                    TokenKind::Keyword(Keyword::Struct) | TokenKind::Keyword(Keyword::Interface)
                ),
                TokenKind::LBrack => tok.is_keyword(Keyword::Map),
                TokenKind::Operator => next.text == "<-" && tok.is_keyword(Keyword::Chan),
                _ => false,
            };
            if !glue_after && !glue_before {
                out.push(' ');
            }
        }
        out
    }
}

/// Strips the quotes of an import path literal.
fn unquote(lit: &str) -> String {
    let inner = lit
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| lit.strip_prefix('`').and_then(|s| s.strip_suffix('`')))
        .unwrap_or(lit);
    inner.replace("\\\"", "\"").replace("\\\\", "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> SourceFile {
        parse_file(src).unwrap()
    }

    #[test]
    fn test_package_clause() {
        let file = parse("package pkg1\n");
        assert_eq!(file.package.name, "pkg1");
        assert!(file.decls.is_empty());
    }

    #[test]
    fn test_missing_package_clause() {
        let err = parse_file("const X = 1\n").unwrap_err();
        assert!(err.message.contains("'package'"));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn test_imports() {
        let file = parse(
            r#"package p

import "fmt"
import (
    str "strings"
    . "example.com/m/dot"
    _ "embed"
)
"#,
        );
        let imports: Vec<_> = file
            .imports
            .iter()
            .map(|i| (i.name.as_deref(), i.path.as_str()))
            .collect();
        assert_eq!(
            imports,
            vec![
                (None, "fmt"),
                (Some("str"), "strings"),
                (Some("."), "example.com/m/dot"),
                (Some("_"), "embed"),
            ]
        );
    }

    #[test]
    fn test_const_group_specs() {
        let file = parse(
            r#"package p

const (
    Active StatusEnum = 0
    Inactive
    Suspended = 2
    A, B StatusEnum = 3, 4
)
"#,
        );
        let group = file.const_groups().next().unwrap();
        assert!(group.grouped);
        assert_eq!(group.specs.len(), 4);

        let active = &group.specs[0];
        assert_eq!(active.names[0].name, "Active");
        assert!(matches!(&active.ty, Some(TypeExpr::Name(id)) if id.name == "StatusEnum"));
        assert_eq!(active.values[0].text, "0");

        assert!(group.specs[1].is_implicit());

        let suspended = &group.specs[2];
        assert!(suspended.ty.is_none());
        assert_eq!(suspended.values.len(), 1);

        let multi = &group.specs[3];
        assert_eq!(multi.names.len(), 2);
        assert_eq!(multi.values.len(), 2);
    }

    #[test]
    fn test_single_const_and_composite_initializer() {
        let file = parse("package p\nconst Archived StatusEnum = 3\nconst X = SomeOtherType{}\n");
        let groups: Vec<_> = file.const_groups().collect();
        assert_eq!(groups.len(), 2);
        assert!(!groups[0].grouped);
        assert_eq!(groups[1].specs[0].values[0].text, "SomeOtherType{}");
        assert!(groups[1].specs[0].ty.is_none());
    }

    #[test]
    fn test_multiline_initializer() {
        let file = parse(
            "package p\nconst (\n    A Kind = iota +\n        1\n    B\n)\n",
        );
        let group = file.const_groups().next().unwrap();
        assert_eq!(group.specs.len(), 2);
        assert_eq!(group.specs[0].values[0].text, "iota +\n        1");
    }

    #[test]
    fn test_type_decls() {
        let file = parse(
            r#"package p

type StatusEnum int
type (
    ColorEnum StatusEnum
    Alias = StatusEnum
    Set[T comparable] map[T]struct{}
    Arr [4]byte
    Remote time.Duration
    Fn func(a int) (string, error)
    Shape struct {
        W, H int // size
    }
)
"#,
        );
        let specs: Vec<_> = file.type_specs().collect();
        assert_eq!(specs.len(), 8);
        assert_eq!(specs[0].ty.render(), "int");
        assert_eq!(specs[1].ty.render(), "StatusEnum");
        assert!(specs[2].alias);
        assert!(specs[3].generic);
        assert_eq!(specs[3].ty.render(), "map[T]struct{}");
        assert!(!specs[4].generic);
        assert_eq!(specs[4].ty.render(), "[4]byte");
        assert_eq!(specs[5].ty.render(), "time.Duration");
        assert_eq!(specs[6].ty.render(), "func(a int) (string, error)");
        assert_eq!(specs[7].ty.render(), "struct{W, H int}");
    }

    #[test]
    fn test_array_length_expressions_are_not_type_params() {
        let file = parse(
            "package p\ntype (\n  A [N * 2]int\n  B [N * M]int\n  C [len(x)]byte\n  D[P *C,] []P\n  E[P ~int | ~uint] []P\n)\n",
        );
        let specs: Vec<_> = file.type_specs().collect();
        assert!(!specs[0].generic);
        assert_eq!(specs[0].ty.render(), "[N * 2]int");
        assert!(!specs[1].generic);
        assert!(!specs[2].generic);
        assert_eq!(specs[2].ty.render(), "[len(x)]byte");
        assert!(specs[3].generic);
        assert_eq!(specs[3].ty.render(), "[]P");
        assert!(specs[4].generic);
    }

    #[test]
    fn test_type_expressions() {
        let file = parse(
            "package p\ntype (\n  A *[]map[string]chan<- int\n  B <-chan (int)\n  C List[int, string]\n  D interface{ M() }\n)\n",
        );
        let specs: Vec<_> = file.type_specs().collect();
        assert_eq!(specs[0].ty.render(), "*[]map[string]chan<- int");
        assert_eq!(specs[1].ty.render(), "<-chan int");
        assert_eq!(specs[2].ty.render(), "List[int, string]");
        assert_eq!(specs[3].ty.render(), "interface{M()}");
    }

    #[test]
    fn test_funcs_are_skipped() {
        let file = parse(
            r#"package p

func (s *Server) Run(ctx context.Context) error {
    if x := f(); x {
        return nil
    }
    return nil
}

func Make() struct{ a int } { return struct{ a int }{} }

func asm(x int) int

const After Kind = 1
"#,
        );
        let funcs: Vec<_> = file
            .decls
            .iter()
            .filter_map(|d| match d {
                Decl::Func(f) => Some(f),
                _ => None,
            })
            .collect();
        assert_eq!(funcs.len(), 3);
        assert_eq!(funcs[0].name.name, "Run");
        assert_eq!(funcs[0].receiver.as_deref(), Some("(s *Server)"));
        assert_eq!(file.const_groups().count(), 1);
    }

    #[test]
    fn test_var_group_with_func_literal() {
        let file = parse(
            "package p\nvar (\n  f = func() int {\n    return 1\n  }\n  g, h int\n)\nconst K Kind = 0\n",
        );
        assert!(matches!(&file.decls[0], Decl::Var(g) if g.specs.len() == 2));
        assert_eq!(file.const_groups().count(), 1);
    }

    #[test]
    fn test_statement_outside_function() {
        let err = parse_file("package p\nx := 1\n").unwrap_err();
        assert!(err.message.contains("non-declaration statement"));
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_unclosed_group() {
        assert!(parse_file("package p\nconst (\n A Kind = 1\n").is_err());
    }

    #[test]
    fn test_import_after_decl_is_error() {
        let err = parse_file("package p\nconst A = 1\nimport \"fmt\"\n").unwrap_err();
        assert!(err.message.contains("imports must appear"));
    }
}
