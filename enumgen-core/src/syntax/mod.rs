//! Go source syntax: lexer, top-level declaration parser and syntax tree.

pub mod ast;
pub mod lexer;
pub mod parser;

pub use ast::{
    ChanDir, Decl, Expr, FuncDecl, Ident, ImportSpec, SourceFile, TypeExpr, TypeSpec, ValueGroup,
    ValueSpec,
};
pub use lexer::{LexError, Span};
pub use parser::{parse_file, ParseError, ParseResult};
