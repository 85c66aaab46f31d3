//! Syntax tree for the top-level structure of a Go source file.
//!
//! Only what the loader and extractor need is modelled in detail:
//! imports, `const`/`var` groups and `type` declarations. Function bodies
//! and initializer expressions are kept as source text.

use super::lexer::Span;

/// An identifier with its location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    /// The blank identifier `_`.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}

/// An expression kept as its (trimmed) source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expr {
    pub text: String,
    pub span: Span,
}

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `Name`
    Name(Ident),
    /// `pkg.Name`
    Qualified { package: Ident, name: Ident },
    /// `Name[T1, T2]`
    Generic { base: Box<TypeExpr>, args: Vec<TypeExpr> },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T`
    Slice(Box<TypeExpr>),
    /// `[N]T` or `[...]T`
    Array { len: String, elem: Box<TypeExpr> },
    /// `map[K]V`
    Map { key: Box<TypeExpr>, value: Box<TypeExpr> },
    /// `chan T`, `chan<- T`, `<-chan T`
    Chan { dir: ChanDir, elem: Box<TypeExpr> },
    /// `func(...) ...`, kept as normalized source text
    Func(String),
    /// `struct { ... }`, kept as normalized source text
    Struct(String),
    /// `interface { ... }`, kept as normalized source text
    Interface(String),
    /// `(T)`
    Paren(Box<TypeExpr>),
}

/// Channel direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

impl TypeExpr {
    /// Strips any number of enclosing parentheses.
    pub fn unparen(&self) -> &TypeExpr {
        let mut ty = self;
        while let TypeExpr::Paren(inner) = ty {
            ty = inner;
        }
        ty
    }

    /// Renders the type the way `go/types` prints it (modulo whitespace
    /// inside func/struct/interface bodies).
    pub fn render(&self) -> String {
        match self {
            TypeExpr::Name(id) => id.name.clone(),
            TypeExpr::Qualified { package, name } => format!("{}.{}", package.name, name.name),
            TypeExpr::Generic { base, args } => {
                let args: Vec<String> = args.iter().map(TypeExpr::render).collect();
                format!("{}[{}]", base.render(), args.join(", "))
            }
            TypeExpr::Pointer(elem) => format!("*{}", elem.render()),
            TypeExpr::Slice(elem) => format!("[]{}", elem.render()),
            TypeExpr::Array { len, elem } => format!("[{}]{}", len, elem.render()),
            TypeExpr::Map { key, value } => format!("map[{}]{}", key.render(), value.render()),
            TypeExpr::Chan { dir, elem } => match dir {
                ChanDir::Both => format!("chan {}", elem.render()),
                ChanDir::Send => format!("chan<- {}", elem.render()),
                ChanDir::Recv => format!("<-chan {}", elem.render()),
            },
            TypeExpr::Func(text) | TypeExpr::Struct(text) | TypeExpr::Interface(text) => {
                text.clone()
            }
            TypeExpr::Paren(inner) => inner.render(),
        }
    }
}

/// One spec of a `const` or `var` declaration: `A, B T = 1, 2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub ty: Option<TypeExpr>,
    pub values: Vec<Expr>,
}

impl ValueSpec {
    /// A spec with neither a type nor an initializer repeats the previous
    /// spec of its group.
    pub fn is_implicit(&self) -> bool {
        self.ty.is_none() && self.values.is_empty()
    }
}

/// A `const`/`var` declaration: either a single spec or a parenthesized group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueGroup {
    /// Whether the specs were written inside `( ... )`
    pub grouped: bool,
    pub specs: Vec<ValueSpec>,
    pub span: Span,
}

/// One spec of a `type` declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub name: Ident,
    /// `type A = B`
    pub alias: bool,
    /// Declares type parameters: `type S[T any] ...`
    pub generic: bool,
    pub ty: TypeExpr,
}

/// An import spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpec {
    /// Explicit name: an identifier, `.` or `_`
    pub name: Option<String>,
    /// Unquoted import path
    pub path: String,
    pub span: Span,
}

/// A function or method declaration. Signature and body are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuncDecl {
    pub name: Ident,
    /// Receiver parameter list text, for methods
    pub receiver: Option<String>,
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decl {
    Const(ValueGroup),
    Var(ValueGroup),
    Type(Vec<TypeSpec>),
    Func(FuncDecl),
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub package: Ident,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<Decl>,
}

impl SourceFile {
    /// Iterates over the `const` declaration groups in source order.
    pub fn const_groups(&self) -> impl Iterator<Item = &ValueGroup> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Const(group) => Some(group),
            _ => None,
        })
    }

    /// Iterates over all type specs in source order.
    pub fn type_specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.decls
            .iter()
            .filter_map(|decl| match decl {
                Decl::Type(specs) => Some(specs.iter()),
                _ => None,
            })
            .flatten()
    }
}
