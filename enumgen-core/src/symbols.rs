//! Package-level type symbols and type resolution.
//!
//! The table holds every `type` declaration of the loaded packages, one
//! scope per package (directory plus package name) and one import scope
//! per file. Resolution follows alias declarations transparently and
//! named-type chains down to their underlying representation.
//!
//! Types from packages outside the loaded module (the standard library,
//! other modules) cannot be seen into: they count as named types whose
//! underlying representation is their qualified spelling.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::syntax::{Span, TypeExpr, TypeSpec};

/// Index of a type declaration in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub usize);

/// Index of a file's import scope in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FileId(pub usize);

/// A package: its directory and the name in its package clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageKey {
    pub dir: PathBuf,
    pub name: String,
}

/// A `type` declaration.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub name: String,
    pub package: PackageKey,
    pub alias: bool,
    pub generic: bool,
    pub ty: TypeExpr,
    pub file: FileId,
    pub path: PathBuf,
    pub span: Span,
}

/// What an import declaration refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportTarget {
    /// A loaded package of the current module
    Package(PackageKey),
    /// Anything else, by import path
    External(String),
}

#[derive(Debug, Clone)]
struct FileScope {
    package: PackageKey,
    imports: HashMap<String, ImportTarget>,
    dot_imports: Vec<PackageKey>,
}

/// A type reference resolved to its named type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    /// Declared name of the named type, unqualified
    pub name: String,
    /// Underlying representation, e.g. `uint8` or `string`
    pub underlying: String,
}

/// Resolves type references written in a file.
///
/// Returns `None` when the reference does not denote a named type: a
/// predeclared type, an unnamed composite type, a generic type, an unknown
/// package qualifier, or an invalid recursive chain.
pub trait TypeResolver {
    fn resolve(&self, file: FileId, ty: &TypeExpr) -> Option<ResolvedType>;
}

/// Predeclared basic types, after `byte`/`rune` canonicalization.
const BASIC_TYPES: &[&str] = &[
    "bool",
    "string",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    "float32",
    "float64",
    "complex64",
    "complex128",
];

/// Whether `name` is a predeclared basic type.
pub fn is_basic_type(name: &str) -> bool {
    BASIC_TYPES.contains(&name)
}

/// Canonical spelling of a predeclared type name.
fn predeclared(name: &str) -> Option<&'static str> {
    match name {
        "byte" => Some("uint8"),
        "rune" => Some("int32"),
        "error" => Some("error"),
        "any" => Some("any"),
        "comparable" => Some("comparable"),
        _ => BASIC_TYPES.iter().find(|b| **b == name).copied(),
    }
}

enum Lookup {
    Decl(TypeId),
    Predeclared(&'static str),
    /// A named type declared outside the loaded sources
    Opaque { name: String, spelled: String },
}

/// All type declarations and scopes of a load.
#[derive(Debug, Default)]
pub struct SymbolTable {
    decls: Vec<TypeDecl>,
    scopes: HashMap<PackageKey, HashMap<String, TypeId>>,
    files: Vec<FileScope>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file belonging to `package` and returns its scope id.
    pub fn add_file(&mut self, package: PackageKey) -> FileId {
        self.scopes.entry(package.clone()).or_default();
        self.files.push(FileScope {
            package,
            imports: HashMap::new(),
            dot_imports: Vec::new(),
        });
        FileId(self.files.len() - 1)
    }

    /// Declares a type in the file's package scope.
    ///
    /// Returns the previous declaration's id if the name is already taken.
    /// Blank names are not declared.
    pub fn declare_type(
        &mut self,
        file: FileId,
        path: &Path,
        spec: &TypeSpec,
    ) -> Result<Option<TypeId>, TypeId> {
        if spec.name.is_blank() {
            return Ok(None);
        }
        let package = self.files[file.0].package.clone();
        let scope = self.scopes.entry(package.clone()).or_default();
        if let Some(&existing) = scope.get(&spec.name.name) {
            return Err(existing);
        }
        let id = TypeId(self.decls.len());
        scope.insert(spec.name.name.clone(), id);
        self.decls.push(TypeDecl {
            name: spec.name.name.clone(),
            package,
            alias: spec.alias,
            generic: spec.generic,
            ty: spec.ty.clone(),
            file,
            path: path.to_path_buf(),
            span: spec.name.span,
        });
        Ok(Some(id))
    }

    /// Binds an import in a file scope. `.` merges the package scope into
    /// the file; `_` binds nothing.
    pub fn bind_import(&mut self, file: FileId, name: &str, target: ImportTarget) {
        let scope = &mut self.files[file.0];
        match name {
            "_" => {}
            "." => {
                if let ImportTarget::Package(key) = target {
                    scope.dot_imports.push(key);
                }
            }
            _ => {
                scope.imports.insert(name.to_string(), target);
            }
        }
    }

    pub fn decl(&self, id: TypeId) -> &TypeDecl {
        &self.decls[id.0]
    }

    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> {
        (0..self.decls.len()).map(TypeId)
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Looks up a type by name in a package scope.
    pub fn lookup_type(&self, package: &PackageKey, name: &str) -> Option<TypeId> {
        self.scopes.get(package)?.get(name).copied()
    }

    fn lookup(&self, file: FileId, ty: &TypeExpr) -> Option<Lookup> {
        let scope = &self.files[file.0];
        match ty.unparen() {
            TypeExpr::Name(id) => {
                if let Some(found) = self.lookup_type(&scope.package, &id.name) {
                    return Some(Lookup::Decl(found));
                }
                if let Some(found) = scope
                    .dot_imports
                    .iter()
                    .find_map(|key| self.lookup_type(key, &id.name))
                {
                    return Some(Lookup::Decl(found));
                }
                if let Some(name) = predeclared(&id.name) {
                    return Some(Lookup::Predeclared(name));
                }
                Some(Lookup::Opaque {
                    name: id.name.clone(),
                    spelled: id.name.clone(),
                })
            }
            TypeExpr::Qualified { package, name } => {
                let spelled = format!("{}.{}", package.name, name.name);
                match scope.imports.get(&package.name)? {
                    ImportTarget::Package(key) => match self.lookup_type(key, &name.name) {
                        Some(found) => Some(Lookup::Decl(found)),
                        None => Some(Lookup::Opaque {
                            name: name.name.clone(),
                            spelled,
                        }),
                    },
                    ImportTarget::External(_) => Some(Lookup::Opaque {
                        name: name.name.clone(),
                        spelled,
                    }),
                }
            }
            _ => None,
        }
    }

    /// The declaration a type's definition names directly, if any:
    /// `B` for `type A B`, nothing for `type A []B`.
    pub fn direct_target(&self, id: TypeId) -> Option<TypeId> {
        let decl = self.decl(id);
        match self.lookup(decl.file, &decl.ty)? {
            Lookup::Decl(target) => Some(target),
            _ => None,
        }
    }

    /// Follows the definition chain of a declared type down to its
    /// underlying representation. `None` on a cycle.
    pub fn underlying(&self, id: TypeId) -> Option<String> {
        let mut visited = HashSet::new();
        let mut current = id;
        loop {
            if !visited.insert(current) {
                return None;
            }
            let decl = self.decl(current);
            match decl.ty.unparen() {
                TypeExpr::Name(_) | TypeExpr::Qualified { .. } => {
                    match self.lookup(decl.file, &decl.ty)? {
                        Lookup::Decl(next) => current = next,
                        Lookup::Predeclared(name) => return Some(name.to_string()),
                        Lookup::Opaque { spelled, .. } => return Some(spelled),
                    }
                }
                other => return Some(other.render()),
            }
        }
    }
}

impl TypeResolver for SymbolTable {
    fn resolve(&self, file: FileId, ty: &TypeExpr) -> Option<ResolvedType> {
        let mut visited = HashSet::new();
        let mut file = file;
        let mut ty = ty;
        loop {
            match self.lookup(file, ty)? {
                Lookup::Decl(id) => {
                    if !visited.insert(id) {
                        return None;
                    }
                    let decl = self.decl(id);
                    if decl.generic {
                        return None;
                    }
                    if decl.alias {
                        file = decl.file;
                        ty = &decl.ty;
                        continue;
                    }
                    let underlying = self.underlying(id)?;
                    return Some(ResolvedType {
                        name: decl.name.clone(),
                        underlying,
                    });
                }
                Lookup::Predeclared(_) => return None,
                Lookup::Opaque { name, spelled } => {
                    return Some(ResolvedType {
                        name,
                        underlying: spelled,
                    })
                }
            }
        }
    }
}
