//! Enumeration member extraction from Go `const` declarations.
//!
//! Each `const` group is folded in source order with the last explicit
//! type as the accumulator:
//! - `A StatusEnum = "a"` sets the carried type and yields `A`
//! - `B` (no type, no value) reuses the carried type
//! - `C = 5` (value, no type) is skipped and leaves the carried type as is
//!
//! The carried type starts empty in every group. A name yields a member
//! only if its type resolves to a named type whose name the matcher accepts.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::trace;

use super::enum_merge::EnumKey;
use super::pattern::NameMatcher;
use crate::loader::CompilationUnit;
use crate::symbols::TypeResolver;
use crate::syntax::{TypeExpr, ValueGroup, ValueSpec};

/// An enumeration type as seen from one declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnumDefinition {
    /// Declared type name
    pub name: String,
    /// Underlying representation, e.g. `int` or `string`
    pub base_type: String,
    /// Package clause name of the declaring file
    pub package: String,
    /// Directory of the declaring file
    pub dir: PathBuf,
    /// Declared in a `_test.go` file
    pub is_test: bool,
}

impl EnumDefinition {
    /// Identity used when merging: everything but the base type.
    pub fn key(&self) -> EnumKey {
        EnumKey {
            dir: self.dir.clone(),
            package: self.package.clone(),
            is_test: self.is_test,
            name: self.name.clone(),
        }
    }
}

/// Extracts `(definition, member name)` pairs from one compilation unit.
pub fn extract<R, M>(unit: &CompilationUnit, resolver: &R, matcher: &M) -> Vec<(EnumDefinition, String)>
where
    R: TypeResolver + ?Sized,
    M: NameMatcher + ?Sized,
{
    unit.file
        .const_groups()
        .flat_map(|group| extract_group(unit, group, resolver, matcher))
        .collect()
}

fn extract_group<R, M>(
    unit: &CompilationUnit,
    group: &ValueGroup,
    resolver: &R,
    matcher: &M,
) -> Vec<(EnumDefinition, String)>
where
    R: TypeResolver + ?Sized,
    M: NameMatcher + ?Sized,
{
    let (_, pairs) = group.specs.iter().fold(
        (None::<&TypeExpr>, Vec::new()),
        |(carried, mut pairs), spec| {
            let carried = match (&spec.ty, spec.values.is_empty()) {
                (Some(ty), _) => Some(ty),
                (None, true) => carried,
                (None, false) => {
                    trace!(
                        file = %unit.path.display(),
                        line = spec_line(spec),
                        "Skipping const without explicit type"
                    );
                    return (carried, pairs);
                }
            };
            if let Some(ty) = carried {
                pairs.extend(accept(unit, spec, ty, resolver, matcher));
            }
            (carried, pairs)
        },
    );
    pairs
}

fn accept<R, M>(
    unit: &CompilationUnit,
    spec: &ValueSpec,
    ty: &TypeExpr,
    resolver: &R,
    matcher: &M,
) -> Vec<(EnumDefinition, String)>
where
    R: TypeResolver + ?Sized,
    M: NameMatcher + ?Sized,
{
    let Some(resolved) = resolver.resolve(unit.file_id, ty) else {
        trace!(
            file = %unit.path.display(),
            line = spec_line(spec),
            ty = %ty.render(),
            "Skipping const of unnamed type"
        );
        return Vec::new();
    };
    if !matcher.matches(&resolved.name) {
        return Vec::new();
    }

    let definition = EnumDefinition {
        name: resolved.name,
        base_type: resolved.underlying,
        package: unit.package.clone(),
        dir: unit.dir.clone(),
        is_test: unit.is_test,
    };
    spec.names
        .iter()
        .filter(|name| !name.is_blank())
        .map(|name| (definition.clone(), name.name.clone()))
        .collect()
}

fn spec_line(spec: &ValueSpec) -> usize {
    spec.names.first().map(|n| n.span.line).unwrap_or_default()
}
